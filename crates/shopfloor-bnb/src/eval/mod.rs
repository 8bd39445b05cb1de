// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Lower bounds on the makespan reachable from a partial schedule.
//!
//! Admissibility requirement:
//! - Every `BoundEvaluator` must return a value that never exceeds the best
//!   makespan of any completion of the given state. The engine prunes a node
//!   as soon as its bound reaches the incumbent, so an inadmissible bound
//!   silently loses optimal schedules. Use
//!   `validation::is_admissible_exhaustive` to check custom evaluators on
//!   small instances.
//!
//! Submodules:
//! - `evaluator`: the `BoundEvaluator` trait and the `TrivialBound`.
//! - `job`: per-job critical path bound.
//! - `machine`: per-machine workload and sequencing bounds.
//! - `combined`: the maximum of two bounds.
//! - `validation`: brute-force admissibility check.

pub mod combined;
pub mod evaluator;
pub mod job;
pub mod machine;
pub mod validation;
