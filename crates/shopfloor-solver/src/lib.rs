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

//! # Shopfloor Solver
//!
//! Exact job-shop scheduling on a pool of worker threads. The crate splits
//! the branch-and-bound tree of `shopfloor-bnb` into subproblems, hands them
//! to workers that share one incumbent, and turns their runs into a single
//! `SolverOutcome`.
//!
//! ## Modules
//!
//! - `solver`: `Solver`, its builder and the shared search context.
//! - `config`: `SolverConfig` and the distribution `Strategy`.
//! - `frontier`: breadth-first frontier of the static strategy.
//! - `queue`: bounded work queue of the dynamic strategy.
//! - `seed`: constructive heuristics for an initial incumbent.
//! - `error`: `SolverError`.

pub mod config;
pub mod error;
pub mod frontier;
pub mod queue;
pub mod seed;
pub mod solver;
