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

//! Shopfloor-BnB: exact branch-and-bound for the job-shop problem
//!
//! Depth-first search over partial schedules. Every node fixes the next
//! operation of one job at its earliest feasible start, so the leaves are
//! exactly the semi-active schedules, and one of them is optimal for the
//! makespan. Branching, bounding and monitoring are separate strategies
//! that plug into one engine.
//!
//! Core flow
//! - Provide a `shopfloor_model::Model<T>`.
//! - Choose a `branching::DecisionBuilder` (child ordering).
//! - Choose an `eval::BoundEvaluator` (admissible lower bound).
//! - Optionally pass a shared incumbent, a subproblem and monitors.
//! - Run `bnb::BnbSolver`.
//!
//! Assumptions and guarantees
//! - Bounds must never exceed the best makespan reachable from a node;
//!   pruning is exact only under that condition.
//! - A schedule is installed only if strictly better than the incumbent.
//! - The state is mutated in place and restored through a trail; the engine
//!   is clean after every solve.
//!
//! Module map
//! - `bnb`: the engine and its search session.
//! - `branching`: decisions and decision builders.
//! - `eval`: bound evaluators and their brute-force check.
//! - `monitor`: tree-search monitors (log, composite, wrappers).
//! - `result`: engine outcomes.
//! - `state`: the partial schedule at a node.
//! - `stats`: counters and timing.
//! - `subproblem`: subtrees addressed by path, for parallel search.
//! - `trail`: undo log for the state.

pub mod bnb;
pub mod branching;
pub mod eval;
mod incumbent;
pub mod monitor;
pub mod result;
mod stack;
pub mod state;
pub mod stats;
pub mod subproblem;
pub mod trail;
