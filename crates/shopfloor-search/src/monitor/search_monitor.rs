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

//! Core monitor trait for the search lifecycle.
//!
//! A `SearchMonitor` observes a single worker's search and may ask it to stop
//! by returning `SearchCommand::Terminate` from `search_command`. Monitors that
//! enforce global budgets share their counters through atomics, so each worker
//! owns its own monitor instance.

use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};

/// The instruction a monitor gives to the search loop.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    /// Keep searching.
    #[default]
    Continue,
    /// Stop as soon as possible, with a human-readable reason.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Observes and controls one worker's search.
pub trait SearchMonitor<T>
where
    T: PrimInt + Signed,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called once before the search starts.
    fn on_enter_search(&mut self, model: &Model<T>);
    /// Called once after the search ended.
    fn on_exit_search(&mut self);
    /// Called whenever the worker improves on its best schedule.
    fn on_solution_found(&mut self, schedule: &Schedule<T>);
    /// Called once per search step (node visit or backtrack).
    fn on_step(&mut self);
    /// Called once per node the search enters.
    fn on_node_explored(&mut self) {}
    /// Asks the monitor whether the search may continue.
    fn search_command(&self) -> SearchCommand;
}

impl<T> std::fmt::Debug for dyn SearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn SearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}
