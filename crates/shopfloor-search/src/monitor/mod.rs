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

//! # Search Monitors
//!
//! Pluggable observers and controllers for a worker's search. Monitors
//! enforce budgets (time, nodes, solutions), react to external interrupts and
//! issue termination commands, without the search loop knowing about them.
//!
//! - `search_monitor`: The `SearchMonitor<T>` trait and `SearchCommand`.
//! - `composite`: Combines several monitors into one.
//! - `interrupt`: Stops on a shared `AtomicBool`.
//! - `node_limit`: Global node budget through a shared `AtomicU64`.
//! - `solution`: Global solution counter with an optional limit.
//! - `time_limit`: Wall-clock budget with step-filtered clock reads.

pub mod composite;
pub mod interrupt;
pub mod node_limit;
pub mod search_monitor;
pub mod solution;
pub mod time_limit;
