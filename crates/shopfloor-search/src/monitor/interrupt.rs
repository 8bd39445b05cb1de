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

//! Stops a worker when a shared flag is raised.
//!
//! The coordinator raises the flag once any worker trips a budget, and callers
//! may raise it themselves to cancel a running solve from another thread.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use std::sync::atomic::{AtomicBool, Ordering};

/// Terminates the search once `stop_flag` is set.
#[derive(Debug, Clone)]
pub struct InterruptMonitor<'a, T> {
    stop_flag: &'a AtomicBool,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> InterruptMonitor<'a, T> {
    #[inline(always)]
    pub fn new(stop_flag: &'a AtomicBool) -> Self {
        Self {
            stop_flag,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<'a, T> SearchMonitor<T> for InterruptMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>) {}
    fn on_exit_search(&mut self) {}
    fn on_solution_found(&mut self, _schedule: &Schedule<T>) {}
    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        if self.stop_flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("interrupt signal received".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InterruptMonitor;
    use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_continues_while_flag_is_clear() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::<i64>::new(&flag);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_terminates_once_flag_is_set() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::<i64>::new(&flag);
        flag.store(true, Ordering::Relaxed);
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate("interrupt signal received".to_string())
        );
    }
}
