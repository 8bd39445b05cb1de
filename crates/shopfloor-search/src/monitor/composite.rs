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

//! Fans every callback out to a list of monitors.
//!
//! `search_command` returns the first `Terminate` in insertion order.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};

/// A monitor that forwards to several boxed monitors.
pub struct CompositeMonitor<'a, T> {
    monitors: Vec<Box<dyn SearchMonitor<T> + 'a>>,
}

impl<'a, T> std::fmt::Debug for CompositeMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.monitors.iter().map(|m| m.name()).collect();
        f.debug_struct("CompositeMonitor")
            .field("monitors", &names.join(", "))
            .finish()
    }
}

impl<'a, T> Default for CompositeMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn SearchMonitor<T> + 'a>> for CompositeMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> SearchMonitor<T> for CompositeMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(model);
        }
    }

    fn on_exit_search(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search();
        }
    }

    fn on_solution_found(&mut self, schedule: &Schedule<T>) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(schedule);
        }
    }

    fn on_step(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_step();
        }
    }

    fn on_node_explored(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_node_explored();
        }
    }

    fn search_command(&self) -> SearchCommand {
        // Hot path; a plain loop avoids building an iterator adapter chain.
        for monitor in &self.monitors {
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::CompositeMonitor;
    use crate::monitor::{
        interrupt::InterruptMonitor,
        node_limit::NodeLimitMonitor,
        search_monitor::{SearchCommand, SearchMonitor},
        solution::SolutionMonitor,
    };
    use shopfloor_model::solution::Schedule;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    #[test]
    fn test_empty_composite_continues() {
        let composite = CompositeMonitor::<i64>::new();
        assert!(composite.is_empty());
        assert_eq!(composite.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_forwards_callbacks_and_first_terminate_wins() {
        let stop = AtomicBool::new(false);
        let nodes = AtomicU64::new(0);
        let solutions = AtomicU64::new(0);

        let mut composite = CompositeMonitor::<i64>::with_capacity(3);
        composite.add_monitor(InterruptMonitor::new(&stop));
        composite.add_monitor(NodeLimitMonitor::new(&nodes, 2));
        composite.add_monitor(SolutionMonitor::without_limit(&solutions));
        assert_eq!(composite.len(), 3);

        composite.on_node_explored();
        composite.on_solution_found(&Schedule::new(4, Vec::new()));
        assert_eq!(nodes.load(Ordering::Relaxed), 1);
        assert_eq!(solutions.load(Ordering::Relaxed), 1);
        assert_eq!(composite.search_command(), SearchCommand::Continue);

        composite.on_node_explored();
        stop.store(true, Ordering::Relaxed);
        assert_eq!(
            composite.search_command(),
            SearchCommand::Terminate("interrupt signal received".to_string())
        );
    }
}
