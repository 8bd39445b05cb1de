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

//! Wall-clock budget.
//!
//! Reading the clock on every step is measurable in a tight search loop, so
//! the monitor only looks at it when `steps & clock_check_mask == 0`. The
//! first step of every search reads it as well, so a run made of many short
//! searches cannot slip past the deadline. The mask is expected to be of the
//! form `2^k - 1`.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use std::time::{Duration, Instant};

/// Terminates the search once `time_limit` has elapsed since the monitor's start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor<T> {
    clock_check_mask: u64,
    steps: u64,
    time_limit: Duration,
    start_time: Instant,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    /// Creates a monitor that checks the clock every 16384 steps.
    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_STEP_CLOCK_CHECK_MASK)
    }

    /// Creates a monitor with a custom check mask. A mask of `0` checks on every step.
    #[inline]
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit,
            start_time: Instant::now(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Creates a monitor measuring from `start_time` instead of `on_enter_search`.
    ///
    /// Workers of one solve share the same deadline this way.
    #[inline]
    pub fn with_start(time_limit: Duration, start_time: Instant) -> Self {
        Self {
            start_time,
            ..Self::new(time_limit)
        }
    }
}

impl<T> SearchMonitor<T> for TimeLimitMonitor<T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>) {
        // The next step wraps onto the mask.
        self.steps = self.clock_check_mask;
    }

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _schedule: &Schedule<T>) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if (self.steps & self.clock_check_mask) == 0 && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::TimeLimitMonitor;
    use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
    use shopfloor_model::{
        index::{JobIndex, MachineIndex},
        model::{Model, ModelBuilder},
    };
    use std::time::{Duration, Instant};

    fn single_operation() -> Model<i64> {
        let mut b = ModelBuilder::new(1, 1);
        b.add_operation(JobIndex::new(0), MachineIndex::new(0), 1);
        b.build().unwrap()
    }

    #[test]
    fn test_zero_limit_terminates_on_checked_step() {
        let monitor = TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::ZERO, 0);
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate("time limit reached".to_string())
        );
    }

    #[test]
    fn test_generous_limit_continues() {
        let mut monitor =
            TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::from_secs(3600), 0);
        for _ in 0..10 {
            monitor.on_step();
            assert_eq!(monitor.search_command(), SearchCommand::Continue);
        }
    }

    #[test]
    fn test_clock_is_only_read_on_masked_steps() {
        let mut monitor = TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::ZERO, 0b11);
        monitor.on_step();
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
        monitor.on_step();
        monitor.on_step();
        monitor.on_step();
        assert!(matches!(monitor.search_command(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_shared_start_in_the_past_expires() {
        let Some(start) = Instant::now().checked_sub(Duration::from_secs(10)) else {
            return;
        };
        let monitor = TimeLimitMonitor::<i64>::with_start(Duration::from_secs(1), start);
        assert!(matches!(monitor.search_command(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_first_step_of_each_search_reads_the_clock() {
        let model = single_operation();
        let mut monitor = TimeLimitMonitor::<i64>::new(Duration::ZERO);

        monitor.on_enter_search(&model);
        monitor.on_step();
        assert!(matches!(monitor.search_command(), SearchCommand::Terminate(_)));
        monitor.on_step();
        assert_eq!(monitor.search_command(), SearchCommand::Continue);

        // A later short search is checked again right away.
        monitor.on_exit_search();
        monitor.on_enter_search(&model);
        monitor.on_step();
        assert!(matches!(monitor.search_command(), SearchCommand::Terminate(_)));
    }
}
