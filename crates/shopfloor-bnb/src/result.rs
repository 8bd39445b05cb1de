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

use crate::stats::BnbSolverStatistics;
use num_traits::{PrimInt, Signed};
use shopfloor_model::solution::Schedule;
use shopfloor_search::result::{SolverResult, TerminationReason};

/// Result of one engine run.
///
/// `TerminationReason::OptimalityProven` means the run exhausted its (sub)tree:
/// no schedule below its root beats the returned one, or, if the result is
/// `Unknown`, beats the upper bound the run started from. `Aborted` means a
/// monitor stopped the run early.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl<T> BnbSolverOutcome<T> {
    /// The tree was exhausted. `schedule` is the best schedule this run
    /// found, if it found any.
    #[inline]
    pub fn exhausted(schedule: Option<Schedule<T>>, statistics: BnbSolverStatistics) -> Self {
        let result = match schedule {
            Some(s) => SolverResult::Optimal(s),
            None => SolverResult::Unknown,
        };
        Self {
            result,
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    /// A monitor stopped the run with `reason`.
    #[inline]
    pub fn aborted<R>(
        schedule: Option<Schedule<T>>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        let result = match schedule {
            Some(s) => SolverResult::Feasible(s),
            None => SolverResult::Unknown,
        };
        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Returns `true` if the run explored its whole tree.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.termination_reason, TerminationReason::OptimalityProven)
    }

    /// Returns the best schedule found by this run, if any.
    #[inline]
    pub fn best_schedule(&self) -> Option<&Schedule<T>> {
        self.result.schedule()
    }

    /// Splits the outcome into its parts.
    #[inline]
    pub fn into_parts(self) -> (SolverResult<T>, TerminationReason, BnbSolverStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolverOutcome(result: {}, reason: {}, nodes: {})",
            self.result, self.termination_reason, self.statistics.nodes_explored
        )
    }
}
