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

//! Final answer of a solve.
//!
//! A job-shop instance always has a schedule, so the only question is whether
//! the search finished: `Optimal` when the tree was exhausted, `Feasible` when
//! a budget or an interrupt stopped it first (the best schedule is returned
//! but optimality is not proven), and `Unknown` when it stopped before any
//! schedule was known.

use crate::stats::SolverStatistics;
use num_traits::{PrimInt, Signed};
use shopfloor_model::solution::Schedule;

/// The best schedule a solve produced and how much is known about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// The schedule is proven optimal.
    Optimal(Schedule<T>),
    /// The schedule is the best found, optimality not proven.
    Feasible(Schedule<T>),
    /// The search stopped before any schedule was found.
    Unknown,
}

impl<T> SolverResult<T> {
    /// Returns the schedule, if any.
    #[inline]
    pub fn schedule(&self) -> Option<&Schedule<T>> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Unknown => None,
        }
    }

    /// Consumes the result and returns the schedule, if any.
    #[inline]
    pub fn into_schedule(self) -> Option<Schedule<T>> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(s) => write!(f, "Optimal(makespan={})", s.makespan()),
            SolverResult::Feasible(s) => write!(f, "Feasible(makespan={})", s.makespan()),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why the solve ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search tree was exhausted.
    OptimalityProven,
    /// A budget or an interrupt stopped the search.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::Aborted(reason) => {
                write!(f, "Aborted: {} (optimality not proven)", reason)
            }
        }
    }
}

/// Result, termination reason and statistics of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome<T> {
    result: SolverResult<T>,
    reason: TerminationReason,
    statistics: SolverStatistics,
}

impl<T> SolverOutcome<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new(
        result: SolverResult<T>,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// Returns `true` if the schedule is proven optimal.
    #[inline]
    pub fn is_optimality_proven(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    /// Returns the best schedule, if any.
    #[inline]
    pub fn best_schedule(&self) -> Option<&Schedule<T>> {
        self.result.schedule()
    }

    /// Returns the best makespan, if any.
    #[inline]
    pub fn best_makespan(&self) -> Option<T> {
        self.result.schedule().map(Schedule::makespan)
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.reason)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SolverStatisticsBuilder;

    #[test]
    fn test_optimal_outcome_accessors() {
        let outcome = SolverOutcome::new(
            SolverResult::Optimal(Schedule::<i64>::new(5, vec![0, 3, 0, 3])),
            TerminationReason::OptimalityProven,
            SolverStatisticsBuilder::new().build(),
        );
        assert!(outcome.is_optimality_proven());
        assert_eq!(outcome.best_makespan(), Some(5));
        assert_eq!(outcome.best_schedule().unwrap().start_times(), &[0, 3, 0, 3]);
    }

    #[test]
    fn test_aborted_outcome_is_not_proven() {
        let outcome = SolverOutcome::new(
            SolverResult::Feasible(Schedule::<i64>::new(7, vec![0])),
            TerminationReason::Aborted("node budget exhausted".into()),
            SolverStatisticsBuilder::new().build(),
        );
        assert!(!outcome.is_optimality_proven());
        assert_eq!(outcome.best_makespan(), Some(7));
        let rendered = outcome.to_string();
        assert!(rendered.contains("Feasible(makespan=7)"));
        assert!(rendered.contains("optimality not proven"));
    }

    #[test]
    fn test_unknown_has_no_schedule() {
        let result = SolverResult::<i64>::Unknown;
        assert!(result.schedule().is_none());
        assert!(result.into_schedule().is_none());
    }
}
