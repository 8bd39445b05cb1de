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

//! # Schedules
//!
//! A `Schedule<T>` fixes a start time for every operation of a model and
//! records the resulting makespan. Start times are stored flattened in the
//! same job-major order as `Model::operations`.
//!
//! Schedules carry no reference to the model they were built for. Use
//! `Schedule::validate` to check one against a model: it reports the first
//! violated constraint (shape, precedence, machine overlap or a makespan that
//! does not match the start times) as a `ScheduleViolation`.

use crate::{
    index::{JobIndex, MachineIndex},
    model::{Model, OperationRef},
};
use num_traits::{PrimInt, Signed};

/// The first constraint a schedule breaks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleViolation {
    /// The schedule has a different number of start times than the model has operations.
    #[error("schedule has {actual} start times, but the model has {expected} operations")]
    ShapeMismatch { expected: usize, actual: usize },
    /// An operation starts before time zero.
    #[error("operation {operation} starts before time zero")]
    NegativeStart { operation: OperationRef },
    /// An operation starts before its job predecessor completes.
    #[error("operation {operation} starts before its predecessor in the job completes")]
    PrecedenceViolated { operation: OperationRef },
    /// Two operations overlap on the same machine.
    #[error("operations {first} and {second} overlap on machine {machine}")]
    MachineOverlap {
        machine: usize,
        first: OperationRef,
        second: OperationRef,
    },
    /// The stored makespan differs from the latest completion time.
    #[error("schedule reports makespan {reported}, but its operations complete at {actual}")]
    MakespanMismatch { reported: i64, actual: i64 },
}

/// Start times for every operation together with the resulting makespan.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Schedule<T> {
    makespan: T,
    start_times: Vec<T>,
}

impl<T> Schedule<T>
where
    T: PrimInt + Signed,
{
    /// Creates a schedule from a makespan and flattened start times.
    ///
    /// No consistency checks are performed; see `validate`.
    #[inline]
    pub fn new(makespan: T, start_times: Vec<T>) -> Self {
        Self {
            makespan,
            start_times,
        }
    }

    /// Creates a schedule from flattened start times, deriving the makespan
    /// from the model's durations.
    ///
    /// # Panics
    ///
    /// Panics if `start_times.len() != model.num_operations()`.
    pub fn from_start_times(model: &Model<T>, start_times: Vec<T>) -> Self {
        assert_eq!(
            start_times.len(),
            model.num_operations(),
            "called `Schedule::from_start_times` with inconsistent lengths: start_times.len() = {}, model.num_operations() = {}",
            start_times.len(),
            model.num_operations()
        );

        let makespan = start_times
            .iter()
            .zip(model.operations())
            .map(|(&start, op)| start.saturating_add(op.duration()))
            .max()
            .unwrap_or_else(T::zero);

        Self {
            makespan,
            start_times,
        }
    }

    /// The completion time of the last operation.
    #[inline]
    pub fn makespan(&self) -> T {
        self.makespan
    }

    /// All start times in job-major order.
    #[inline]
    pub fn start_times(&self) -> &[T] {
        &self.start_times
    }

    /// Returns the number of scheduled operations.
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.start_times.len()
    }

    /// Returns the start time of `(job, position)`.
    #[inline]
    pub fn start_time(&self, model: &Model<T>, job: JobIndex, position: usize) -> T {
        self.start_times[model.operation_offset(job, position)]
    }

    /// Returns the completion time of `(job, position)`.
    #[inline]
    pub fn completion_time(&self, model: &Model<T>, job: JobIndex, position: usize) -> T {
        let duration = model.operation(job, position).duration();
        self.start_time(model, job, position).saturating_add(duration)
    }

    /// Checks the schedule against every constraint of `model`.
    pub fn validate(&self, model: &Model<T>) -> Result<(), ScheduleViolation>
    where
        T: Into<i64>,
    {
        if self.start_times.len() != model.num_operations() {
            return Err(ScheduleViolation::ShapeMismatch {
                expected: model.num_operations(),
                actual: self.start_times.len(),
            });
        }

        let mut latest_completion = T::zero();
        for j in 0..model.num_jobs() {
            let job = JobIndex::new(j);
            let mut job_ready = T::zero();
            for position in 0..model.num_job_operations(job) {
                let operation = OperationRef::new(job, position);
                let start = self.start_time(model, job, position);
                if start < T::zero() {
                    return Err(ScheduleViolation::NegativeStart { operation });
                }
                if start < job_ready {
                    return Err(ScheduleViolation::PrecedenceViolated { operation });
                }
                job_ready = self.completion_time(model, job, position);
                latest_completion = latest_completion.max(job_ready);
            }
        }

        for m in 0..model.num_machines() {
            let mut intervals: Vec<(T, T, OperationRef)> = model
                .machine_operations(MachineIndex::new(m))
                .iter()
                .map(|&op| {
                    (
                        self.start_time(model, op.job, op.position),
                        self.completion_time(model, op.job, op.position),
                        op,
                    )
                })
                .collect();
            intervals.sort_unstable();

            for pair in intervals.windows(2) {
                let (_, first_end, first) = pair[0];
                let (second_start, _, second) = pair[1];
                if second_start < first_end {
                    return Err(ScheduleViolation::MachineOverlap {
                        machine: m,
                        first,
                        second,
                    });
                }
            }
        }

        if latest_completion != self.makespan {
            return Err(ScheduleViolation::MakespanMismatch {
                reported: self.makespan.into(),
                actual: latest_completion.into(),
            });
        }

        Ok(())
    }
}

impl<T> std::fmt::Display for Schedule<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Schedule Summary")?;
        writeln!(f, "   Makespan: {}", self.makespan)?;
        writeln!(f, "   Operations: {}", self.start_times.len())?;
        if self.start_times.is_empty() {
            writeln!(f, "   (No operations scheduled)")?;
            return Ok(());
        }
        write!(f, "   Start times:")?;
        for start in &self.start_times {
            write!(f, " {}", start)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    type IntegerType = i64;

    fn two_by_two() -> Model<IntegerType> {
        let mut b = ModelBuilder::new(2, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 3), (MachineIndex::new(1), 2)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(1), 2), (MachineIndex::new(0), 1)]);
        b.build().expect("valid instance")
    }

    #[test]
    fn test_optimal_two_by_two_is_valid() {
        let model = two_by_two();
        // J0: M0 [0,3) M1 [3,5); J1: M1 [0,2) M0 [3,4)
        let schedule = Schedule::from_start_times(&model, vec![0, 3, 0, 3]);
        assert_eq!(schedule.makespan(), 5);
        assert_eq!(schedule.validate(&model), Ok(()));
        assert_eq!(schedule.completion_time(&model, JobIndex::new(1), 1), 4);
    }

    #[test]
    fn test_precedence_violation_is_reported() {
        let model = two_by_two();
        let schedule = Schedule::from_start_times(&model, vec![0, 2, 0, 3]);
        assert_eq!(
            schedule.validate(&model),
            Err(ScheduleViolation::PrecedenceViolated {
                operation: OperationRef::new(JobIndex::new(0), 1)
            })
        );
    }

    #[test]
    fn test_machine_overlap_is_reported() {
        let model = two_by_two();
        let schedule = Schedule::from_start_times(&model, vec![0, 3, 0, 2]);
        assert!(matches!(
            schedule.validate(&model),
            Err(ScheduleViolation::MachineOverlap { machine: 0, .. })
        ));
    }

    #[test]
    fn test_makespan_mismatch_is_reported() {
        let model = two_by_two();
        let schedule = Schedule::new(4, vec![0, 3, 0, 3]);
        assert_eq!(
            schedule.validate(&model),
            Err(ScheduleViolation::MakespanMismatch {
                reported: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_shape_and_negative_start_are_reported() {
        let model = two_by_two();
        assert!(matches!(
            Schedule::new(5, vec![0, 3]).validate(&model),
            Err(ScheduleViolation::ShapeMismatch {
                expected: 4,
                actual: 2
            })
        ));
        assert!(matches!(
            Schedule::new(5, vec![-1, 3, 0, 3]).validate(&model),
            Err(ScheduleViolation::NegativeStart { .. })
        ));
    }

    #[test]
    fn test_zero_length_operations_may_share_a_start() {
        let mut builder = ModelBuilder::<IntegerType>::new(2, 1);
        builder
            .add_operation(JobIndex::new(0), MachineIndex::new(0), 0)
            .add_operation(JobIndex::new(1), MachineIndex::new(0), 4);
        let model = builder.build().unwrap();
        let schedule = Schedule::from_start_times(&model, vec![0, 0]);
        assert_eq!(schedule.validate(&model), Ok(()));
    }

    #[test]
    fn test_display_lists_makespan() {
        let rendered = format!("{}", Schedule::<IntegerType>::new(5, vec![0, 3]));
        assert!(rendered.contains("Makespan: 5"));
        assert!(rendered.contains("Start times: 0 3"));
    }
}
