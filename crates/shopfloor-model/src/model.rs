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

//! # Job-Shop Problem Instance
//!
//! `Model<T>` is the immutable description of a job-shop instance: a set of
//! jobs, each an ordered chain of operations, where every operation occupies
//! one fixed machine for a fixed, non-negative duration. Every job visits each
//! machine exactly once. Machines process at most one operation at a time and
//! operations are never preempted.
//!
//! Operations are stored flattened in job-major order. Alongside the raw
//! tables the model precomputes what the search consults at every node:
//!
//! - the remaining processing time of each job from any position (suffix sums),
//! - the operations each machine has to process, and
//! - the total workload per machine.
//!
//! Models are created through `ModelBuilder`, whose `build` validates the
//! instance and reports the first problem as a `ModelError`. A model that
//! exists is therefore always well formed.
//!
//! ```rust
//! use shopfloor_model::index::{JobIndex, MachineIndex};
//! use shopfloor_model::model::ModelBuilder;
//!
//! let mut builder = ModelBuilder::<i64>::new(2, 2);
//! builder
//!     .add_operation(JobIndex::new(0), MachineIndex::new(0), 3)
//!     .add_operation(JobIndex::new(0), MachineIndex::new(1), 2)
//!     .add_operation(JobIndex::new(1), MachineIndex::new(1), 2)
//!     .add_operation(JobIndex::new(1), MachineIndex::new(0), 1);
//! let model = builder.build().expect("valid instance");
//!
//! assert_eq!(model.num_operations(), 4);
//! assert_eq!(model.remaining_work(JobIndex::new(0), 0), 5);
//! assert_eq!(model.machine_workload(MachineIndex::new(0)), 4);
//! ```

use crate::index::{JobIndex, MachineIndex};
use num_traits::{PrimInt, Signed};

/// A single processing step: one machine, one duration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Operation<T> {
    machine: MachineIndex,
    duration: T,
}

impl<T> Operation<T>
where
    T: Copy,
{
    /// Creates a new operation.
    #[inline]
    pub const fn new(machine: MachineIndex, duration: T) -> Self {
        Self { machine, duration }
    }

    /// The machine this operation occupies.
    #[inline]
    pub fn machine(&self) -> MachineIndex {
        self.machine
    }

    /// The processing time of this operation.
    #[inline]
    pub fn duration(&self) -> T {
        self.duration
    }
}

impl<T> std::fmt::Display for Operation<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(M{}, {})", self.machine.get(), self.duration)
    }
}

/// Addresses an operation by its job and its position inside the job.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OperationRef {
    pub job: JobIndex,
    pub position: usize,
}

impl OperationRef {
    #[inline]
    pub const fn new(job: JobIndex, position: usize) -> Self {
        Self { job, position }
    }
}

impl std::fmt::Display for OperationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "J{}.{}", self.job.get(), self.position)
    }
}

/// Reasons a `ModelBuilder` refuses to produce a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// An operation refers to a machine the instance does not have.
    #[error(
        "operation {position} of job {job} uses machine {machine}, but the instance has {num_machines} machines"
    )]
    MachineOutOfRange {
        job: usize,
        position: usize,
        machine: usize,
        num_machines: usize,
    },
    /// An operation has a negative processing time.
    #[error("operation {position} of job {job} has a negative duration")]
    NegativeDuration { job: usize, position: usize },
    /// A job visits the same machine twice.
    #[error("operation {position} of job {job} revisits machine {machine}")]
    DuplicateMachine {
        job: usize,
        position: usize,
        machine: usize,
    },
    /// A job does not have exactly one operation per machine.
    #[error("job {job} has {operations} operations, but the instance has {num_machines} machines")]
    RaggedJob {
        job: usize,
        operations: usize,
        num_machines: usize,
    },
    /// The sum of all processing times does not fit into the time type.
    #[error("total processing time of the instance overflows the time type")]
    HorizonOverflow,
}

#[inline(always)]
fn job_range(offsets: &[usize], job: usize) -> std::ops::Range<usize> {
    offsets[job]..offsets[job + 1]
}

/// An immutable, validated job-shop instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Model<T> {
    num_machines: usize,
    job_offsets: Vec<usize>,
    operations: Vec<Operation<T>>,
    remaining_work: Vec<T>,
    machine_operations: Vec<Vec<OperationRef>>,
    machine_workloads: Vec<T>,
    total_work: T,
}

impl<T> Model<T>
where
    T: PrimInt + Signed,
{
    /// Returns the number of jobs.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.job_offsets.len() - 1
    }

    /// Returns the number of machines.
    #[inline]
    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Returns the total number of operations over all jobs.
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Returns the number of operations of `job`.
    ///
    /// # Panics
    ///
    /// Panics if `job` is not in `0..num_jobs()`.
    #[inline]
    pub fn num_job_operations(&self, job: JobIndex) -> usize {
        let index = job.get();
        debug_assert!(
            index < self.num_jobs(),
            "called `Model::num_job_operations` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            index
        );

        self.job_offsets[index + 1] - self.job_offsets[index]
    }

    /// Returns the operations of `job` in processing order.
    #[inline]
    pub fn job_operations(&self, job: JobIndex) -> &[Operation<T>] {
        let index = job.get();
        debug_assert!(
            index < self.num_jobs(),
            "called `Model::job_operations` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            index
        );

        &self.operations[job_range(&self.job_offsets, index)]
    }

    /// Returns all operations flattened in job-major order.
    #[inline]
    pub fn operations(&self) -> &[Operation<T>] {
        &self.operations
    }

    /// Returns the offset of `(job, position)` in the flattened operation table.
    #[inline]
    pub fn operation_offset(&self, job: JobIndex, position: usize) -> usize {
        debug_assert!(
            position < self.num_job_operations(job),
            "called `Model::operation_offset` with position out of bounds: the len is {} but the index is {}",
            self.num_job_operations(job),
            position
        );

        self.job_offsets[job.get()] + position
    }

    /// Returns the operation at `position` of `job`.
    ///
    /// # Panics
    ///
    /// Panics if `job` or `position` is out of bounds.
    #[inline]
    pub fn operation(&self, job: JobIndex, position: usize) -> Operation<T> {
        self.job_operations(job)[position]
    }

    /// Returns the operation at `position` of `job` without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `job` is in `0..num_jobs()` and `position`
    /// is in `0..num_job_operations(job)`.
    #[inline]
    pub unsafe fn operation_unchecked(&self, job: JobIndex, position: usize) -> Operation<T> {
        debug_assert!(
            job.get() < self.num_jobs(),
            "called `Model::operation_unchecked` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            job.get()
        );
        debug_assert!(
            position < self.num_job_operations(job),
            "called `Model::operation_unchecked` with position out of bounds: the len is {} but the index is {}",
            self.num_job_operations(job),
            position
        );

        unsafe {
            let offset = *self.job_offsets.get_unchecked(job.get()) + position;
            *self.operations.get_unchecked(offset)
        }
    }

    /// Returns the processing time `job` still needs from `position` on.
    ///
    /// `position == num_job_operations(job)` is allowed and yields zero.
    #[inline]
    pub fn remaining_work(&self, job: JobIndex, position: usize) -> T {
        let range = job_range(&self.job_offsets, job.get());
        debug_assert!(
            position <= range.len(),
            "called `Model::remaining_work` with position out of bounds: the len is {} but the index is {}",
            range.len(),
            position
        );

        if position == range.len() {
            T::zero()
        } else {
            self.remaining_work[range.start + position]
        }
    }

    /// Returns the total processing time of `job`.
    #[inline]
    pub fn job_work(&self, job: JobIndex) -> T {
        self.remaining_work(job, 0)
    }

    /// Returns the operations that run on `machine`, ordered by job then position.
    #[inline]
    pub fn machine_operations(&self, machine: MachineIndex) -> &[OperationRef] {
        let index = machine.get();
        debug_assert!(
            index < self.num_machines(),
            "called `Model::machine_operations` with machine index out of bounds: the len is {} but the index is {}",
            self.num_machines(),
            index
        );

        &self.machine_operations[index]
    }

    /// Returns the summed duration of all operations on `machine`.
    #[inline]
    pub fn machine_workload(&self, machine: MachineIndex) -> T {
        let index = machine.get();
        debug_assert!(
            index < self.num_machines(),
            "called `Model::machine_workload` with machine index out of bounds: the len is {} but the index is {}",
            self.num_machines(),
            index
        );

        self.machine_workloads[index]
    }

    /// Returns the summed duration of every operation in the instance.
    #[inline]
    pub fn total_work(&self) -> T {
        self.total_work
    }

    /// The classic root bound: no schedule can be shorter than its longest
    /// job or than the workload of its busiest machine.
    pub fn trivial_lower_bound(&self) -> T {
        let longest_job = (0..self.num_jobs())
            .map(|j| self.job_work(JobIndex::new(j)))
            .max()
            .unwrap_or_else(T::zero);
        let busiest_machine = self
            .machine_workloads
            .iter()
            .copied()
            .max()
            .unwrap_or_else(T::zero);
        longest_job.max(busiest_machine)
    }
}

impl<T> std::fmt::Debug for Model<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("num_jobs", &self.num_jobs())
            .field("num_machines", &self.num_machines)
            .field("num_operations", &self.operations.len())
            .field("total_work", &self.total_work)
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Model ({} jobs x {} machines, {} operations)",
            self.num_jobs(),
            self.num_machines,
            self.operations.len()
        )?;
        for j in 0..self.num_jobs() {
            write!(f, "   J{:<3}", j)?;
            for op in &self.operations[job_range(&self.job_offsets, j)] {
                write!(f, " {}", op)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Incrementally assembles a `Model`.
///
/// The number of jobs and machines is fixed at construction. Operations are
/// appended to a job in processing order.
#[derive(Clone, Debug)]
pub struct ModelBuilder<T> {
    num_machines: usize,
    jobs: Vec<Vec<Operation<T>>>,
}

impl<T> ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    /// Creates a builder for `num_jobs` empty jobs on `num_machines` machines.
    pub fn new(num_jobs: usize, num_machines: usize) -> Self {
        Self {
            num_machines,
            jobs: vec![Vec::new(); num_jobs],
        }
    }

    /// Returns the number of jobs.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Returns the number of machines.
    #[inline]
    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Appends an operation to the end of `job`.
    ///
    /// Machine and duration are validated by `build`.
    ///
    /// # Panics
    ///
    /// Panics if `job` is not in `0..num_jobs()`.
    #[inline]
    pub fn add_operation(
        &mut self,
        job: JobIndex,
        machine: MachineIndex,
        duration: T,
    ) -> &mut Self {
        let index = job.get();
        assert!(
            index < self.num_jobs(),
            "called `ModelBuilder::add_operation` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            index
        );

        self.jobs[index].push(Operation::new(machine, duration));
        self
    }

    /// Appends a sequence of `(machine, duration)` pairs to the end of `job`.
    pub fn add_operations<I>(&mut self, job: JobIndex, operations: I) -> &mut Self
    where
        I: IntoIterator<Item = (MachineIndex, T)>,
    {
        for (machine, duration) in operations {
            self.add_operation(job, machine, duration);
        }
        self
    }

    /// Validates the instance and freezes it into a `Model`.
    ///
    /// Every job must visit each machine exactly once.
    pub fn build(self) -> Result<Model<T>, ModelError> {
        let num_machines = self.num_machines;
        let num_operations = self.jobs.iter().map(Vec::len).sum();

        let mut job_offsets = Vec::with_capacity(self.jobs.len() + 1);
        let mut operations = Vec::with_capacity(num_operations);
        let mut remaining_work = vec![T::zero(); num_operations];
        let mut machine_operations = vec![Vec::new(); num_machines];
        let mut machine_workloads = vec![T::zero(); num_machines];
        let mut total_work = T::zero();
        let mut visited = vec![false; num_machines];

        job_offsets.push(0);
        for (j, job) in self.jobs.into_iter().enumerate() {
            visited.fill(false);
            for (position, op) in job.iter().enumerate() {
                let machine = op.machine.get();
                if machine >= num_machines {
                    return Err(ModelError::MachineOutOfRange {
                        job: j,
                        position,
                        machine,
                        num_machines,
                    });
                }
                if std::mem::replace(&mut visited[machine], true) {
                    return Err(ModelError::DuplicateMachine {
                        job: j,
                        position,
                        machine,
                    });
                }
                if op.duration < T::zero() {
                    return Err(ModelError::NegativeDuration { job: j, position });
                }
                total_work = total_work
                    .checked_add(&op.duration)
                    .ok_or(ModelError::HorizonOverflow)?;

                machine_workloads[machine] = machine_workloads[machine] + op.duration;
                machine_operations[machine].push(OperationRef::new(JobIndex::new(j), position));
            }
            if job.len() != num_machines {
                return Err(ModelError::RaggedJob {
                    job: j,
                    operations: job.len(),
                    num_machines,
                });
            }

            // Suffix sums cannot overflow once the total fits.
            let start = operations.len();
            let mut suffix = T::zero();
            for (position, op) in job.iter().enumerate().rev() {
                suffix = suffix + op.duration;
                remaining_work[start + position] = suffix;
            }

            operations.extend(job);
            job_offsets.push(operations.len());
        }

        Ok(Model {
            num_machines,
            job_offsets,
            operations,
            remaining_work,
            machine_operations,
            machine_workloads,
            total_work,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn jm(j: usize) -> JobIndex {
        JobIndex::new(j)
    }

    fn mi(m: usize) -> MachineIndex {
        MachineIndex::new(m)
    }

    fn two_by_two() -> Model<IntegerType> {
        let mut builder = ModelBuilder::new(2, 2);
        builder
            .add_operations(jm(0), [(mi(0), 3), (mi(1), 2)])
            .add_operations(jm(1), [(mi(1), 2), (mi(0), 1)]);
        builder.build().expect("valid instance")
    }

    #[test]
    fn test_dimensions_and_offsets() {
        let model = two_by_two();
        assert_eq!(model.num_jobs(), 2);
        assert_eq!(model.num_machines(), 2);
        assert_eq!(model.num_operations(), 4);
        assert_eq!(model.num_job_operations(jm(1)), 2);
        assert_eq!(model.operation_offset(jm(1), 1), 3);
        assert_eq!(model.operation(jm(1), 0), Operation::new(mi(1), 2));
        unsafe {
            assert_eq!(model.operation_unchecked(jm(0), 1), Operation::new(mi(1), 2));
        }
    }

    #[test]
    fn test_remaining_work_is_suffix_sum() {
        let model = two_by_two();
        assert_eq!(model.remaining_work(jm(0), 0), 5);
        assert_eq!(model.remaining_work(jm(0), 1), 2);
        assert_eq!(model.remaining_work(jm(0), 2), 0);
        assert_eq!(model.job_work(jm(1)), 3);
    }

    #[test]
    fn test_machine_tables() {
        let model = two_by_two();
        assert_eq!(model.machine_workload(mi(0)), 4);
        assert_eq!(model.machine_workload(mi(1)), 4);
        assert_eq!(
            model.machine_operations(mi(0)),
            &[OperationRef::new(jm(0), 0), OperationRef::new(jm(1), 1)]
        );
        assert_eq!(model.total_work(), 8);
        assert_eq!(model.trivial_lower_bound(), 5);
    }

    #[test]
    fn test_machine_out_of_range_is_rejected() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 2);
        builder.add_operation(jm(0), mi(0), 1).add_operation(jm(0), mi(5), 1);
        assert_eq!(
            builder.build(),
            Err(ModelError::MachineOutOfRange {
                job: 0,
                position: 1,
                machine: 5,
                num_machines: 2
            })
        );
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let mut builder = ModelBuilder::<IntegerType>::new(2, 1);
        builder.add_operation(jm(0), mi(0), 1).add_operation(jm(1), mi(0), -3);
        assert_eq!(
            builder.build(),
            Err(ModelError::NegativeDuration { job: 1, position: 0 })
        );
    }

    #[test]
    fn test_ragged_job_is_rejected() {
        let mut builder = ModelBuilder::<IntegerType>::new(2, 2);
        builder
            .add_operations(jm(0), [(mi(0), 3), (mi(1), 2)])
            .add_operation(jm(1), mi(1), 2);
        assert_eq!(
            builder.build(),
            Err(ModelError::RaggedJob {
                job: 1,
                operations: 1,
                num_machines: 2
            })
        );
    }

    #[test]
    fn test_duplicate_machine_is_rejected() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 3);
        builder.add_operations(jm(0), [(mi(2), 1), (mi(0), 4), (mi(2), 1)]);
        assert_eq!(
            builder.build(),
            Err(ModelError::DuplicateMachine {
                job: 0,
                position: 2,
                machine: 2
            })
        );
    }

    #[test]
    fn test_empty_job_is_ragged() {
        let model = ModelBuilder::<IntegerType>::new(1, 1).build();
        assert_eq!(
            model,
            Err(ModelError::RaggedJob {
                job: 0,
                operations: 0,
                num_machines: 1
            })
        );
    }

    #[test]
    fn test_overflowing_horizon_is_rejected() {
        let mut builder = ModelBuilder::<i8>::new(2, 1);
        builder
            .add_operation(jm(0), mi(0), 100)
            .add_operation(jm(1), mi(0), 100);
        assert_eq!(builder.build(), Err(ModelError::HorizonOverflow));
    }

    #[test]
    fn test_empty_instance_is_valid() {
        let model = ModelBuilder::<IntegerType>::new(0, 0).build().unwrap();
        assert_eq!(model.num_jobs(), 0);
        assert_eq!(model.num_operations(), 0);
        assert_eq!(model.trivial_lower_bound(), 0);
    }

    #[test]
    fn test_zero_duration_operations_are_allowed() {
        let mut builder = ModelBuilder::<IntegerType>::new(1, 1);
        builder.add_operation(jm(0), mi(0), 0);
        let model = builder.build().unwrap();
        assert_eq!(model.job_work(jm(0)), 0);
    }

    #[test]
    fn test_error_messages_name_the_operation() {
        let err = ModelError::NegativeDuration { job: 2, position: 4 };
        assert_eq!(
            err.to_string(),
            "operation 4 of job 2 has a negative duration"
        );
    }

    #[test]
    fn test_display_lists_jobs() {
        let rendered = format!("{}", two_by_two());
        assert!(rendered.contains("2 jobs x 2 machines"));
        assert!(rendered.contains("(M0, 3) (M1, 2)"));
    }
}
