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

//! Machine bounds.
//!
//! Both bounds look at each machine in isolation and relax every other
//! resource constraint:
//!
//! - `MachineWorkloadBound`: the machine is busy until its ready time plus the
//!   summed duration of its pending operations.
//! - `MachineSequencingBound`: each pending operation additionally gets a
//!   release date (its job's ready time plus the durations of the job's
//!   pending predecessors) and a tail (the durations of its job successors).
//!   Sequencing by release date is optimal for one machine with release dates,
//!   so the simulated finish time is a valid bound. The smallest tail among the
//!   pending operations is added on top, since whichever runs last still has
//!   its successors to do.
//!
//! Both return at least the current makespan.

use crate::{eval::evaluator::BoundEvaluator, state::SearchState};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{index::MachineIndex, model::Model};

/// `max_m (machine_ready(m) + Σ pending durations on m)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineWorkloadBound;

impl MachineWorkloadBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEvaluator<T> for MachineWorkloadBound
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "MachineWorkloadBound"
    }

    fn lower_bound(&mut self, model: &Model<T>, state: &SearchState<T>) -> T {
        let mut bound = state.makespan();
        for m in 0..model.num_machines() {
            let machine = MachineIndex::new(m);
            let finish = state
                .machine_ready_time(machine)
                .saturating_add(state.machine_remaining_work(machine));
            bound = bound.max(finish);
        }
        bound
    }
}

/// A pending operation as seen by the one-machine relaxation.
#[derive(Debug, Clone, Copy)]
struct PendingOperation<T> {
    release: T,
    duration: T,
}

/// One-machine relaxation with release dates and tails.
#[derive(Debug, Clone)]
pub struct MachineSequencingBound<T> {
    scratch: Vec<PendingOperation<T>>,
}

impl<T> Default for MachineSequencingBound<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MachineSequencingBound<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_jobs: usize) -> Self {
        Self {
            scratch: Vec::with_capacity(num_jobs),
        }
    }
}

impl<T> MachineSequencingBound<T>
where
    T: PrimInt + Signed,
{
    /// Bound contributed by a single machine. Returns `None` if nothing is
    /// pending on it.
    fn machine_bound(
        &mut self,
        model: &Model<T>,
        state: &SearchState<T>,
        machine: MachineIndex,
    ) -> Option<T> {
        if state.machine_pending_operations(machine) == 0 {
            return None;
        }

        self.scratch.clear();
        let mut min_tail = T::max_value();
        for op in model.machine_operations(machine) {
            let next = state.next_operation(op.job);
            if op.position < next {
                continue;
            }

            // Work of the job between its next operation and this one.
            let ahead =
                model.remaining_work(op.job, next) - model.remaining_work(op.job, op.position);
            let duration = unsafe { model.operation_unchecked(op.job, op.position) }.duration();
            let tail = model.remaining_work(op.job, op.position) - duration;

            self.scratch.push(PendingOperation {
                release: state.job_ready_time(op.job).saturating_add(ahead),
                duration,
            });
            min_tail = min_tail.min(tail);
        }

        self.scratch.sort_unstable_by_key(|op| op.release);

        let mut time = state.machine_ready_time(machine);
        for op in &self.scratch {
            time = time.max(op.release).saturating_add(op.duration);
        }
        Some(time.saturating_add(min_tail))
    }
}

impl<T> BoundEvaluator<T> for MachineSequencingBound<T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "MachineSequencingBound"
    }

    fn lower_bound(&mut self, model: &Model<T>, state: &SearchState<T>) -> T {
        let mut bound = state.makespan();
        for m in 0..model.num_machines() {
            if let Some(finish) = self.machine_bound(model, state, MachineIndex::new(m)) {
                bound = bound.max(finish);
            }
        }
        bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{branching::decision::Decision, trail::SearchTrail};
    use shopfloor_model::{index::JobIndex, model::ModelBuilder};

    type IntegerType = i64;

    fn two_by_two() -> Model<IntegerType> {
        let mut b = ModelBuilder::new(2, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 3), (MachineIndex::new(1), 2)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(1), 2), (MachineIndex::new(0), 1)]);
        b.build().unwrap()
    }

    #[test]
    fn test_workload_bound_at_root() {
        let model = two_by_two();
        let state = SearchState::new(&model);
        assert_eq!(MachineWorkloadBound::new().lower_bound(&model, &state), 4);
    }

    #[test]
    fn test_sequencing_bound_at_root() {
        // M0: J0.0 (r 0, d 3, tail 2), J1.1 (r 2, d 1, tail 0) -> 0+3=3, max(3,2)+1=4, +0 = 4
        // M1: J1.0 (r 0, d 2, tail 1), J0.1 (r 3, d 2, tail 0) -> 2, max(2,3)+2=5, +0 = 5
        let model = two_by_two();
        let state = SearchState::new(&model);
        assert_eq!(MachineSequencingBound::new().lower_bound(&model, &state), 5);
    }

    #[test]
    fn test_sequencing_bound_adds_minimum_tail() {
        // Two jobs start on M0 and both continue elsewhere for 5 units.
        let mut b = ModelBuilder::<IntegerType>::new(2, 3);
        b.add_operations(
            JobIndex::new(0),
            [(MachineIndex::new(0), 2), (MachineIndex::new(1), 5), (MachineIndex::new(2), 0)],
        )
        .add_operations(
            JobIndex::new(1),
            [(MachineIndex::new(0), 2), (MachineIndex::new(2), 5), (MachineIndex::new(1), 0)],
        );
        let model = b.build().unwrap();
        let state = SearchState::new(&model);

        // M0 is busy until 4 and whichever job runs second still needs 5.
        assert_eq!(MachineSequencingBound::preallocated(2).lower_bound(&model, &state), 9);
        assert_eq!(MachineWorkloadBound::new().lower_bound(&model, &state), 5);
    }

    #[test]
    fn test_bounds_respect_machine_ready_time() {
        let model = two_by_two();
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        let d = Decision::for_job(&model, &state, JobIndex::new(0)).unwrap();
        trail.apply(&mut state, &model, &d);

        // M0 ready at 3 with J1.1 (r 2, d 1) pending -> 4.
        // M1: J1.0 (r 0, d 2, tail 1), J0.1 (r 3, d 2, tail 0) -> 5.
        assert_eq!(MachineWorkloadBound::new().lower_bound(&model, &state), 4);
        assert_eq!(MachineSequencingBound::new().lower_bound(&model, &state), 5);
    }
}
