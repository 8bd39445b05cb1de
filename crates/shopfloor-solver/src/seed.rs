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

//! Constructive heuristics that produce an initial incumbent.
//!
//! Both heuristics place every operation at its earliest feasible start
//! given what they placed before, so their schedules are always feasible.
//! They only differ in the order in which operations are placed.

use shopfloor_model::{index::JobIndex, model::Model, solution::Schedule};
use shopfloor_search::num::SolverNumeric;

/// Builds a complete schedule for a model.
pub trait SeedHeuristic<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the heuristic.
    fn name(&self) -> &str;

    /// Returns a feasible schedule for `model`.
    fn build(&mut self, model: &Model<T>) -> Schedule<T>;
}

impl<T> std::fmt::Debug for dyn SeedHeuristic<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeedHeuristic({})", self.name())
    }
}

/// Ready times of jobs and machines while a schedule is built.
#[derive(Debug, Clone, Default)]
struct ReadyTimes<T> {
    job_ready: Vec<T>,
    machine_ready: Vec<T>,
    start_times: Vec<T>,
    makespan: T,
}

impl<T> ReadyTimes<T>
where
    T: SolverNumeric,
{
    fn reset(&mut self, model: &Model<T>) {
        self.job_ready.clear();
        self.job_ready.resize(model.num_jobs(), T::zero());
        self.machine_ready.clear();
        self.machine_ready.resize(model.num_machines(), T::zero());
        self.start_times.clear();
        self.start_times.resize(model.num_operations(), T::zero());
        self.makespan = T::zero();
    }

    #[inline]
    fn earliest_start(&self, model: &Model<T>, job: JobIndex, position: usize) -> T {
        let machine = model.operation(job, position).machine();
        self.job_ready[job.get()].max(self.machine_ready[machine.get()])
    }

    fn place(&mut self, model: &Model<T>, job: JobIndex, position: usize) {
        let op = model.operation(job, position);
        let start = self.earliest_start(model, job, position);
        let end = start.saturating_add(op.duration());
        self.start_times[model.operation_offset(job, position)] = start;
        self.job_ready[job.get()] = end;
        self.machine_ready[op.machine().get()] = end;
        self.makespan = self.makespan.max(end);
    }

    fn to_schedule(&self) -> Schedule<T> {
        Schedule::new(self.makespan, self.start_times.clone())
    }
}

/// Places jobs one after another in index order, every operation at
/// `max(job ready, machine ready)`.
#[derive(Debug, Clone, Default)]
pub struct JobOrderListScheduler<T> {
    times: ReadyTimes<T>,
}

impl<T> JobOrderListScheduler<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            times: ReadyTimes {
                job_ready: Vec::new(),
                machine_ready: Vec::new(),
                start_times: Vec::new(),
                makespan: T::zero(),
            },
        }
    }
}

impl<T> SeedHeuristic<T> for JobOrderListScheduler<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "JobOrderListScheduler"
    }

    fn build(&mut self, model: &Model<T>) -> Schedule<T> {
        self.times.reset(model);
        for j in 0..model.num_jobs() {
            let job = JobIndex::new(j);
            for position in 0..model.num_job_operations(job) {
                self.times.place(model, job, position);
            }
        }
        self.times.to_schedule()
    }
}

/// Dispatches among the next operations of all jobs the one that can start
/// first, preferring the job with the most remaining work, then the lower
/// job index.
#[derive(Debug, Clone, Default)]
pub struct MostWorkRemainingDispatcher<T> {
    times: ReadyTimes<T>,
    next_op: Vec<usize>,
}

impl<T> MostWorkRemainingDispatcher<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            times: ReadyTimes {
                job_ready: Vec::new(),
                machine_ready: Vec::new(),
                start_times: Vec::new(),
                makespan: T::zero(),
            },
            next_op: Vec::new(),
        }
    }

    /// Returns the job to dispatch next, `None` once every job is done.
    fn select(&self, model: &Model<T>) -> Option<JobIndex> {
        (0..model.num_jobs())
            .map(JobIndex::new)
            .filter(|&job| self.next_op[job.get()] < model.num_job_operations(job))
            .min_by(|&a, &b| {
                let (pa, pb) = (self.next_op[a.get()], self.next_op[b.get()]);
                let start_a = self.times.earliest_start(model, a, pa);
                let start_b = self.times.earliest_start(model, b, pb);
                start_a
                    .cmp(&start_b)
                    .then_with(|| model.remaining_work(b, pb).cmp(&model.remaining_work(a, pa)))
                    .then_with(|| a.cmp(&b))
            })
    }
}

impl<T> SeedHeuristic<T> for MostWorkRemainingDispatcher<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "MostWorkRemainingDispatcher"
    }

    fn build(&mut self, model: &Model<T>) -> Schedule<T> {
        self.times.reset(model);
        self.next_op.clear();
        self.next_op.resize(model.num_jobs(), 0);

        while let Some(job) = self.select(model) {
            let position = self.next_op[job.get()];
            self.times.place(model, job, position);
            self.next_op[job.get()] += 1;
        }
        self.times.to_schedule()
    }
}

/// Runs every seed heuristic and returns the schedule with the smallest
/// makespan, preferring the dispatcher on ties.
pub fn best_seed<T>(model: &Model<T>) -> Schedule<T>
where
    T: SolverNumeric,
{
    let dispatched = MostWorkRemainingDispatcher::new().build(model);
    let listed = JobOrderListScheduler::new().build(model);
    if listed.makespan() < dispatched.makespan() {
        listed
    } else {
        dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
    use shopfloor_model::{index::MachineIndex, model::ModelBuilder};

    type IntegerType = i64;

    fn two_by_two() -> Model<IntegerType> {
        let mut b = ModelBuilder::new(2, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 3), (MachineIndex::new(1), 2)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(1), 2), (MachineIndex::new(0), 1)]);
        b.build().unwrap()
    }

    #[test]
    fn test_job_order_list_schedule() {
        let model = two_by_two();
        let schedule = JobOrderListScheduler::new().build(&model);
        // J0 runs 0..3 on M0 and 3..5 on M1, J1 waits for M1 until 5.
        assert_eq!(schedule.start_times(), &[0, 3, 5, 7]);
        assert_eq!(schedule.makespan(), 8);
        assert!(schedule.validate(&model).is_ok());
    }

    #[test]
    fn test_dispatcher_finds_optimum_of_two_by_two() {
        let model = two_by_two();
        let schedule = MostWorkRemainingDispatcher::new().build(&model);
        assert_eq!(schedule.start_times(), &[0, 3, 0, 3]);
        assert_eq!(schedule.makespan(), 5);
        assert!(schedule.validate(&model).is_ok());
    }

    #[test]
    fn test_best_seed_picks_smaller_makespan() {
        let model = two_by_two();
        assert_eq!(best_seed(&model).makespan(), 5);
    }

    #[test]
    fn test_seeds_are_feasible_on_random_instances() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut list = JobOrderListScheduler::new();
        let mut dispatch = MostWorkRemainingDispatcher::new();
        for _ in 0..50 {
            let (jobs, machines) = (rng.random_range(1..=6), rng.random_range(1..=6));
            let mut b = ModelBuilder::new(jobs, machines);
            for j in 0..jobs {
                let mut route: Vec<usize> = (0..machines).collect();
                route.shuffle(&mut rng);
                for m in route {
                    let duration = rng.random_range(0..=9);
                    b.add_operation(JobIndex::new(j), MachineIndex::new(m), duration);
                }
            }
            let model: Model<IntegerType> = b.build().unwrap();

            let a = list.build(&model);
            let d = dispatch.build(&model);
            assert!(a.validate(&model).is_ok());
            assert!(d.validate(&model).is_ok());
            assert!(best_seed(&model).makespan() <= a.makespan().min(d.makespan()));
            assert!(a.makespan() >= model.trivial_lower_bound());
        }
    }
}
