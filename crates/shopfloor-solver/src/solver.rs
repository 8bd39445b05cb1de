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

//! # Parallel Coordinator
//!
//! Runs the branch-and-bound engine on a fixed pool of worker threads that
//! share one incumbent.
//!
//! ## Strategies
//!
//! - `Strategy::Static`: the coordinator expands the tree breadth-first down
//!   to `parallel_depth_cutoff`, pruning against the incumbent, and deals the
//!   frontier round-robin. A worker that runs out of subproblems idles.
//! - `Strategy::Dynamic`: workers share a bounded `WorkQueue`. A node above
//!   the cutoff is expanded one level and its children are queued; a node at
//!   the cutoff is solved to exhaustion. Children that do not fit into a full
//!   queue are solved by the worker that produced them.
//!
//! ## Shared state
//!
//! Workers see a `SharedSearchContext`: the incumbent, the stop flag, the
//! global node and solution counters, and the queue of the dynamic strategy.
//! Every worker owns its engine, builder, evaluator and monitor stack. The
//! incumbent and queue locks are never held at the same time.
//!
//! ## Termination
//!
//! A budget, a solution limit or an external interrupt trips the stop flag.
//! All workers then return and the incumbent is reported as
//! `SolverResult::Feasible` with `TerminationReason::Aborted`. Only a run in
//! which every subproblem was exhausted reports `SolverResult::Optimal`.
//!
//! ## Usage
//!
//! ```rust
//! use shopfloor_model::{index::{JobIndex, MachineIndex}, model::ModelBuilder};
//! use shopfloor_search::result::SolverResult;
//! use shopfloor_solver::solver::SolverBuilder;
//!
//! let mut b = ModelBuilder::<i64>::new(2, 2);
//! b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 3), (MachineIndex::new(1), 2)])
//!     .add_operations(JobIndex::new(1), [(MachineIndex::new(1), 2), (MachineIndex::new(0), 1)]);
//! let model = b.build().unwrap();
//!
//! let solver = SolverBuilder::new().with_worker_count(2).build();
//! let outcome = solver.solve(&model).unwrap();
//! assert!(matches!(outcome.result(), SolverResult::Optimal(s) if s.makespan() == 5));
//! ```

use crate::{
    config::{SolverConfig, Strategy},
    error::SolverError,
    frontier::Frontier,
    queue::WorkQueue,
};
use shopfloor_bnb::{
    bnb::BnbSolver,
    branching::priority::PriorityBuilder,
    eval::{combined::CombinedBound, job::JobPathBound, machine::MachineSequencingBound},
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogTreeSearchMonitor,
        wrapper::WrapperMonitor,
    },
    stats::BnbSolverStatistics,
    subproblem::{Expansion, Subproblem, SubproblemExpander},
};
use shopfloor_model::{model::Model, solution::Schedule};
use shopfloor_search::{
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor,
        interrupt::InterruptMonitor,
        node_limit::NodeLimitMonitor,
        search_monitor::{SearchCommand, SearchMonitor},
        solution::SolutionMonitor,
        time_limit::TimeLimitMonitor,
    },
    num::SolverNumeric,
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Instant,
};
use tracing::{Level, debug, info, info_span, warn};

/// Upper limit on the open nodes of the static frontier.
const MAX_FRONTIER_LEN: usize = 1 << 16;

/// State shared by all workers of one solve.
#[derive(Debug)]
pub struct SharedSearchContext<'a, T: num_traits::PrimInt + num_traits::Signed> {
    model: &'a Model<T>,
    config: &'a SolverConfig,
    incumbent: SharedIncumbent<T>,
    stop: AtomicBool,
    interrupt: Option<&'a AtomicBool>,
    nodes: AtomicU64,
    solutions: AtomicU64,
    subproblems_solved: AtomicU64,
    abort_reason: Mutex<Option<String>>,
    queue: Option<WorkQueue>,
    start_time: Instant,
}

impl<'a, T> SharedSearchContext<'a, T>
where
    T: SolverNumeric,
{
    fn new(
        model: &'a Model<T>,
        config: &'a SolverConfig,
        incumbent: SharedIncumbent<T>,
        interrupt: Option<&'a AtomicBool>,
        start_time: Instant,
    ) -> Self {
        let queue = match config.strategy() {
            Strategy::Dynamic => Some(WorkQueue::new(config.queue_capacity())),
            Strategy::Static => None,
        };
        Self {
            model,
            config,
            incumbent,
            stop: AtomicBool::new(false),
            interrupt,
            nodes: AtomicU64::new(0),
            solutions: AtomicU64::new(0),
            subproblems_solved: AtomicU64::new(0),
            abort_reason: Mutex::new(None),
            queue,
            start_time,
        }
    }

    /// Returns the shared incumbent.
    #[inline]
    pub fn incumbent(&self) -> &SharedIncumbent<T> {
        &self.incumbent
    }

    /// Returns `true` once the search must wind down.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
            || self.interrupt.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Stops every worker. The first reason recorded is the one reported.
    pub fn abort(&self, reason: String) {
        {
            let mut guard = self.abort_reason.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.is_none() {
                debug!(reason = %reason, "stopping workers");
                *guard = Some(reason);
            }
        }
        self.stop.store(true, Ordering::Relaxed);
        if let Some(queue) = &self.queue {
            queue.close();
        }
    }

    fn abort_reason(&self) -> Option<String> {
        self.abort_reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds the monitors that enforce the stop flag, the interrupt, the
    /// solution limit and both budgets. The time budget counts from the
    /// start of the solve and the counters are shared by the whole pool.
    fn budget_monitor(&self) -> CompositeMonitor<'_, T> {
        let mut monitor = CompositeMonitor::with_capacity(5);
        monitor.add_monitor(InterruptMonitor::new(&self.stop));
        if let Some(flag) = self.interrupt {
            monitor.add_monitor(InterruptMonitor::new(flag));
        }
        monitor.add_monitor(SolutionMonitor::new(&self.solutions, self.config.solution_limit()));
        if let Some(limit) = self.config.time_budget() {
            monitor.add_monitor(TimeLimitMonitor::with_start(limit, self.start_time));
        }
        if let Some(limit) = self.config.node_budget() {
            monitor.add_monitor(NodeLimitMonitor::new(&self.nodes, limit));
        }
        monitor
    }

    /// Returns the incumbent's makespan as `T`, `T::MAX` while there is none.
    #[inline]
    fn upper_bound(&self) -> T {
        self.incumbent
            .upper_bound_as()
            .unwrap_or_else(|_| T::max_value())
    }
}

type StandardBound<T> = CombinedBound<JobPathBound, MachineSequencingBound<T>>;

/// One thread of the pool with its private search structures.
///
/// The budget and log monitors live as long as the worker, so their step
/// counters and clocks carry over from one subproblem to the next.
struct Worker<'c, 'a, T>
where
    T: SolverNumeric,
{
    id: usize,
    ctx: &'c SharedSearchContext<'a, T>,
    engine: BnbSolver<T>,
    builder: PriorityBuilder<T>,
    evaluator: StandardBound<T>,
    expander: SubproblemExpander<T>,
    children: Vec<Subproblem>,
    monitor: CompositeMonitor<'c, T>,
    log: LogTreeSearchMonitor<T>,
    stats: BnbSolverStatistics,
}

impl<'c, 'a, T> Worker<'c, 'a, T>
where
    T: SolverNumeric,
{
    fn new(id: usize, ctx: &'c SharedSearchContext<'a, T>) -> Self {
        let model = ctx.model;
        Self {
            id,
            ctx,
            engine: BnbSolver::preallocated(model.num_jobs(), model.num_operations()),
            builder: PriorityBuilder::preallocated(model.num_jobs()),
            evaluator: CombinedBound::new(
                JobPathBound::new(),
                MachineSequencingBound::preallocated(model.num_jobs()),
            ),
            expander: SubproblemExpander::new(),
            children: Vec::new(),
            monitor: ctx.budget_monitor(),
            log: LogTreeSearchMonitor::default()
                .with_level(Level::DEBUG)
                .with_start(ctx.start_time),
            stats: BnbSolverStatistics::default(),
        }
    }

    /// Solves `subproblem` to exhaustion. Returns `false` if the run was stopped.
    fn solve_subtree(&mut self, subproblem: &Subproblem) -> bool {
        let ctx = self.ctx;
        let mut monitor = CompositeTreeSearchMonitor::with_capacity(2);
        monitor.add_monitor(WrapperMonitor::new(&mut self.monitor));
        monitor.add_monitor(&mut self.log);

        let outcome = self.engine.solve_subproblem(
            ctx.model,
            subproblem,
            &mut self.builder,
            &mut self.evaluator,
            monitor,
            &ctx.incumbent,
        );
        ctx.subproblems_solved.fetch_add(1, Ordering::Relaxed);
        self.stats.merge(outcome.statistics());

        match outcome.termination_reason() {
            TerminationReason::OptimalityProven => true,
            TerminationReason::Aborted(reason) => {
                ctx.abort(reason.clone());
                false
            }
        }
    }

    fn run_static(&mut self, hand: &[Subproblem]) {
        let _span = info_span!("worker", id = self.id).entered();
        for subproblem in hand {
            if self.ctx.should_stop() {
                self.record_interrupt();
                return;
            }
            if !self.solve_subtree(subproblem) {
                return;
            }
        }
    }

    fn run_dynamic(&mut self, queue: &WorkQueue) {
        let _span = info_span!("worker", id = self.id).entered();
        let ctx = self.ctx;
        self.monitor.on_enter_search(ctx.model);
        while let Some(subproblem) = queue.pop(|| ctx.should_stop()) {
            let completed = self.process_queued(queue, &subproblem);
            queue.task_done();
            if !completed {
                return;
            }
        }
        self.monitor.on_exit_search();
        if ctx.should_stop() {
            self.record_interrupt();
        }
    }

    /// Expands a node above the cutoff, or solves it if it lies at the cutoff.
    /// Returns `false` if the run was stopped.
    ///
    /// An expansion is a step and an explored node of the budget monitors.
    fn process_queued(&mut self, queue: &WorkQueue, subproblem: &Subproblem) -> bool {
        if subproblem.depth() >= self.ctx.config.parallel_depth_cutoff() {
            return self.solve_subtree(subproblem);
        }

        self.monitor.on_step();
        if let SearchCommand::Terminate(reason) = self.monitor.search_command() {
            self.ctx.abort(reason);
            return false;
        }
        self.monitor.on_node_explored();
        self.stats.nodes_explored += 1;

        self.children.clear();
        let expansion = self.expander.expand(
            self.ctx.model,
            subproblem,
            &mut self.builder,
            &mut self.evaluator,
            self.ctx.upper_bound(),
            &mut self.children,
        );
        match expansion {
            Expansion::Pruned => true,
            Expansion::Leaf(schedule) => {
                self.install(&schedule);
                true
            }
            Expansion::Children(_) => {
                let mut overflow = Vec::new();
                for child in self.children.drain(..) {
                    if let Err(child) = queue.try_push(child) {
                        overflow.push(child);
                    }
                }
                if !overflow.is_empty() {
                    debug!(worker = self.id, count = overflow.len(), "queue full, solving inline");
                }
                overflow.iter().all(|child| self.solve_subtree(child))
            }
        }
    }

    fn install(&mut self, schedule: &Schedule<T>) {
        if self.ctx.incumbent.try_install(schedule) {
            self.monitor.on_solution_found(schedule);
            debug!(worker = self.id, makespan = %schedule.makespan(), "new incumbent");
        }
    }

    fn record_interrupt(&self) {
        self.ctx.abort("interrupted".to_string());
    }
}

/// Exact job-shop solver running the branch-and-bound engine on a worker pool.
#[derive(Debug, Clone)]
pub struct Solver<T> {
    config: SolverConfig,
    seed: Option<Schedule<T>>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<T> Solver<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns the seed schedule, if any.
    #[inline]
    pub fn seed(&self) -> Option<&Schedule<T>> {
        self.seed.as_ref()
    }

    /// Solves `model`.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::InvalidSeed` if the seed does not fit `model`
    /// or is infeasible.
    pub fn solve(&self, model: &Model<T>) -> Result<SolverOutcome<T>, SolverError> {
        let start_time = Instant::now();

        let incumbent = match &self.seed {
            Some(seed) => {
                seed.validate(model)?;
                SharedIncumbent::with_schedule(seed.clone())
            }
            None => SharedIncumbent::new(),
        };

        info!(
            jobs = model.num_jobs(),
            machines = model.num_machines(),
            config = %self.config,
            seed = ?self.seed.as_ref().map(|s| s.makespan()),
            "starting branch-and-bound"
        );

        let ctx = SharedSearchContext::new(
            model,
            &self.config,
            incumbent,
            self.interrupt.as_deref(),
            start_time,
        );

        let (stats, exhausted) = match self.config.strategy() {
            Strategy::Static => self.run_static(&ctx),
            Strategy::Dynamic => self.run_dynamic(&ctx),
        };

        Ok(self.construct_outcome(&ctx, stats, exhausted))
    }

    fn run_static(&self, ctx: &SharedSearchContext<'_, T>) -> (BnbSolverStatistics, bool) {
        let workers = self.config.worker_count();
        let frontier = Frontier::expand(
            ctx.model,
            &ctx.incumbent,
            self.config.parallel_depth_cutoff(),
            MAX_FRONTIER_LEN,
            &mut PriorityBuilder::preallocated(ctx.model.num_jobs()),
            &mut CombinedBound::standard(),
            &mut ctx.budget_monitor(),
        );
        let frontier_nodes = frontier.nodes_expanded();

        if let Some(reason) = frontier.aborted() {
            ctx.abort(reason.to_string());
            let stats = BnbSolverStatistics {
                nodes_explored: frontier_nodes,
                ..BnbSolverStatistics::default()
            };
            return (stats, false);
        }
        info!(
            frontier = frontier.len(),
            expanded = frontier.nodes_expanded(),
            "static frontier built"
        );

        let hands = frontier.deal(workers);
        let mut stats = std::thread::scope(|scope| {
            let handles: Vec<_> = hands
                .iter()
                .enumerate()
                .map(|(id, hand)| {
                    scope.spawn(move || {
                        let mut worker = Worker::new(id, ctx);
                        worker.run_static(hand);
                        worker.stats
                    })
                })
                .collect();
            join_all(handles)
        });
        stats.nodes_explored = stats.nodes_explored.saturating_add(frontier_nodes);

        (stats, ctx.abort_reason().is_none())
    }

    fn run_dynamic(&self, ctx: &SharedSearchContext<'_, T>) -> (BnbSolverStatistics, bool) {
        let Some(queue) = ctx.queue.as_ref() else {
            return (BnbSolverStatistics::default(), false);
        };
        if queue.try_push(Subproblem::root()).is_err() {
            return (BnbSolverStatistics::default(), false);
        }

        let stats = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.config.worker_count())
                .map(|id| {
                    scope.spawn(move || {
                        let mut worker = Worker::new(id, ctx);
                        worker.run_dynamic(queue);
                        worker.stats
                    })
                })
                .collect();
            join_all(handles)
        });

        (stats, ctx.abort_reason().is_none() && queue.is_drained())
    }

    fn construct_outcome(
        &self,
        ctx: &SharedSearchContext<'_, T>,
        bnb_stats: BnbSolverStatistics,
        exhausted: bool,
    ) -> SolverOutcome<T> {
        let stats = self.build_statistics(ctx, &bnb_stats);
        let best = ctx.incumbent.snapshot();

        if exhausted {
            info!(
                makespan = ?best.as_ref().map(|s| s.makespan()),
                nodes = stats.nodes_explored,
                elapsed_ms = stats.solve_duration.as_millis() as u64,
                "optimality proven"
            );
            let result = match best {
                Some(schedule) => SolverResult::Optimal(schedule),
                None => SolverResult::Unknown,
            };
            return SolverOutcome::new(result, TerminationReason::OptimalityProven, stats);
        }

        let reason = ctx
            .abort_reason()
            .unwrap_or_else(|| "search stopped before the tree was covered".to_string());
        warn!(
            reason = %reason,
            makespan = ?best.as_ref().map(|s| s.makespan()),
            "search stopped, optimality not proven"
        );
        let result = match best {
            Some(schedule) => SolverResult::Feasible(schedule),
            None => SolverResult::Unknown,
        };
        SolverOutcome::new(result, TerminationReason::Aborted(reason), stats)
    }

    fn build_statistics(
        &self,
        ctx: &SharedSearchContext<'_, T>,
        bnb_stats: &BnbSolverStatistics,
    ) -> SolverStatistics {
        SolverStatisticsBuilder::new()
            .solutions_found(ctx.incumbent.improvements())
            .used_threads(self.config.worker_count())
            .nodes_explored(bnb_stats.nodes_explored)
            .subproblems_solved(ctx.subproblems_solved.load(Ordering::Relaxed))
            .solve_duration(ctx.start_time.elapsed())
            .build()
    }
}

/// Joins the workers and merges their statistics. A worker panic is
/// propagated to the caller.
fn join_all(
    handles: Vec<std::thread::ScopedJoinHandle<'_, BnbSolverStatistics>>,
) -> BnbSolverStatistics {
    let mut total = BnbSolverStatistics::default();
    for handle in handles {
        let stats = handle
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
        total.merge(&stats);
    }
    total
}

/// Builder for `Solver`.
#[derive(Debug, Clone)]
pub struct SolverBuilder<T> {
    config: SolverConfig,
    seed: Option<Schedule<T>>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<T> Default for SolverBuilder<T>
where
    T: SolverNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SolverBuilder<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
            seed: None,
            interrupt: None,
        }
    }

    /// Replaces the whole configuration.
    #[inline]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn with_node_budget(mut self, limit: u64) -> Self {
        self.config.node_budget = Some(limit);
        self
    }

    #[inline]
    pub fn with_time_budget(mut self, limit: std::time::Duration) -> Self {
        self.config.time_budget = Some(limit);
        self
    }

    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.config.solution_limit = Some(limit);
        self
    }

    /// Sets the number of worker threads. Zero is raised to one.
    #[inline]
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.config.worker_count = workers.max(1);
        self
    }

    #[inline]
    pub fn with_parallel_depth_cutoff(mut self, depth: usize) -> Self {
        self.config.parallel_depth_cutoff = depth;
        self
    }

    #[inline]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Sets the capacity of the dynamic strategy's queue. Zero is raised to one.
    #[inline]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity.max(1);
        self
    }

    /// Starts the search from `seed` as the incumbent.
    #[inline]
    pub fn with_seed(mut self, seed: Schedule<T>) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stops the search once `flag` is raised.
    #[inline]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[inline]
    pub fn build(self) -> Solver<T> {
        Solver {
            config: self.config,
            seed: self.seed,
            interrupt: self.interrupt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{JobOrderListScheduler, SeedHeuristic, best_seed};
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
    use shopfloor_bnb::eval::validation::brute_force_makespan;
    use shopfloor_model::{
        index::{JobIndex, MachineIndex},
        loading::ProblemLoader,
        model::ModelBuilder,
        solution::ScheduleViolation,
    };
    use std::time::Duration;

    type IntegerType = i64;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn two_by_two() -> Model<IntegerType> {
        let mut b = ModelBuilder::new(2, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 3), (MachineIndex::new(1), 2)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(1), 2), (MachineIndex::new(0), 1)]);
        b.build().unwrap()
    }

    fn random_model(rng: &mut StdRng, jobs: usize, machines: usize) -> Model<IntegerType> {
        let mut b = ModelBuilder::new(jobs, machines);
        for j in 0..jobs {
            let mut route: Vec<usize> = (0..machines).collect();
            route.shuffle(rng);
            for m in route {
                b.add_operation(JobIndex::new(j), MachineIndex::new(m), rng.random_range(1..=9));
            }
        }
        b.build().unwrap()
    }

    fn ft06() -> Model<IntegerType> {
        ProblemLoader::new()
            .from_str(include_str!("../../../data/ft06.txt"))
            .unwrap()
    }

    fn optimal_makespan(outcome: &SolverOutcome<IntegerType>) -> IntegerType {
        match outcome.result() {
            SolverResult::Optimal(s) => s.makespan(),
            other => panic!("expected an optimal result, got {:?}", other),
        }
    }

    #[test]
    fn test_two_by_two_all_workers_and_strategies() {
        init_tracing();
        let model = two_by_two();
        for strategy in [Strategy::Static, Strategy::Dynamic] {
            for workers in 1..=4 {
                let solver = SolverBuilder::new()
                    .with_strategy(strategy)
                    .with_worker_count(workers)
                    .build();
                let outcome = solver.solve(&model).unwrap();
                assert!(outcome.is_optimality_proven());
                assert_eq!(optimal_makespan(&outcome), 5);
                assert!(outcome.best_schedule().unwrap().validate(&model).is_ok());
                assert_eq!(outcome.statistics().used_threads, workers);
            }
        }
    }

    #[test]
    fn test_single_job_is_sum_of_durations_for_any_worker_count() {
        let mut b = ModelBuilder::new(1, 4);
        b.add_operations(
            JobIndex::new(0),
            [
                (MachineIndex::new(3), 2),
                (MachineIndex::new(1), 5),
                (MachineIndex::new(0), 1),
                (MachineIndex::new(2), 4),
            ],
        );
        let model: Model<IntegerType> = b.build().unwrap();

        for strategy in [Strategy::Static, Strategy::Dynamic] {
            for workers in 1..=3 {
                let outcome = SolverBuilder::new()
                    .with_strategy(strategy)
                    .with_worker_count(workers)
                    .build()
                    .solve(&model)
                    .unwrap();
                assert_eq!(optimal_makespan(&outcome), 12);
            }
        }
    }

    #[test]
    fn test_worker_counts_agree_with_brute_force() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..8 {
            let model = random_model(&mut rng, 3, 3);
            let expected = brute_force_makespan(&model, usize::MAX).unwrap();

            for strategy in [Strategy::Static, Strategy::Dynamic] {
                for workers in 1..=4 {
                    let outcome = SolverBuilder::new()
                        .with_strategy(strategy)
                        .with_worker_count(workers)
                        .with_parallel_depth_cutoff(rng.random_range(0..=4))
                        .with_queue_capacity(2)
                        .build()
                        .solve(&model)
                        .unwrap();
                    assert_eq!(optimal_makespan(&outcome), expected);
                    assert!(outcome.best_schedule().unwrap().validate(&model).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_tiny_queue_still_covers_the_tree() {
        let mut rng = StdRng::seed_from_u64(11);
        let model = random_model(&mut rng, 4, 3);
        let reference = SolverBuilder::new()
            .with_worker_count(1)
            .with_strategy(Strategy::Static)
            .with_parallel_depth_cutoff(0)
            .build()
            .solve(&model)
            .unwrap();

        let outcome = SolverBuilder::new()
            .with_worker_count(3)
            .with_strategy(Strategy::Dynamic)
            .with_parallel_depth_cutoff(4)
            .with_queue_capacity(1)
            .build()
            .solve(&model)
            .unwrap();
        assert_eq!(optimal_makespan(&outcome), optimal_makespan(&reference));
    }

    #[test]
    fn test_seeded_optimum_is_not_improved() {
        let model = two_by_two();
        let seed = best_seed(&model);
        assert_eq!(seed.makespan(), 5);

        for strategy in [Strategy::Static, Strategy::Dynamic] {
            let outcome = SolverBuilder::new()
                .with_strategy(strategy)
                .with_worker_count(2)
                .with_seed(seed.clone())
                .build()
                .solve(&model)
                .unwrap();
            assert_eq!(optimal_makespan(&outcome), 5);
            assert_eq!(outcome.statistics().solutions_found, 0);
        }
    }

    #[test]
    fn test_weak_seed_is_improved() {
        let model = two_by_two();
        let seed = JobOrderListScheduler::new().build(&model);
        assert_eq!(seed.makespan(), 8);

        let outcome = SolverBuilder::new()
            .with_worker_count(2)
            .with_seed(seed)
            .build()
            .solve(&model)
            .unwrap();
        assert_eq!(optimal_makespan(&outcome), 5);
        assert!(outcome.statistics().solutions_found >= 1);
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let model = two_by_two();
        let solver = SolverBuilder::new()
            .with_seed(Schedule::new(4, vec![0, 0, 0]))
            .build();
        assert!(matches!(
            solver.solve(&model),
            Err(SolverError::InvalidSeed(ScheduleViolation::ShapeMismatch { .. }))
        ));

        // Both jobs start on their first machine at 0, but J1's second
        // operation overlaps J0's first on M0.
        let overlapping = Schedule::from_start_times(&model, vec![0, 3, 0, 2]);
        let solver = SolverBuilder::new().with_seed(overlapping).build();
        assert!(solver.solve(&model).is_err());
    }

    #[test]
    fn test_node_budget_reports_best_effort() {
        init_tracing();
        let model = ft06();
        for strategy in [Strategy::Static, Strategy::Dynamic] {
            let outcome = SolverBuilder::new()
                .with_strategy(strategy)
                .with_worker_count(2)
                .with_node_budget(500)
                .with_seed(JobOrderListScheduler::new().build(&model))
                .build()
                .solve(&model)
                .unwrap();

            assert!(!outcome.is_optimality_proven());
            assert!(matches!(outcome.reason(), TerminationReason::Aborted(_)));
            match outcome.result() {
                SolverResult::Feasible(s) => assert!(s.validate(&model).is_ok()),
                other => panic!("expected a feasible result, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_time_budget_stops_immediately() {
        let model = ft06();
        let outcome = SolverBuilder::new()
            .with_worker_count(2)
            .with_time_budget(Duration::ZERO)
            .build()
            .solve(&model)
            .unwrap();
        assert!(!outcome.is_optimality_proven());
    }

    #[test]
    fn test_raised_interrupt_stops_the_pool() {
        let model = ft06();
        let flag = Arc::new(AtomicBool::new(true));
        for strategy in [Strategy::Static, Strategy::Dynamic] {
            let outcome = SolverBuilder::new()
                .with_strategy(strategy)
                .with_worker_count(3)
                .with_interrupt(Arc::clone(&flag))
                .build()
                .solve(&model)
                .unwrap();
            assert!(!outcome.is_optimality_proven());
        }
    }

    fn ten_by_ten() -> Model<IntegerType> {
        random_model(&mut StdRng::seed_from_u64(0x5EED), 10, 10)
    }

    #[test]
    fn test_deep_static_cutoff_honours_time_budget() {
        init_tracing();
        let model = ten_by_ten();
        let started = Instant::now();
        let outcome = SolverBuilder::new()
            .with_strategy(Strategy::Static)
            .with_worker_count(1)
            .with_parallel_depth_cutoff(8)
            .with_time_budget(Duration::from_millis(50))
            .build()
            .solve(&model)
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(
            outcome.reason(),
            TerminationReason::Aborted(r) if r == "time limit reached"
        ));
    }

    #[test]
    fn test_dynamic_expansion_honours_time_budget() {
        init_tracing();
        let model = ten_by_ten();
        let started = Instant::now();
        let outcome = SolverBuilder::new()
            .with_strategy(Strategy::Dynamic)
            .with_worker_count(2)
            .with_parallel_depth_cutoff(8)
            .with_queue_capacity(1 << 22)
            .with_seed(best_seed(&model))
            .with_time_budget(Duration::from_millis(50))
            .build()
            .solve(&model)
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(
            outcome.reason(),
            TerminationReason::Aborted(r) if r == "time limit reached"
        ));
        assert!(outcome.best_schedule().unwrap().validate(&model).is_ok());
    }

    #[test]
    fn test_dynamic_expansion_counts_against_node_budget() {
        let model = ten_by_ten();
        let outcome = SolverBuilder::new()
            .with_strategy(Strategy::Dynamic)
            .with_worker_count(1)
            .with_parallel_depth_cutoff(8)
            .with_queue_capacity(1 << 22)
            .with_node_budget(1_000)
            .build()
            .solve(&model)
            .unwrap();
        assert!(matches!(
            outcome.reason(),
            TerminationReason::Aborted(r) if r == "node budget exhausted"
        ));
        assert!(outcome.statistics().nodes_explored >= 1_000);
    }

    #[test]
    fn test_interrupt_during_frontier_expansion() {
        init_tracing();
        let model = ten_by_ten();
        let flag = Arc::new(AtomicBool::new(false));
        let started = Instant::now();
        let outcome = std::thread::scope(|scope| {
            let raiser = Arc::clone(&flag);
            scope.spawn(move || {
                std::thread::sleep(Duration::from_millis(10));
                raiser.store(true, Ordering::Relaxed);
            });
            SolverBuilder::new()
                .with_strategy(Strategy::Static)
                .with_worker_count(1)
                .with_parallel_depth_cutoff(9)
                .with_interrupt(Arc::clone(&flag))
                .build()
                .solve(&model)
                .unwrap()
        });
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!outcome.is_optimality_proven());
    }

    #[test]
    fn test_solution_limit_stops_after_first_improvement() {
        let model = ft06();
        let outcome = SolverBuilder::new()
            .with_worker_count(1)
            .with_solution_limit(1)
            .build()
            .solve(&model)
            .unwrap();
        assert!(matches!(
            outcome.reason(),
            TerminationReason::Aborted(r) if r.contains("solution limit")
        ));
        assert!(outcome.best_schedule().is_some());
    }

    #[test]
    fn test_builder_clamps_degenerate_values() {
        let solver = SolverBuilder::<IntegerType>::new()
            .with_worker_count(0)
            .with_queue_capacity(0)
            .build();
        assert_eq!(solver.config().worker_count(), 1);
        assert_eq!(solver.config().queue_capacity(), 1);
        assert!(solver.seed().is_none());
    }
}
