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

//! Subtrees of the search, addressed by the path from the root.
//!
//! A `Subproblem` is the sequence of jobs whose next operation was fixed on
//! the way down from the root. Because children fix operations at their
//! earliest feasible start, the path alone determines the node: replaying it
//! from the root state rebuilds the partial schedule exactly. This makes
//! subproblems small, cheap to send between threads and independent of any
//! worker's state.
//!
//! `SubproblemExpander` turns one subproblem into its surviving children,
//! cutting those whose bound already reaches a given upper bound. The parallel
//! coordinator uses it to build the frontier it hands to workers.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    eval::evaluator::BoundEvaluator,
    state::SearchState,
    trail::SearchTrail,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{index::JobIndex, model::Model, solution::Schedule};

/// A node of the search tree, given by the jobs fixed on the path to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Subproblem {
    path: Vec<JobIndex>,
}

impl Subproblem {
    /// The root of the search tree.
    #[inline]
    pub fn root() -> Self {
        Self { path: Vec::new() }
    }

    /// A node given by its path.
    #[inline]
    pub fn from_path(path: Vec<JobIndex>) -> Self {
        Self { path }
    }

    /// Returns the jobs fixed on the path, from the root down.
    #[inline]
    pub fn path(&self) -> &[JobIndex] {
        &self.path
    }

    /// Returns the depth of the node, the number of fixed operations.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns the child that fixes the next operation of `job`.
    #[inline]
    pub fn child(&self, job: JobIndex) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(job);
        Self { path }
    }

    /// Replays the path on `state`, recording every step on `trail` outside
    /// of any frame. Returns `false`, leaving the state partially replayed,
    /// if the path names a job that has no operation left.
    pub fn replay<T>(
        &self,
        model: &Model<T>,
        state: &mut SearchState<T>,
        trail: &mut SearchTrail<T>,
    ) -> bool
    where
        T: PrimInt + Signed,
    {
        for &job in &self.path {
            if job.get() >= model.num_jobs() {
                return false;
            }
            let Some(decision) = Decision::for_job(model, state, job) else {
                return false;
            };
            trail.apply(state, model, &decision);
        }
        true
    }

    /// Returns `true` if the path can be replayed on `model`.
    pub fn is_valid_for<T>(&self, model: &Model<T>) -> bool
    where
        T: PrimInt + Signed,
    {
        let mut next = vec![0usize; model.num_jobs()];
        self.path.iter().all(|job| {
            let j = job.get();
            if j >= next.len() || next[j] >= model.num_job_operations(*job) {
                return false;
            }
            next[j] += 1;
            true
        })
    }
}

impl std::fmt::Display for Subproblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subproblem(")?;
        for (i, job) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", job.get())?;
        }
        write!(f, ")")
    }
}

/// What `SubproblemExpander::expand` found at a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion<T> {
    /// The node's bound reached the upper bound.
    Pruned,
    /// The node is a complete schedule.
    Leaf(Schedule<T>),
    /// The node was expanded; this many children were appended.
    Children(usize),
}

/// Expands subproblems one level, reusing its buffers between calls.
#[derive(Debug, Clone)]
pub struct SubproblemExpander<T> {
    state: Option<SearchState<T>>,
    trail: SearchTrail<T>,
    scratch: Vec<Decision<T>>,
}

impl<T> Default for SubproblemExpander<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubproblemExpander<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            state: None,
            trail: SearchTrail::new(),
            scratch: Vec::new(),
        }
    }
}

impl<T> SubproblemExpander<T>
where
    T: PrimInt + Signed,
{
    /// Expands `subproblem` and appends its children to `out` in branching
    /// order, skipping every child whose operation alone already ends at or
    /// after `upper_bound`.
    ///
    /// # Panics
    ///
    /// Panics if `subproblem` cannot be replayed on `model`.
    pub fn expand<B, E>(
        &mut self,
        model: &Model<T>,
        subproblem: &Subproblem,
        builder: &mut B,
        evaluator: &mut E,
        upper_bound: T,
        out: &mut Vec<Subproblem>,
    ) -> Expansion<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEvaluator<T>,
    {
        let state = match self.state.as_mut() {
            Some(state) => {
                self.trail.clear(state);
                state
            }
            None => self.state.insert(SearchState::new(model)),
        };
        debug_assert_eq!(
            state.num_operations(),
            model.num_operations(),
            "called `SubproblemExpander::expand` with a different model than before"
        );

        self.trail.ensure_capacity(model.num_operations());
        assert!(
            subproblem.replay(model, state, &mut self.trail),
            "called `SubproblemExpander::expand` with a path that does not fit the model: {}",
            subproblem
        );

        if let Some(schedule) = state.to_schedule() {
            return Expansion::Leaf(schedule);
        }
        if evaluator.lower_bound(model, state) >= upper_bound {
            return Expansion::Pruned;
        }

        self.scratch.clear();
        self.scratch.extend(builder.next_decision(model, state));
        let before = out.len();
        out.extend(
            self.scratch
                .iter()
                .filter(|d| d.end_time() < upper_bound)
                .map(|d| subproblem.child(d.job())),
        );
        Expansion::Children(out.len() - before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{branching::priority::PriorityBuilder, eval::combined::CombinedBound};
    use shopfloor_model::{index::MachineIndex, model::ModelBuilder};

    type IntegerType = i64;

    fn two_by_two() -> Model<IntegerType> {
        let mut b = ModelBuilder::new(2, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 3), (MachineIndex::new(1), 2)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(1), 2), (MachineIndex::new(0), 1)]);
        b.build().unwrap()
    }

    fn path(jobs: &[usize]) -> Subproblem {
        Subproblem::from_path(jobs.iter().copied().map(JobIndex::new).collect())
    }

    #[test]
    fn test_replay_rebuilds_state() {
        let model = two_by_two();
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();

        let sub = path(&[1, 0, 0, 1]);
        assert!(sub.is_valid_for(&model));
        assert!(sub.replay(&model, &mut state, &mut trail));
        assert_eq!(state.to_schedule().unwrap().start_times(), &[0, 3, 0, 3]);
        assert_eq!(sub.depth(), 4);
        assert_eq!(sub.to_string(), "Subproblem(1 0 0 1)");
    }

    #[test]
    fn test_invalid_paths_are_detected() {
        let model = two_by_two();
        assert!(!path(&[0, 0, 0]).is_valid_for(&model));
        assert!(!path(&[2]).is_valid_for(&model));

        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        assert!(!path(&[0, 0, 0]).replay(&model, &mut state, &mut trail));
    }

    #[test]
    fn test_child_extends_path() {
        let root = Subproblem::root();
        let child = root.child(JobIndex::new(1)).child(JobIndex::new(0));
        assert_eq!(child, path(&[1, 0]));
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn test_expand_root_and_leaf() {
        let model = two_by_two();
        let mut expander = SubproblemExpander::new();
        let mut builder = PriorityBuilder::new();
        let mut bound = CombinedBound::standard();
        let mut out = Vec::new();

        let expansion = expander.expand(
            &model,
            &Subproblem::root(),
            &mut builder,
            &mut bound,
            IntegerType::MAX,
            &mut out,
        );
        assert_eq!(expansion, Expansion::Children(2));
        // J0 carries 5 units of work, J1 only 3.
        assert_eq!(out, vec![path(&[0]), path(&[1])]);

        let expansion = expander.expand(
            &model,
            &path(&[1, 0, 0, 1]),
            &mut builder,
            &mut bound,
            IntegerType::MAX,
            &mut out,
        );
        assert!(matches!(expansion, Expansion::Leaf(ref s) if s.makespan() == 5));
    }

    #[test]
    fn test_expand_prunes_against_upper_bound() {
        let model = two_by_two();
        let mut expander = SubproblemExpander::new();
        let mut builder = PriorityBuilder::new();
        let mut bound = CombinedBound::standard();
        let mut out = Vec::new();

        // The root bound is 5, so nothing can beat an incumbent of 5.
        let expansion = expander.expand(
            &model,
            &Subproblem::root(),
            &mut builder,
            &mut bound,
            5,
            &mut out,
        );
        assert_eq!(expansion, Expansion::Pruned);
        assert!(out.is_empty());
    }
}
