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

//! Brute-force admissibility check for bound evaluators.
//!
//! Enumerates the whole search tree of a (small) model, computes for every
//! node the best makespan among its completions, and verifies that the
//! evaluator's bound at that node does not exceed it. The enumeration uses
//! the same state, trail and branching rule as the engine, so it checks the
//! bound against exactly the schedules the engine can reach.
//!
//! The tree grows factorially with the number of operations. Keep the models
//! tiny (3 jobs by 3 machines has a few thousand nodes) or cap the work with
//! `max_nodes`; a capped run only reports violations found before the cap.

use crate::{
    branching::decision::{Decision, open_decisions},
    eval::evaluator::BoundEvaluator,
    state::SearchState,
    trail::SearchTrail,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::model::Model;

/// Returns `true` if no node of the first `max_nodes` visited has a bound
/// above the best makespan reachable from it.
pub fn is_admissible_exhaustive<T, E>(
    evaluator: &mut E,
    model: &Model<T>,
    max_nodes: usize,
) -> bool
where
    T: PrimInt + Signed,
    E: BoundEvaluator<T>,
{
    let mut checker = AdmissibilityChecker {
        model,
        evaluator,
        state: SearchState::new(model),
        trail: SearchTrail::preallocated(model.num_operations()),
        nodes: 0,
        max_nodes,
        violated: false,
    };
    let _ = checker.visit();
    !checker.violated
}

/// Returns the optimal makespan of `model` by full enumeration, or `None`
/// if the tree has more than `max_nodes` nodes.
pub fn brute_force_makespan<T>(model: &Model<T>, max_nodes: usize) -> Option<T>
where
    T: PrimInt + Signed,
{
    let mut evaluator = crate::eval::evaluator::TrivialBound;
    let mut checker = AdmissibilityChecker {
        model,
        evaluator: &mut evaluator,
        state: SearchState::new(model),
        trail: SearchTrail::preallocated(model.num_operations()),
        nodes: 0,
        max_nodes,
        violated: false,
    };
    checker.visit()
}

struct AdmissibilityChecker<'a, T, E> {
    model: &'a Model<T>,
    evaluator: &'a mut E,
    state: SearchState<T>,
    trail: SearchTrail<T>,
    nodes: usize,
    max_nodes: usize,
    violated: bool,
}

impl<'a, T, E> AdmissibilityChecker<'a, T, E>
where
    T: PrimInt + Signed,
    E: BoundEvaluator<T>,
{
    /// Returns the best makespan below the current node, `None` once the cap is hit.
    fn visit(&mut self) -> Option<T> {
        self.nodes += 1;
        if self.nodes > self.max_nodes {
            return None;
        }

        let bound = self.evaluator.lower_bound(self.model, &self.state);
        let best = if self.state.is_complete() {
            self.state.makespan()
        } else {
            let decisions: Vec<Decision<T>> = open_decisions(self.model, &self.state).collect();
            let mut best = T::max_value();
            for decision in decisions {
                self.trail.push_frame();
                self.trail.apply(&mut self.state, self.model, &decision);
                let below = self.visit();
                self.trail.backtrack(&mut self.state);
                best = best.min(below?);
            }
            best
        };

        if bound > best {
            self.violated = true;
        }
        Some(best)
    }
}
