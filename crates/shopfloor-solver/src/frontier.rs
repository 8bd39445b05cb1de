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

//! Breadth-first frontier of the static strategy.
//!
//! The tree is expanded level by level down to the cutoff depth. Nodes whose
//! bound already reaches the incumbent are dropped on the way, and complete
//! schedules met above the cutoff are offered to the incumbent directly. The
//! surviving nodes at the cutoff are the frontier, in branching order.
//!
//! Every expansion is a step and an explored node of the attached monitor, so
//! budgets and interrupts hold during the expansion too. Once the frontier
//! would reach `max_len` nodes, expansion stops early. The frontier then
//! mixes two depths, which still covers every surviving subtree exactly once.

use shopfloor_bnb::{
    branching::decision::DecisionBuilder,
    eval::evaluator::BoundEvaluator,
    subproblem::{Expansion, Subproblem, SubproblemExpander},
};
use shopfloor_model::model::Model;
use shopfloor_search::{
    incumbent::SharedIncumbent,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SolverNumeric,
};

/// The subproblems left at the cutoff depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    subproblems: Vec<Subproblem>,
    nodes_expanded: u64,
    aborted: Option<String>,
}

impl Frontier {
    /// Expands `model` breadth-first down to `cutoff` levels, holding at most
    /// about `max_len` open nodes.
    ///
    /// If `monitor` asks to terminate, expansion stops and the reason is kept
    /// in `aborted`. The frontier is then incomplete.
    pub fn expand<T, B, E, M>(
        model: &Model<T>,
        incumbent: &SharedIncumbent<T>,
        cutoff: usize,
        max_len: usize,
        builder: &mut B,
        evaluator: &mut E,
        monitor: &mut M,
    ) -> Self
    where
        T: SolverNumeric,
        B: DecisionBuilder<T>,
        E: BoundEvaluator<T>,
        M: SearchMonitor<T> + ?Sized,
    {
        let mut expander = SubproblemExpander::new();
        let mut current = vec![Subproblem::root()];
        let mut next = Vec::new();
        let mut nodes_expanded = 0u64;
        let mut aborted = None;

        monitor.on_enter_search(model);
        'levels: for _ in 0..cutoff {
            let mut level = std::mem::take(&mut current).into_iter();
            while let Some(subproblem) = level.next() {
                monitor.on_step();
                if let SearchCommand::Terminate(reason) = monitor.search_command() {
                    aborted = Some(reason);
                }
                if aborted.is_some() || next.len() + 1 + level.len() >= max_len {
                    next.push(subproblem);
                    next.extend(level);
                    current = std::mem::take(&mut next);
                    break 'levels;
                }

                monitor.on_node_explored();
                nodes_expanded += 1;
                let bound = incumbent.upper_bound_as().unwrap_or_else(|_| T::max_value());
                let expansion =
                    expander.expand(model, &subproblem, builder, evaluator, bound, &mut next);
                match expansion {
                    Expansion::Leaf(schedule) => {
                        if incumbent.try_install(&schedule) {
                            monitor.on_solution_found(&schedule);
                        }
                    }
                    Expansion::Pruned | Expansion::Children(_) => {}
                }
            }
            std::mem::swap(&mut current, &mut next);
            if current.is_empty() {
                break;
            }
        }
        monitor.on_exit_search();

        Self {
            subproblems: current,
            nodes_expanded,
            aborted,
        }
    }

    /// Returns the frontier nodes in branching order.
    #[inline]
    pub fn subproblems(&self) -> &[Subproblem] {
        &self.subproblems
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subproblems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subproblems.is_empty()
    }

    /// Returns the number of nodes expanded to build the frontier.
    #[inline]
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    /// Returns the reason the monitor stopped the expansion, if it did.
    #[inline]
    pub fn aborted(&self) -> Option<&str> {
        self.aborted.as_deref()
    }

    /// Deals the frontier round-robin onto `workers` (at least one) lists.
    pub fn deal(self, workers: usize) -> Vec<Vec<Subproblem>> {
        let workers = workers.max(1);
        let mut hands: Vec<Vec<Subproblem>> = (0..workers)
            .map(|_| Vec::with_capacity(self.subproblems.len() / workers + 1))
            .collect();
        for (i, subproblem) in self.subproblems.into_iter().enumerate() {
            hands[i % workers].push(subproblem);
        }
        hands
    }
}
