use std::fmt::Debug;

use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use crate::basic_types::BitVector;
use crate::basic_types::ProblemSolution;
use crate::basic_types::SolutionReference;
use crate::terms::NodeId;

/// A hook into the propagation loop, e.g. for verifying that the values propagated down the term
/// graph are actually attained after a move.
///
/// The methods are called in the order `on_walk_started`, `on_propagation` for every visited node,
/// and `on_move_applied` once the cone of the changed variable has been updated; a walk which ends
/// in a conflict is followed by another `on_walk_started`.
pub trait PropagationObserver: Debug + Downcast {
    fn on_walk_started(&mut self) {}

    fn on_propagation(&mut self, _node: NodeId, _target: BitVector) {}

    fn on_move_applied(&mut self, _solution: SolutionReference<'_>) {}
}

impl_downcast!(PropagationObserver);

/// The outcome of a single move as seen by a [`PropagationPathRecorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathReport {
    /// The number of nodes on the propagation path
    pub propagations: usize,
    /// The number of nodes on the path which have their target value after the move
    pub matched: usize,
}

/// The reports of all moves so far, summed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathSummary {
    pub moves: u64,
    pub propagations: u64,
    pub matched: u64,
    /// The number of moves after which none of the targets on the path held
    pub moves_without_match: u64,
    /// The most nodes on the path of a single move
    pub longest_path: usize,
}

/// Records the targets propagated during a move and reports how many of them were attained.
///
/// Only the report of the latest move is kept; earlier moves are folded into a [`PathSummary`] so
/// that the memory use does not grow with the length of the search.
#[derive(Clone, Debug, Default)]
pub struct PropagationPathRecorder {
    path: Vec<(NodeId, BitVector)>,
    last_report: Option<PathReport>,
    summary: PathSummary,
}

impl PropagationPathRecorder {
    pub fn new() -> PropagationPathRecorder {
        PropagationPathRecorder::default()
    }

    /// The report of the latest move, if any move was made.
    pub fn last_report(&self) -> Option<PathReport> {
        self.last_report
    }

    pub fn summary(&self) -> PathSummary {
        self.summary
    }
}

impl PropagationObserver for PropagationPathRecorder {
    fn on_walk_started(&mut self) {
        self.path.clear();
    }

    fn on_propagation(&mut self, node: NodeId, target: BitVector) {
        self.path.push((node, target));
    }

    fn on_move_applied(&mut self, solution: SolutionReference<'_>) {
        let matched = self
            .path
            .iter()
            .filter(|&&(node, target)| solution.value(node) == target)
            .count();
        let report = PathReport {
            propagations: self.path.len(),
            matched,
        };
        self.summary.moves += 1;
        self.summary.propagations += report.propagations as u64;
        self.summary.matched += report.matched as u64;
        if report.matched == 0 {
            self.summary.moves_without_match += 1;
        }
        self.summary.longest_path = self.summary.longest_path.max(report.propagations);
        self.last_report = Some(report);
        self.path.clear();
    }
}
