use std::time::Duration;

use crate::create_statistics_struct;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::OperatorCounters;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The statistics of a solving session of the local search.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolverStatistics {
    /// Counters of the local search engine (e.g. the number of moves)
    pub engine_statistics: EngineStatistics,
    /// The amount of time which is spent in the solver
    pub time_spent_in_solver: Duration,
}

impl SolverStatistics {
    pub(crate) fn log(&self, verbose: bool) {
        log_statistic("moves", self.engine_statistics.moves);
        log_statistic("restarts", self.engine_statistics.restarts);
        log_statistic(
            "inverseValues",
            self.engine_statistics.inverse_values.total(),
        );
        log_statistic(
            "consistentValues",
            self.engine_statistics.consistent_values.total(),
        );
        log_statistic("solveTime", self.time_spent_in_solver.as_secs_f64());
        if verbose {
            self.engine_statistics
                .log(StatisticLogger::new(["engine"]));
        }
        log_statistic_postfix();
    }
}

create_statistics_struct!(
    /// Counters of the local search engine
    EngineStatistics {
        /// The number of moves, i.e. changes of the value of a variable
        moves: u64,
        /// The number of moves which started from an entailed propagation
        moves_entailed: u64,
        /// The number of nodes visited while propagating targets down the term graph
        steps: u64,
        /// The number of steps made while handling entailed propagations
        steps_entailed: u64,
        /// The number of children which were selected with an inverse value
        inverse_propagations: u64,
        /// The number of children which were selected with a consistent value
        consistent_propagations: u64,
        /// The number of nodes at which no child was invertible but some child was consistent
        recoverable_conflicts: u64,
        /// The number of walks which ended at a node without a consistent child
        non_recoverable_conflicts: u64,
        /// The number of conflicts because every candidate child was fixed
        fixed_conflicts: u64,
        /// The number of restarts
        restarts: u64,
        /// The number of node values recomputed after moves
        cone_updates: u64,
        /// The number of inverse values computed per operator
        inverse_values: OperatorCounters,
        /// The number of consistent values computed per operator
        consistent_values: OperatorCounters,
    }
);
