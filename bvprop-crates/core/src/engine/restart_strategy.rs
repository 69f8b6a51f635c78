use log::warn;

use crate::basic_types::sequence_generators::ConstantSequence;
use crate::basic_types::sequence_generators::DoublingSequence;
use crate::basic_types::sequence_generators::GeometricSequence;
use crate::basic_types::sequence_generators::LubySequence;
use crate::basic_types::sequence_generators::SequenceGenerator;
use crate::basic_types::sequence_generators::SequenceGeneratorType;

/// The coefficient used by the geometric sequence if none is given.
const DEFAULT_GEOMETRIC_COEF: f64 = 2.0;

/// The options which determine after how many moves the local search restarts.
///
/// A round of the local search ends once it has made the number of moves given by the next
/// element of the restart sequence; the search then starts again from a fresh initial assignment.
/// With the default [`SequenceGeneratorType::Doubling`] and a base interval of `100`, the rounds
/// take `100, 200, 100, 400, 100, 800, ...` moves.
#[derive(Debug, Clone, Copy)]
pub struct RestartOptions {
    /// Decides the sequence based on which the restarts are performed.
    /// To be used in combination with [`RestartOptions::base_interval`]
    pub sequence_generator_type: SequenceGeneratorType,
    /// The base interval length is used as a multiplier to the restart sequence.
    /// For example, constant restarts with base interval 100 means a restart is triggered every
    /// 100 moves.
    pub base_interval: u64,
    /// The coefficient in the geometric sequence `x_i = x_{i-1} * geometric-coef` where `x_1 =
    /// `[`RestartOptions::base_interval`]. Used only if
    /// [`RestartOptions::sequence_generator_type`] is assigned to
    /// [`SequenceGeneratorType::Geometric`].
    pub geometric_coef: Option<f64>,
}

impl Default for RestartOptions {
    fn default() -> Self {
        Self {
            sequence_generator_type: SequenceGeneratorType::Doubling,
            base_interval: 100,
            geometric_coef: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RestartStrategy {
    /// Generates the number of moves of every round; `None` if restarts are disabled.
    sequence_generator: Option<Box<dyn SequenceGenerator>>,
    /// The number of moves made since the last restart
    moves_since_restart: u64,
    /// The number of moves after which the current round ends
    moves_until_restart: u64,
}

impl RestartStrategy {
    pub(crate) fn new(options: RestartOptions, restarts_enabled: bool) -> Self {
        let mut sequence_generator = restarts_enabled.then(|| create_sequence_generator(options));
        let moves_until_restart = next_interval(&mut sequence_generator);
        RestartStrategy {
            sequence_generator,
            moves_since_restart: 0,
            moves_until_restart,
        }
    }

    pub(crate) fn should_restart(&self) -> bool {
        self.sequence_generator.is_some() && self.moves_since_restart >= self.moves_until_restart
    }

    pub(crate) fn notify_move(&mut self) {
        self.moves_since_restart += 1;
    }

    pub(crate) fn moves_since_restart(&self) -> u64 {
        self.moves_since_restart
    }

    /// Starts a new round whose length is the next element of the sequence.
    pub(crate) fn notify_restart(&mut self) {
        self.moves_since_restart = 0;
        self.moves_until_restart = next_interval(&mut self.sequence_generator);
    }
}

fn create_sequence_generator(options: RestartOptions) -> Box<dyn SequenceGenerator> {
    let base_interval = options.base_interval as i64;
    match options.sequence_generator_type {
        SequenceGeneratorType::Constant => Box::new(ConstantSequence::new(base_interval)),
        SequenceGeneratorType::Geometric => {
            let coefficient = options.geometric_coef.unwrap_or_else(|| {
                warn!(
                    "Using the geometric sequence for restarts without a coefficient, defaulting to {DEFAULT_GEOMETRIC_COEF}"
                );
                DEFAULT_GEOMETRIC_COEF
            });
            Box::new(GeometricSequence::new(base_interval, coefficient))
        }
        SequenceGeneratorType::Luby => Box::new(LubySequence::new(base_interval)),
        SequenceGeneratorType::Doubling => Box::new(DoublingSequence::new(base_interval)),
    }
}

/// Every round takes at least one move.
fn next_interval(sequence_generator: &mut Option<Box<dyn SequenceGenerator>>) -> u64 {
    sequence_generator
        .as_mut()
        .map_or(u64::MAX, |generator| generator.next().max(1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_lengths(strategy: &mut RestartStrategy, rounds: usize) -> Vec<u64> {
        let mut lengths = vec![];
        for _ in 0..rounds {
            while !strategy.should_restart() {
                strategy.notify_move();
            }
            lengths.push(strategy.moves_since_restart());
            strategy.notify_restart();
        }
        lengths
    }

    #[test]
    fn default_rounds_follow_the_doubling_sequence() {
        let mut strategy = RestartStrategy::new(RestartOptions::default(), true);
        assert_eq!(
            round_lengths(&mut strategy, 8),
            vec![100, 200, 100, 400, 100, 800, 100, 1600]
        );
    }

    #[test]
    fn geometric_sequence_without_coefficient_doubles() {
        let options = RestartOptions {
            sequence_generator_type: SequenceGeneratorType::Geometric,
            base_interval: 3,
            geometric_coef: None,
        };
        let mut strategy = RestartStrategy::new(options, true);
        assert_eq!(round_lengths(&mut strategy, 4), vec![3, 6, 12, 24]);
    }

    #[test]
    fn disabled_restarts_never_trigger() {
        let mut strategy = RestartStrategy::new(RestartOptions::default(), false);
        for _ in 0..1000 {
            strategy.notify_move();
        }
        assert!(!strategy.should_restart());
    }
}
