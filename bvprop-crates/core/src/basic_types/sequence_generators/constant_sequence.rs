use super::SequenceGenerator;

// A sequence that generates the same value
#[derive(Debug, Copy, Clone)]
pub(crate) struct ConstantSequence {
    constant_value: i64,
}

impl ConstantSequence {
    pub(crate) fn new(constant_value: i64) -> ConstantSequence {
        ConstantSequence { constant_value }
    }
}

impl SequenceGenerator for ConstantSequence {
    fn next(&mut self) -> i64 {
        self.constant_value
    }
}

#[cfg(test)]
mod tests {
    use super::ConstantSequence;
    use crate::basic_types::sequence_generators::SequenceGenerator;

    #[test]
    fn always_returns_the_constant() {
        let mut constant_sequence = ConstantSequence::new(250);
        for _ in 0..100 {
            assert_eq!(constant_sequence.next(), 250);
        }
    }
}
