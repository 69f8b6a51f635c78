use super::SequenceGenerator;

/// The restart schedule of propagation-based local search: the `i`-th round (starting at
/// `i = 1`) may take `base * 2^(i / 2)` moves when `i` is even and `base` moves when `i` is odd.
///
/// This yields `100, 200, 100, 400, 100, 800, ...` for a base of 100; every other round is short
/// while the long rounds double.
#[derive(Debug, Copy, Clone)]
pub(crate) struct DoublingSequence {
    round: u64,
    base_value: i64,
}

impl DoublingSequence {
    pub(crate) fn new(base_value: i64) -> DoublingSequence {
        DoublingSequence {
            round: 0,
            base_value,
        }
    }
}

impl SequenceGenerator for DoublingSequence {
    fn next(&mut self) -> i64 {
        self.round += 1;
        if self.round % 2 == 1 {
            return self.base_value;
        }

        let exponent = self.round >> 1;
        if exponent >= 62 {
            i64::MAX
        } else {
            self.base_value.saturating_mul(1 << exponent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DoublingSequence;
    use crate::basic_types::sequence_generators::SequenceGenerator;

    #[test]
    fn alternates_base_and_doubling_rounds() {
        let mut sequence = DoublingSequence::new(100);
        let expected = [100, 200, 100, 400, 100, 800, 100, 1600];
        for value in expected {
            assert_eq!(sequence.next(), value);
        }
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let mut sequence = DoublingSequence::new(100);
        let last = (0..200).map(|_| sequence.next()).max();
        assert_eq!(last, Some(i64::MAX));
    }
}
