use super::SequenceGenerator;

/// Given constants 'a' and 'm', the i-th element f(i) in a geometric sequence is computed as:
///  f(i) = f(i-1) * m
///  f(0) = a
/// When 'm' is not an integer, the above formula is _not_ the same as f(i) = a * m^i since
/// intermediate values will be rounded down.
///
/// The values saturate at [`i64::MAX`].
#[derive(Debug, Copy, Clone)]
pub(crate) struct GeometricSequence {
    current_value: i64,
    multiplication_factor: f64,
}

impl GeometricSequence {
    pub(crate) fn new(starting_value: i64, multiplication_factor: f64) -> GeometricSequence {
        GeometricSequence {
            current_value: starting_value,
            multiplication_factor,
        }
    }
}

impl SequenceGenerator for GeometricSequence {
    fn next(&mut self) -> i64 {
        let next_value = self.current_value;
        // Float to integer casts saturate.
        self.current_value = (self.current_value as f64 * self.multiplication_factor) as i64;
        next_value
    }
}
