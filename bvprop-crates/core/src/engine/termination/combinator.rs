use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers when one of two given [`TerminationCondition`]s
/// triggers.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<T1, T2> {
    t1: T1,
    t2: T2,
}

impl<T1, T2> Combinator<T1, T2> {
    /// Combine two [`TerminationCondition`]s into one.
    pub fn new(t1: T1, t2: T2) -> Self {
        Combinator { t1, t2 }
    }
}

impl<T1: TerminationCondition, T2: TerminationCondition> TerminationCondition
    for Combinator<T1, T2>
{
    fn should_stop(&mut self) -> bool {
        self.t1.should_stop() || self.t2.should_stop()
    }

    fn move_has_been_made(&mut self) {
        self.t1.move_has_been_made();
        self.t2.move_has_been_made();
    }
}

#[cfg(test)]
mod tests {
    use super::Combinator;
    use crate::engine::termination::Indefinite;
    use crate::engine::termination::MoveBudget;
    use crate::engine::termination::TerminationCondition;

    #[test]
    fn moves_are_forwarded_to_both_conditions() {
        let mut combinator = Combinator::new(Indefinite, MoveBudget::new(2));
        assert!(!combinator.should_stop());
        combinator.move_has_been_made();
        combinator.move_has_been_made();
        assert!(combinator.should_stop());
    }
}
