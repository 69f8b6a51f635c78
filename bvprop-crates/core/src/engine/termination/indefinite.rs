use super::TerminationCondition;

/// A [`TerminationCondition`] which never triggers; the search continues until it finds a model
/// or proves that none exists.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}
