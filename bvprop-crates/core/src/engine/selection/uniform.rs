use super::ConstraintSelector;
use crate::basic_types::Random;
use crate::engine::roots::RootSet;
use crate::terms::NodeId;

/// Selects a violated constraint uniformly at random.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct UniformSelector;

impl ConstraintSelector for UniformSelector {
    fn select(&mut self, roots: &RootSet, random: &mut dyn Random) -> Option<NodeId> {
        if roots.is_empty() {
            return None;
        }
        Some(roots.get(random.generate_usize_in_range(0..roots.len())))
    }
}
