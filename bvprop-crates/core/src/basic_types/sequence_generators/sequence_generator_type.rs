/// The sequence which determines how many moves a round of the local search may take before the
/// solver restarts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SequenceGeneratorType {
    Constant,
    Geometric,
    Luby,
    Doubling,
}

impl std::fmt::Display for SequenceGeneratorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceGeneratorType::Constant => write!(f, "constant"),
            SequenceGeneratorType::Geometric => write!(f, "geometric"),
            SequenceGeneratorType::Luby => write!(f, "luby"),
            SequenceGeneratorType::Doubling => write!(f, "doubling"),
        }
    }
}
