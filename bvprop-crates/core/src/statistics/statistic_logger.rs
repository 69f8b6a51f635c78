use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;

/// Writes statistics whose names are prefixed with the path of the component they belong to,
/// e.g. `engine_moves`.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new<Input: IntoIterator<Item = impl Display>>(name_prefix: Input) -> Self {
        Self {
            name_prefix: name_prefix.into_iter().join("_"),
        }
    }

    /// Returns a logger whose prefix is extended with `addition_to_prefix`.
    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        let name_prefix = if self.name_prefix.is_empty() {
            addition_to_prefix.to_string()
        } else {
            format!("{}_{}", self.name_prefix, addition_to_prefix)
        };
        Self { name_prefix }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name_prefix, value);
    }
}

#[cfg(test)]
mod tests {
    use super::StatisticLogger;

    #[test]
    fn prefixes_are_joined() {
        let logger = StatisticLogger::new(["engine", "walk"]).attach_to_prefix("moves");
        assert_eq!(logger.name_prefix, "engine_walk_moves");
        assert_eq!(
            StatisticLogger::default()
                .attach_to_prefix("restarts")
                .name_prefix,
            "restarts"
        );
    }
}
