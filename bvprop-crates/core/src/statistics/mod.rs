//! Collection and reporting of the counters kept by the local search engine.
mod statistic_logger;
mod statistic_logging;

use std::fmt::Display;

use enum_map::EnumMap;
pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;
pub use statistic_logging::StatisticOptions;

use crate::terms::OpKind;

/// A value which can be written to the statistic output under a name prefix.
///
/// See [`create_statistics_struct!`] for deriving this for a struct of counters.
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, statistic_logger: StatisticLogger) {
        statistic_logger.log_statistic(self);
    }
}

/// A counter per operator; only the operators with a non-zero count are logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperatorCounters(pub(crate) EnumMap<OpKind, u64>);

impl OperatorCounters {
    pub(crate) fn increment(&mut self, kind: OpKind) {
        self.0[kind] += 1;
    }

    pub fn get(&self, kind: OpKind) -> u64 {
        self.0[kind]
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl Statistic for OperatorCounters {
    fn log(&self, statistic_logger: StatisticLogger) {
        self.0
            .iter()
            .filter(|(_, count)| **count > 0)
            .for_each(|(kind, count)| statistic_logger.attach_to_prefix(kind).log_statistic(count));
    }
}

/// Generates a struct of statistics in which every field is logged under its own name.
///
/// # Example
/// ```rust
/// # use bvprop_core::create_statistics_struct;
/// create_statistics_struct!(WalkStatistics {
///     walks: u64
/// });
///
/// let statistics = WalkStatistics::default();
/// assert_eq!(statistics.walks, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $name {
            $($(#[$variable_documentation])* pub $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $($crate::statistics::Statistic::log(
                    &self.$field,
                    statistic_logger.attach_to_prefix(stringify!($field)),
                );)+
            }
        }
    };
}
