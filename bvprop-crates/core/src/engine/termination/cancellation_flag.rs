use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers once the flag has been raised, possibly from another
/// thread through a clone of the flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> CancellationFlag {
        CancellationFlag::default()
    }

    /// Requests every search polling this flag (or one of its clones) to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl TerminationCondition for CancellationFlag {
    fn should_stop(&mut self) -> bool {
        self.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::CancellationFlag;
    use crate::engine::termination::TerminationCondition;

    #[test]
    fn clones_share_the_flag() {
        let mut flag = CancellationFlag::new();
        let remote = flag.clone();
        assert!(!flag.should_stop());

        thread::spawn(move || remote.cancel())
            .join()
            .expect("the cancelling thread does not panic");
        assert!(flag.should_stop());
    }
}
