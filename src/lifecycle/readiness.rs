//! Process readiness signal

use std::sync::{Arc, OnceLock};
use tokio::sync::watch;

/// Single-assignment readiness flag.
///
/// Starts `false` and flips to `true` at most once; it never goes back. Clones
/// observe the same flag, so a probe can hold one while the host flips another.
#[derive(Clone, Debug)]
pub struct Readiness {
    tx: Arc<watch::Sender<bool>>,
}

impl Readiness {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// The process-wide flag read by readiness probes.
    pub fn global() -> &'static Readiness {
        static GLOBAL: OnceLock<Readiness> = OnceLock::new();
        GLOBAL.get_or_init(Readiness::new)
    }

    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Flip the flag. Returns `true` only for the call that performed the transition.
    pub fn mark_ready(&self) -> bool {
        self.tx.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        })
    }

    /// Resolves once the flag is set.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_flips_exactly_once() {
        let readiness = Readiness::new();
        assert!(!readiness.is_ready());
        assert!(readiness.mark_ready());
        assert!(readiness.is_ready());
        assert!(!readiness.mark_ready());
        assert!(!readiness.clone().mark_ready());
        assert!(readiness.is_ready());
    }

    #[tokio::test]
    async fn test_wait_resolves_after_mark() {
        let readiness = Readiness::new();
        let waiter = {
            let readiness = readiness.clone();
            tokio::spawn(async move { readiness.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());
        readiness.mark_ready();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_on_ready_flag_returns_immediately() {
        let readiness = Readiness::new();
        readiness.mark_ready();
        tokio::time::timeout(Duration::from_millis(100), readiness.wait())
            .await
            .unwrap();
    }
}
