//! Generation-counted debouncing.
//!
//! Every call to [`Debouncer::settle`] bumps a generation and sleeps. When the
//! sleep ends, the call only proceeds if no newer call (or cancel) happened
//! in between. This gives "last input wins" without spawning or aborting
//! tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

/// Handle for one pending [`Debouncer::settle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start a new pending call, superseding any earlier one.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no newer ticket or cancel has been issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Wait out the quiet period. `false` means a newer call took over.
    pub async fn settle(&self) -> bool {
        let ticket = self.ticket();
        self.wait(ticket).await
    }

    /// Sleep for the configured delay, then report whether `ticket` survived.
    pub async fn wait(&self, ticket: Ticket) -> bool {
        if !self.delay.is_zero() {
            futures_timer::Delay::new(self.delay).await;
        }
        self.is_current(ticket)
    }

    /// Drop whatever is pending.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_call_wins() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let (first, second) = futures_util::join!(debouncer.settle(), async {
            futures_timer::Delay::new(Duration::from_millis(10)).await;
            debouncer.settle().await
        });
        assert!(!first);
        assert!(second);
    }

    #[tokio::test]
    async fn test_cancel_supersedes_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let (settled, ()) = futures_util::join!(debouncer.settle(), async {
            futures_timer::Delay::new(Duration::from_millis(5)).await;
            debouncer.cancel();
        });
        assert!(!settled);
    }

    #[test]
    fn test_ticket_generations() {
        let debouncer = Debouncer::new(Duration::ZERO);
        let a = debouncer.ticket();
        assert!(debouncer.is_current(a));
        let b = debouncer.ticket();
        assert!(!debouncer.is_current(a));
        assert!(debouncer.is_current(b));
    }
}
