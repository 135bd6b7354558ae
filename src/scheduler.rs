//! Deferred opponent moves on a tokio timer.

#![cfg(feature = "std")]

use std::time::Duration;

use log::trace;
use rand::Rng;
use tokio::time::{sleep_until, Instant};

use crate::game::MoveTicket;

// Deadline used when a delay does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Holds at most one pending opponent move and the instant it becomes due.
///
/// `wait` is cancel safe: dropping it mid-sleep keeps the move pending, so it
/// can sit in a `select!` next to user input.
#[derive(Debug)]
pub struct OpponentClock {
    min_ms: u64,
    max_ms: u64,
    pending: Option<(MoveTicket, Instant)>,
}

impl OpponentClock {
    /// Delays are drawn uniformly from `min..=max`.
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        Self {
            min_ms: millis(min),
            max_ms: millis(max),
            pending: None,
        }
    }

    /// A clock whose moves are due right away.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Queue `ticket`, replacing anything pending. Returns the chosen delay.
    pub fn schedule<R: Rng + ?Sized>(&mut self, ticket: MoveTicket, rng: &mut R) -> Duration {
        let delay = Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms));
        trace!("opponent move {:?} due in {:?}", ticket, delay);
        let now = Instant::now();
        let deadline = now.checked_add(delay).unwrap_or(now + FAR_FUTURE);
        self.pending = Some((ticket, deadline));
        delay
    }

    /// Drop the pending move, if any.
    pub fn cancel(&mut self) -> Option<MoveTicket> {
        self.pending.take().map(|(ticket, _)| ticket)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve with the pending ticket once it is due. Never resolves while
    /// nothing is scheduled.
    pub async fn wait(&mut self) -> MoveTicket {
        match self.pending {
            Some((ticket, deadline)) => {
                sleep_until(deadline).await;
                self.pending = None;
                ticket
            }
            None => std::future::pending().await,
        }
    }
}

// Delays beyond u64 milliseconds saturate.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
