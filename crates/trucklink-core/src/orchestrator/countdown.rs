//! Pre-warm countdown
//!
//! Whole-second countdown driven by `tokio::time`, so it follows paused
//! virtual time in tests. Cancellation is observed at every tick boundary.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// The countdown was cancelled before it completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownCancelled {
    /// Seconds that were still left
    pub remaining: u32,
}

/// Countdown from `seconds` to 1
#[derive(Debug, Clone)]
pub struct Countdown {
    seconds: u32,
    tick: Duration,
    cancel: CancellationToken,
}

impl Countdown {
    /// Create a countdown of `seconds` ticks of length `tick`
    pub fn new(seconds: u32, tick: Duration, cancel: CancellationToken) -> Self {
        Self {
            seconds,
            tick,
            cancel,
        }
    }

    /// Total number of ticks
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Run to completion.
    ///
    /// `on_tick` receives the remaining seconds (N, N-1, ..., 1) before each
    /// tick's sleep.
    pub async fn run<F>(&self, mut on_tick: F) -> Result<(), CountdownCancelled>
    where
        F: FnMut(u32),
    {
        for remaining in (1..=self.seconds).rev() {
            if self.cancel.is_cancelled() {
                return Err(CountdownCancelled { remaining });
            }
            on_tick(remaining);
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(CountdownCancelled { remaining }),
                _ = tokio::time::sleep(self.tick) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_down_to_one() {
        let countdown = Countdown::new(6, Duration::from_secs(1), CancellationToken::new());
        let started = Instant::now();
        let mut ticks = Vec::new();

        countdown.run(|remaining| ticks.push(remaining)).await.unwrap();

        assert_eq!(ticks, vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_seconds_completes_immediately() {
        let countdown = Countdown::new(0, Duration::from_secs(1), CancellationToken::new());
        let started = Instant::now();
        let mut ticks = 0;

        countdown.run(|_| ticks += 1).await.unwrap();

        assert_eq!(ticks, 0);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_at_tick_boundary() {
        let token = CancellationToken::new();
        let countdown = Countdown::new(10, Duration::from_secs(1), token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            token.cancel();
        });

        let result = countdown.run(|_| {}).await;
        canceller.await.unwrap();
        assert_eq!(result, Err(CountdownCancelled { remaining: 7 }));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_ticks() {
        let token = CancellationToken::new();
        token.cancel();
        let countdown = Countdown::new(3, Duration::from_secs(1), token);
        let mut ticks = 0;

        assert!(countdown.run(|_| ticks += 1).await.is_err());
        assert_eq!(ticks, 0);
    }
}
