//! Rate-limit handling for the repository API.
//!
//! ```text
//!            rate limited
//!   NORMAL ───────────────► WAITING ──(cooldown elapsed)──► retry request
//!     ▲   \                   │  │                              │
//!     │    \ fail-fast        │  └── Ctrl-C / waits exhausted   │
//!     │     ▼                 ▼                                 │
//!     │    ABORTING ◄─────────┘                                 │
//!     └──────────────────── any other response ◄────────────────┘
//! ```
//!
//! `ABORTING` is terminal for the run: once entered, every further
//! rate-limit signal aborts immediately.
//!
//! Ctrl-C is handled by a listener that lives for the whole run (see
//! [`TokioCooldown`]), so it is honoured during a cooldown and between records.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use super::traits::{Cooldown, WaitOutcome};

/// Cooldown GitHub needs before an exhausted quota is usable again
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);

/// How to react when the API reports an exhausted quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateLimitPolicy {
    /// Stop the run at the first rate-limit signal
    #[default]
    FailFast,
    /// Sleep for `cooldown` and repeat the request.
    /// `max_waits` bounds consecutive waits for one request; `None` is unbounded.
    WaitAndRetry {
        cooldown: Duration,
        max_waits: Option<u32>,
    },
}

impl RateLimitPolicy {
    pub fn wait_and_retry() -> Self {
        Self::WaitAndRetry {
            cooldown: DEFAULT_COOLDOWN,
            max_waits: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitState {
    Normal,
    /// Waiting out a cooldown; `waits` counts consecutive waits for the current request
    Waiting { waits: u32 },
    Aborting,
}

/// Why the controller gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortCause {
    /// Fail-fast policy
    RateLimited,
    /// User pressed Ctrl-C
    Interrupted,
    /// `max_waits` consecutive cooldowns didn't clear the limit
    WaitsExhausted,
}

impl std::fmt::Display for AbortCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortCause::RateLimited => f.write_str("GitHub API rate limit reached"),
            AbortCause::Interrupted => f.write_str("interrupted by user"),
            AbortCause::WaitsExhausted => f.write_str("rate limit persisted after repeated waits"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Re-issue the identical request
    Retry,
    /// Stop the whole run
    Abort(AbortCause),
}

/// Per-run rate-limit state machine.
pub struct RateLimitController<'a, C: Cooldown + ?Sized> {
    policy: RateLimitPolicy,
    cooldown: &'a C,
    state: RateLimitState,
    total_waits: u32,
}

impl<'a, C: Cooldown + ?Sized> RateLimitController<'a, C> {
    pub fn new(policy: RateLimitPolicy, cooldown: &'a C) -> Self {
        Self {
            policy,
            cooldown,
            state: RateLimitState::Normal,
            total_waits: 0,
        }
    }

    pub fn state(&self) -> RateLimitState {
        self.state
    }

    /// Cooldowns waited out over the whole run.
    pub fn total_waits(&self) -> u32 {
        self.total_waits
    }

    /// Handle a rate-limit signal. May block for the cooldown interval.
    pub async fn on_rate_limited(&mut self) -> RateLimitDecision {
        let (cooldown, max_waits) = match (self.state, self.policy) {
            (RateLimitState::Aborting, _) => {
                return RateLimitDecision::Abort(AbortCause::RateLimited);
            }
            (_, RateLimitPolicy::FailFast) => {
                return self.abort(AbortCause::RateLimited);
            }
            (_, RateLimitPolicy::WaitAndRetry { cooldown, max_waits }) => (cooldown, max_waits),
        };

        let waits = match self.state {
            RateLimitState::Waiting { waits } => waits,
            _ => 0,
        };
        if max_waits.is_some_and(|max| waits >= max) {
            return self.abort(AbortCause::WaitsExhausted);
        }

        self.state = RateLimitState::Waiting { waits: waits + 1 };
        tracing::warn!(
            "GitHub API rate limit reached. Waiting for {}...",
            format_duration(cooldown)
        );

        match self.cooldown.wait(cooldown).await {
            WaitOutcome::Elapsed => {
                self.total_waits += 1;
                RateLimitDecision::Retry
            }
            WaitOutcome::Interrupted => {
                tracing::warn!("Process interrupted by user");
                self.abort(AbortCause::Interrupted)
            }
        }
    }

    /// Any response other than a rate-limit signal clears the waiting state.
    pub fn on_response(&mut self) {
        if let RateLimitState::Waiting { .. } = self.state {
            self.state = RateLimitState::Normal;
        }
    }

    fn abort(&mut self, cause: AbortCause) -> RateLimitDecision {
        self.state = RateLimitState::Aborting;
        RateLimitDecision::Abort(cause)
    }
}

/// Real cooldown backed by a per-run Ctrl-C listener.
///
/// The first Ctrl-C cancels a cooldown in progress, or asks the engine to
/// stop before the next record so the progress so far can be saved. A
/// second Ctrl-C exits the process immediately with status 130.
#[derive(Debug, Clone)]
pub struct TokioCooldown {
    interrupted: watch::Receiver<bool>,
}

impl TokioCooldown {
    /// Start listening for Ctrl-C. Must be called from within a tokio runtime.
    pub fn listen() -> Self {
        let (tx, rx) = watch::channel(false);

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Could not listen for Ctrl-C: {}", e);
                return;
            }
            tracing::warn!("Process interrupted by user. Press Ctrl-C again to quit without saving.");
            let _ = tx.send(true);

            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });

        Self::from_receiver(rx)
    }

    fn from_receiver(interrupted: watch::Receiver<bool>) -> Self {
        Self { interrupted }
    }
}

/// Resolves `true` once an interrupt is flagged, `false` if the listener is gone.
async fn interrupt_flagged(rx: &mut watch::Receiver<bool>) -> bool {
    loop {
        if *rx.borrow_and_update() {
            return true;
        }
        if rx.changed().await.is_err() {
            return false;
        }
    }
}

#[async_trait]
impl Cooldown for TokioCooldown {
    async fn wait(&self, duration: Duration) -> WaitOutcome {
        let mut interrupted = self.interrupted.clone();
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        tokio::select! {
            _ = &mut sleep => WaitOutcome::Elapsed,
            flagged = interrupt_flagged(&mut interrupted) => {
                if flagged {
                    WaitOutcome::Interrupted
                } else {
                    sleep.await;
                    WaitOutcome::Elapsed
                }
            }
        }
    }

    fn stop_requested(&self) -> bool {
        *self.interrupted.borrow()
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let mins = secs / 60;
        format!("{} minute{}", mins, if mins == 1 { "" } else { "s" })
    } else {
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    }
}
