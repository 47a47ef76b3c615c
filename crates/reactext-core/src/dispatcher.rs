//! Sequential reaction dispatch.
//!
//! One call at a time, each awaited before the next. A fixed pause follows
//! every successful call except the last; failed calls are logged and the
//! loop moves on.

use std::time::Duration;

use reactext_types::{ReactionDirective, ReactionFailure, TargetMessage};
use tracing::{debug, info};

use crate::classify::{classify, log_failure};
use crate::clock::{Clock, SystemClock};
use crate::host::ReactionSink;

/// Pause after a successful reaction call
pub const REACTION_PAUSE: Duration = Duration::from_millis(350);

/// Outcome of one dispatch run
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub succeeded: usize,
    pub failures: Vec<ReactionFailure>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }
}

pub struct Dispatcher<C: Clock = SystemClock> {
    clock: C,
    pause: Duration,
}

impl Default for Dispatcher<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            pause: REACTION_PAUSE,
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Add every directive's reaction to `target`, in order.
    pub async fn dispatch<S: ReactionSink>(
        &self,
        sink: &S,
        directives: &[ReactionDirective],
        target: TargetMessage,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let last = directives.len().saturating_sub(1);

        for (i, directive) in directives.iter().enumerate() {
            match sink.add_reaction(target, &directive.emoji).await {
                Ok(()) => {
                    debug!(
                        "Reacted {:?} with {} from guild {}",
                        directive.character,
                        directive.emoji.reaction_ref(),
                        directive.space_id
                    );
                    report.succeeded += 1;
                    if i < last {
                        self.clock.sleep(self.pause).await;
                    }
                }
                Err(e) => {
                    let failure = classify(directive, &e);
                    log_failure(&failure);
                    report.failures.push(failure);
                }
            }
        }

        info!(
            "Dispatched {} reactions to message {} ({} failed)",
            report.attempted(),
            target.message_id,
            report.failures.len()
        );
        report
    }
}
