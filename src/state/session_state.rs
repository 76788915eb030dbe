/// Session state definitions for the crawl termination protocol
///
/// A session only moves forward: `Running → Draining → Done`. Skipping
/// `Draining` is legal but the frontier always passes through it.
use crate::LensError;
use serde::Serialize;
use std::fmt;

/// Represents the lifecycle phase of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Workers are consuming tasks and new links are admitted
    Running,

    /// The page cap was reached; no new admissions, in-flight tasks finish
    Draining,

    /// Every dispatched task has resolved; the queue may be released
    Done,
}

impl SessionState {
    /// Returns true while new tasks may still be admitted
    pub fn accepts_work(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Running, Self::Draining) | (Self::Running, Self::Done) | (Self::Draining, Self::Done)
        )
    }

    /// Performs a checked transition
    ///
    /// # Returns
    ///
    /// * `Ok(SessionState)` - The new state
    /// * `Err(LensError::InvalidTransition)` - The step would move backwards or stay put
    pub fn transition_to(self, next: SessionState) -> Result<SessionState, LensError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(LensError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lowercase name used in logs and API output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
