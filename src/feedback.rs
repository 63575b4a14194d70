//! Transient feedback text shown next to the mascot.
//!
//! Lives on the UI side: the session only says what to show and for how
//! long. Posting a new message replaces the old one along with its expiry.

use std::time::{Duration, Instant};

struct Posted {
    text: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct FeedbackBoard {
    posted: Option<Posted>,
}

impl FeedbackBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, text: impl Into<String>, ttl: Duration, now: Instant) {
        self.posted = Some(Posted {
            text: text.into(),
            expires_at: now + ttl,
        });
    }

    /// Drop the message once its deadline has passed and hand back its text.
    pub fn expire(&mut self, now: Instant) -> Option<String> {
        match self.posted.take() {
            Some(p) if now >= p.expires_at => Some(p.text),
            kept => {
                self.posted = kept;
                None
            }
        }
    }
}
