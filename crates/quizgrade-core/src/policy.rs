//! Attempt policy evaluation.
//!
//! Decides whether a student may start another attempt given the lesson's
//! policy and the number of attempts already recorded. The count is supplied
//! by the caller; this module never reads attempt storage itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AttemptPolicy, PolicyMode};

/// Whether a new attempt is allowed, with a status line for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStatus {
    /// A new attempt may be started.
    pub can_take: bool,
    /// Human-readable status, e.g. "Attempts: 1/3".
    pub status_text: String,
    /// Attempts already recorded.
    pub used: u32,
    /// Effective cap, or `None` when unlimited.
    pub cap: Option<u32>,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_text)
    }
}

impl AttemptPolicy {
    /// The effective number of allowed attempts, or `None` when unlimited.
    ///
    /// A configured limit of 0 is treated as 1.
    pub fn cap(&self) -> Option<u32> {
        match self.mode {
            PolicyMode::Unlimited => None,
            PolicyMode::OneTime => Some(1),
            PolicyMode::Limit => Some(self.limit.max(1)),
        }
    }
}

/// Evaluate a policy against the number of attempts already used.
pub fn evaluate_attempt_policy(policy: &AttemptPolicy, attempts_used: u32) -> AttemptStatus {
    let used = attempts_used;
    match policy.cap() {
        None => AttemptStatus {
            can_take: true,
            status_text: format!("Attempts: {used} (unlimited)"),
            used,
            cap: None,
        },
        Some(cap) => {
            let can_take = used < cap;
            let status_text = if can_take {
                format!("Attempts: {used}/{cap}")
            } else {
                format!("Attempts: {cap}/{cap} (locked)")
            };
            AttemptStatus {
                can_take,
                status_text,
                used,
                cap: Some(cap),
            }
        }
    }
}
