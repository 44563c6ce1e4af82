//! Signup abuse decision.
//!
//! Pure mapping from a signup attempt and the resolved policy to an
//! allow/deny decision. No I/O, no mutation.

use serde::Serialize;

use crate::config::{SignupAbusePolicyConfig, SignupPolicyMode};
use crate::routes::is_monitored_signup_path;

/// One account-creation attempt as seen by the abuse policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupAttempt {
    pub path: String,
    pub email: String,
    pub invite_code_header: Option<String>,
}

impl SignupAttempt {
    pub fn new(
        path: impl Into<String>,
        email: impl Into<String>,
        invite_code_header: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            email: email.into(),
            invite_code_header,
        }
    }
}

/// Stable, client-facing reason for a denied signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    AllowlistDenied,
    InvalidInviteCode,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::AllowlistDenied => "allowlist_denied",
            DenialReason::InvalidInviteCode => "invalid_invite_code",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupDecision {
    Allowed,
    Denied { reason: DenialReason },
}

impl SignupDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SignupDecision::Allowed)
    }
}

/// Evaluate a signup attempt.
///
/// Only the email signup path is inspected. Production skips the allowlist
/// and invite-code checks entirely; those are enforced, or deliberately
/// disabled, outside this service.
pub fn evaluate(attempt: &SignupAttempt, config: &SignupAbusePolicyConfig) -> SignupDecision {
    if !is_monitored_signup_path(&attempt.path) {
        return SignupDecision::Allowed;
    }

    if config.is_production {
        return SignupDecision::Allowed;
    }

    if config.signup_policy_mode == SignupPolicyMode::Allowlist
        && !config.allowlisted_emails.contains(&attempt.email)
    {
        return SignupDecision::Denied {
            reason: DenialReason::AllowlistDenied,
        };
    }

    if let Some(expected) = config.local_invite_code.as_deref() {
        if attempt.invite_code_header.as_deref() != Some(expected) {
            return SignupDecision::Denied {
                reason: DenialReason::InvalidInviteCode,
            };
        }
    }

    SignupDecision::Allowed
}
