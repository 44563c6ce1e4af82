//! Signup abuse policy: allowlist parsing and the signup decision.

pub mod allowlist;
pub mod decision;

pub use allowlist::{normalize_allowlist, EmailAllowlist};
pub use decision::{evaluate, DenialReason, SignupAttempt, SignupDecision};
