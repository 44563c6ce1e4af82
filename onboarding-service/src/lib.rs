//! Signup abuse policy and organization onboarding for the account-creation
//! pipeline.
//!
//! The host pipeline owns routing, credential hashing, sessions and
//! persistence. This crate supplies the pieces it calls into: the signup
//! decision, the three account-creation hooks in [`hooks`], the throttling
//! table in [`rate_limit`] and the route helpers in [`routes`].

pub mod config;
pub mod context;
pub mod hooks;
pub mod models;
pub mod policy;
pub mod rate_limit;
pub mod routes;
pub mod services;

pub use context::SignupContext;
pub use hooks::OnboardingService;
