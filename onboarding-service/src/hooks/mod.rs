//! Account-creation hooks.
//!
//! The host pipeline calls these in a fixed order for every account it
//! creates, passing the same [`SignupContext`](crate::context::SignupContext):
//!
//! 1. [`OnboardingService::guard`] before anything is persisted,
//! 2. [`OnboardingService::materialize`] while the account record is built,
//! 3. [`OnboardingService::finalize`] after the account exists.
//!
//! A join reservation taken by the guard is only consumed by the finalizer.
//! If the pipeline aborts in between, the reservation is left to expire on
//! the provider side.

mod finalize;
mod guard;
mod materialize;

pub use guard::OrganizationIntent;

use std::sync::Arc;

use crate::config::{OnboardingConfig, SignupAbusePolicyConfig};
use crate::services::OrganizationSignupProvider;

#[derive(Clone)]
pub struct OnboardingService {
    policy: Arc<SignupAbusePolicyConfig>,
    organizations: Arc<dyn OrganizationSignupProvider>,
}

impl OnboardingService {
    pub fn new(
        policy: SignupAbusePolicyConfig,
        organizations: Arc<dyn OrganizationSignupProvider>,
    ) -> Self {
        Self {
            policy: Arc::new(policy),
            organizations,
        }
    }

    pub fn from_config(
        config: &OnboardingConfig,
        organizations: Arc<dyn OrganizationSignupProvider>,
    ) -> Self {
        Self::new(config.signup.clone(), organizations)
    }

    pub fn policy(&self) -> &SignupAbusePolicyConfig {
        &self.policy
    }
}
