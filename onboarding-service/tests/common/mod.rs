//! Test helpers for onboarding-service integration tests.
//!
//! Wires an [`OnboardingService`] to the in-memory organization provider and
//! drives the hooks the way the host pipeline does.

#![allow(dead_code)]

use onboarding_service::{
    config::{OnboardingConfig, SignupAbusePolicyConfig, SignupPolicyInputs},
    models::{CreatedAccount, PendingAccountRecord},
    services::{MockOrganizationProvider, ServiceError},
    OnboardingService, SignupContext,
};
use service_core::axum::http::{HeaderMap, HeaderValue};
use std::sync::Arc;

pub const FLEET_JOIN_CODE: &str = "FLEET-7";
pub const FLEET_ORG_ID: &str = "org-fleet-7";

pub struct TestApp {
    pub service: OnboardingService,
    pub provider: Arc<MockOrganizationProvider>,
}

impl TestApp {
    /// Service with the policy resolved from `vars`, as `from_env` would.
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let inputs = SignupPolicyInputs::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        });
        let config = OnboardingConfig::from_parts(service_core::config::Config::default(), inputs);
        let provider = Arc::new(
            MockOrganizationProvider::new().with_organization(FLEET_JOIN_CODE, FLEET_ORG_ID),
        );
        Self {
            service: OnboardingService::from_config(&config, provider.clone()),
            provider,
        }
    }

    pub fn with_policy(policy: SignupAbusePolicyConfig) -> Self {
        let provider = Arc::new(
            MockOrganizationProvider::new().with_organization(FLEET_JOIN_CODE, FLEET_ORG_ID),
        );
        Self {
            service: OnboardingService::new(policy, provider.clone()),
            provider,
        }
    }

    /// Run guard, record construction, a simulated insert and the finalizer
    /// in pipeline order. Returns the context as the host would hold it.
    pub async fn sign_up(
        &self,
        path: &str,
        headers: &[(&str, &str)],
        record: PendingAccountRecord,
        user_id: &str,
    ) -> Result<SignupContext, ServiceError> {
        let mut ctx = SignupContext::new(path, header_map(headers));

        self.service.guard(&mut ctx, &record.email).await?;
        let fields = self.service.materialize(&record, &ctx)?;
        assert!(!fields.organization_id.is_empty());

        ctx.set_returned(CreatedAccount {
            id: user_id.to_string(),
        });
        self.service.finalize(&ctx).await?;
        Ok(ctx)
    }
}

pub fn header_map(headers: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(
            service_core::axum::http::HeaderName::from_bytes(name.as_bytes())
                .expect("valid header name"),
            HeaderValue::from_str(value).expect("valid header value"),
        );
    }
    map
}

pub fn record(email: &str) -> PendingAccountRecord {
    PendingAccountRecord {
        email: email.to_string(),
        name: Some("Test User".to_string()),
        ..Default::default()
    }
}
