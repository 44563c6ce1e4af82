use serde::{Deserialize, Serialize};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

use crate::policy::EmailAllowlist;

/// Environment designation that switches on production behaviour.
pub const PRODUCTION_ENVIRONMENT: &str = "production";

#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    pub common: core_config::Config,
    pub environment: String,
    pub signup: SignupAbusePolicyConfig,
}

/// Which signups are admitted on the email signup path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SignupPolicyMode {
    Open,
    Allowlist,
}

impl SignupPolicyMode {
    /// Safe default for an environment: production never defaults to open.
    pub fn default_for(is_production: bool) -> Self {
        if is_production {
            SignupPolicyMode::Allowlist
        } else {
            SignupPolicyMode::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignupPolicyMode::Open => "open",
            SignupPolicyMode::Allowlist => "allowlist",
        }
    }
}

impl std::str::FromStr for SignupPolicyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(SignupPolicyMode::Open),
            "allowlist" => Ok(SignupPolicyMode::Allowlist),
            _ => Err(format!("Invalid signup policy mode: {}", s)),
        }
    }
}

/// Raw signup policy inputs, as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct SignupPolicyInputs {
    pub environment: String,
    pub policy_mode: Option<String>,
    pub allowlist: Option<String>,
    pub local_invite_code: Option<String>,
}

/// Resolved signup abuse policy.
///
/// In production the invite code is carried but never consulted.
#[derive(Debug, Clone)]
pub struct SignupAbusePolicyConfig {
    pub is_production: bool,
    pub signup_policy_mode: SignupPolicyMode,
    pub allowlisted_emails: EmailAllowlist,
    pub local_invite_code: Option<String>,
}

impl SignupAbusePolicyConfig {
    pub fn resolve(inputs: &SignupPolicyInputs) -> Self {
        let is_production = inputs.environment == PRODUCTION_ENVIRONMENT;
        let fallback = SignupPolicyMode::default_for(is_production);

        let signup_policy_mode = match inputs.policy_mode.as_deref() {
            None => fallback,
            Some(raw) => raw.parse::<SignupPolicyMode>().unwrap_or_else(|e| {
                tracing::warn!(
                    error = %e,
                    fallback = fallback.as_str(),
                    "Ignoring unrecognized signup policy mode"
                );
                fallback
            }),
        };

        let allowlisted_emails = inputs
            .allowlist
            .as_deref()
            .map(EmailAllowlist::parse)
            .unwrap_or_default();

        Self {
            is_production,
            signup_policy_mode,
            allowlisted_emails,
            local_invite_code: inputs.local_invite_code.clone(),
        }
    }
}

impl SignupPolicyInputs {
    /// Read inputs through `lookup`, so callers other than `from_env` can
    /// supply variables without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            policy_mode: lookup("SIGNUP_POLICY_MODE"),
            allowlist: lookup("SIGNUP_ALLOWLIST_EMAILS"),
            local_invite_code: lookup("LOCAL_SIGNUP_INVITE_CODE"),
        }
    }
}

impl OnboardingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let inputs = SignupPolicyInputs::from_lookup(|key| env::var(key).ok());
        Ok(Self::from_parts(common, inputs))
    }

    pub fn from_parts(common: core_config::Config, inputs: SignupPolicyInputs) -> Self {
        let signup = SignupAbusePolicyConfig::resolve(&inputs);

        if signup.is_production && signup.local_invite_code.is_some() {
            tracing::warn!("LOCAL_SIGNUP_INVITE_CODE is set but ignored in production");
        }

        tracing::info!(
            environment = %inputs.environment,
            signup_policy_mode = signup.signup_policy_mode.as_str(),
            allowlist_entries = signup.allowlisted_emails.len(),
            invite_code_configured = signup.local_invite_code.is_some(),
            "Signup policy resolved"
        );

        Self {
            common,
            environment: inputs.environment,
            signup,
        }
    }

    /// Install the JSON tracing subscriber for this service.
    pub fn init_tracing(&self) {
        service_core::observability::init_tracing(&self.common.service_name, &self.common.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn inputs(environment: &str, policy_mode: Option<&str>) -> SignupPolicyInputs {
        SignupPolicyInputs {
            environment: environment.to_string(),
            policy_mode: policy_mode.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_production_defaults_to_allowlist() {
        let config = SignupAbusePolicyConfig::resolve(&inputs("production", None));
        assert!(config.is_production);
        assert_eq!(config.signup_policy_mode, SignupPolicyMode::Allowlist);
    }

    #[test]
    fn test_development_defaults_to_open() {
        let config = SignupAbusePolicyConfig::resolve(&inputs("development", None));
        assert!(!config.is_production);
        assert_eq!(config.signup_policy_mode, SignupPolicyMode::Open);
    }

    #[test]
    fn test_invalid_override_falls_back_to_safe_default() {
        let config = SignupAbusePolicyConfig::resolve(&inputs("production", Some("invalid-policy")));
        assert_eq!(config.signup_policy_mode, SignupPolicyMode::Allowlist);

        for garbage in ["", "OPEN", " open", "open\n", "allowlist;open"] {
            let config = SignupAbusePolicyConfig::resolve(&inputs("production", Some(garbage)));
            assert_eq!(config.signup_policy_mode, SignupPolicyMode::Allowlist, "{garbage:?}");
        }
    }

    #[test]
    fn test_recognized_override_is_honored() {
        let config = SignupAbusePolicyConfig::resolve(&inputs("production", Some("open")));
        assert_eq!(config.signup_policy_mode, SignupPolicyMode::Open);

        let config = SignupAbusePolicyConfig::resolve(&inputs("development", Some("allowlist")));
        assert_eq!(config.signup_policy_mode, SignupPolicyMode::Allowlist);
    }

    #[test]
    fn test_only_exact_sentinel_is_production() {
        for designation in ["Production", "prod", "production ", "staging", ""] {
            let config = SignupAbusePolicyConfig::resolve(&inputs(designation, None));
            assert!(!config.is_production, "{designation:?}");
        }
    }

    #[test]
    fn test_allowlist_and_invite_code_pass_through() {
        let config = SignupAbusePolicyConfig::resolve(&SignupPolicyInputs {
            environment: "development".to_string(),
            policy_mode: None,
            allowlist: Some("B@x.test; b@x.test\na@x.test".to_string()),
            local_invite_code: Some("dev-only-invite".to_string()),
        });
        assert_eq!(config.allowlisted_emails.entries(), ["b@x.test", "a@x.test"]);
        assert_eq!(config.local_invite_code.as_deref(), Some("dev-only-invite"));
    }

    #[test]
    fn test_inputs_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("ENVIRONMENT", "production"),
            ("SIGNUP_POLICY_MODE", "open"),
            ("SIGNUP_ALLOWLIST_EMAILS", "ops@driver.test"),
        ]
        .into_iter()
        .collect();

        let inputs = SignupPolicyInputs::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(inputs.environment, "production");
        assert_eq!(inputs.policy_mode.as_deref(), Some("open"));
        assert_eq!(inputs.allowlist.as_deref(), Some("ops@driver.test"));
        assert!(inputs.local_invite_code.is_none());

        let common = core_config::Config {
            log_level: "off".to_string(),
            ..Default::default()
        };
        let config = OnboardingConfig::from_parts(common, inputs);
        config.init_tracing();
        assert!(config.signup.is_production);
        assert_eq!(config.signup.signup_policy_mode, SignupPolicyMode::Open);
    }

    #[test]
    fn test_environment_defaults_to_development() {
        let inputs = SignupPolicyInputs::from_lookup(|_| None);
        assert_eq!(inputs.environment, "development");
        assert!(!SignupAbusePolicyConfig::resolve(&inputs).is_production);
    }
}
