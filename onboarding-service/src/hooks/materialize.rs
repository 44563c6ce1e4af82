use super::OnboardingService;
use crate::context::SignupContext;
use crate::models::{AssignmentFields, PendingAccountRecord};
use crate::routes::ADMIN_CREATE_USER_PATH;
use crate::services::ServiceError;

impl OnboardingService {
    /// Record-construction hook: organization fields for the new account.
    ///
    /// The guard's assignment takes precedence. Explicit fields on the record
    /// are only honoured on the administrative creation path, and only when
    /// both are present. Anything else fails closed.
    pub fn materialize(
        &self,
        record: &PendingAccountRecord,
        ctx: &SignupContext,
    ) -> Result<AssignmentFields, ServiceError> {
        if let Some(assignment) = ctx.assignment() {
            return Ok(AssignmentFields {
                organization_id: assignment.organization_id().to_string(),
                role: assignment.role(),
            });
        }

        if ctx.path() == ADMIN_CREATE_USER_PATH {
            if let (Some(organization_id), Some(role)) = (&record.organization_id, record.role) {
                return Ok(AssignmentFields {
                    organization_id: organization_id.clone(),
                    role,
                });
            }
        }

        tracing::error!(
            path = %ctx.path(),
            "Refusing to create account without an organization assignment"
        );
        Err(ServiceError::MissingOrganizationAssignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SignupAbusePolicyConfig, SignupPolicyMode};
    use crate::models::{AssignmentSource, OrganizationAssignment, OrganizationRole};
    use crate::routes::SIGN_UP_EMAIL_PATH;
    use crate::services::MockOrganizationProvider;
    use service_core::axum::http::HeaderMap;
    use std::sync::Arc;

    fn service() -> OnboardingService {
        let policy = SignupAbusePolicyConfig {
            is_production: false,
            signup_policy_mode: SignupPolicyMode::Open,
            allowlisted_emails: Default::default(),
            local_invite_code: None,
        };
        OnboardingService::new(policy, Arc::new(MockOrganizationProvider::new()))
    }

    fn explicit_record() -> PendingAccountRecord {
        PendingAccountRecord {
            email: "ops@driver.test".to_string(),
            organization_id: Some("org-admin".to_string()),
            role: Some(OrganizationRole::Manager),
            ..Default::default()
        }
    }

    #[test]
    fn test_unrelated_path_without_assignment_fails_closed() {
        let ctx = SignupContext::new("/sign-up/social", HeaderMap::new());
        let err = service()
            .materialize(&PendingAccountRecord::default(), &ctx)
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingOrganizationAssignment));
    }

    #[test]
    fn test_signup_path_ignores_explicit_fields() {
        let ctx = SignupContext::new(SIGN_UP_EMAIL_PATH, HeaderMap::new());
        let err = service().materialize(&explicit_record(), &ctx).unwrap_err();
        assert!(matches!(err, ServiceError::MissingOrganizationAssignment));
    }

    #[test]
    fn test_admin_path_passes_explicit_fields_through() {
        let ctx = SignupContext::new(ADMIN_CREATE_USER_PATH, HeaderMap::new());
        let fields = service().materialize(&explicit_record(), &ctx).unwrap();
        assert_eq!(
            fields,
            AssignmentFields {
                organization_id: "org-admin".to_string(),
                role: OrganizationRole::Manager,
            }
        );
    }

    #[test]
    fn test_admin_path_requires_both_fields() {
        let ctx = SignupContext::new(ADMIN_CREATE_USER_PATH, HeaderMap::new());
        let record = PendingAccountRecord {
            role: None,
            ..explicit_record()
        };
        let err = service().materialize(&record, &ctx).unwrap_err();
        assert!(matches!(err, ServiceError::MissingOrganizationAssignment));
    }

    #[test]
    fn test_context_assignment_wins_over_explicit_fields() {
        let mut ctx = SignupContext::new(ADMIN_CREATE_USER_PATH, HeaderMap::new());
        ctx.record_assignment(OrganizationAssignment::CreateProvisioned {
            organization_id: "org-new".to_string(),
            organization_slug: "org-new".to_string(),
            join_code: "ABCD1234".to_string(),
            role: OrganizationRole::Manager,
            source: AssignmentSource::CreateProvision,
        })
        .unwrap();

        let fields = service().materialize(&explicit_record(), &ctx).unwrap();
        assert_eq!(fields.organization_id, "org-new");
    }
}
