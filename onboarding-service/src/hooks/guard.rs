use validator::Validate;

use super::OnboardingService;
use crate::context::{
    SignupContext, INVITE_CODE_HEADER, ORG_JOIN_CODE_HEADER, ORG_MODE_HEADER, ORG_NAME_HEADER,
};
use crate::models::{AssignmentSource, OrganizationAssignment, OrganizationRole};
use crate::policy::{evaluate, SignupAttempt, SignupDecision};
use crate::services::{OrganizationCreateRequest, ReservationOutcome, ServiceError};

/// Organization intent declared by a signup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationIntent {
    Join,
    Create,
}

impl std::str::FromStr for OrganizationIntent {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join" => Ok(OrganizationIntent::Join),
            "create" => Ok(OrganizationIntent::Create),
            _ => Err(ServiceError::InvalidOrganizationMode(s.to_string())),
        }
    }
}

impl OnboardingService {
    /// Pre-creation guard.
    ///
    /// Applies the signup abuse policy, then acts on the declared
    /// organization intent. On success with an intent, the assignment is in
    /// `ctx` before this returns. Provider faults propagate unchanged and the
    /// host is expected to abort account creation.
    pub async fn guard(&self, ctx: &mut SignupContext, email: &str) -> Result<(), ServiceError> {
        let attempt = SignupAttempt::new(
            ctx.path(),
            email,
            ctx.header(INVITE_CODE_HEADER).map(str::to_string),
        );

        if let SignupDecision::Denied { reason } = evaluate(&attempt, &self.policy) {
            tracing::warn!(path = %attempt.path, reason = %reason, "Signup denied by abuse policy");
            return Err(reason.into());
        }

        let intent = match ctx.header(ORG_MODE_HEADER) {
            None => return Ok(()),
            Some(raw) => raw.parse::<OrganizationIntent>()?,
        };

        let assignment = match intent {
            OrganizationIntent::Join => self.reserve_join(ctx, email).await?,
            OrganizationIntent::Create => self.provision_organization(ctx).await?,
        };

        ctx.record_assignment(assignment)?;
        Ok(())
    }

    async fn reserve_join(
        &self,
        ctx: &SignupContext,
        email: &str,
    ) -> Result<OrganizationAssignment, ServiceError> {
        let join_code = ctx
            .header(ORG_JOIN_CODE_HEADER)
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or(ServiceError::MissingJoinCode)?;

        match self.organizations.reserve_join(join_code, email).await? {
            ReservationOutcome::Allowed {
                reservation_id,
                organization_id,
                target_role,
            } => {
                tracing::info!(
                    reservation_id = %reservation_id,
                    organization_id = %organization_id,
                    role = %target_role,
                    "Organization join reserved"
                );
                Ok(OrganizationAssignment::JoinReserved {
                    reservation_id,
                    organization_id,
                    role: target_role,
                })
            }
            ReservationOutcome::Denied { reason } => {
                tracing::warn!(reason = %reason, "Organization join reservation denied");
                Err(ServiceError::JoinReservationDenied { reason })
            }
        }
    }

    async fn provision_organization(
        &self,
        ctx: &SignupContext,
    ) -> Result<OrganizationAssignment, ServiceError> {
        let request = OrganizationCreateRequest {
            organization_name: ctx
                .header(ORG_NAME_HEADER)
                .unwrap_or_default()
                .trim()
                .to_string(),
        };
        request
            .validate()
            .map_err(|e| ServiceError::InvalidOrganizationName(e.to_string()))?;

        let provisioned = self.organizations.prepare_create(&request).await?;

        tracing::info!(
            organization_id = %provisioned.organization_id,
            organization_slug = %provisioned.organization_slug,
            "Organization provisioned for signup"
        );

        Ok(OrganizationAssignment::CreateProvisioned {
            organization_id: provisioned.organization_id,
            organization_slug: provisioned.organization_slug,
            join_code: provisioned.organization_join_code,
            role: OrganizationRole::Manager,
            source: AssignmentSource::CreateProvision,
        })
    }
}
