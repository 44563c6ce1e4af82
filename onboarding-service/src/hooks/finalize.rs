use super::OnboardingService;
use crate::context::SignupContext;
use crate::models::OrganizationAssignment;
use crate::services::{FinalizeJoinRequest, FinalizeOutcome, ServiceError};

impl OnboardingService {
    /// Post-creation hook: consume the join reservation taken by the guard.
    ///
    /// Does nothing unless the context holds a join reservation. Requires the
    /// host to have filled the context's returned account.
    pub async fn finalize(&self, ctx: &SignupContext) -> Result<(), ServiceError> {
        let Some(OrganizationAssignment::JoinReserved { reservation_id, .. }) = ctx.assignment()
        else {
            return Ok(());
        };

        let user_id = ctx
            .returned()
            .map(|account| account.id.clone())
            .ok_or(ServiceError::MissingCreatedAccount)?;

        let request = FinalizeJoinRequest {
            reservation_id: reservation_id.clone(),
            user_id,
        };

        match self.organizations.finalize_join(&request).await? {
            FinalizeOutcome::Finalized => {
                tracing::info!(
                    reservation_id = %request.reservation_id,
                    user_id = %request.user_id,
                    "Organization join finalized"
                );
                Ok(())
            }
            FinalizeOutcome::AlreadyFinalized => {
                tracing::debug!(
                    reservation_id = %request.reservation_id,
                    "Organization join already finalized"
                );
                Ok(())
            }
            FinalizeOutcome::Rejected { reason } => {
                tracing::error!(
                    reservation_id = %request.reservation_id,
                    user_id = %request.user_id,
                    reason = %reason,
                    "Organization join finalization rejected"
                );
                Err(ServiceError::JoinFinalizeRejected { reason })
            }
        }
    }
}
