use service_core::error::AppError;
use thiserror::Error;

use crate::policy::DenialReason;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Signup is restricted to allowlisted email addresses")]
    AllowlistDenied,

    #[error("Invite code is missing or invalid")]
    InvalidInviteCode,

    #[error("Organization join was refused: {reason}")]
    JoinReservationDenied { reason: String },

    #[error("Unrecognized organization signup mode: {0}")]
    InvalidOrganizationMode(String),

    #[error("Organization join code is required")]
    MissingJoinCode,

    #[error("Invalid organization name: {0}")]
    InvalidOrganizationName(String),

    #[error("Organization assignment already recorded for this request")]
    AssignmentAlreadyRecorded,

    #[error("Account has no organization assignment")]
    MissingOrganizationAssignment,

    #[error("Created account is not available to finalize the organization join")]
    MissingCreatedAccount,

    #[error("Organization join finalization was rejected: {reason}")]
    JoinFinalizeRejected { reason: String },

    #[error("Organization service error: {0}")]
    Collaborator(#[from] anyhow::Error),
}

impl From<DenialReason> for ServiceError {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::AllowlistDenied => ServiceError::AllowlistDenied,
            DenialReason::InvalidInviteCode => ServiceError::InvalidInviteCode,
        }
    }
}

impl ServiceError {
    /// Client-facing reason code, for errors the end user can act on.
    pub fn reason_code(&self) -> Option<&str> {
        match self {
            ServiceError::AllowlistDenied => Some(DenialReason::AllowlistDenied.as_str()),
            ServiceError::InvalidInviteCode => Some(DenialReason::InvalidInviteCode.as_str()),
            ServiceError::JoinReservationDenied { reason } => Some(reason.as_str()),
            ServiceError::InvalidOrganizationMode(_) => Some("invalid_organization_mode"),
            ServiceError::MissingJoinCode => Some("missing_join_code"),
            ServiceError::InvalidOrganizationName(_) => Some("invalid_organization_name"),
            _ => None,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::AllowlistDenied => AppError::Forbidden {
                code: DenialReason::AllowlistDenied.as_str().to_string(),
                message,
            },
            ServiceError::InvalidInviteCode => AppError::Forbidden {
                code: DenialReason::InvalidInviteCode.as_str().to_string(),
                message,
            },
            ServiceError::JoinReservationDenied { reason } => AppError::Forbidden {
                code: reason,
                message,
            },
            ServiceError::InvalidOrganizationMode(_) => AppError::BadRequest {
                code: "invalid_organization_mode",
                message,
            },
            ServiceError::MissingJoinCode => AppError::BadRequest {
                code: "missing_join_code",
                message,
            },
            ServiceError::InvalidOrganizationName(_) => AppError::BadRequest {
                code: "invalid_organization_name",
                message,
            },
            ServiceError::AssignmentAlreadyRecorded
            | ServiceError::MissingOrganizationAssignment
            | ServiceError::MissingCreatedAccount
            | ServiceError::JoinFinalizeRejected { .. } => {
                AppError::InternalError(anyhow::anyhow!(message))
            }
            ServiceError::Collaborator(e) => AppError::InternalError(e),
        }
    }
}
