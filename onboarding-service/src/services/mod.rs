//! Services layer for onboarding-service.
//!
//! Error taxonomy and the external organization collaborator.

pub mod error;
pub mod organization;

pub use error::ServiceError;
pub use organization::{
    FinalizeJoinRequest, FinalizeOutcome, MockOrganizationProvider, OrganizationCreateRequest,
    OrganizationSignupProvider, ProviderCall, ProvisionedOrganization, ReservationOutcome,
};
