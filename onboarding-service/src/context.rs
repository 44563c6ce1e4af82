//! Per-request state threaded through the signup hooks.
//!
//! The host pipeline creates one [`SignupContext`] per account-creation
//! request and passes it to the guard, the materializer and the finalizer in
//! that order. It is never shared between requests.

use service_core::axum::http::HeaderMap;

use crate::models::{CreatedAccount, OrganizationAssignment};
use crate::services::ServiceError;

/// `join` or `create`; absent when the signup carries no organization intent.
pub const ORG_MODE_HEADER: &str = "x-signup-org-mode";
pub const ORG_JOIN_CODE_HEADER: &str = "x-signup-org-join-code";
pub const ORG_NAME_HEADER: &str = "x-signup-org-name";
pub const INVITE_CODE_HEADER: &str = "x-signup-invite-code";

#[derive(Debug, Clone)]
pub struct SignupContext {
    path: String,
    headers: HeaderMap,
    assignment: Option<OrganizationAssignment>,
    returned: Option<CreatedAccount>,
}

impl SignupContext {
    pub fn new(path: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            path: path.into(),
            headers,
            assignment: None,
            returned: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text. Missing or non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assignment(&self) -> Option<&OrganizationAssignment> {
        self.assignment.as_ref()
    }

    /// Record the organization assignment. Write-once per request.
    pub fn record_assignment(
        &mut self,
        assignment: OrganizationAssignment,
    ) -> Result<&OrganizationAssignment, ServiceError> {
        if self.assignment.is_some() {
            return Err(ServiceError::AssignmentAlreadyRecorded);
        }
        Ok(self.assignment.insert(assignment))
    }

    /// Called by the host pipeline once the account has been persisted.
    pub fn set_returned(&mut self, account: CreatedAccount) {
        self.returned = Some(account);
    }

    pub fn returned(&self) -> Option<&CreatedAccount> {
        self.returned.as_ref()
    }
}
