//! Organization assignment carried from the signup guard to the new account.

use serde::{Deserialize, Serialize};

/// Role a new account holds inside its organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationRole {
    /// Organization owner. Always the role of whoever creates the organization.
    Manager,
    Driver,
}

impl OrganizationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationRole::Manager => "manager",
            OrganizationRole::Driver => "driver",
        }
    }
}

impl std::fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrganizationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(OrganizationRole::Manager),
            "driver" => Ok(OrganizationRole::Driver),
            _ => Err(format!("Invalid organization role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    CreateProvision,
}

impl AssignmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentSource::CreateProvision => "create_provision",
        }
    }
}

/// Outcome of the signup guard's organization step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrganizationAssignment {
    /// A seat in an existing organization is held under `reservation_id`
    /// until the account exists and the reservation is finalized.
    JoinReserved {
        reservation_id: String,
        organization_id: String,
        role: OrganizationRole,
    },
    /// A fresh organization was provisioned for the signing-up manager.
    CreateProvisioned {
        organization_id: String,
        organization_slug: String,
        join_code: String,
        role: OrganizationRole,
        source: AssignmentSource,
    },
}

impl OrganizationAssignment {
    pub fn organization_id(&self) -> &str {
        match self {
            OrganizationAssignment::JoinReserved {
                organization_id, ..
            }
            | OrganizationAssignment::CreateProvisioned {
                organization_id, ..
            } => organization_id,
        }
    }

    pub fn role(&self) -> OrganizationRole {
        match self {
            OrganizationAssignment::JoinReserved { role, .. }
            | OrganizationAssignment::CreateProvisioned { role, .. } => *role,
        }
    }

    pub fn reservation_id(&self) -> Option<&str> {
        match self {
            OrganizationAssignment::JoinReserved { reservation_id, .. } => Some(reservation_id),
            OrganizationAssignment::CreateProvisioned { .. } => None,
        }
    }
}

/// Organization fields merged into the account record before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFields {
    pub organization_id: String,
    pub role: OrganizationRole,
}

/// Account record under construction by the host pipeline.
///
/// Organization fields are only set by callers on the administrative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAccountRecord {
    pub email: String,
    pub name: Option<String>,
    pub organization_id: Option<String>,
    pub role: Option<OrganizationRole>,
}

/// The persisted account as reported back by the host pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAccount {
    pub id: String,
}
