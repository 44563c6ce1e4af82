//! Organization signup collaborator.
//!
//! Reservations and organizations live in an external service. This module
//! defines the contract the signup hooks consume, plus an in-memory
//! implementation used by tests and local wiring.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::models::OrganizationRole;

/// Result of asking to join an organization by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReservationOutcome {
    Allowed {
        reservation_id: String,
        organization_id: String,
        target_role: OrganizationRole,
    },
    Denied {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCreateRequest {
    #[validate(length(min = 1, max = 120))]
    pub organization_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedOrganization {
    pub organization_id: String,
    pub organization_slug: String,
    pub organization_join_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeJoinRequest {
    pub reservation_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FinalizeOutcome {
    Finalized,
    /// The reservation was already consumed by the same user.
    AlreadyFinalized,
    Rejected {
        reason: String,
    },
}

/// Reservation and provisioning service consumed by the signup hooks.
///
/// Contract:
/// - `reserve_join` holds a seat for `email`. Reservations that are never
///   finalized must expire on the provider's own TTL; the hooks never
///   release them.
/// - `prepare_create` is called once per signup.
/// - `finalize_join` consumes a reservation and must be idempotent for the
///   same `(reservation_id, user_id)` pair.
///
/// `Err` means the provider could not answer (network, storage). Policy
/// refusals are reported through the `Denied`/`Rejected` outcomes.
#[async_trait]
pub trait OrganizationSignupProvider: Send + Sync {
    async fn reserve_join(
        &self,
        join_code: &str,
        email: &str,
    ) -> Result<ReservationOutcome, anyhow::Error>;

    async fn prepare_create(
        &self,
        request: &OrganizationCreateRequest,
    ) -> Result<ProvisionedOrganization, anyhow::Error>;

    async fn finalize_join(
        &self,
        request: &FinalizeJoinRequest,
    ) -> Result<FinalizeOutcome, anyhow::Error>;
}

/// Calls observed by [`MockOrganizationProvider`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    ReserveJoin { join_code: String, email: String },
    PrepareCreate(OrganizationCreateRequest),
    FinalizeJoin(FinalizeJoinRequest),
}

#[derive(Debug, Clone)]
struct MockOrganization {
    organization_id: String,
    member_role: OrganizationRole,
}

#[derive(Debug, Clone)]
struct MockReservation {
    expires_at: DateTime<Utc>,
    consumed_by: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    organizations: HashMap<String, MockOrganization>,
    reservations: HashMap<String, MockReservation>,
    calls: Vec<ProviderCall>,
    failure: Option<String>,
}

/// In-memory organization provider.
pub struct MockOrganizationProvider {
    state: Mutex<MockState>,
    reservation_ttl: Duration,
}

impl Default for MockOrganizationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOrganizationProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            reservation_ttl: Duration::minutes(15),
        }
    }

    pub fn with_reservation_ttl(mut self, ttl: Duration) -> Self {
        self.reservation_ttl = ttl;
        self
    }

    /// Register an existing organization that drivers can join with `join_code`.
    pub fn with_organization(self, join_code: &str, organization_id: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.organizations.insert(
                join_code.to_string(),
                MockOrganization {
                    organization_id: organization_id.to_string(),
                    member_role: OrganizationRole::Driver,
                },
            );
        }
        self
    }

    /// Make every subsequent call fail as if the backing store were down.
    pub fn fail_with(&self, message: &str) -> Result<(), anyhow::Error> {
        self.lock()?.failure = Some(message.to_string());
        Ok(())
    }

    pub fn calls(&self) -> Result<Vec<ProviderCall>, anyhow::Error> {
        Ok(self.lock()?.calls.clone())
    }

    /// Drop reservations past their TTL that were never consumed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, anyhow::Error> {
        let mut state = self.lock()?;
        let before = state.reservations.len();
        state
            .reservations
            .retain(|_, r| r.consumed_by.is_some() || r.expires_at > now);
        Ok(before - state.reservations.len())
    }

    pub fn pending_reservations(&self) -> Result<usize, anyhow::Error> {
        Ok(self
            .lock()?
            .reservations
            .values()
            .filter(|r| r.consumed_by.is_none())
            .count())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MockState>, anyhow::Error> {
        self.state
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock organization provider mutex poisoned: {}", e))
    }

    fn record(&self, call: ProviderCall) -> Result<std::sync::MutexGuard<'_, MockState>, anyhow::Error> {
        let mut state = self.lock()?;
        state.calls.push(call);
        if let Some(message) = &state.failure {
            return Err(anyhow::anyhow!("{}", message));
        }
        Ok(state)
    }
}

#[async_trait]
impl OrganizationSignupProvider for MockOrganizationProvider {
    async fn reserve_join(
        &self,
        join_code: &str,
        email: &str,
    ) -> Result<ReservationOutcome, anyhow::Error> {
        let mut state = self.record(ProviderCall::ReserveJoin {
            join_code: join_code.to_string(),
            email: email.to_string(),
        })?;

        let Some(org) = state.organizations.get(join_code).cloned() else {
            return Ok(ReservationOutcome::Denied {
                reason: "join_code_not_found".to_string(),
            });
        };

        let reservation_id = Uuid::new_v4().to_string();
        state.reservations.insert(
            reservation_id.clone(),
            MockReservation {
                expires_at: Utc::now() + self.reservation_ttl,
                consumed_by: None,
            },
        );

        Ok(ReservationOutcome::Allowed {
            reservation_id,
            organization_id: org.organization_id,
            target_role: org.member_role,
        })
    }

    async fn prepare_create(
        &self,
        request: &OrganizationCreateRequest,
    ) -> Result<ProvisionedOrganization, anyhow::Error> {
        let mut state = self.record(ProviderCall::PrepareCreate(request.clone()))?;

        let organization_id = Uuid::new_v4().to_string();
        let organization_join_code = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        state.organizations.insert(
            organization_join_code.clone(),
            MockOrganization {
                organization_id: organization_id.clone(),
                member_role: OrganizationRole::Driver,
            },
        );

        Ok(ProvisionedOrganization {
            organization_id,
            organization_slug: slugify(&request.organization_name),
            organization_join_code,
        })
    }

    async fn finalize_join(
        &self,
        request: &FinalizeJoinRequest,
    ) -> Result<FinalizeOutcome, anyhow::Error> {
        let mut state = self.record(ProviderCall::FinalizeJoin(request.clone()))?;

        let Some(reservation) = state.reservations.get_mut(&request.reservation_id) else {
            return Ok(FinalizeOutcome::Rejected {
                reason: "reservation_not_found".to_string(),
            });
        };

        match reservation.consumed_by.as_deref() {
            Some(user_id) if user_id == request.user_id => Ok(FinalizeOutcome::AlreadyFinalized),
            Some(_) => Ok(FinalizeOutcome::Rejected {
                reason: "reservation_already_consumed".to_string(),
            }),
            None if reservation.expires_at <= Utc::now() => Ok(FinalizeOutcome::Rejected {
                reason: "reservation_expired".to_string(),
            }),
            None => {
                reservation.consumed_by = Some(request.user_id.clone());
                Ok(FinalizeOutcome::Finalized)
            }
        }
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
