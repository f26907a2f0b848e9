//! Membership and invitations
//!
//! Members join at contract creation or by accepting an invitation. Only
//! the contract creator invites. Invitations carry an unguessable token and
//! a bounded lifetime; acceptance validates identity, adds the member with
//! the invited role and weight, and consumes the invitation.
//!
//! A newly added member immediately counts toward the unanimity denominator
//! for every open version (eager consistency, evaluated at vote time).

use crate::engine::ContractEngine;
use crate::records::InvitationRecord;
use crate::state::{InvitationRow, MemberRow};
use accord_core::{
    AccordError, ContractId, InvitationId, InvitationStatus, Result, UserId,
};
use chrono::{Duration as ChronoDuration, Utc};
use uuid::Uuid;

/// Who an invitation targets and what membership it grants
#[derive(Debug, Clone)]
pub struct InviteSpec {
    /// Invitee email; matched against the accepting user's profile
    pub email: Option<String>,
    /// Invitee external identity; matched against the accepting user's profile
    pub external_identity: Option<String>,
    /// Role label the member will receive
    pub role: String,
    /// Voting weight the member will receive (passthrough data)
    pub weight: f64,
}

impl ContractEngine {
    /// Add a member directly (creator-only operation)
    pub async fn add_member(
        &self,
        caller: UserId,
        contract: ContractId,
        user: UserId,
        role: &str,
        weight: f64,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.contracts.contains_key(&contract) || !state.is_creator(contract, caller) {
            return Err(AccordError::not_found("Contract not found"));
        }
        if state.is_listed_member(contract, user) {
            return Err(AccordError::invalid(
                "User is already a member of this contract",
            ));
        }
        state.members.push(MemberRow {
            contract_id: contract,
            user_id: user,
            role: role.to_string(),
            weight,
            added_at: Utc::now(),
        });
        Ok(())
    }

    /// Create a membership invitation (creator only)
    pub async fn invite(
        &self,
        caller: UserId,
        contract: ContractId,
        spec: InviteSpec,
    ) -> Result<InvitationRecord> {
        if spec.email.is_none() && spec.external_identity.is_none() {
            return Err(AccordError::invalid("Email or external identity required"));
        }

        let record = {
            let mut state = self.state.write().await;
            state
                .accessible_contract(caller, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
            if !state.is_creator(contract, caller) {
                return Err(AccordError::forbidden(
                    "Only the contract creator can invite members",
                ));
            }

            // Already a member under either identity?
            let already_member = state.members_of(contract).any(|m| {
                state.users.get(&m.user_id).is_some_and(|u| {
                    identity_matches(&spec.email, &u.email)
                        || identity_matches(&spec.external_identity, &u.external_identity)
                })
            });
            if already_member {
                return Err(AccordError::invalid(
                    "User is already a member of this contract",
                ));
            }

            let now = Utc::now();
            let duplicate_pending = state.invitations.values().any(|i| {
                i.contract_id == contract
                    && i.status == InvitationStatus::Pending
                    && i.expires_at > now
                    && (identity_matches(&spec.email, &i.email)
                        || identity_matches(&spec.external_identity, &i.external_identity))
            });
            if duplicate_pending {
                return Err(AccordError::invalid("Invitation already sent to this user"));
            }

            let ttl = ChronoDuration::from_std(self.config.invitation_ttl)
                .map_err(|e| AccordError::internal(e.to_string()))?;
            let row = InvitationRow {
                id: InvitationId::new(),
                contract_id: contract,
                email: spec.email,
                external_identity: spec.external_identity,
                role: spec.role,
                weight: spec.weight,
                token: Uuid::new_v4().to_string(),
                invited_by: caller,
                status: InvitationStatus::Pending,
                created_at: now,
                expires_at: now + ttl,
            };
            let record = invitation_record(&row);
            state.invitations.insert(row.id, row);
            record
        };

        tracing::info!(contract = %contract, invitation = %record.id, "created invitation");
        self.notifier.invitation_created(&record).await;
        Ok(record)
    }

    /// Invitations for a contract, visible only to its creator.
    ///
    /// Invitation records carry their acceptance tokens, so listing is as
    /// restricted as issuing.
    pub async fn list_invitations(
        &self,
        caller: UserId,
        contract: ContractId,
    ) -> Result<Vec<InvitationRecord>> {
        let state = self.state.read().await;
        state
            .accessible_contract(caller, contract)
            .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        if !state.is_creator(contract, caller) {
            return Err(AccordError::forbidden(
                "Only the contract creator can view invitations",
            ));
        }
        let mut records: Vec<InvitationRecord> = state
            .invitations
            .values()
            .filter(|i| i.contract_id == contract)
            .map(invitation_record)
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    /// Look up a pending, unexpired invitation by token
    pub async fn get_invitation(&self, token: &str) -> Result<InvitationRecord> {
        let state = self.state.read().await;
        let now = Utc::now();
        state
            .invitations
            .values()
            .find(|i| i.token == token && i.status == InvitationStatus::Pending && i.expires_at > now)
            .map(invitation_record)
            .ok_or_else(|| AccordError::not_found("Invalid or expired invitation"))
    }

    /// Accept an invitation, joining the contract with the invited role and
    /// weight.
    ///
    /// The accepting user's profile must match the invited identity when one
    /// was specified.
    pub async fn accept_invitation(&self, user: UserId, token: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let invitation = state
            .invitations
            .values()
            .find(|i| i.token == token && i.status == InvitationStatus::Pending && i.expires_at > now)
            .cloned()
            .ok_or_else(|| AccordError::not_found("Invalid or expired invitation"))?;

        let profile = state.users.get(&user);
        if let Some(expected) = &invitation.email {
            let actual = profile.and_then(|p| p.email.as_deref());
            if actual != Some(expected.as_str()) {
                return Err(AccordError::forbidden(
                    "Email address does not match invitation",
                ));
            }
        }
        if let Some(expected) = &invitation.external_identity {
            let actual = profile.and_then(|p| p.external_identity.as_deref());
            if actual != Some(expected.as_str()) {
                return Err(AccordError::forbidden(
                    "External identity does not match invitation",
                ));
            }
        }
        if state.is_listed_member(invitation.contract_id, user) {
            return Err(AccordError::invalid(
                "User is already a member of this contract",
            ));
        }

        state.members.push(MemberRow {
            contract_id: invitation.contract_id,
            user_id: user,
            role: invitation.role.clone(),
            weight: invitation.weight,
            added_at: now,
        });
        if let Some(row) = state.invitations.get_mut(&invitation.id) {
            row.status = InvitationStatus::Accepted;
        }
        tracing::info!(contract = %invitation.contract_id, user = %user, "invitation accepted");
        Ok(())
    }
}

fn identity_matches(expected: &Option<String>, actual: &Option<String>) -> bool {
    match (expected, actual) {
        (Some(e), Some(a)) => e == a,
        _ => false,
    }
}

fn invitation_record(row: &InvitationRow) -> InvitationRecord {
    InvitationRecord {
        id: row.id,
        contract_id: row.contract_id,
        email: row.email.clone(),
        external_identity: row.external_identity.clone(),
        role: row.role.clone(),
        weight: row.weight,
        token: row.token.clone(),
        invited_by: row.invited_by,
        status: row.status,
        expires_at: row.expires_at,
        created_at: row.created_at,
    }
}
