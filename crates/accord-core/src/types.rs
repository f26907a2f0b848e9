//! Domain enums for the contract lifecycle
//!
//! Statuses serialize as the lowercase strings the rest of the system (and
//! any persisted data) expects, so every enum carries explicit
//! `serde(rename_all = "lowercase")` plus `FromStr`/`Display` for the wire
//! strings.

use crate::errors::AccordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a contract document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Initial drafting phase
    Draft,
    /// Under collaborative review
    Review,
    /// Terms in force
    Active,
    /// Fulfilled and closed
    Completed,
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Review => "review",
            ContractStatus::Active => "active",
            ContractStatus::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ContractStatus {
    type Err = AccordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ContractStatus::Draft),
            "review" => Ok(ContractStatus::Review),
            "active" => Ok(ContractStatus::Active),
            "completed" => Ok(ContractStatus::Completed),
            other => Err(AccordError::invalid(format!(
                "Valid status required, got '{other}'"
            ))),
        }
    }
}

/// Aggregate approval status of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// No votes recorded yet
    Pending,
    /// At least one approval recorded
    Approved,
    /// Rejections recorded and no approvals
    Rejected,
    /// Promoted to the contract's canonical version
    Merged,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Merged => "merged",
        };
        write!(f, "{s}")
    }
}

/// A member's vote on a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// Approve the version
    Approve,
    /// Reject the version
    Reject,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Vote::Approve => "approve",
            Vote::Reject => "reject",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Vote {
    type Err = AccordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Vote::Approve),
            "reject" => Ok(Vote::Reject),
            _ => Err(AccordError::invalid("Valid vote (approve/reject) required")),
        }
    }
}

/// Status of a membership invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting a response from the invitee
    Pending,
    /// Accepted; invitee is now a member
    Accepted,
    /// Expired before acceptance
    Expired,
}
