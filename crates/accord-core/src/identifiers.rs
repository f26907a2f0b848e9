//! Core identifier types used across the Accord workspace
//!
//! Every entity gets its own newtype so a version id can never be passed
//! where a contract id is expected. UUID-backed ids are random v4; the
//! string-backed types (`ContentRef`, `TxId`) wrap opaque references handed
//! back by external collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create from a UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Identifier for a contract under collaborative control
    ContractId,
    "contract"
);

uuid_id!(
    /// Identifier for an immutable version snapshot within a contract chain
    VersionId,
    "version"
);

uuid_id!(
    /// Identifier for a user known to the engine
    UserId,
    "user"
);

uuid_id!(
    /// Identifier for a single member's vote on a version
    ApprovalId,
    "approval"
);

uuid_id!(
    /// Identifier for a pending membership invitation
    InvitationId,
    "invitation"
);

uuid_id!(
    /// Identifier for a comment attached to a version
    CommentId,
    "comment"
);

/// Opaque reference returned by a content store for a stored blob.
///
/// The engine never interprets the reference; resolution always goes back
/// through the `ContentStore` that issued it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    /// Create a new content reference
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Borrow the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ContentRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Transaction identifier returned by a ledger anchor for a proof record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Create a new transaction identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for TxId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types_with_prefixed_display() {
        let contract = ContractId::new();
        let version = VersionId::new();
        assert!(contract.to_string().starts_with("contract-"));
        assert!(version.to_string().starts_with("version-"));
        assert_ne!(contract.uuid(), version.uuid());
    }

    #[test]
    fn content_ref_round_trips_through_serde() {
        let reference = ContentRef::new("bafy-test");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, "\"bafy-test\"");
        let back: ContentRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }
}
