//! Strongly-typed identifiers for domain entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate strongly-typed ID wrappers
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn into_uuid(self) -> Uuid {
                self.0
            }

            /// Returns the prefixed slug form used in URLs and audit output
            pub fn to_slug(&self) -> String {
                format!("{}_{}", $prefix, self.0)
            }

            /// Parse from a prefixed slug or a bare UUID
            pub fn from_slug(s: &str) -> Option<Self> {
                let prefix = concat!($prefix, "_");
                if let Some(stripped) = s.strip_prefix(prefix) {
                    Uuid::parse_str(stripped).ok().map(Self)
                } else {
                    Uuid::parse_str(s).ok().map(Self)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                // Try parsing with prefix first
                if let Some(id) = Self::from_slug(s) {
                    return Ok(id);
                }
                // Fall back to plain UUID
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

// Workspace-level IDs
define_id!(WorkspaceId, "ws");
define_id!(MemberId, "mem");
define_id!(UserId, "usr");
define_id!(DocumentId, "doc");

// Policy IDs
define_id!(WorkspacePolicyId, "wsp");
define_id!(CustomPolicyId, "cp");
