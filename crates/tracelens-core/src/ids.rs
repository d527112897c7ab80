//! Stable ID newtypes for debug entities.
//!
//! All IDs are distinct UUID newtype wrappers, providing type safety so that
//! an `ExecutionId` cannot be accidentally used where a `BreakpointId` is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one task execution (and its trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(pub Uuid);

/// Identity of the workflow an execution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowId(pub Uuid);

/// Identity of a registered breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakpointId(pub Uuid);

/// Identity of a registered watch expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchId(pub Uuid);

/// Identity of one connected observer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

macro_rules! impl_id {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// Generates a fresh random ID.
                pub fn new() -> Self {
                    $name(Uuid::new_v4())
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
        )*
    };
}

impl_id!(ExecutionId, WorkflowId, BreakpointId, WatchId, SessionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ExecutionId::new(), ExecutionId::new());
        assert_ne!(BreakpointId::new(), BreakpointId::new());
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = SessionId::new();
        assert_eq!(format!("{}", id), id.0.to_string());
    }

    #[test]
    fn serde_roundtrip() {
        let id = ExecutionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: ExecutionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
