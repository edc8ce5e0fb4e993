//! Errors reported to callers of the menu synchronizer.
//!
//! Store failures are wrapped transparently so callers see exactly what the
//! adapter reported. Nothing here is fatal to the process; every error goes
//! back to the immediate caller.

use thiserror::Error;

use super::menu::EntityId;
use super::mutation::EntityKind;
use super::ports::MenuStoreError;

/// Failure of a load or mutation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The read or write step failed in the store adapter.
    #[error(transparent)]
    Store(#[from] MenuStoreError),

    /// An update or delete target was absent and the policy rejects that.
    #[error("{kind} {id} not found in menu")]
    NotFound {
        /// Collection that was searched.
        kind: EntityKind,
        /// Identity that was not found.
        id: EntityId,
    },

    /// The mutation would have left two entities with the same id.
    #[error("{kind} {id} already exists in menu")]
    DuplicateId {
        /// Collection the conflict is in.
        kind: EntityKind,
        /// Identity that would have been duplicated.
        id: EntityId,
    },

    /// The session gate has not been passed yet.
    #[error("session is not authenticated")]
    Unauthenticated,
}

impl SyncError {
    /// Return whether the failure came from the store transport.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Store(error) if error.is_transport())
    }

    /// Return whether the store answered with an undecodable body.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Store(error) if error.is_decode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        SyncError::from(MenuStoreError::transport("status 502")),
        "menu store transport failed: status 502"
    )]
    #[case(
        SyncError::NotFound { kind: EntityKind::Ingredient, id: EntityId::from(4) },
        "ingredient 4 not found in menu"
    )]
    #[case(
        SyncError::DuplicateId { kind: EntityKind::Dish, id: EntityId::from("soup") },
        "dish soup already exists in menu"
    )]
    #[case(SyncError::Unauthenticated, "session is not authenticated")]
    fn messages_are_stable(#[case] error: SyncError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn store_errors_keep_their_classification() {
        let transport = SyncError::from(MenuStoreError::transport("refused"));
        let decode = SyncError::from(MenuStoreError::decode("eof"));

        assert!(transport.is_transport());
        assert!(!transport.is_decode());
        assert!(decode.is_decode());
        assert!(!SyncError::Unauthenticated.is_transport());
    }
}
