use crate::key::{Key, Keychain};
use crate::value::ValueKind;
use thiserror::Error;

/// Errors that can occur when setting a value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetError {
    /// The root target is not a container
    #[error("Cannot set {key} on non-object {kind}")]
    NotAnObject { kind: ValueKind, key: Key },
    /// A non-terminal key needs to descend into something that cannot hold keys
    #[error("Cannot descend through {kind} at {path} to reach {key}")]
    NotTraversable {
        path: Keychain,
        kind: ValueKind,
        key: Key,
    },
    /// The key cannot address a slot in this kind of container
    #[error("Key {key} is not a valid index for {kind}")]
    InvalidKey { kind: ValueKind, key: Key },
    /// The keychain has no keys
    #[error("Keychain is empty")]
    EmptyKeychain,
    /// Failed to acquire lock on a shared value
    #[error("Failed to acquire lock")]
    LockError,
}

impl SetError {
    /// Returns true for errors caused by the shape of the target or keychain
    ///
    /// Everything except [`SetError::LockError`] belongs to this family.
    pub fn is_type_error(&self) -> bool {
        !matches!(self, SetError::LockError)
    }
}
