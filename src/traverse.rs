//! Keychain traversal: read lookups and in-place edits.
//!
//! [`resolve`] walks a keychain without changing anything and reports what,
//! if anything, sits at the end of it. [`edit`] walks the same way but
//! creates an empty record for every missing intermediate key, then lets a
//! callback decide what happens to the terminal slot.

use crate::error::SetError;
use crate::key::{Key, Keychain};
use crate::value::Value;
use std::borrow::Cow;

/// Options that control how keys are matched against containers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Let canonical decimal names like `"3"` address positions in arrays,
    /// sets and typed arrays. Defaults to `true`.
    pub indexed_names: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            indexed_names: true,
        }
    }
}

impl TraversalOptions {
    pub fn with_indexed_names(mut self, indexed_names: bool) -> Self {
        self.indexed_names = indexed_names;
        self
    }
}

/// The terminal slot of an [`edit`], as seen before the edit is applied
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    key: &'a Key,
    old: Option<&'a Value>,
}

impl<'a> Slot<'a> {
    /// The terminal key of the keychain
    pub fn key(&self) -> &'a Key {
        self.key
    }

    /// The value currently in the slot, if any
    pub fn old(&self) -> Option<&'a Value> {
        self.old
    }

    /// Whether the slot currently holds a value
    pub fn found(&self) -> bool {
        self.old.is_some()
    }

    /// The value currently in the slot, or `fallback` when it is empty
    pub fn old_or(&self, fallback: &'a Value) -> &'a Value {
        self.old.unwrap_or(fallback)
    }
}

/// What an [`edit`] callback wants done with the terminal slot
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Store this value in the slot
    Write(Value),
    /// Leave the slot as it is
    Cancel,
}

/// Looks up the value at the end of `keychain`
///
/// Returns `None` when any step is absent, lands on a leaf, or uses a key the
/// container cannot address. An empty keychain resolves to the root itself.
///
/// ```
/// use sovran_deepset::traverse::{resolve, TraversalOptions};
/// use sovran_deepset::{Keychain, Value};
/// use serde_json::json;
///
/// let root = Value::from(json!({"users": [{"name": "ada"}]}));
/// let options = TraversalOptions::default();
///
/// let name = resolve(&root, &Keychain::from(["users", "0", "name"]), &options);
/// assert_eq!(name.as_deref(), Some(&Value::from("ada")));
/// assert!(resolve(&root, &Keychain::from(["users", "0", "name", "x"]), &options).is_none());
/// ```
pub fn resolve<'a>(
    container: &'a Value,
    keychain: &Keychain,
    options: &TraversalOptions,
) -> Option<Cow<'a, Value>> {
    let mut current = Cow::Borrowed(container);
    for key in keychain {
        current = match current {
            Cow::Borrowed(value) => value.get_key(key, options).ok()??,
            // Owned values are typed array elements, which hold no keys
            Cow::Owned(_) => return None,
        };
    }
    Some(current)
}

/// Walks `keychain`, creating missing intermediate records, and applies
/// the callback's decision to the terminal slot
///
/// Returns what the slot reads as after [`Edit::Write`], which for a typed
/// array is the coerced number and for an ignored write [`Value::Undefined`].
/// On [`Edit::Cancel`] returns the value left in the slot
/// ([`Value::Undefined`] when the slot was empty).
///
/// Records created before a failing step stay linked into the structure.
///
/// # Errors
///
/// - `SetError::EmptyKeychain` if `keychain` has no keys
/// - `SetError::NotAnObject` if `container` is not a container
/// - `SetError::NotTraversable` if an intermediate key lands on a leaf, a
///   set, or a typed array
/// - `SetError::InvalidKey` if a key cannot address a positional container
pub fn edit<F>(
    container: &mut Value,
    keychain: &Keychain,
    options: &TraversalOptions,
    decide: F,
) -> Result<Value, SetError>
where
    F: FnOnce(Slot<'_>) -> Edit,
{
    let (last, parents) = keychain.split_last().ok_or(SetError::EmptyKeychain)?;

    let target = descend(container, keychain.keys(), parents, options)?;
    check_container(target, keychain.keys(), parents.len())?;

    let old = target.get_key(last, options)?.map(Cow::into_owned);
    let decision = decide(Slot {
        key: last,
        old: old.as_ref(),
    });

    match decision {
        Edit::Write(value) => target.assign_key(last, value, options),
        Edit::Cancel => Ok(old.unwrap_or_default()),
    }
}

/// Follows `parents`, creating a record wherever a key is absent
fn descend<'a>(
    root: &'a mut Value,
    keychain: &[Key],
    parents: &[Key],
    options: &TraversalOptions,
) -> Result<&'a mut Value, SetError> {
    let mut current = root;
    for (depth, key) in parents.iter().enumerate() {
        check_container(current, keychain, depth)?;
        if !current.is_traversable() {
            return Err(SetError::NotTraversable {
                path: Keychain::from(&keychain[..depth]),
                kind: current.kind(),
                key: key.clone(),
            });
        }

        if current.get_key(key, options)?.is_none() {
            log::trace!(
                "creating record at {}",
                Keychain::from(&keychain[..=depth])
            );
            current.assign_key(key, Value::record(), options)?;
        }

        let kind = current.kind();
        current = current
            .get_key_mut(key, options)?
            .ok_or_else(|| SetError::InvalidKey {
                kind,
                key: key.clone(),
            })?;
    }
    Ok(current)
}

/// Fails unless `value`, found by following `keychain[..depth]`, is a container
fn check_container(value: &Value, keychain: &[Key], depth: usize) -> Result<(), SetError> {
    if value.is_container() {
        return Ok(());
    }
    let key = keychain[depth].clone();
    if depth == 0 {
        Err(SetError::NotAnObject {
            kind: value.kind(),
            key,
        })
    } else {
        Err(SetError::NotTraversable {
            path: Keychain::from(&keychain[..depth]),
            kind: value.kind(),
            key,
        })
    }
}
