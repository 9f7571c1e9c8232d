use crate::error::SetError;
use crate::key::Keychain;
use crate::traverse::{self, Edit, TraversalOptions};
use crate::value::Value;
use std::borrow::Cow;

/// Options for [`set_with`] and [`set_all`]
///
/// # Examples
///
/// ```
/// use sovran_deepset::{SetOptions, TraversalOptions};
///
/// let keep_existing = SetOptions::default().with_overwrite(false);
/// assert!(!keep_existing.overwrite);
///
/// let strict = SetOptions::default()
///     .with_traversal(TraversalOptions::default().with_indexed_names(false));
/// assert!(strict.overwrite);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOptions {
    /// Replace a value already in the target slot. Defaults to `true`; when
    /// `false`, the existing value is kept and returned instead.
    pub overwrite: bool,
    /// Passed through to the keychain traversal untouched
    pub traversal: TraversalOptions,
}

impl Default for SetOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            traversal: TraversalOptions::default(),
        }
    }
}

impl SetOptions {
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_traversal(mut self, traversal: TraversalOptions) -> Self {
        self.traversal = traversal;
        self
    }
}

/// Sets `value` at `keychain` inside `container`, overwriting what is there
///
/// Missing intermediate keys get a fresh empty record. Returns the value the
/// slot now holds: the written value, except that a typed array returns the
/// coerced element, or [`Value::Undefined`] when the write fell past its end.
///
/// # Examples
///
/// ```
/// use sovran_deepset::{get, set, SetError, Value};
/// use serde_json::json;
///
/// let mut config = Value::record();
/// set(&mut config, ["server", "port"], 8080)?;
/// set(&mut config, "name", "edge")?;
///
/// assert_eq!(config, Value::from(json!({"server": {"port": 8080}, "name": "edge"})));
/// assert_eq!(get(&config, ["server", "port"]).as_deref(), Some(&Value::from(8080)));
/// # Ok::<(), SetError>(())
/// ```
///
/// # Errors
///
/// - `SetError::NotAnObject` if `container` is not a container
/// - `SetError::NotTraversable` if an intermediate key holds a leaf, a set or
///   a typed array
/// - `SetError::InvalidKey` if a name that is not an index is used on an
///   array, set or typed array, if an array index is at or past
///   `u32::MAX`, or if a set index is past the set's length
/// - `SetError::EmptyKeychain` if the keychain has no keys
pub fn set<K, V>(container: &mut Value, keychain: K, value: V) -> Result<Value, SetError>
where
    K: Into<Keychain>,
    V: Into<Value>,
{
    set_with(container, keychain, value, &SetOptions::default())
}

/// Sets `value` at `keychain` inside `container` according to `options`
///
/// With `overwrite` off, a slot that already holds a value is left alone and
/// its current value is returned.
///
/// ```
/// use sovran_deepset::{set_with, SetError, SetOptions, Value};
///
/// let options = SetOptions::default().with_overwrite(false);
/// let mut settings = Value::record();
///
/// assert_eq!(set_with(&mut settings, ["ui", "theme"], "dark", &options)?, Value::from("dark"));
/// assert_eq!(set_with(&mut settings, ["ui", "theme"], "light", &options)?, Value::from("dark"));
/// # Ok::<(), SetError>(())
/// ```
///
/// # Errors
///
/// Same as [`set`].
pub fn set_with<K, V>(
    container: &mut Value,
    keychain: K,
    value: V,
    options: &SetOptions,
) -> Result<Value, SetError>
where
    K: Into<Keychain>,
    V: Into<Value>,
{
    let keychain = keychain.into();
    let value = value.into();
    let overwrite = options.overwrite;
    traverse::edit(container, &keychain, &options.traversal, |slot| {
        if !slot.found() || overwrite {
            Edit::Write(value)
        } else {
            log::debug!("keeping existing value at {}", keychain);
            Edit::Cancel
        }
    })
}

/// Sets the same `value` at each keychain in turn
///
/// Returns one result per keychain, in order. Stops at the first error;
/// keychains already applied stay applied.
///
/// ```
/// use sovran_deepset::{get, set_all, SetError, SetOptions, Value};
///
/// let mut flags = Value::record();
/// let written = set_all(&mut flags, [["a", "on"], ["b", "on"]], true, &SetOptions::default())?;
/// assert_eq!(written, vec![Value::from(true), Value::from(true)]);
/// assert_eq!(get(&flags, ["b", "on"]).as_deref(), Some(&Value::from(true)));
/// # Ok::<(), SetError>(())
/// ```
///
/// # Errors
///
/// The first error any single keychain produces; see [`set`].
pub fn set_all<I, K, V>(
    container: &mut Value,
    keychains: I,
    value: V,
    options: &SetOptions,
) -> Result<Vec<Value>, SetError>
where
    I: IntoIterator<Item = K>,
    K: Into<Keychain>,
    V: Into<Value>,
{
    let value = value.into();
    keychains
        .into_iter()
        .map(|keychain| set_with(container, keychain, value.clone(), options))
        .collect()
}

/// Reads the value at `keychain`, or `None` when nothing is there
pub fn get<K>(container: &Value, keychain: K) -> Option<Cow<'_, Value>>
where
    K: Into<Keychain>,
{
    traverse::resolve(container, &keychain.into(), &TraversalOptions::default())
}
