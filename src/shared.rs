use crate::error::SetError;
use crate::key::Keychain;
use crate::set::{self, SetOptions};
use crate::value::Value;
use std::sync::{Arc, Mutex};

/// A thread-safe handle to a nested value tree
///
/// `SharedValue` owns a root [`Value`] behind an `Arc<Mutex<_>>`, so several
/// components can write into the same structure. Each call takes the lock
/// for its whole duration, which makes every `set` atomic with respect to
/// other callers. Clones share the same root.
///
/// # Examples
///
/// ```
/// use sovran_deepset::{SetError, SharedValue, Value};
/// use std::thread;
///
/// let settings = SharedValue::new(Value::record());
///
/// let handles: Vec<_> = (0..4usize)
///     .map(|worker| {
///         let settings = settings.clone();
///         let chain = vec!["workers".to_string(), worker.to_string()];
///         thread::spawn(move || settings.set(chain, true))
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap()?;
/// }
///
/// let workers = settings.get("workers")?;
/// assert_eq!(workers.as_ref().and_then(Value::as_record).map(|w| w.len()), Some(4));
/// # Ok::<(), SetError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedValue {
    root: Arc<Mutex<Value>>,
}

impl SharedValue {
    /// Wraps `root` for shared access
    pub fn new(root: Value) -> Self {
        Self {
            root: Arc::new(Mutex::new(root)),
        }
    }

    /// Sets a value, overwriting what is there; see [`set::set`]
    ///
    /// # Errors
    ///
    /// - Returns `SetError::LockError` if the internal lock cannot be acquired
    /// - Returns any error [`set::set`] produces
    pub fn set<K, V>(&self, keychain: K, value: V) -> Result<Value, SetError>
    where
        K: Into<Keychain>,
        V: Into<Value>,
    {
        let mut root = self.root.lock().map_err(|_| SetError::LockError)?;
        set::set(&mut *root, keychain, value)
    }

    /// Sets a value according to `options`; see [`set::set_with`]
    ///
    /// # Errors
    ///
    /// - Returns `SetError::LockError` if the internal lock cannot be acquired
    /// - Returns any error [`set::set_with`] produces
    pub fn set_with<K, V>(
        &self,
        keychain: K,
        value: V,
        options: &SetOptions,
    ) -> Result<Value, SetError>
    where
        K: Into<Keychain>,
        V: Into<Value>,
    {
        let mut root = self.root.lock().map_err(|_| SetError::LockError)?;
        set::set_with(&mut *root, keychain, value, options)
    }

    /// Sets a value at several keychains under one lock; see [`set::set_all`]
    ///
    /// # Errors
    ///
    /// - Returns `SetError::LockError` if the internal lock cannot be acquired
    /// - Returns the first error [`set::set_all`] produces
    pub fn set_all<I, K, V>(
        &self,
        keychains: I,
        value: V,
        options: &SetOptions,
    ) -> Result<Vec<Value>, SetError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Keychain>,
        V: Into<Value>,
    {
        let mut root = self.root.lock().map_err(|_| SetError::LockError)?;
        set::set_all(&mut *root, keychains, value, options)
    }

    /// Retrieves a clone of the value at `keychain`
    ///
    /// # Errors
    ///
    /// Returns `SetError::LockError` if the internal lock cannot be acquired.
    pub fn get<K>(&self, keychain: K) -> Result<Option<Value>, SetError>
    where
        K: Into<Keychain>,
    {
        let root = self.root.lock().map_err(|_| SetError::LockError)?;
        Ok(set::get(&root, keychain).map(|value| value.into_owned()))
    }

    /// Runs `f` with read access to the root
    ///
    /// # Errors
    ///
    /// Returns `SetError::LockError` if the internal lock cannot be acquired.
    pub fn with<F, R>(&self, f: F) -> Result<R, SetError>
    where
        F: FnOnce(&Value) -> R,
    {
        let root = self.root.lock().map_err(|_| SetError::LockError)?;
        Ok(f(&*root))
    }

    /// Runs `f` with write access to the root
    ///
    /// Useful for several sets that must land together:
    ///
    /// ```
    /// use sovran_deepset::{set, SetError, SharedValue, Value};
    ///
    /// let shared = SharedValue::new(Value::record());
    /// shared.with_mut(|root| {
    ///     set(root, ["db", "host"], "localhost")?;
    ///     set(root, ["db", "port"], 5432)
    /// })??;
    /// assert_eq!(shared.get(["db", "port"])?, Some(Value::from(5432)));
    /// # Ok::<(), SetError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SetError::LockError` if the internal lock cannot be acquired.
    pub fn with_mut<F, R>(&self, f: F) -> Result<R, SetError>
    where
        F: FnOnce(&mut Value) -> R,
    {
        let mut root = self.root.lock().map_err(|_| SetError::LockError)?;
        Ok(f(&mut *root))
    }

    /// Returns a clone of the whole tree
    ///
    /// # Errors
    ///
    /// Returns `SetError::LockError` if the internal lock cannot be acquired.
    pub fn snapshot(&self) -> Result<Value, SetError> {
        let root = self.root.lock().map_err(|_| SetError::LockError)?;
        Ok(root.clone())
    }

    /// Unwraps the tree when this is the last handle
    ///
    /// Returns `Err(self)` while other clones are alive.
    pub fn into_inner(self) -> Result<Value, Self> {
        match Arc::try_unwrap(self.root) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())),
            Err(root) => Err(Self { root }),
        }
    }
}
