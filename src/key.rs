use std::borrow::Cow;
use std::fmt;

/// A single step into a container
///
/// Records are addressed by name, positional containers (arrays, sets and
/// typed arrays) by index. Each container decides how to read a key of the
/// other flavor; see [`Key::as_index`] and [`Key::to_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A position in an array, set or typed array
    Index(usize),
    /// A property or map key
    Name(String),
}

impl Key {
    /// Returns the position this key addresses in a positional container
    ///
    /// A name addresses a position only when `indexed_names` is set and the
    /// name is a canonical decimal index (`"7"`, but not `"07"` or `"+7"`).
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_deepset::Key;
    ///
    /// assert_eq!(Key::Index(3).as_index(false), Some(3));
    /// assert_eq!(Key::from("3").as_index(true), Some(3));
    /// assert_eq!(Key::from("3").as_index(false), None);
    /// assert_eq!(Key::from("03").as_index(true), None);
    /// ```
    pub fn as_index(&self, indexed_names: bool) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(name) if indexed_names => parse_canonical_index(name),
            Key::Name(_) => None,
        }
    }

    /// Returns the property name this key addresses in a record
    pub fn to_name(&self) -> Cow<'_, str> {
        match self {
            Key::Index(index) => Cow::Owned(index.to_string()),
            Key::Name(name) => Cow::Borrowed(name),
        }
    }
}

fn parse_canonical_index(name: &str) -> Option<usize> {
    let canonical = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && (name == "0" || !name.starts_with('0'));
    if canonical {
        name.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{}", index),
            Key::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

/// An ordered path of keys from a root container to the slot being written
///
/// Anything that converts into a [`Key`] converts into a one-key chain, so
/// call sites can pass `"name"`, `3`, or `["sub", "key"]` interchangeably.
///
/// ```
/// use sovran_deepset::{Key, Keychain};
///
/// let chain = Keychain::from(["config", "servers"]).with(0usize);
/// assert_eq!(chain.len(), 3);
/// assert_eq!(chain.to_string(), "config.servers[0]");
/// assert_eq!(Keychain::from("solo").keys(), &[Key::from("solo")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Keychain(Vec<Key>);

impl Keychain {
    /// Creates an empty keychain
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a key and returns the extended chain
    pub fn with(mut self, key: impl Into<Key>) -> Self {
        self.0.push(key.into());
        self
    }

    pub fn push(&mut self, key: impl Into<Key>) {
        self.0.push(key.into());
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits into the parent keys and the terminal key
    pub fn split_last(&self) -> Option<(&Key, &[Key])> {
        self.0.split_last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.0.iter()
    }
}

impl fmt::Display for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (position, key) in self.0.iter().enumerate() {
            match key {
                Key::Index(index) => write!(f, "[{}]", index)?,
                Key::Name(name) if position == 0 => write!(f, "{}", name)?,
                Key::Name(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

impl From<Key> for Keychain {
    fn from(key: Key) -> Self {
        Self(vec![key])
    }
}

impl From<usize> for Keychain {
    fn from(index: usize) -> Self {
        Key::Index(index).into()
    }
}

impl From<&str> for Keychain {
    fn from(name: &str) -> Self {
        Key::from(name).into()
    }
}

impl From<String> for Keychain {
    fn from(name: String) -> Self {
        Key::Name(name).into()
    }
}

impl From<&[Key]> for Keychain {
    fn from(keys: &[Key]) -> Self {
        Self(keys.to_vec())
    }
}

impl<K: Into<Key>> From<Vec<K>> for Keychain {
    fn from(keys: Vec<K>) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: Into<Key>, const N: usize> From<[K; N]> for Keychain {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: Into<Key>> FromIterator<K> for Keychain {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Keychain {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_index_names() {
        assert_eq!(Key::from("0").as_index(true), Some(0));
        assert_eq!(Key::from("42").as_index(true), Some(42));
        assert_eq!(Key::from("").as_index(true), None);
        assert_eq!(Key::from("007").as_index(true), None);
        assert_eq!(Key::from("-1").as_index(true), None);
        assert_eq!(Key::from("1.5").as_index(true), None);
        assert_eq!(Key::from("key").as_index(true), None);
    }

    #[test]
    fn test_index_keys_name_record_properties() {
        assert_eq!(Key::Index(12).to_name(), "12");
        assert_eq!(Key::from("sub").to_name(), "sub");
    }

    #[test]
    fn test_scalar_keys_become_single_key_chains() {
        assert_eq!(Keychain::from(3usize).keys(), &[Key::Index(3)]);
        assert_eq!(Keychain::from("a").keys(), &[Key::from("a")]);
        assert_eq!(Keychain::from(Key::from("a")), Keychain::from(vec!["a"]));
    }

    #[test]
    fn test_mixed_chains_keep_their_order() {
        let chain: Keychain = vec![Key::from("items"), Key::Index(2), Key::from("name")].into();
        let (last, parents) = chain.split_last().unwrap();
        assert_eq!(last, &Key::from("name"));
        assert_eq!(parents, &[Key::from("items"), Key::Index(2)]);
        assert_eq!(chain.to_string(), "items[2].name");
    }

    #[test]
    fn test_empty_chain_display() {
        assert!(Keychain::new().is_empty());
        assert_eq!(Keychain::new().to_string(), "<root>");
    }
}
