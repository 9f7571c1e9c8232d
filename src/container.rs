//! Get-by-key and set-by-key for each container variant of [`Value`].

use crate::error::SetError;
use crate::key::Key;
use crate::traverse::TraversalOptions;
use crate::value::Value;
use indexmap::IndexSet;
use std::borrow::Cow;

/// Arrays grow only for indexes below this, the host's maximum array length
pub(crate) const MAX_ARRAY_LENGTH: usize = u32::MAX as usize;

impl Value {
    /// Returns true for values that can hold keyed sub-values
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Map(_) | Value::Set(_) | Value::Buffer(_) | Value::Record(_)
        )
    }

    /// Returns true for containers whose elements can be borrowed mutably
    /// and descended into
    pub(crate) fn is_traversable(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_) | Value::Record(_))
    }

    fn position(&self, key: &Key, options: &TraversalOptions) -> Result<usize, SetError> {
        key.as_index(options.indexed_names)
            .ok_or_else(|| SetError::InvalidKey {
                kind: self.kind(),
                key: key.clone(),
            })
    }

    /// Reads the sub-value at `key`, or `None` when the slot is absent
    ///
    /// Typed array elements are materialized as [`Value::Number`].
    pub(crate) fn get_key(
        &self,
        key: &Key,
        options: &TraversalOptions,
    ) -> Result<Option<Cow<'_, Value>>, SetError> {
        let slot = match self {
            Value::Array(items) => items.get(self.position(key, options)?).map(Cow::Borrowed),
            Value::Map(entries) => entries.get(key).map(Cow::Borrowed),
            Value::Set(elements) => elements
                .get_index(self.position(key, options)?)
                .map(Cow::Borrowed),
            Value::Buffer(buffer) => buffer
                .get(self.position(key, options)?)
                .map(|n| Cow::Owned(Value::Number(n))),
            Value::Record(fields) => fields.get(&*key.to_name()).map(Cow::Borrowed),
            other => {
                return Err(SetError::NotAnObject {
                    kind: other.kind(),
                    key: key.clone(),
                })
            }
        };
        Ok(slot.filter(|value| !value.is_undefined()))
    }

    /// Borrows the sub-value at `key` for descent
    ///
    /// Only arrays, maps and records hand out their elements; callers check
    /// [`Value::is_traversable`] first.
    pub(crate) fn get_key_mut(
        &mut self,
        key: &Key,
        options: &TraversalOptions,
    ) -> Result<Option<&mut Value>, SetError> {
        let kind = self.kind();
        let index = key.as_index(options.indexed_names);
        match self {
            Value::Array(items) => match index {
                Some(index) => Ok(items.get_mut(index)),
                None => Err(SetError::InvalidKey {
                    kind,
                    key: key.clone(),
                }),
            },
            Value::Map(entries) => Ok(entries.get_mut(key)),
            Value::Record(fields) => Ok(fields.get_mut(&*key.to_name())),
            _ => Err(SetError::InvalidKey {
                kind,
                key: key.clone(),
            }),
        }
    }

    /// Writes `value` into the slot at `key` and returns what the slot now reads as
    ///
    /// That is `value` itself for arrays, maps and records. Sets return the
    /// element left at that position, typed arrays the coerced number, and
    /// either returns [`Value::Undefined`] when the write left nothing there.
    pub(crate) fn assign_key(
        &mut self,
        key: &Key,
        value: Value,
        options: &TraversalOptions,
    ) -> Result<Value, SetError> {
        let kind = self.kind();
        let invalid = || SetError::InvalidKey {
            kind,
            key: key.clone(),
        };
        let index = key.as_index(options.indexed_names);
        let stored = match self {
            Value::Array(items) => {
                let len = index.and_then(array_length_for).ok_or_else(invalid)?;
                if len > items.len() {
                    items.resize(len, Value::Undefined);
                }
                items[len - 1] = value.clone();
                value
            }
            Value::Map(entries) => {
                entries.insert(key.clone(), value.clone());
                value
            }
            Value::Set(elements) => {
                let index = index.filter(|i| *i <= elements.len()).ok_or_else(invalid)?;
                replace_in_set(elements, index, value);
                elements.get_index(index).cloned().unwrap_or_default()
            }
            Value::Buffer(buffer) => {
                let index = index.ok_or_else(invalid)?;
                if buffer.set(index, value.to_number()) {
                    buffer.get(index).map(Value::Number).unwrap_or_default()
                } else {
                    log::debug!(
                        "ignoring write at {} past the end of a {}-element {}",
                        index,
                        buffer.len(),
                        buffer.kind()
                    );
                    Value::Undefined
                }
            }
            Value::Record(fields) => {
                fields.insert(key.to_name().into_owned(), value.clone());
                value
            }
            _ => {
                return Err(SetError::NotAnObject {
                    kind,
                    key: key.clone(),
                })
            }
        };
        Ok(stored)
    }
}

/// Returns the length an array needs to hold `index`, or `None` past [`MAX_ARRAY_LENGTH`]
fn array_length_for(index: usize) -> Option<usize> {
    index.checked_add(1).filter(|len| *len <= MAX_ARRAY_LENGTH)
}

/// Replaces the element at ordinal `index`, or appends when `index` is the length
///
/// The rebuilt set keeps the first occurrence of any element, so writing a
/// value that already sits at another position collapses the two.
fn replace_in_set(elements: &mut IndexSet<Value>, index: usize, value: Value) {
    if index == elements.len() {
        elements.insert(value);
        return;
    }
    let mut ordered: Vec<Value> = elements.drain(..).collect();
    ordered[index] = value;
    *elements = ordered.into_iter().collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ElementKind, TypedArray};
    use crate::value::ValueKind;
    use serde_json::json;

    fn options() -> TraversalOptions {
        TraversalOptions::default()
    }

    #[test]
    fn test_array_extends_with_empty_slots() {
        let mut array = Value::from(vec!["a"]);
        array.assign_key(&Key::Index(3), Value::from("d"), &options()).unwrap();

        let items = array.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert!(items[1].is_undefined());
        assert_eq!(array.get_key(&Key::Index(1), &options()).unwrap(), None);
        assert_eq!(
            array.get_key(&Key::from("3"), &options()).unwrap().as_deref(),
            Some(&Value::from("d"))
        );
    }

    #[test]
    fn test_array_rejects_non_index_names() {
        let mut array = Value::from(vec![1]);
        let err = array
            .assign_key(&Key::from("length"), Value::from(0), &options())
            .unwrap_err();
        assert!(matches!(err, SetError::InvalidKey { .. }));

        let strict = TraversalOptions::default().with_indexed_names(false);
        assert!(array.get_key(&Key::from("0"), &strict).is_err());
        assert!(array.get_key(&Key::Index(0), &strict).unwrap().is_some());
    }

    #[test]
    fn test_map_keys_are_distinct_by_flavor() {
        let mut map = Value::map();
        map.assign_key(&Key::Index(1), Value::from("index"), &options()).unwrap();
        map.assign_key(&Key::from("1"), Value::from("name"), &options()).unwrap();

        assert_eq!(map.as_map().unwrap().len(), 2);
        assert_eq!(
            map.get_key(&Key::Index(1), &options()).unwrap().as_deref(),
            Some(&Value::from("index"))
        );
    }

    #[test]
    fn test_record_index_keys_name_properties() {
        let mut record = Value::record();
        record.assign_key(&Key::Index(0), Value::from("zero"), &options()).unwrap();
        assert_eq!(
            record.get_key(&Key::from("0"), &options()).unwrap().as_deref(),
            Some(&Value::from("zero"))
        );
    }

    #[test]
    fn test_set_replacement_keeps_positions() {
        let mut set = Value::set_of([1, 2, 3]);
        set.assign_key(&Key::Index(1), Value::from(5), &options()).unwrap();
        let order: Vec<&Value> = set.as_set().unwrap().iter().collect();
        assert_eq!(order, [&Value::from(1), &Value::from(5), &Value::from(3)]);
    }

    #[test]
    fn test_set_replacement_with_existing_element_collapses() {
        let mut set = Value::set_of([1, 2, 3]);
        set.assign_key(&Key::Index(1), Value::from(3), &options()).unwrap();
        assert_eq!(set, Value::set_of([1, 3]));
        let order: Vec<&Value> = set.as_set().unwrap().iter().collect();
        assert_eq!(order, [&Value::from(1), &Value::from(3)]);
    }

    #[test]
    fn test_array_length_bounds() {
        assert_eq!(array_length_for(0), Some(1));
        assert_eq!(array_length_for(MAX_ARRAY_LENGTH - 1), Some(MAX_ARRAY_LENGTH));
        assert_eq!(array_length_for(MAX_ARRAY_LENGTH), None);
        assert_eq!(array_length_for(usize::MAX), None);
    }

    #[test]
    fn test_array_rejects_indexes_past_max_length() {
        let mut array = Value::from(vec![1]);
        for index in [MAX_ARRAY_LENGTH, usize::MAX] {
            let err = array
                .assign_key(&Key::Index(index), Value::from(2), &options())
                .unwrap_err();
            assert!(matches!(err, SetError::InvalidKey { kind: ValueKind::Array, .. }));
        }
        assert_eq!(array, Value::from(vec![1]));
    }

    #[test]
    fn test_set_index_at_end_appends() {
        let mut set = Value::set_of(["a"]);
        let stored = set.assign_key(&Key::Index(1), Value::from("b"), &options()).unwrap();
        assert_eq!(stored, Value::from("b"));
        assert_eq!(set.as_set().unwrap().get_index(1), Some(&Value::from("b")));
    }

    #[test]
    fn test_set_index_past_end_is_invalid() {
        let mut set = Value::set_of(["a"]);
        let err = set
            .assign_key(&Key::Index(9), Value::from("b"), &options())
            .unwrap_err();
        assert!(matches!(err, SetError::InvalidKey { kind: ValueKind::Set, .. }));
        assert_eq!(set, Value::set_of(["a"]));
    }

    #[test]
    fn test_set_returns_what_is_left_at_the_position() {
        let mut set = Value::set_of([1, 2, 3]);
        let stored = set.assign_key(&Key::Index(0), Value::from(3), &options()).unwrap();
        assert_eq!(stored, Value::from(3));

        // 1 collapses onto its earlier copy, leaving nothing at position 2
        let mut set = Value::set_of([1, 2, 3]);
        let stored = set.assign_key(&Key::Index(2), Value::from(1), &options()).unwrap();
        assert!(stored.is_undefined());
        assert_eq!(set.as_set().unwrap().len(), 2);
    }

    #[test]
    fn test_buffer_coerces_and_ignores_out_of_range() {
        let mut buffer = Value::from(TypedArray::new(ElementKind::Int8, 2));
        let stored = buffer.assign_key(&Key::Index(0), Value::from("200"), &options()).unwrap();
        assert_eq!(stored, Value::from(-56));
        let ignored = buffer.assign_key(&Key::Index(5), Value::from(1), &options()).unwrap();
        assert!(ignored.is_undefined());

        let typed = buffer.as_buffer().unwrap();
        assert_eq!(typed.to_vec(), vec![-56.0, 0.0]);
        assert_eq!(buffer.get_key(&Key::Index(5), &options()).unwrap(), None);
    }

    #[test]
    fn test_leaves_are_not_containers() {
        let mut leaf = Value::from(json!("a string"));
        assert!(!leaf.is_container());
        let err = leaf
            .assign_key(&Key::from("key"), Value::from("value"), &options())
            .unwrap_err();
        assert!(matches!(err, SetError::NotAnObject { .. }));
        assert!(leaf.get_key(&Key::from("key"), &options()).is_err());
    }

    #[test]
    fn test_only_arrays_maps_and_records_are_traversable() {
        assert!(Value::record().is_traversable());
        assert!(Value::map().is_traversable());
        assert!(Value::from(vec![1]).is_traversable());
        assert!(!Value::set_of([1]).is_traversable());
        assert!(!Value::from(TypedArray::new(ElementKind::Uint8, 1)).is_traversable());
    }
}
