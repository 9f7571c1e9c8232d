//! # sovran-deepset
//!
//! Set values deep inside heterogeneous nested containers.
//!
//! `sovran-deepset` writes a value at a *keychain*, a path of keys leading
//! from a root container to the slot being written. Along the way it walks
//! through arrays, maps and records, creating an empty record wherever a key
//! is missing, and finally assigns into whichever container holds the
//! terminal slot: an array, a map, an insertion-ordered set, a fixed-width
//! typed array, or a plain record.
//!
//! ## Key Features
//!
//! - **One operation**: [`set`] and its variants [`set_with`] and [`set_all`]
//! - **Auto-vivification**: missing intermediate keys become empty records
//! - **Overwrite policy**: keep an existing value instead of replacing it
//! - **Typed errors**: shape problems are reported as [`SetError`] values
//! - **Thread-safe sharing**: [`SharedValue`] serializes writers with a mutex
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_deepset::{set, SetError, Value};
//!
//! fn main() -> Result<(), SetError> {
//!     // Arrays are written by index
//!     let mut arr = Value::from(vec!["before"]);
//!     set(&mut arr, 0usize, "after")?;
//!     assert_eq!(arr, Value::from(vec!["after"]));
//!
//!     // Records by name, and the written value comes back
//!     let mut obj = Value::record();
//!     assert_eq!(set(&mut obj, "key", "value")?, Value::from("value"));
//!
//!     // Sets by position in their iteration order
//!     let mut s = Value::set_of([1, 2, 3]);
//!     set(&mut s, 1usize, 5)?;
//!     assert_eq!(
//!         s.as_set().unwrap().iter().cloned().collect::<Vec<_>>(),
//!         vec![Value::from(1), Value::from(5), Value::from(3)]
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Nested Keychains
//!
//! ```rust
//! use sovran_deepset::{get, set, SetError, Value};
//! use serde_json::json;
//!
//! fn main() -> Result<(), SetError> {
//!     let mut obj = Value::record();
//!
//!     // `sub` does not exist yet, so an empty record is created for it
//!     set(&mut obj, ["sub", "key"], "value")?;
//!
//!     assert_eq!(obj, Value::from(json!({"sub": {"key": "value"}})));
//!     assert_eq!(get(&obj, ["sub", "key"]).as_deref(), Some(&Value::from("value")));
//!     Ok(())
//! }
//! ```
//!
//! ### Keeping Existing Values
//!
//! ```rust
//! use sovran_deepset::{set_with, SetError, SetOptions, Value};
//!
//! fn main() -> Result<(), SetError> {
//!     let defaults = SetOptions::default().with_overwrite(false);
//!     let mut config = Value::record();
//!
//!     set_with(&mut config, ["log", "level"], "warn", &defaults)?;
//!     let level = set_with(&mut config, ["log", "level"], "debug", &defaults)?;
//!
//!     // The first write wins and is what the second call returns
//!     assert_eq!(level, Value::from("warn"));
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_deepset::{set, SetError, Value};
//! use serde_json::json;
//!
//! // Leaves cannot hold keys
//! let mut text = Value::from("a string");
//! match set(&mut text, "key", "value") {
//!     Ok(_) => println!("This shouldn't happen"),
//!     Err(SetError::NotAnObject { kind, .. }) => println!("Root is a {}", kind),
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! // Neither can a leaf halfway down the keychain
//! let mut obj = Value::from(json!({"sub": "a string"}));
//! match set(&mut obj, ["sub", "key"], "value") {
//!     Err(e @ SetError::NotTraversable { .. }) => {
//!         assert!(e.is_type_error());
//!         println!("{}", e);
//!     }
//!     other => println!("Unexpected: {:?}", other),
//! }
//! ```

mod buffer;
mod container;
mod error;
mod key;
mod set;
mod shared;
pub mod traverse;
mod value;

pub use buffer::{ElementKind, TypedArray};
pub use error::SetError;
pub use key::{Key, Keychain};
pub use set::{get, set, set_all, set_with, SetOptions};
pub use shared::SharedValue;
pub use traverse::TraversalOptions;
pub use value::{Value, ValueKind};

// Re-export the collections used by `Value` for convenience
pub use indexmap::{IndexMap, IndexSet};
