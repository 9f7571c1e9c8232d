use crate::value::{number_bits, same_value_zero};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Element type of a [`TypedArray`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl ElementKind {
    /// Width of one element in bytes
    pub fn width(self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::Uint8 | ElementKind::Uint8Clamped => 1,
            ElementKind::Int16 | ElementKind::Uint16 => 2,
            ElementKind::Int32 | ElementKind::Uint32 | ElementKind::Float32 => 4,
            ElementKind::Float64 => 8,
        }
    }

    /// Converts a number to the nearest value this element type can hold
    ///
    /// Integer kinds truncate and wrap modulo their range, with non-finite
    /// input becoming 0. `Uint8Clamped` clamps to 0..=255 and rounds half to
    /// even. `Float32` rounds to single precision.
    pub fn coerce(self, number: f64) -> f64 {
        match self {
            ElementKind::Float64 => number,
            ElementKind::Float32 => number as f32 as f64,
            ElementKind::Uint8Clamped => {
                if number.is_nan() {
                    0.0
                } else {
                    round_half_even(number.clamp(0.0, 255.0))
                }
            }
            _ => {
                if !number.is_finite() {
                    return 0.0;
                }
                let bits = (self.width() * 8) as i32;
                let modulus = 2f64.powi(bits);
                let wrapped = number.trunc().rem_euclid(modulus);
                if self.is_signed() && wrapped >= modulus / 2.0 {
                    wrapped - modulus
                } else {
                    wrapped
                }
            }
        }
    }

    fn is_signed(self) -> bool {
        matches!(
            self,
            ElementKind::Int8 | ElementKind::Int16 | ElementKind::Int32
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ElementKind::Int8 => "Int8Array",
            ElementKind::Uint8 => "Uint8Array",
            ElementKind::Uint8Clamped => "Uint8ClampedArray",
            ElementKind::Int16 => "Int16Array",
            ElementKind::Uint16 => "Uint16Array",
            ElementKind::Int32 => "Int32Array",
            ElementKind::Uint32 => "Uint32Array",
            ElementKind::Float32 => "Float32Array",
            ElementKind::Float64 => "Float64Array",
        };
        write!(f, "{}", name)
    }
}

fn round_half_even(number: f64) -> f64 {
    let floor = number.floor();
    let fraction = number - floor;
    if fraction < 0.5 {
        floor
    } else if fraction > 0.5 || floor % 2.0 != 0.0 {
        floor + 1.0
    } else {
        floor
    }
}

/// A fixed-length numeric buffer whose elements share one [`ElementKind`]
///
/// The length is fixed at construction. Every stored number has already been
/// coerced to the element kind, so reads return exactly what the element
/// type can represent.
///
/// ```
/// use sovran_deepset::{ElementKind, TypedArray};
///
/// let mut bytes = TypedArray::new(ElementKind::Uint8, 2);
/// assert!(bytes.set(0, 300.0));
/// assert_eq!(bytes.get(0), Some(44.0));
/// assert!(!bytes.set(2, 1.0));
/// assert_eq!(bytes.byte_len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TypedArray {
    kind: ElementKind,
    elements: Vec<f64>,
}

impl TypedArray {
    /// Creates a zero-filled buffer of `len` elements
    pub fn new(kind: ElementKind, len: usize) -> Self {
        Self {
            kind,
            elements: vec![0.0; len],
        }
    }

    /// Creates a buffer from numbers, coercing each one to `kind`
    pub fn from_numbers<I>(kind: ElementKind, numbers: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            kind,
            elements: numbers.into_iter().map(|n| kind.coerce(n)).collect(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Size of the underlying storage in bytes
    pub fn byte_len(&self) -> usize {
        self.elements.len() * self.kind.width()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.elements.get(index).copied()
    }

    /// Writes a coerced number at `index`
    ///
    /// Returns `false` and leaves the buffer untouched when `index` is past
    /// the end.
    pub fn set(&mut self, index: usize, number: f64) -> bool {
        match self.elements.get_mut(index) {
            Some(slot) => {
                *slot = self.kind.coerce(number);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.elements.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.elements.clone()
    }
}

impl PartialEq for TypedArray {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| same_value_zero(*a, *b))
    }
}

impl Eq for TypedArray {}

impl Hash for TypedArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.elements.len().hash(state);
        for element in &self.elements {
            number_bits(*element).hash(state);
        }
    }
}
