//! Opaque typed objects.
//!
//! A [`Payload`] is how a key or value travels when its concrete type is
//! not statically known at the wire boundary. Equality is *semantic*: a
//! [`Payload::Text`] and a [`Payload::Bytes`] holding the same UTF-8
//! content are equal, and [`Hash`] agrees with that.
//!
//! Absence is not a payload. An unset value is `Option::<Payload>::None`,
//! so a present zero and a missing value never collide.

use core::hash::{Hash, Hasher};

use bytes::Bytes;

use crate::tag::TypeTag;

/// Errors raised when converting a [`Payload`] into a concrete type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The payload carries a different type than the one requested.
    #[error("expected {expected} payload, got {actual}")]
    TypeMismatch {
        /// Tag of the requested type.
        expected: TypeTag,
        /// Tag of the payload actually present.
        actual: TypeTag,
    },

    /// An integer payload does not fit the requested integer type.
    #[error("integer {value} out of range for {target}")]
    OutOfRange {
        /// The integer carried by the payload.
        value: i64,
        /// Name of the requested Rust type.
        target: &'static str,
    },

    /// A byte payload was requested as text but is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    /// A typed object claims one of the primitive tags, which only the
    /// primitive variants may carry.
    #[error("typed object uses the primitive tag {0}")]
    ReservedTag(TypeTag),
}

/// An opaque typed object.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float, compared by bit pattern.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// A raw byte buffer.
    Bytes(Bytes),
    /// A raw serialized body of an application-defined type.
    Typed {
        /// The schema tag naming the body's type.
        tag: TypeTag,
        /// The serialized body.
        body: Bytes,
    },
}

impl Payload {
    /// Build a [`Payload::Typed`] from a tag and a body.
    pub fn typed(tag: impl Into<TypeTag>, body: impl Into<Bytes>) -> Self {
        Self::Typed {
            tag: tag.into(),
            body: body.into(),
        }
    }

    /// The schema tag of this payload.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Bool(_) => TypeTag::BOOL,
            Self::Int(_) => TypeTag::INT,
            Self::Float(_) => TypeTag::FLOAT,
            Self::Text(_) => TypeTag::TEXT,
            Self::Bytes(_) => TypeTag::BYTES,
            Self::Typed { tag, .. } => tag.clone(),
        }
    }

    /// The raw content of a text or byte payload.
    ///
    /// Text and bytes are two buffer representations of the same content,
    /// so they share this view for equality and hashing.
    pub fn content_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(text) => Some(text.as_bytes()),
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (
                Self::Typed { tag: ta, body: ba },
                Self::Typed { tag: tb, body: bb },
            ) => ta == tb && ba == bb,
            _ => match (self.content_bytes(), other.content_bytes()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Payload {}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Text(_) | Self::Bytes(_) => {
                0_u8.hash(state);
                self.content_bytes().unwrap_or_default().hash(state);
            }
            Self::Bool(b) => {
                1_u8.hash(state);
                b.hash(state);
            }
            Self::Int(i) => {
                2_u8.hash(state);
                i.hash(state);
            }
            Self::Float(x) => {
                3_u8.hash(state);
                x.to_bits().hash(state);
            }
            Self::Typed { tag, body } => {
                4_u8.hash(state);
                tag.hash(state);
                body.hash(state);
            }
        }
    }
}

impl core::fmt::Display for Payload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(text) => f.write_str(text),
            Self::Bytes(bytes) => match core::str::from_utf8(bytes) {
                Ok(text) => f.write_str(text),
                Err(_) => write!(f, "0x{}", hex::encode(bytes)),
            },
            Self::Typed { tag, body } => write!(f, "{tag}(0x{})", hex::encode(body)),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Types that can be written as an opaque typed object.
pub trait ToPayload {
    /// Encode `self` as a [`Payload`].
    fn to_payload(&self) -> Payload;
}

/// Types that can be resolved from an opaque typed object.
pub trait FromPayload: Sized {
    /// Decode a [`Payload`] into `Self`.
    fn from_payload(payload: Payload) -> Result<Self, PayloadError>;
}

fn type_mismatch(expected: TypeTag, payload: &Payload) -> PayloadError {
    PayloadError::TypeMismatch {
        expected,
        actual: payload.tag(),
    }
}

impl<T: ToPayload + ?Sized> ToPayload for &T {
    fn to_payload(&self) -> Payload {
        (**self).to_payload()
    }
}

impl ToPayload for Payload {
    fn to_payload(&self) -> Payload {
        self.clone()
    }
}

impl FromPayload for Payload {
    fn from_payload(payload: Payload) -> Result<Self, PayloadError> {
        Ok(payload)
    }
}

/// Implements [`ToPayload`] and [`FromPayload`] for integer types that
/// travel as [`Payload::Int`].
macro_rules! int_payload {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToPayload for $ty {
                fn to_payload(&self) -> Payload {
                    Payload::Int(i64::from(*self))
                }
            }

            impl FromPayload for $ty {
                fn from_payload(payload: Payload) -> Result<Self, PayloadError> {
                    match payload {
                        Payload::Int(value) => <$ty>::try_from(value)
                            .ok()
                            .ok_or(PayloadError::OutOfRange {
                                value,
                                target: stringify!($ty),
                            }),
                        other => Err(type_mismatch(TypeTag::INT, &other)),
                    }
                }
            }
        )*
    };
}

int_payload!(i8, i16, i32, i64, u8, u16, u32);

impl ToPayload for bool {
    fn to_payload(&self) -> Payload {
        Payload::Bool(*self)
    }
}

impl FromPayload for bool {
    fn from_payload(payload: Payload) -> Result<Self, PayloadError> {
        match payload {
            Payload::Bool(b) => Ok(b),
            other => Err(type_mismatch(TypeTag::BOOL, &other)),
        }
    }
}

impl ToPayload for f64 {
    fn to_payload(&self) -> Payload {
        Payload::Float(*self)
    }
}

impl FromPayload for f64 {
    fn from_payload(payload: Payload) -> Result<Self, PayloadError> {
        match payload {
            Payload::Float(x) => Ok(x),
            other => Err(type_mismatch(TypeTag::FLOAT, &other)),
        }
    }
}

impl ToPayload for str {
    fn to_payload(&self) -> Payload {
        Payload::Text(self.to_owned())
    }
}

impl ToPayload for String {
    fn to_payload(&self) -> Payload {
        Payload::Text(self.clone())
    }
}

impl FromPayload for String {
    fn from_payload(payload: Payload) -> Result<Self, PayloadError> {
        match payload {
            Payload::Text(text) => Ok(text),
            Payload::Bytes(bytes) => {
                Self::from_utf8(bytes.to_vec()).ok().ok_or(PayloadError::InvalidUtf8)
            }
            other => Err(type_mismatch(TypeTag::TEXT, &other)),
        }
    }
}

impl ToPayload for Bytes {
    fn to_payload(&self) -> Payload {
        Payload::Bytes(self.clone())
    }
}

impl FromPayload for Bytes {
    fn from_payload(payload: Payload) -> Result<Self, PayloadError> {
        match payload {
            Payload::Bytes(bytes) => Ok(bytes),
            Payload::Text(text) => Ok(Self::from(text)),
            other => Err(type_mismatch(TypeTag::BYTES, &other)),
        }
    }
}

impl ToPayload for [u8] {
    fn to_payload(&self) -> Payload {
        Payload::Bytes(Bytes::copy_from_slice(self))
    }
}

impl ToPayload for Vec<u8> {
    fn to_payload(&self) -> Payload {
        self.as_slice().to_payload()
    }
}

impl FromPayload for Vec<u8> {
    fn from_payload(payload: Payload) -> Result<Self, PayloadError> {
        Bytes::from_payload(payload).map(|bytes| bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(payload: &Payload) -> u64 {
        let mut hasher = DefaultHasher::new();
        payload.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn text_and_bytes_with_same_content_are_equal() {
        let text = Payload::Text("EURUSD".to_owned());
        let bytes = Payload::Bytes(Bytes::from_static(b"EURUSD"));
        assert_eq!(text, bytes);
        assert_eq!(hash_of(&text), hash_of(&bytes));
    }

    #[test]
    fn different_kinds_are_not_equal() {
        assert_ne!(Payload::Int(1), Payload::Bool(true));
        assert_ne!(Payload::Int(0), Payload::Text("0".to_owned()));
        assert_ne!(
            Payload::typed("blob", Bytes::from_static(b"a")),
            Payload::Bytes(Bytes::from_static(b"a"))
        );
    }

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(Payload::Float(f64::NAN), Payload::Float(f64::NAN));
        assert_ne!(Payload::Float(0.0), Payload::Float(-0.0));
    }

    #[test]
    fn integer_conversions_check_range() {
        assert_eq!(i32::from_payload(Payload::Int(42)), Ok(42));
        assert_eq!(
            u8::from_payload(Payload::Int(300)),
            Err(PayloadError::OutOfRange {
                value: 300,
                target: "u8"
            })
        );
        assert_eq!(
            i64::from_payload(Payload::Bool(true)),
            Err(PayloadError::TypeMismatch {
                expected: TypeTag::INT,
                actual: TypeTag::BOOL
            })
        );
    }

    #[test]
    fn string_accepts_utf8_bytes_only() {
        let ok = String::from_payload(Payload::Bytes(Bytes::from_static(b"abc")));
        assert_eq!(ok.as_deref(), Ok("abc"));
        let bad = String::from_payload(Payload::Bytes(Bytes::from_static(&[0xff, 0xfe])));
        assert_eq!(bad, Err(PayloadError::InvalidUtf8));
    }

    #[test]
    fn display_renders_content() {
        assert_eq!(Payload::Int(-7).to_string(), "-7");
        assert_eq!(Payload::Bytes(Bytes::from_static(&[0x00, 0xff])).to_string(), "0x00ff");
        assert_eq!(
            Payload::typed("quote", Bytes::from_static(&[0xab])).to_string(),
            "quote(0xab)"
        );
        assert_eq!(Payload::typed("quote", Bytes::new()).to_string(), "quote(0x)");
    }
}
