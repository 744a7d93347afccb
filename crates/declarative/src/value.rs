//! Typed tree primitives
//!
//! Resource models are plain structs built from these pieces:
//! - [`Value<T>`] for scalars that must distinguish "never set" and
//!   "explicitly absent" from a real value such as `0` or `false`
//! - `Option<SubTree>` for nested blocks that are present or absent as a unit
//! - `Vec<T>` for ordered collections
//! - `BTreeMap<String, T>` for keyed property bags

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A scalar with a three-valued presence state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value<T> {
    /// Never assigned
    #[default]
    Unset,
    /// Explicitly absent or unknown
    Null,
    /// Assigned a value
    Present(T),
}

impl<T> Value<T> {
    /// Check if a value is present
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Check if the value is unset or null
    ///
    /// Wire DTOs use this with `skip_serializing_if` so that absent
    /// scalars are omitted instead of sent as `null`.
    pub fn is_absent(&self) -> bool {
        !self.is_present()
    }

    /// Check if the value was never assigned
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Borrow the value, if present
    pub fn as_ref(&self) -> Value<&T> {
        match self {
            Self::Unset => Value::Unset,
            Self::Null => Value::Null,
            Self::Present(v) => Value::Present(v),
        }
    }

    /// Get the value, if present
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }

    /// Convert into an `Option`, collapsing unset and null
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }

    /// Return the value or a fallback
    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    /// Keep this value if present, otherwise use `other`
    pub fn or(self, other: Value<T>) -> Value<T> {
        match self {
            Self::Present(_) => self,
            _ => other,
        }
    }
}

impl<T: Clone> Value<T> {
    /// Clone the inner value into an `Option`
    pub fn cloned(&self) -> Option<T> {
        self.get().cloned()
    }
}

impl Value<String> {
    /// Borrow a string value as `&str`
    pub fn as_deref(&self) -> Option<&str> {
        self.get().map(String::as_str)
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Null,
        }
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Self::Present(value)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Self::Present(value.to_string())
    }
}

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "(unset)"),
            Self::Null => write!(f, "(null)"),
            Self::Present(v) => write!(f, "{}", v),
        }
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(v) => serializer.serialize_some(v),
            Self::Unset | Self::Null => serializer.serialize_none(),
        }
    }
}

// A missing key never reaches this impl; containers opt into `Unset`
// through `#[serde(default)]`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Value::from)
    }
}

// ============================================================================
// Ordered collections
// ============================================================================

/// Convert a wire list into a collection
///
/// A missing, null or empty list all become an empty collection.
/// Element order is preserved.
pub fn list_from_wire(list: Option<Vec<String>>) -> Vec<String> {
    list.unwrap_or_default()
}

/// Convert a collection into its wire form
///
/// An empty collection is omitted from the request; otherwise the
/// exact element order is reproduced.
pub fn list_to_wire(list: &[String]) -> Option<Vec<String>> {
    if list.is_empty() {
        None
    } else {
        Some(list.to_vec())
    }
}

// ============================================================================
// Number-or-string decoding
// ============================================================================

/// Wire shapes accepted for byte-size-like fields
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Number(serde_json::Number),
    Text(String),
}

/// Decode an integer that may arrive as a JSON number or a numeric string
///
/// Numeric decoding is attempted first, then string-to-integer parsing.
/// `null` becomes [`Value::Null`]; any other shape is a decode error.
/// Use with `#[serde(default, deserialize_with = "deserialize_byte_size")]`
/// so a missing key stays [`Value::Unset`].
pub fn deserialize_byte_size<'de, D>(deserializer: D) -> Result<Value<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<SizeRepr>::deserialize(deserializer).map_err(|_| {
        de::Error::custom("expected a number or a numeric string for byte size")
    })?;

    match repr {
        None => Ok(Value::Null),
        Some(SizeRepr::Number(n)) => {
            if let Some(v) = n.as_i64() {
                Ok(Value::Present(v))
            } else if let Some(v) = n.as_f64() {
                Ok(Value::Present(v as i64))
            } else {
                Err(de::Error::custom(format!("byte size out of range: {}", n)))
            }
        }
        Some(SizeRepr::Text(s)) => s
            .parse::<i64>()
            .map(Value::Present)
            .map_err(|e| de::Error::custom(format!("invalid byte size {:?}: {}", s, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct Wire {
        #[serde(default, skip_serializing_if = "Value::is_absent")]
        silence_timeout_seconds: Value<i64>,
    }

    #[derive(Debug, Deserialize)]
    struct Sized {
        #[serde(default, deserialize_with = "deserialize_byte_size")]
        bytes: Value<i64>,
    }

    #[test]
    fn test_unset_is_omitted() {
        let wire = Wire::default();
        assert_eq!(serde_json::to_value(&wire).unwrap(), json!({}));
    }

    #[test]
    fn test_null_is_omitted() {
        let wire = Wire {
            silence_timeout_seconds: Value::Null,
        };
        assert_eq!(serde_json::to_value(&wire).unwrap(), json!({}));
    }

    #[test]
    fn test_explicit_zero_is_emitted() {
        let wire = Wire {
            silence_timeout_seconds: Value::Present(0),
        };
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({ "silenceTimeoutSeconds": 0 })
        );
    }

    #[test]
    fn test_deserialize_tri_state() {
        let missing: Wire = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.silence_timeout_seconds, Value::Unset);

        let null: Wire = serde_json::from_value(json!({ "silenceTimeoutSeconds": null })).unwrap();
        assert_eq!(null.silence_timeout_seconds, Value::Null);

        let zero: Wire = serde_json::from_value(json!({ "silenceTimeoutSeconds": 0 })).unwrap();
        assert_eq!(zero.silence_timeout_seconds, Value::Present(0));
    }

    #[test]
    fn test_value_helpers() {
        let v: Value<String> = "demo".into();
        assert_eq!(v.as_deref(), Some("demo"));
        assert!(v.is_present());
        assert_eq!(Value::<i64>::Null.or(Value::Present(3)), Value::Present(3));
        assert_eq!(Value::<i64>::from(None::<i64>), Value::Null);
        assert_eq!(Value::<i64>::Unset.unwrap_or(7), 7);
    }

    #[test]
    fn test_list_conversions_preserve_order() {
        let list = list_from_wire(Some(vec!["b".into(), "a".into(), "c".into()]));
        assert_eq!(list, vec!["b", "a", "c"]);
        assert_eq!(list_to_wire(&list), Some(vec!["b".into(), "a".into(), "c".into()]));
    }

    #[test]
    fn test_list_conversions_empty() {
        assert!(list_from_wire(None).is_empty());
        assert!(list_from_wire(Some(vec![])).is_empty());
        assert_eq!(list_to_wire(&[]), None);
    }

    #[test]
    fn test_byte_size_number() {
        let s: Sized = serde_json::from_value(json!({ "bytes": 1024 })).unwrap();
        assert_eq!(s.bytes, Value::Present(1024));

        let f: Sized = serde_json::from_value(json!({ "bytes": 2048.0 })).unwrap();
        assert_eq!(f.bytes, Value::Present(2048));
    }

    #[test]
    fn test_byte_size_string_fallback() {
        let s: Sized = serde_json::from_value(json!({ "bytes": "4096" })).unwrap();
        assert_eq!(s.bytes, Value::Present(4096));
    }

    #[test]
    fn test_byte_size_null_and_missing() {
        let null: Sized = serde_json::from_value(json!({ "bytes": null })).unwrap();
        assert_eq!(null.bytes, Value::Null);

        let missing: Sized = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.bytes, Value::Unset);
    }

    #[test]
    fn test_byte_size_rejects_other_shapes() {
        assert!(serde_json::from_value::<Sized>(json!({ "bytes": "12kb" })).is_err());
        assert!(serde_json::from_value::<Sized>(json!({ "bytes": " 12 " })).is_err());
        assert!(serde_json::from_value::<Sized>(json!({ "bytes": "" })).is_err());
        assert!(serde_json::from_value::<Sized>(json!({ "bytes": true })).is_err());
        assert!(serde_json::from_value::<Sized>(json!({ "bytes": [1] })).is_err());
    }
}
