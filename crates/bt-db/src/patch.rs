//! Tri-state field presence for partial updates
//!
//! A partial update payload has to distinguish a field that was omitted
//! (leave the column alone) from one that was explicitly set to `null`
//! (clear the column). `Option<T>` collapses those two cases, so nullable
//! columns use [`Patch`] instead.

use serde::{Deserialize, Deserializer};

/// Presence of one nullable field in a partial update payload.
///
/// With `#[serde(default)]` on the field, a missing key deserializes to
/// `Absent`, an explicit `null` to `Null`, and a value to `Value(v)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key not present in the payload; leave the column untouched
    #[default]
    Absent,
    /// Key present as `null`; clear the column
    Null,
    /// Key present with a value; set the column
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// The value to bind when the field is present: `Some(None)` clears,
    /// `Some(Some(v))` sets, `None` means skip the column entirely.
    pub fn as_update(&self) -> Option<Option<&T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default)]
        description: Patch<String>,
    }

    #[test]
    fn test_missing_key_is_absent() {
        let p: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(p.description, Patch::Absent);
        assert!(p.description.is_absent());
    }

    #[test]
    fn test_explicit_null() {
        let p: Payload = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(p.description, Patch::Null);
        assert_eq!(p.description.as_update(), Some(None));
    }

    #[test]
    fn test_value() {
        let p: Payload = serde_json::from_str(r#"{"description": "broken"}"#).unwrap();
        assert_eq!(p.description, Patch::Value("broken".to_string()));
        assert_eq!(
            p.description.as_update(),
            Some(Some(&"broken".to_string()))
        );
    }
}
