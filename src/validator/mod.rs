//! A strict, path-carrying cursor over parsed JSON.
//!
//! Every raw archive value is walked through a [`Validator`], which pairs a
//! borrowed `serde_json::Value` with the textual path locating it in the
//! document (filename included). The narrowing accessors either return the
//! narrowed value or fail with a [`ValidationError`] naming the expected
//! type and the offending path. Object access takes an explicit allow-list
//! of keys, so any unknown field anywhere in a post fails validation instead
//! of silently passing through.
//!
//! The cursor is read-only; it never mutates the underlying document.

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// A borrowed JSON value plus the path locating it within its document.
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Validator<'a> {
    /// Wrap the root value of a document. The filename becomes the leading
    /// component of every path reported from this cursor.
    pub fn new(value: &'a Value, filename: &str) -> Self {
        Validator { value, path: filename.to_string() }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Build a validation error for the current value.
    pub fn invalid(&self, message: impl Into<String>) -> ValidationError {
        ValidationError { path: self.path.clone(), message: message.into() }
    }

    pub fn to_str(&self) -> Result<&'a str, ValidationError> {
        self.value.as_str().ok_or_else(|| self.invalid("is not a string"))
    }

    pub fn to_integer(&self) -> Result<i64, ValidationError> {
        self.value.as_i64().ok_or_else(|| self.invalid("is not an integer"))
    }

    pub fn to_float(&self) -> Result<f64, ValidationError> {
        self.value.as_f64().ok_or_else(|| self.invalid("is neither integer nor float"))
    }

    /// Narrow to a list, yielding each element as a path-qualified cursor.
    pub fn to_list(&self) -> Result<Vec<Validator<'a>>, ValidationError> {
        let items = self.value.as_array().ok_or_else(|| self.invalid("is not a list"))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(index, item)| Validator { value: item, path: format!("{}[{index}]", self.path) })
            .collect())
    }

    /// Narrow to an object whose keys all appear in `valid_keys`.
    pub fn to_object(&self, valid_keys: &[&str]) -> Result<ObjectValidator<'a>, ValidationError> {
        let map = self.value.as_object().ok_or_else(|| self.invalid("is not an object"))?;
        for key in map.keys() {
            if !valid_keys.contains(&key.as_str()) {
                return Err(self.invalid(format!("contains unexpected field {key}")));
            }
        }
        Ok(ObjectValidator { map, path: self.path.clone() })
    }

    /// Narrow to an object with exactly one field, returning the field's name
    /// along with a cursor positioned at its value.
    pub fn to_singleton_object(
        &self,
        valid_keys: &[&str],
    ) -> Result<(&'a str, Validator<'a>), ValidationError> {
        let object = self.to_object(valid_keys)?;
        if object.map.len() != 1 {
            return Err(self.invalid("is not an object with a single field"));
        }
        let (key, value) = object.map.iter().next().unwrap();
        Ok((key, Validator { value, path: join_key(&self.path, key) }))
    }
}

/// An object narrowed by [`Validator::to_object`], with keyed field access.
#[derive(Debug, Clone)]
pub struct ObjectValidator<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> ObjectValidator<'a> {
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Access a field that must be present.
    pub fn required(&self, key: &str) -> Result<Validator<'a>, ValidationError> {
        self.optional(key).ok_or_else(|| ValidationError {
            path: self.path.clone(),
            message: format!("is missing required field {key}"),
        })
    }

    /// Access a field that may be absent.
    pub fn optional(&self, key: &str) -> Option<Validator<'a>> {
        self.map
            .get(key)
            .map(|value| Validator { value, path: join_key(&self.path, key) })
    }
}

/// Append an object key to a path: `.key` for identifier-like keys, a quoted
/// index expression otherwise.
fn join_key(path: &str, key: &str) -> String {
    let mut chars = key.chars();
    let identifier_like = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if identifier_like {
        format!("{path}.{key}")
    } else {
        format!("{path}[{key:?}]")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_narrowing_success() {
        let value = json!({"name": "x", "count": 3, "ratio": 1.5, "items": [1, 2]});
        let data = Validator::new(&value, "doc");
        let object = data.to_object(&["name", "count", "ratio", "items"]).unwrap();

        assert_eq!(object.required("name").unwrap().to_str().unwrap(), "x");
        assert_eq!(object.required("count").unwrap().to_integer().unwrap(), 3);
        assert_eq!(object.required("ratio").unwrap().to_float().unwrap(), 1.5);
        // to_float accepts integers as well.
        assert_eq!(object.required("count").unwrap().to_float().unwrap(), 3.0);
        assert_eq!(object.required("items").unwrap().to_list().unwrap().len(), 2);
        assert!(object.optional("missing").is_none());
    }

    #[test]
    fn test_wrong_type_names_path() {
        let value = json!({"outer": {"timestamp": "665"}});
        let data = Validator::new(&value, "doc");
        let outer = data.to_object(&["outer"]).unwrap().required("outer").unwrap();
        let err = outer.to_object(&["timestamp"]).unwrap().required("timestamp").unwrap()
            .to_integer()
            .unwrap_err();
        assert_eq!(err.to_string(), "doc.outer.timestamp is not an integer");
    }

    #[test]
    fn test_unexpected_field_rejected() {
        let value = json!({"answer": 42});
        let data = Validator::new(&value, "doc");
        let err = data.to_object(&["question"]).unwrap_err();
        assert_eq!(err.to_string(), "doc contains unexpected field answer");
    }

    #[test]
    fn test_missing_required_field() {
        let value = json!({});
        let data = Validator::new(&value, "doc");
        let err = data.to_object(&["latitude"]).unwrap().required("latitude").unwrap_err();
        assert_eq!(err.to_string(), "doc is missing required field latitude");
    }

    #[test]
    fn test_list_elements_are_path_qualified() {
        let value = json!([{"a": 1}, "nope"]);
        let data = Validator::new(&value, "doc");
        let items = data.to_list().unwrap();
        let err = items[1].to_object(&["a"]).unwrap_err();
        assert_eq!(err.to_string(), "doc[1] is not an object");
    }

    #[test]
    fn test_singleton_object() {
        let value = json!({"media": {"uri": "photo.jpg"}});
        let data = Validator::new(&value, "doc");
        let (key, inner) = data.to_singleton_object(&["media", "place"]).unwrap();
        assert_eq!(key, "media");
        assert_eq!(inner.path(), "doc.media");

        let two = json!({"media": 1, "place": 2});
        let err = Validator::new(&two, "doc").to_singleton_object(&["media", "place"]).unwrap_err();
        assert_eq!(err.to_string(), "doc is not an object with a single field");
    }

    #[test]
    fn test_non_identifier_key_quoted_in_path() {
        let value = json!({"weird key": 1});
        let data = Validator::new(&value, "doc");
        let (_, inner) = data.to_singleton_object(&["weird key"]).unwrap();
        assert_eq!(inner.path(), "doc[\"weird key\"]");
    }
}
