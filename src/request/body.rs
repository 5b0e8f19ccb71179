//! Decoded request body

use indexmap::IndexMap;
use serde_json::Value;

/// Request body, decoded according to `Content-Type`
///
/// Callers match on the variant: a JSON body may be an object, an array or
/// a scalar, so there is no single mapping view of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// `text/plain` or `application/x-www-form-urlencoded` pairs
    Form(IndexMap<String, String>),
    /// `application/json` document
    Json(Value),
    /// Missing, unsupported or undecoded content type
    #[default]
    Empty,
}

impl Body {
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn as_form(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Self::Form(fields) => Some(fields),
            _ => None,
        }
    }

    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Form field by name; `None` for non-form bodies
    pub fn field(&self, name: &str) -> Option<&str> {
        self.as_form()?.get(name).map(String::as_str)
    }

    /// JSON view of the body (form fields become a string object, empty becomes `{}`)
    pub fn to_json(&self) -> Value {
        match self {
            Self::Form(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            Self::Json(value) => value.clone(),
            Self::Empty => Value::Object(serde_json::Map::new()),
        }
    }
}

/// File part of a multipart upload
///
/// Multipart decoding is not implemented: [`Request::files`](super::Request::files)
/// is always empty and the parser logs a warning when such a body arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_access() {
        let mut fields = IndexMap::new();
        fields.insert("a".to_string(), "1".to_string());
        let body = Body::Form(fields);
        assert_eq!(body.field("a"), Some("1"));
        assert_eq!(body.field("b"), None);
        assert!(body.as_json().is_none());
        assert_eq!(body.to_json(), json!({"a": "1"}));
    }

    #[test]
    fn test_json_access() {
        let body = Body::Json(json!([1, 2]));
        assert!(body.as_form().is_none());
        assert_eq!(body.field("a"), None);
        assert_eq!(body.as_json(), Some(&json!([1, 2])));
    }

    #[test]
    fn test_empty() {
        assert!(Body::default().is_empty());
        assert_eq!(Body::Empty.to_json(), json!({}));
    }
}
