//! User profile model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// User profile as returned by the backend
///
/// Only `id`, `username` and `email` are interpreted; every other field is
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Overlay the given fields on this profile
    pub fn merged_with(&self, fields: &Map<String, Value>) -> Result<User, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(object) = &mut value {
            for (key, field) in fields {
                object.insert(key.clone(), field.clone());
            }
        }
        serde_json::from_value(value)
    }

    /// Extract a profile from a response body shaped either `{user: {...}}` or `{...}`
    pub fn from_response(body: Value) -> Result<User, serde_json::Error> {
        match body {
            Value::Object(mut object) if matches!(object.get("user"), Some(Value::Object(_))) => {
                serde_json::from_value(object.remove("user").unwrap_or(Value::Null))
            }
            other => serde_json::from_value(other),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
