use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of the signed-in user, always carried in its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets a raw JSON id. Falsy values (`""`, `0`, `false`, `null`)
    /// and non-scalars mean nobody is signed in.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The persisted `user` entry. Only `id` matters here; whatever else the
/// sign-in flow stored is kept untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Value,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

impl SessionUser {
    pub fn user_id(&self) -> Option<UserId> {
        UserId::from_json(&self.id)
    }
}
