//! Session identity stored under the session key.

use core::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of the logged-in user.
///
/// The login backend has used both numeric and string ids over time, so both
/// are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserKey {
    /// Numeric database id.
    Number(i64),
    /// Opaque string id.
    Text(String),
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The record describing the currently authenticated user.
///
/// Absence of a record (not an empty record) means "anonymous". Several
/// alternative fields can mark an administrator; see
/// [`classify`](crate::classify) for how they are read.
///
/// Fields this type does not model are kept in [`extra`](Self::extra) so that
/// rewriting the record (for example after a profile edit) never drops data
/// the login module stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// User identifier.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub id: Option<UserKey>,
    /// Name shown in the login button and account page.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Login name.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub username: Option<String>,
    /// Role marker (English field name).
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub role: Option<String>,
    /// Role marker (legacy field name).
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub rol: Option<String>,
    /// Account type marker.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub tipo: Option<String>,
    /// Explicit administrator flag. Only a JSON `true` counts.
    #[serde(
        default,
        rename = "isAdmin",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub is_admin: Option<bool>,
    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionIdentity {
    /// Create an identity for `username` with no role markers.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// The name to show for this user: display name, then username.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.username.as_deref())
    }
}

/// Deserialize a field, treating a value of the wrong JSON type as absent.
///
/// The record is written by code outside this crate; a stray `"isAdmin":
/// "yes"` must not make the whole session unreadable.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
