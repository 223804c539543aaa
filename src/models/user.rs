// User record model and identifier

use chrono::{DateTime, Utc};
use serde::de::{Deserialize, Deserializer, Error as DeError};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque user identifier. Minted by the store layer as a UUIDv4 and carried
/// on the wire as 32 lowercase hex characters with no hyphens. Identifiers
/// in any other shape are rejected before a store lookup happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("user identifiers are 32-character hex strings")]
pub struct InvalidUserId;

impl UserId {
    pub const HEX_LEN: usize = 32;

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Strict parse: exactly 32 hex characters. Hyphenated or braced UUID
    /// renderings are not valid wire identifiers.
    pub fn parse_str(raw: &str) -> Result<Self, InvalidUserId> {
        if raw.len() != Self::HEX_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidUserId);
        }
        Uuid::try_parse(raw).map(Self).map_err(|_| InvalidUserId)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.simple())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        UserId::parse_str(&raw).map_err(D::Error::custom)
    }
}

/// Request-body shape shared by create and update. Deserialized only after
/// schema validation has passed, so every field is already known to be a
/// string of the right shape.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub enrolment_number: Option<String>,
}

/// A persisted user record. The identifier is assigned at construction and
/// never changes; `enrolment_number` is the only optional field and is
/// omitted from responses when absent.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolment_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(payload: UserPayload) -> Self {
        Self {
            id: UserId::generate(),
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            enrolment_number: payload.enrolment_number,
            created_at: Utc::now(),
        }
    }

    /// Full replace of the mutable fields. A field absent from the payload
    /// becomes absent on the record; nothing is merged.
    pub fn apply(&mut self, payload: UserPayload) {
        self.email = payload.email;
        self.first_name = payload.first_name;
        self.last_name = payload.last_name;
        self.enrolment_number = payload.enrolment_number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(email: &str) -> UserPayload {
        UserPayload {
            email: email.to_string(),
            first_name: "Bernard".to_string(),
            last_name: "Bernoulli".to_string(),
            enrolment_number: None,
        }
    }

    #[test]
    fn id_renders_as_32_hex_chars() {
        let id = UserId::generate();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), UserId::HEX_LEN);
        assert!(rendered.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(UserId::parse_str(&rendered), Ok(id));
    }

    #[test]
    fn id_parse_rejects_wrong_shapes() {
        assert!(UserId::parse_str("").is_err());
        assert!(UserId::parse_str("abc").is_err());
        assert!(UserId::parse_str("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        // hyphenated UUID rendering is 36 chars
        assert!(UserId::parse_str(&Uuid::new_v4().to_string()).is_err());
        // one short, one long
        assert!(UserId::parse_str(&"a".repeat(31)).is_err());
        assert!(UserId::parse_str(&"a".repeat(33)).is_err());
    }

    #[test]
    fn id_parse_accepts_uppercase_hex() {
        let rendered = UserId::generate().to_string().to_uppercase();
        assert!(UserId::parse_str(&rendered).is_ok());
    }

    #[test]
    fn user_serializes_with_underscore_id_field() {
        let user = User::new(payload("bernard@dot.com"));
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["_id"], json!(user.id.to_string()));
        assert_eq!(value["email"], json!("bernard@dot.com"));
        assert_eq!(value["firstName"], json!("Bernard"));
        assert!(value.get("id").is_none());
        // absent optional field is omitted entirely
        assert!(value.get("enrolmentNumber").is_none());
    }

    #[test]
    fn apply_replaces_all_mutable_fields() {
        let mut user = User::new(UserPayload {
            enrolment_number: Some("E-100".to_string()),
            ..payload("old@dot.com")
        });
        let id = user.id;

        user.apply(payload("new@dot.com"));

        assert_eq!(user.id, id);
        assert_eq!(user.email, "new@dot.com");
        // full replace: omitted optional field is cleared, not kept
        assert_eq!(user.enrolment_number, None);
    }

    #[test]
    fn user_round_trips_through_json() {
        let mut user = User::new(payload("bernard@dot.com"));
        user.enrolment_number = Some("E-42".to_string());

        let text = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&text).unwrap();

        assert_eq!(back.id, user.id);
        assert_eq!(back.enrolment_number.as_deref(), Some("E-42"));
    }
}
