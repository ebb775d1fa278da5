//! Identifiers of backend entities

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The identifier of a reservation, a location or a room, as assigned by the backend.
///
/// Backends may use integers or strings for their ids. Both are accepted. Ids that read as integers are serialized as JSON numbers, others as strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    content: String,
}

pub type ReservationId = EntityId;
pub type LocationId = EntityId;
pub type RoomId = EntityId;

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    fn as_integer(&self) -> Option<i64> {
        self.content.parse().ok()
    }
}

impl From<String> for EntityId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for EntityId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self { content: value.to_string() }
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_integer() {
            Some(value) => serializer.serialize_i64(value),
            None => serializer.serialize_str(&self.content),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Integer(i64),
    Text(String),
}

/// Used to support serde
impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<EntityId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let content = match RawId::deserialize(deserializer)? {
            RawId::Integer(value) => value.to_string(),
            RawId::Text(text) => text,
        };
        Ok(EntityId{ content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_stay_integers() {
        let id: EntityId = serde_json::from_str("42").unwrap();
        assert_eq!(id, EntityId::from(42i64));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn text_ids_stay_text() {
        let id: EntityId = serde_json::from_str(r#""6f1c-aa""#).unwrap();
        assert_eq!(id.as_str(), "6f1c-aa");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""6f1c-aa""#);
    }
}
