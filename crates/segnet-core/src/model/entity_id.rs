// ── Core identity type ──
//
// EntityId is the identifier carried by every stored entity. Stores
// assign auto-incrementing numeric ids; topology documents may carry
// free-form client-side ids that are only meaningful inside the document.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for a topology, node, link, rule or scenario.
///
/// Numeric ids sort before named ids, and numeric ids sort by value,
/// which is what the `lowest-id` tie-break relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawEntityId")]
pub enum EntityId {
    Numeric(u64),
    Named(String),
}

impl EntityId {
    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Named(_) => None,
        }
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(s) => Some(s),
            Self::Numeric(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Named(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Numeric(n) => serializer.serialize_u64(*n),
            Self::Named(s) => serializer.serialize_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.trim().parse::<u64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Named(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

/// Wire shape accepted for ids: a bare integer or any string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntityId {
    Numeric(u64),
    Text(String),
}

impl From<RawEntityId> for EntityId {
    fn from(raw: RawEntityId) -> Self {
        match raw {
            RawEntityId::Numeric(n) => Self::Numeric(n),
            RawEntityId::Text(s) => Self::from(s),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_numeric_string() {
        let id = EntityId::from("42");
        assert_eq!(id.as_numeric(), Some(42));
    }

    #[test]
    fn entity_id_from_named_string() {
        let id = EntityId::from("fw-edge");
        assert_eq!(id.as_named(), Some("fw-edge"));
    }

    #[test]
    fn entity_id_from_str() {
        let id: EntityId = "7".parse().unwrap();
        assert_eq!(id, EntityId::Numeric(7));
    }

    #[test]
    fn numeric_ids_sort_by_value_before_named() {
        let mut ids = vec![
            EntityId::from("b"),
            EntityId::from(10),
            EntityId::from(2),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![EntityId::from(2), EntityId::from(10), EntityId::from("b")]
        );
    }

    #[test]
    fn deserializes_integers_and_strings() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[3, "3", "edge"]"#).unwrap();
        assert_eq!(ids[0], EntityId::Numeric(3));
        assert_eq!(ids[1], EntityId::Numeric(3));
        assert_eq!(ids[2], EntityId::Named("edge".into()));
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&[EntityId::from(5), EntityId::from("x")]).unwrap();
        assert_eq!(json, r#"[5,"x"]"#);
    }
}
