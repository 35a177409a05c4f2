//! Custom deserializers for query-string coercion.
//!
//! Filter and pagination fields arrive untyped. A recognized field is kept
//! only when the raw value passes coercion: strings must be non-empty after
//! trimming, integers must parse base-10. Anything else deserializes to
//! `None` — absent, not defaulted and not an error.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse::<i64>().ok()))
}

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse::<Uuid>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        score: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        id: Option<Uuid>,
    }

    #[test]
    fn test_empty_string_is_absent() {
        let probe: Probe = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert_eq!(probe.name, None);
    }

    #[test]
    fn test_whitespace_only_is_absent() {
        let probe: Probe = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert_eq!(probe.name, None);
    }

    #[test]
    fn test_string_is_trimmed() {
        let probe: Probe = serde_json::from_str(r#"{"name":" A "}"#).unwrap();
        assert_eq!(probe.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_integer_parses() {
        let probe: Probe = serde_json::from_str(r#"{"score":"42"}"#).unwrap();
        assert_eq!(probe.score, Some(42));

        let probe: Probe = serde_json::from_str(r#"{"score":"-3"}"#).unwrap();
        assert_eq!(probe.score, Some(-3));
    }

    #[test]
    fn test_unparsable_integer_is_absent_not_error() {
        let probe: Probe = serde_json::from_str(r#"{"score":"forty"}"#).unwrap();
        assert_eq!(probe.score, None);

        let probe: Probe = serde_json::from_str(r#"{"score":"4.5"}"#).unwrap();
        assert_eq!(probe.score, None);

        let probe: Probe = serde_json::from_str(r#"{"score":""}"#).unwrap();
        assert_eq!(probe.score, None);
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.name, None);
        assert_eq!(probe.score, None);
        assert_eq!(probe.id, None);
    }

    #[test]
    fn test_uuid_parses_or_absent() {
        let id = Uuid::new_v4();
        let probe: Probe =
            serde_json::from_str(&format!(r#"{{"id":"{}"}}"#, id)).unwrap();
        assert_eq!(probe.id, Some(id));

        let probe: Probe = serde_json::from_str(r#"{"id":"not-a-uuid"}"#).unwrap();
        assert_eq!(probe.id, None);
    }
}
