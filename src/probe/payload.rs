//! Decoded upstream payloads and live-indicator detection.
//!
//! Upstream responses vary in shape, so the payload is modelled as a
//! partial record where every field is optional. Detection walks a fixed
//! list of scopes and, within each scope, a fixed list of fields. The first
//! truthy signal wins; when none is found the user is reported offline.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `liveRoom.status` value meaning "currently streaming".
pub const ROOM_STATUS_LIVE: i64 = 2;

/// Partial view of an upstream response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LivePayload {
    #[serde(rename = "userInfo", default, deserialize_with = "lenient")]
    pub user_info: Option<LiveFields>,

    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<LiveFields>,

    /// Root-level fields, including a root `user` object.
    #[serde(flatten)]
    pub root: LiveFields,
}

/// Fields that may carry a live signal at any nesting level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveFields {
    #[serde(rename = "roomId")]
    pub room_id_camel: Option<Value>,

    pub room_id: Option<Value>,

    #[serde(rename = "isLive")]
    pub is_live_camel: Option<Value>,

    pub is_live: Option<Value>,

    #[serde(rename = "liveRoom", default, deserialize_with = "lenient")]
    pub live_room: Option<LiveRoom>,

    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<Box<LiveFields>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveRoom {
    pub status: Option<Value>,
}

/// A nested field of the wrong shape becomes `None` instead of failing its
/// parent, so well-formed siblings still count.
fn lenient<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

type Extractor = fn(&LiveFields) -> Option<bool>;

/// Live indicators in priority order.
pub const LIVE_FIELDS: &[(&str, Extractor)] = &[
    ("roomId", room_id_camel),
    ("room_id", room_id),
    ("isLive", is_live_camel),
    ("is_live", is_live),
    ("liveRoom.status", live_room_status),
];

fn room_id_camel(f: &LiveFields) -> Option<bool> {
    f.room_id_camel.as_ref().map(room_id_truthy)
}

fn room_id(f: &LiveFields) -> Option<bool> {
    f.room_id.as_ref().map(room_id_truthy)
}

fn is_live_camel(f: &LiveFields) -> Option<bool> {
    f.is_live_camel.as_ref().map(flag_truthy)
}

fn is_live(f: &LiveFields) -> Option<bool> {
    f.is_live.as_ref().map(flag_truthy)
}

fn live_room_status(f: &LiveFields) -> Option<bool> {
    f.live_room
        .as_ref()
        .and_then(|room| room.status.as_ref())
        .map(|status| status.as_i64() == Some(ROOM_STATUS_LIVE))
}

/// Result of running the detection table over a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub is_live: bool,
    /// Dotted path of the field that produced the signal.
    pub matched_field: Option<String>,
}

impl LivePayload {
    /// Decode a JSON value, degrading to the empty record when the shape
    /// does not fit.
    pub fn from_value(value: &Value) -> Self {
        LivePayload::deserialize(value).unwrap_or_default()
    }

    /// Scopes searched for live indicators, most specific first.
    fn scopes(&self) -> Vec<(&'static str, &LiveFields)> {
        let mut scopes = Vec::with_capacity(6);
        if let Some(user_info) = &self.user_info {
            if let Some(user) = &user_info.user {
                scopes.push(("userInfo.user", user.as_ref()));
            }
            scopes.push(("userInfo", user_info));
        }
        if let Some(user) = &self.root.user {
            scopes.push(("user", user.as_ref()));
        }
        if let Some(data) = &self.data {
            if let Some(user) = &data.user {
                scopes.push(("data.user", user.as_ref()));
            }
            scopes.push(("data", data));
        }
        scopes.push(("", &self.root));
        scopes
    }

    pub fn detect(&self) -> Detection {
        for (scope, fields) in self.scopes() {
            for (name, extract) in LIVE_FIELDS {
                if extract(fields) == Some(true) {
                    let matched = if scope.is_empty() {
                        name.to_string()
                    } else {
                        format!("{}.{}", scope, name)
                    };
                    return Detection {
                        is_live: true,
                        matched_field: Some(matched),
                    };
                }
            }
        }

        // Absent fields and explicit "offline" are reported the same way.
        Detection {
            is_live: false,
            matched_field: None,
        }
    }
}

fn room_id_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && s != "0"
        }
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn flag_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detect(value: Value) -> Detection {
        LivePayload::from_value(&value).detect()
    }

    #[test]
    fn test_root_room_id_is_live() {
        let d = detect(json!({"roomId": "123"}));
        assert!(d.is_live);
        assert_eq!(d.matched_field.as_deref(), Some("roomId"));
    }

    #[test]
    fn test_no_known_fields_is_offline() {
        let d = detect(json!({"nickname": "alice", "followers": 10}));
        assert!(!d.is_live);
        assert_eq!(d.matched_field, None);
    }

    #[test]
    fn test_nested_user_info_room_id() {
        let d = detect(json!({"userInfo": {"user": {"roomId": "7300000000"}}}));
        assert!(d.is_live);
        assert_eq!(d.matched_field.as_deref(), Some("userInfo.user.roomId"));
    }

    #[test]
    fn test_empty_room_id_is_not_a_signal() {
        let d = detect(json!({"userInfo": {"user": {"roomId": ""}}}));
        assert!(!d.is_live);

        let d = detect(json!({"user": {"room_id": "0", "is_live": true}}));
        assert!(d.is_live);
        assert_eq!(d.matched_field.as_deref(), Some("user.is_live"));
    }

    #[test]
    fn test_priority_within_scope() {
        let d = detect(json!({"data": {"isLive": true, "room_id": 42}}));
        assert_eq!(d.matched_field.as_deref(), Some("data.room_id"));
    }

    #[test]
    fn test_more_specific_scope_wins() {
        let d = detect(json!({"isLive": true, "user": {"isLive": true}}));
        assert_eq!(d.matched_field.as_deref(), Some("user.isLive"));
    }

    #[test]
    fn test_flag_variants() {
        assert!(detect(json!({"is_live": "true"})).is_live);
        assert!(detect(json!({"is_live": 1})).is_live);
        assert!(!detect(json!({"is_live": false})).is_live);
        assert!(!detect(json!({"is_live": null})).is_live);
    }

    #[test]
    fn test_live_room_status() {
        let d = detect(json!({"data": {"user": {"roomId": "0"}, "liveRoom": {"status": 2}}}));
        assert!(d.is_live);
        assert_eq!(d.matched_field.as_deref(), Some("data.liveRoom.status"));

        assert!(!detect(json!({"data": {"liveRoom": {"status": 4}}})).is_live);
    }

    #[test]
    fn test_unexpected_shape_degrades_to_offline() {
        assert!(!detect(json!([1, 2, 3])).is_live);
        assert!(!detect(json!({"userInfo": "not an object"})).is_live);
    }

    #[test]
    fn test_mistyped_sibling_keeps_valid_signal() {
        let d = detect(json!({"roomId": "123", "data": []}));
        assert!(d.is_live);
        assert_eq!(d.matched_field.as_deref(), Some("roomId"));

        let d = detect(json!({"userInfo": {"user": {"roomId": "7300"}}, "user": "x"}));
        assert!(d.is_live);
        assert_eq!(d.matched_field.as_deref(), Some("userInfo.user.roomId"));

        let d = detect(json!({"data": {"liveRoom": "gone", "user": {"isLive": true}}}));
        assert!(d.is_live);
        assert_eq!(d.matched_field.as_deref(), Some("data.user.isLive"));
    }

    #[test]
    fn test_mistyped_field_alone_is_offline() {
        let payload = LivePayload::from_value(&json!({"userInfo": 5, "liveRoom": [1]}));
        assert!(payload.user_info.is_none());
        assert!(payload.root.live_room.is_none());
        assert!(!payload.detect().is_live);
    }
}
