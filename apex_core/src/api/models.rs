//! Wire models for the stats API.
//!
//! The upstream service is loose about types: numbers arrive as strings,
//! flags as `0`/`1`, and optional sections as `null`. Every scalar here goes
//! through one of the lenient deserializers below so a single odd field never
//! fails a whole poll.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMapRotation {
    #[serde(default)]
    pub current: RawMapSlot,
    #[serde(default)]
    pub next: RawMapSlot,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMapSlot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub map: String,
    #[serde(rename = "DurationInMinutes", default, deserialize_with = "lenient_f64")]
    pub duration_in_minutes: f64,
    #[serde(rename = "remainingMins", default, deserialize_with = "lenient_f64")]
    pub remaining_mins: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub start: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayerStats {
    #[serde(default)]
    pub global: RawGlobal,
    #[serde(default)]
    pub realtime: RawRealtime,
    #[serde(default)]
    pub legends: RawLegends,
    #[serde(default)]
    pub total: RawTotal,
    #[serde(rename = "mozambiquehere_internal", default)]
    pub internal: RawInternal,
    #[serde(rename = "processingTime", default, deserialize_with = "lenient_f64")]
    pub processing_time: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGlobal {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub platform: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub level: f64,
    #[serde(rename = "toNextLevelPercent", default, deserialize_with = "lenient_f64")]
    pub to_next_level_percent: f64,
    #[serde(default)]
    pub bans: RawBans,
    #[serde(default)]
    pub rank: RawRank,
    #[serde(default)]
    pub arena: RawRank,
    #[serde(default)]
    pub battlepass: RawBattlePass,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBans {
    #[serde(rename = "isActive", default, deserialize_with = "lenient_bool")]
    pub is_active: bool,
    #[serde(rename = "remainingSeconds", default, deserialize_with = "lenient_f64")]
    pub remaining_seconds: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRank {
    #[serde(rename = "rankName", default, deserialize_with = "lenient_string")]
    pub rank_name: String,
    #[serde(rename = "rankScore", default, deserialize_with = "lenient_f64")]
    pub rank_score: f64,
    #[serde(rename = "rankDiv", default, deserialize_with = "lenient_f64")]
    pub rank_div: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBattlePass {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub level: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub history: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRealtime {
    #[serde(rename = "lobbyState", default, deserialize_with = "lenient_string")]
    pub lobby_state: String,
    #[serde(rename = "isOnline", default, deserialize_with = "lenient_bool")]
    pub is_online: bool,
    #[serde(rename = "isInGame", default, deserialize_with = "lenient_bool")]
    pub is_in_game: bool,
    #[serde(rename = "partyFull", default, deserialize_with = "lenient_bool")]
    pub party_full: bool,
    #[serde(rename = "selectedLegend", default, deserialize_with = "lenient_string")]
    pub selected_legend: String,
    #[serde(rename = "currentState", default, deserialize_with = "lenient_string")]
    pub current_state: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLegends {
    #[serde(default)]
    pub selected: RawSelectedLegend,
    #[serde(default)]
    pub all: BTreeMap<String, RawLegendEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSelectedLegend {
    #[serde(rename = "LegendName", default, deserialize_with = "lenient_string")]
    pub legend_name: String,
    #[serde(default, deserialize_with = "lenient_trackers")]
    pub data: Vec<RawTracker>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLegendEntry {
    /// `None` when the legend carries no tracker section at all.
    #[serde(default)]
    pub data: Option<Vec<RawTracker>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTracker {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTotal {
    #[serde(default)]
    pub kills: Option<RawTotalValue>,
    #[serde(default)]
    pub kd: Option<RawTotalValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTotalValue {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInternal {
    #[serde(rename = "clusterSrv", default, deserialize_with = "lenient_string")]
    pub cluster_srv: String,
}

/// Returns the message of an `{"Error": "..."}` payload, if that is what
/// the body is.
pub fn upstream_error(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    let message = obj.get("Error").or_else(|| obj.get("error"))?;
    Some(match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

// The selected legend's trackers are occasionally an object instead of a list.
fn lenient_trackers<'de, D>(deserializer: D) -> Result<Vec<RawTracker>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_scalars() {
        let raw: RawGlobal = serde_json::from_value(json!({
            "name": "Wraith",
            "platform": "PC",
            "level": "512",
            "toNextLevelPercent": null,
            "bans": { "isActive": 0, "remainingSeconds": "30" },
            "battlepass": { "level": "-1", "history": { "season1": 10 } }
        }))
        .unwrap();

        assert_eq!(raw.level, 512.0);
        assert_eq!(raw.to_next_level_percent, 0.0);
        assert!(!raw.bans.is_active);
        assert_eq!(raw.bans.remaining_seconds, 30.0);
        assert_eq!(raw.battlepass.level, -1.0);
        assert_eq!(raw.battlepass.history, 0.0);
        assert_eq!(raw.rank.rank_name, "");
    }

    #[test]
    fn test_realtime_flags() {
        let raw: RawRealtime = serde_json::from_value(json!({
            "lobbyState": "open",
            "isOnline": 1,
            "isInGame": false,
            "partyFull": "1",
            "selectedLegend": "Wraith",
            "currentState": "inLobby"
        }))
        .unwrap();

        assert!(raw.is_online);
        assert!(!raw.is_in_game);
        assert!(raw.party_full);
    }

    #[test]
    fn test_upstream_error_detection() {
        assert_eq!(
            upstream_error(&json!({ "Error": "Player not found" })),
            Some("Player not found".to_string())
        );
        assert_eq!(upstream_error(&json!({ "global": {} })), None);
        assert_eq!(upstream_error(&json!([1, 2])), None);
    }
}
