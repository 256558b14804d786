use crate::api::models::{RawMapRotation, RawPlayerStats, RawRank};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Tracker key holding a legend's kill count.
const KILLS_KEY: &str = "kills";

/// Aggregate pseudo-legend in `legends.all`; not a playable legend.
const GLOBAL_LEGEND: &str = "Global";

#[derive(Debug, Clone, PartialEq)]
pub struct MapRotation {
    pub current_map: String,
    pub current_duration_minutes: f64,
    pub current_remaining_minutes: f64,
    pub next_map: String,
    pub next_duration_minutes: f64,
    /// Start of the next rotation, as reported upstream.
    pub next_start: f64,
    /// When the response was received; exported as the last-success time.
    pub fetched_at: DateTime<Utc>,
}

impl From<RawMapRotation> for MapRotation {
    fn from(raw: RawMapRotation) -> Self {
        Self {
            current_map: raw.current.map,
            current_duration_minutes: raw.current.duration_in_minutes,
            current_remaining_minutes: raw.current.remaining_mins,
            next_map: raw.next.map,
            next_duration_minutes: raw.next.duration_in_minutes,
            next_start: raw.next.start,
            fetched_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankInfo {
    pub name: String,
    pub score: f64,
    pub division: f64,
}

impl From<RawRank> for RankInfo {
    fn from(raw: RawRank) -> Self {
        Self {
            name: raw.rank_name,
            score: raw.rank_score,
            division: raw.rank_div,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub identifier: String,
    pub platform: String,
    pub level: f64,
    pub next_level_percentage: f64,
    pub banned: bool,
    pub ban_duration_seconds: f64,

    pub br_rank: RankInfo,
    pub arena_rank: RankInfo,

    pub battle_pass_level: f64,
    pub battle_pass_history: f64,

    pub lobby_state: String,
    pub is_online: bool,
    pub is_in_game: bool,
    pub party_full: bool,
    pub selected_legend: String,
    pub current_state: String,

    pub active_legend: String,
    pub active_legend_kills: f64,
    /// Kills per legend; legends without a kills tracker or with zero kills
    /// are left out.
    pub legend_kills: BTreeMap<String, f64>,

    pub kills: f64,
    pub kill_death_ratio: f64,

    pub cluster_server: String,
    pub processing_time_ms: f64,
    pub fetched_at: DateTime<Utc>,
}

impl From<RawPlayerStats> for PlayerStats {
    fn from(raw: RawPlayerStats) -> Self {
        let global = raw.global;
        let realtime = raw.realtime;

        let active_legend_kills = raw
            .legends
            .selected
            .data
            .first()
            .map(|tracker| tracker.value)
            .unwrap_or(0.0);

        let legend_kills = raw
            .legends
            .all
            .into_iter()
            .filter(|(name, _)| name != GLOBAL_LEGEND)
            .filter_map(|(name, entry)| {
                let kills = entry
                    .data?
                    .iter()
                    .find(|tracker| tracker.key == KILLS_KEY)
                    .map(|tracker| tracker.value)
                    .unwrap_or(0.0);
                (kills != 0.0).then_some((name, kills))
            })
            .collect();

        Self {
            identifier: global.name,
            platform: global.platform,
            level: global.level,
            next_level_percentage: global.to_next_level_percent,
            banned: global.bans.is_active,
            ban_duration_seconds: global.bans.remaining_seconds,
            br_rank: global.rank.into(),
            arena_rank: global.arena.into(),
            battle_pass_level: global.battlepass.level,
            battle_pass_history: global.battlepass.history,
            lobby_state: realtime.lobby_state,
            is_online: realtime.is_online,
            is_in_game: realtime.is_in_game,
            party_full: realtime.party_full,
            selected_legend: realtime.selected_legend,
            current_state: realtime.current_state,
            active_legend: raw.legends.selected.legend_name,
            active_legend_kills,
            legend_kills,
            kills: raw.total.kills.map(|k| k.value).unwrap_or(0.0),
            kill_death_ratio: raw.total.kd.map(|kd| kd.value).unwrap_or(0.0),
            cluster_server: raw.internal.cluster_srv,
            processing_time_ms: raw.processing_time,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legend_kills_filtering() {
        let raw: RawPlayerStats = serde_json::from_value(json!({
            "legends": {
                "selected": { "LegendName": "Wraith", "data": [] },
                "all": {
                    "Global": { "data": [{ "key": "kills", "value": 999 }] },
                    "Wraith": { "data": [
                        { "key": "damage", "value": 10 },
                        { "key": "kills", "value": 42 }
                    ] },
                    "Bloodhound": { "data": [{ "key": "kills", "value": 0 }] },
                    "Lifeline": { "data": [{ "key": "wins", "value": 3 }] },
                    "Pathfinder": { "ImgAssets": {} }
                }
            }
        }))
        .unwrap();

        let stats = PlayerStats::from(raw);

        assert_eq!(stats.active_legend, "Wraith");
        assert_eq!(stats.active_legend_kills, 0.0);
        assert_eq!(stats.legend_kills.len(), 1);
        assert_eq!(stats.legend_kills.get("Wraith"), Some(&42.0));
    }

    #[test]
    fn test_totals_default_to_zero() {
        let stats = PlayerStats::from(RawPlayerStats::default());
        assert_eq!(stats.kills, 0.0);
        assert_eq!(stats.kill_death_ratio, 0.0);
        assert!(stats.legend_kills.is_empty());
    }
}
