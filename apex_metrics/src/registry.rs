use crate::{error::Result, info::InfoMetric, poll::PollMetrics};
use apex_core::{MapRotation, PlayerStats};
use prometheus::{Gauge, GaugeVec, Opts, Registry};
use tracing::debug;

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<Gauge> {
    let gauge = Gauge::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

struct MapMetrics {
    current_map: InfoMetric,
    current_duration: Gauge,
    current_remaining: Gauge,
    next_map: InfoMetric,
    next_start: Gauge,
    next_duration: Gauge,
}

impl MapMetrics {
    fn register(registry: &Registry) -> Result<Self> {
        Ok(Self {
            current_map: InfoMetric::register(
                registry,
                "apex_current_map_info",
                "Name of the current map",
                "map_name",
            )?,
            current_duration: gauge(
                registry,
                "apex_current_map_duration_total",
                "Duration of the current map in minutes",
            )?,
            current_remaining: gauge(
                registry,
                "apex_current_map_remaining_total",
                "Time remaining of the current map in minutes",
            )?,
            next_map: InfoMetric::register(
                registry,
                "apex_next_map_info",
                "Name of the next map",
                "next_map_name",
            )?,
            next_start: gauge(
                registry,
                "apex_next_map_start_total",
                "Start time of the next map",
            )?,
            next_duration: gauge(
                registry,
                "apex_next_map_duration_minutes",
                "Duration of the next map in minutes",
            )?,
        })
    }
}

struct PlayerMetrics {
    identifier: InfoMetric,
    platform: InfoMetric,
    level: Gauge,
    next_level_percentage: Gauge,
    banned: InfoMetric,
    ban_duration: Gauge,
    br_rank_name: InfoMetric,
    br_rank_score: Gauge,
    br_rank_div: Gauge,
    arena_rank_name: InfoMetric,
    arena_rank_score: Gauge,
    arena_rank_div: Gauge,
    battle_pass_level: Gauge,
    battle_pass_history: Gauge,
    lobby_state: InfoMetric,
    is_online: Gauge,
    is_in_game: Gauge,
    party_full: InfoMetric,
    selected_legend: InfoMetric,
    active_legend: InfoMetric,
    active_legend_kills: Gauge,
    current_state: InfoMetric,
    legend_kills: GaugeVec,
    kills: Gauge,
    kill_death_ratio: Gauge,
    cluster_server: InfoMetric,
    processing_time: Gauge,
}

impl PlayerMetrics {
    fn register(registry: &Registry) -> Result<Self> {
        let legend_kills = GaugeVec::new(
            Opts::new("player_legend_kills", "Total kills for each legend"),
            &["legend_name"],
        )?;
        registry.register(Box::new(legend_kills.clone()))?;

        Ok(Self {
            identifier: InfoMetric::register(
                registry,
                "apex_player_identifier_info",
                "Name of the player",
                "player_identifier",
            )?,
            platform: InfoMetric::register(
                registry,
                "player_platform_info",
                "Platform of the player",
                "platform",
            )?,
            level: gauge(registry, "player_level", "Level of the player")?,
            next_level_percentage: gauge(
                registry,
                "player_next_level_percentage",
                "Next level percentage of the player",
            )?,
            banned: InfoMetric::register(
                registry,
                "player_banned_info",
                "Is the player banned",
                "banned",
            )?,
            ban_duration: gauge(
                registry,
                "player_ban_duration",
                "Ban duration of the player",
            )?,
            br_rank_name: InfoMetric::register(
                registry,
                "player_br_rank_name_info",
                "BR Rank Name of the player",
                "br_rank_name",
            )?,
            br_rank_score: gauge(
                registry,
                "player_br_rank_score",
                "BR Rank Score of the player",
            )?,
            br_rank_div: gauge(
                registry,
                "player_br_rank_div",
                "BR Rank Division of the player",
            )?,
            arena_rank_name: InfoMetric::register(
                registry,
                "player_arena_rank_name_info",
                "Arena Rank Name of the player",
                "arena_rank_name",
            )?,
            arena_rank_score: gauge(
                registry,
                "player_arena_rank_score",
                "Arena Rank Score of the player",
            )?,
            arena_rank_div: gauge(
                registry,
                "player_arena_rank_div",
                "Arena Rank Division of the player",
            )?,
            battle_pass_level: gauge(
                registry,
                "player_battle_pass_level",
                "Battle Pass Level of the player",
            )?,
            battle_pass_history: gauge(
                registry,
                "player_battle_pass_history",
                "Battle Pass History of the player",
            )?,
            lobby_state: InfoMetric::register(
                registry,
                "player_lobby_state_info",
                "Lobby state of the player",
                "lobby_state",
            )?,
            is_online: gauge(registry, "player_is_online", "Is the player online")?,
            is_in_game: gauge(registry, "player_is_in_game", "Is the player in a game")?,
            party_full: InfoMetric::register(
                registry,
                "player_party_full_info",
                "Is the player in a party",
                "party_full",
            )?,
            selected_legend: InfoMetric::register(
                registry,
                "player_selected_legend_info",
                "Name of the selected legend",
                "selected_legend",
            )?,
            active_legend: InfoMetric::register(
                registry,
                "player_active_legend_info",
                "Name of the active legend",
                "active_legend",
            )?,
            active_legend_kills: gauge(
                registry,
                "player_active_legend_kills",
                "Total kills of the active legend",
            )?,
            current_state: InfoMetric::register(
                registry,
                "player_current_state_info",
                "Current state of the player",
                "current_state",
            )?,
            legend_kills,
            kills: gauge(registry, "player_kills_total", "Total kills of the player")?,
            kill_death_ratio: gauge(
                registry,
                "player_kill_death_ratio",
                "Kill/Death Ratio of the player",
            )?,
            cluster_server: InfoMetric::register(
                registry,
                "player_mozambique_cluster_server_info",
                "Cluster name presenting API",
                "mozambique_cluster_server",
            )?,
            processing_time: gauge(
                registry,
                "player_processing_time",
                "API Processing Time in milliseconds",
            )?,
        })
    }
}

/// Every metric the exporter publishes, on a private registry.
pub struct ApexMetrics {
    registry: Registry,
    map: MapMetrics,
    player: PlayerMetrics,
    poll: PollMetrics,
}

impl ApexMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let map = MapMetrics::register(&registry)?;
        let player = PlayerMetrics::register(&registry)?;
        let poll = PollMetrics::register(&registry)?;

        Ok(Self {
            registry,
            map,
            player,
            poll,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn poll(&self) -> &PollMetrics {
        &self.poll
    }

    pub fn apply_map_rotation(&self, rotation: &MapRotation) {
        let m = &self.map;
        m.current_map.set(&rotation.current_map);
        m.current_duration.set(rotation.current_duration_minutes);
        m.current_remaining.set(rotation.current_remaining_minutes);
        m.next_map.set(&rotation.next_map);
        m.next_duration.set(rotation.next_duration_minutes);
        m.next_start.set(rotation.next_start);

        debug!(
            current = %rotation.current_map,
            next = %rotation.next_map,
            "Applied map rotation"
        );
    }

    pub fn apply_player_stats(&self, stats: &PlayerStats) {
        let m = &self.player;
        m.identifier.set(&stats.identifier);
        m.platform.set(&stats.platform);
        m.level.set(stats.level);
        m.next_level_percentage.set(stats.next_level_percentage);
        m.banned.set_bool(stats.banned);
        m.ban_duration.set(stats.ban_duration_seconds);

        m.br_rank_name.set(&stats.br_rank.name);
        m.br_rank_score.set(stats.br_rank.score);
        m.br_rank_div.set(stats.br_rank.division);
        m.arena_rank_name.set(&stats.arena_rank.name);
        m.arena_rank_score.set(stats.arena_rank.score);
        m.arena_rank_div.set(stats.arena_rank.division);

        m.battle_pass_level.set(stats.battle_pass_level);
        m.battle_pass_history.set(stats.battle_pass_history);

        m.lobby_state.set(&stats.lobby_state);
        m.is_online.set(flag(stats.is_online));
        m.is_in_game.set(flag(stats.is_in_game));
        m.party_full.set_bool(stats.party_full);
        m.selected_legend.set(&stats.selected_legend);
        m.active_legend.set(&stats.active_legend);
        m.active_legend_kills.set(stats.active_legend_kills);
        m.current_state.set(&stats.current_state);

        m.legend_kills.reset();
        for (legend, kills) in &stats.legend_kills {
            m.legend_kills.with_label_values(&[legend.as_str()]).set(*kills);
        }

        m.kills.set(stats.kills);
        m.kill_death_ratio.set(stats.kill_death_ratio);
        m.cluster_server.set(&stats.cluster_server);
        m.processing_time.set(stats.processing_time_ms);

        debug!(
            player = %stats.identifier,
            level = stats.level,
            legends = stats.legend_kills.len(),
            "Applied player stats"
        );
    }
}
