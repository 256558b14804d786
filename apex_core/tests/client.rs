//! API client tests against a local mock of the stats API.

use apex_core::{ApexError, ApiClient, ExporterConfig, StatsSource};
use mockito::{Matcher, Server};

const BRIDGE: &str = include_str!("fixtures/bridge.json");
const MAP_ROTATION: &str = include_str!("fixtures/maprotation.json");

fn client_for(server: &Server, player_name: Option<&str>, user_id: Option<&str>) -> ApiClient {
    let config = ExporterConfig::builder()
        .api_key("test-key")
        .player_name(player_name.map(str::to_string))
        .user_id(user_id.map(str::to_string))
        .platform(Some("pc".to_string()))
        .api_base_url(server.url())
        .build()
        .expect("valid config");
    ApiClient::new(&config).expect("client")
}

#[tokio::test]
async fn test_fetch_player_stats_by_name() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/bridge")
        .match_header("authorization", "test-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("player_name".into(), "NeonRaider".into()),
            Matcher::UrlEncoded("platform".into(), "PC".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BRIDGE)
        .create_async()
        .await;

    let client = client_for(&server, Some("NeonRaider"), None);
    let stats = client.fetch_player_stats().await.unwrap();
    mock.assert_async().await;

    assert_eq!(stats.identifier, "NeonRaider");
    assert_eq!(stats.platform, "PC");
    assert_eq!(stats.level, 512.0);
    assert_eq!(stats.next_level_percentage, 37.0);
    assert!(!stats.banned);
    assert_eq!(stats.br_rank.name, "Platinum");
    assert_eq!(stats.br_rank.score, 9120.0);
    assert_eq!(stats.br_rank.division, 3.0);
    assert_eq!(stats.arena_rank.name, "Unranked");
    assert_eq!(stats.battle_pass_level, 72.0);
    assert_eq!(stats.battle_pass_history, 0.0);
    assert!(stats.is_online);
    assert!(!stats.is_in_game);
    assert!(!stats.party_full);
    assert_eq!(stats.lobby_state, "open");
    assert_eq!(stats.current_state, "inLobby");
    assert_eq!(stats.active_legend, "Wraith");
    assert_eq!(stats.active_legend_kills, 4211.0);
    assert_eq!(stats.legend_kills.len(), 2);
    assert_eq!(stats.legend_kills["Wraith"], 4211.0);
    assert_eq!(stats.legend_kills["Bloodhound"], 388.0);
    assert_eq!(stats.kills, 4599.0);
    assert_eq!(stats.kill_death_ratio, 1.87);
    assert_eq!(stats.cluster_server, "MAIN-SRV-3");
    assert_eq!(stats.processing_time_ms, 0.0412);
}

#[tokio::test]
async fn test_fetch_player_stats_by_uid() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/bridge")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("uid".into(), "1000836527372".into()),
            Matcher::UrlEncoded("platform".into(), "PC".into()),
        ]))
        .with_status(200)
        .with_body(BRIDGE)
        .create_async()
        .await;

    let client = client_for(&server, None, Some("1000836527372"));
    client.fetch_player_stats().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_map_rotation() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/maprotation")
        .match_header("authorization", "test-key")
        .with_status(200)
        .with_body(MAP_ROTATION)
        .create_async()
        .await;

    let client = client_for(&server, Some("NeonRaider"), None);
    let rotation = client.fetch_map_rotation().await.unwrap();
    mock.assert_async().await;

    assert_eq!(rotation.current_map, "Olympus");
    assert_eq!(rotation.current_duration_minutes, 90.0);
    assert_eq!(rotation.current_remaining_minutes, 45.0);
    assert_eq!(rotation.next_map, "Storm Point");
    assert_eq!(rotation.next_duration_minutes, 90.0);
    assert_eq!(rotation.next_start, 1713097800.0);
}

#[tokio::test]
async fn test_invalid_api_key_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/maprotation")
        .with_status(403)
        .with_body("Invalid API key")
        .create_async()
        .await;

    let client = client_for(&server, Some("NeonRaider"), None);
    let err = client.fetch_map_rotation().await.unwrap_err();

    assert!(matches!(err, ApexError::Unauthorized(_)));
    assert!(err.to_string().contains("API_KEY"));
}

#[tokio::test]
async fn test_unknown_player_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bridge")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"Error": "Player not found. Try again?"}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some("NobodyAtAll"), None);
    let err = client.fetch_player_stats().await.unwrap_err();

    assert!(matches!(err, ApexError::PlayerNotFound(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/maprotation")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let client = client_for(&server, Some("NeonRaider"), None);
    match client.fetch_map_rotation().await.unwrap_err() {
        ApexError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}
