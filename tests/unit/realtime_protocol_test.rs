use cloudmarks::config::RemoteConfig;
use cloudmarks::remote::realtime::{bookmarks_topic, join_frame, parse_change_event, websocket_url};
use cloudmarks::types::event::ChangeKind;
use rstest::rstest;

fn config(base_url: &str) -> RemoteConfig {
    RemoteConfig::new(base_url, "anon-key", "cm://localhost/bookmarks").unwrap()
}

#[test]
fn test_websocket_url_maps_https_to_wss() {
    assert_eq!(
        websocket_url(&config("https://proj.example.co")),
        "wss://proj.example.co/realtime/v1/websocket?apikey=anon-key&vsn=1.0.0"
    );
}

#[test]
fn test_websocket_url_maps_http_to_ws() {
    assert_eq!(
        websocket_url(&config("http://localhost:54321")),
        "ws://localhost:54321/realtime/v1/websocket?apikey=anon-key&vsn=1.0.0"
    );
}

#[test]
fn test_bookmarks_topic() {
    assert_eq!(bookmarks_topic(), "realtime:public:bookmarks");
}

#[test]
fn test_join_frame_shape() {
    let frame: serde_json::Value = serde_json::from_str(&join_frame()).unwrap();
    assert_eq!(frame["topic"], "realtime:public:bookmarks");
    assert_eq!(frame["event"], "phx_join");
    assert_eq!(frame["ref"], "1");
    assert!(frame["payload"].is_object());
}

#[test]
fn test_parse_insert_frame() {
    let text = r#"{
        "topic": "realtime:public:bookmarks",
        "event": "INSERT",
        "payload": {"record": {"id": "x"}},
        "ref": null
    }"#;
    let event = parse_change_event(text).unwrap();
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.table, "bookmarks");
}

#[rstest]
#[case("INSERT", ChangeKind::Insert)]
#[case("UPDATE", ChangeKind::Update)]
#[case("DELETE", ChangeKind::Delete)]
fn test_each_event_name_maps_to_its_kind(#[case] event: &str, #[case] expected: ChangeKind) {
    let text = format!(
        r#"{{"topic":"realtime:public:bookmarks","event":"{}","payload":{{}}}}"#,
        event
    );
    assert_eq!(parse_change_event(&text).unwrap().kind, expected);
}

#[test]
fn test_other_topics_are_ignored() {
    let other_table = r#"{"topic":"realtime:public:notes","event":"INSERT","payload":{}}"#;
    assert!(parse_change_event(other_table).is_none());

    let phoenix = r#"{"topic":"phoenix","event":"phx_reply","payload":{"status":"ok"}}"#;
    assert!(parse_change_event(phoenix).is_none());
}

#[test]
fn test_replies_and_garbage_are_ignored() {
    let reply = r#"{"topic":"realtime:public:bookmarks","event":"phx_reply","payload":{}}"#;
    assert!(parse_change_event(reply).is_none());

    assert!(parse_change_event("not json").is_none());
    assert!(parse_change_event("{}").is_none());
    assert!(parse_change_event(r#"{"topic":"realtime:public:bookmarks"}"#).is_none());
}
