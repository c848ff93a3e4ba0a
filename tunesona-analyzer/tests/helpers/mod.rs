//! Test Helper Utilities
//!
//! Canned music API payloads and a mock server wired to the standard
//! collection paths.

#![allow(dead_code)]

use serde_json::{json, Value};
use tunesona_common::config::{ApiConfig, QuerySettings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Song resource as the music API returns it
pub fn song(id: &str, name: &str, genre: &str, duration_ms: u64, play_count: Option<u64>) -> Value {
    let mut attributes = json!({
        "name": name,
        "artistName": format!("{} Artist", name),
        "albumName": format!("{} Album", name),
        "genreNames": [genre, "Music"],
        "durationInMillis": duration_ms,
        "dateAdded": "2024-05-01T12:00:00Z"
    });
    if let Some(count) = play_count {
        attributes["playCount"] = json!(count);
    }
    json!({ "id": id, "type": "library-songs", "attributes": attributes })
}

pub fn album(id: &str, name: &str, genre: &str) -> Value {
    json!({
        "id": id,
        "type": "albums",
        "attributes": {
            "name": name,
            "artistName": format!("{} Artist", name),
            "releaseDate": "2020-01-01",
            "trackCount": 10,
            "genreNames": [genre],
            "artwork": { "url": format!("https://img.example/{}.jpg", id) }
        }
    })
}

pub fn artist(id: &str, name: &str, genre: &str) -> Value {
    json!({
        "id": id,
        "type": "library-artists",
        "attributes": { "name": name, "genreNames": [genre] }
    })
}

/// `{ "data": [...] }`
pub fn page(items: Vec<Value>) -> Value {
    json!({ "data": items })
}

/// Serve `body` with status 200 on `route`
pub async fn mount_ok(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer `route` with a bare status
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub fn api_config(server: &MockServer, developer_token: Option<&str>) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        developer_token: developer_token.map(str::to_string),
        timeout_secs: 5,
    }
}

pub fn query_settings() -> QuerySettings {
    QuerySettings {
        locale: "en-us".to_string(),
        limit: Some(25),
        heavy_rotation_limit: Some(10),
    }
}
