#![allow(dead_code)]

use std::time::Duration;

use httpmock::MockServer;
use serde_json::{json, Value};

use kino_client::config::AppConfig;
use kino_client::AppState;

pub fn test_config(endpoint: &str) -> AppConfig {
    AppConfig {
        endpoint: endpoint.to_string(),
        project_id: "test-project".to_string(),
        database_id: "db".to_string(),
        movies_collection_id: "movies".to_string(),
        metrics_collection_id: "metrics".to_string(),
        purchases_collection_id: "purchases".to_string(),
        profiles_collection_id: "profiles".to_string(),
        payment_create_fn_id: "fn-payment-create".to_string(),
        payment_status_fn_id: "fn-payment-status".to_string(),
        identity_verify_fn_id: "fn-verify-identity".to_string(),
        password_reset_fn_id: "fn-password-reset".to_string(),
        poll_interval: Duration::from_millis(20),
    }
}

pub fn build_state(server: &MockServer) -> AppState {
    AppState::new(test_config(&server.base_url()))
}

pub fn movie_doc(id: &str, title: &str, kind: &str) -> Value {
    json!({
        "$id": id,
        "title": title,
        "posterUrl": format!("https://cdn.example/{id}.jpg"),
        "streamUrl": format!("https://cdn.example/{id}.m3u8"),
        "rating": 8.1,
        "releaseYear": 2022,
        "type": kind,
        "price": 4900,
        "episodeUrls": [],
        "overview": "",
    })
}

pub fn metric_doc(id: &str, term: &str, movie_id: &str, title: &str, count: i64) -> Value {
    json!({
        "$id": id,
        "searchTerm": term,
        "movie_id": movie_id,
        "title": title,
        "poster_url": format!("https://cdn.example/{movie_id}.jpg"),
        "count": count,
    })
}

pub fn purchase_doc(id: &str, user_id: &str, movie_id: &str, expires_at: &str) -> Value {
    json!({
        "$id": id,
        "userId": user_id,
        "movieId": movie_id,
        "status": "PAID",
        "expiresAt": expires_at,
    })
}

pub fn list_body(docs: &[Value]) -> Value {
    json!({ "total": docs.len(), "documents": docs })
}
