//! Notes API Tests
//!
//! Drives the full router (dispatcher, store, middleware) against an
//! in-memory SQLite database:
//! - Create/list/update/delete round trips
//! - Validation happens before any write
//! - Missing ids succeed without touching other notes
//! - Search is case-insensitive and ignores invalid terms
//! - Every response carries the security headers

mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use notesd::store::LastInsertId;
use serde_json::json;

use common::*;

const TITLE_ERROR: &str = "Title is required and must be less than 200 characters";

// =============================================================================
// Round Trip
// =============================================================================

#[tokio::test]
async fn test_list_starts_empty() {
    let router = router(memory_store().await);

    let response = get(&router, "/?action=list").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({"ok": true, "data": []}));
}

#[tokio::test]
async fn test_action_defaults_to_list() {
    let router = router(memory_store().await);
    create(&router, "Milk", "2%").await;

    let response = get(&router, "/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_milk_round_trip() {
    let router = router(memory_store().await);

    let created = post(&router, "/?action=create", json!({"title": "Milk", "body": "2%"})).await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.json["ok"], true);
    let note = &created.json["data"];
    let id = note["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(note["title"], "Milk");
    assert_eq!(note["body"], "2%");
    assert!(!note["created_at"].as_str().unwrap().is_empty());

    let notes = list(&router).await;
    assert_eq!(notes, vec![note.clone()]);

    let updated = post(
        &router,
        "/?action=update",
        json!({"id": id, "title": "Milk 2%", "body": ""}),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json["data"]["id"], id);
    assert_eq!(updated.json["data"]["title"], "Milk 2%");
    assert_eq!(updated.json["data"]["body"], "");
    assert_eq!(updated.json["data"]["created_at"], note["created_at"]);

    let notes = list(&router).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Milk 2%");
    assert_eq!(notes[0]["body"], "");

    let deleted = post(&router, "/?action=delete", json!({"id": id})).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json, json!({"ok": true}));

    assert!(list(&router).await.is_empty());
}

#[tokio::test]
async fn test_create_trims_input() {
    let router = router(memory_store().await);

    let created = post(
        &router,
        "/?action=create",
        json!({"title": "  Eggs \n", "body": "\t a dozen  "}),
    )
    .await;
    assert_eq!(created.json["data"]["title"], "Eggs");
    assert_eq!(created.json["data"]["body"], "a dozen");
}

#[tokio::test]
async fn test_create_with_last_insert_id_strategy() {
    let router = router(memory_store_with(std::sync::Arc::new(LastInsertId)).await);

    let created = post(
        &router,
        "/?action=create",
        json!({"title": "  Milk ", "body": " 2% "}),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    let note = &created.json["data"];
    assert!(note["id"].as_i64().unwrap() > 0);
    assert_eq!(note["title"], "Milk");
    assert_eq!(note["body"], "2%");
    assert!(!note["created_at"].as_str().unwrap().is_empty());

    let second = create(&router, "Eggs", "").await;
    assert_eq!(second, note["id"].as_i64().unwrap() + 1);
    assert_eq!(list(&router).await.len(), 2);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let router = router(memory_store().await);
    let first = create(&router, "first", "").await;
    let second = create(&router, "second", "").await;
    let third = create(&router, "third", "").await;

    let ids: Vec<i64> = list(&router)
        .await
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[tokio::test]
async fn test_legacy_path_is_served() {
    let router = router(memory_store().await);

    let created = post(&router, "/api.php?action=create", json!({"title": "Legacy"})).await;
    assert_eq!(created.status, StatusCode::OK);

    let listed = get(&router, "/api.php?action=list").await;
    assert_eq!(listed.json["data"][0]["title"], "Legacy");
}

// =============================================================================
// Create Validation
// =============================================================================

#[tokio::test]
async fn test_create_rejects_missing_or_blank_title() {
    let router = router(memory_store().await);

    for body in [json!({}), json!({"title": ""}), json!({"title": "   \t"}), json!({"title": 5})] {
        let response = post(&router, "/?action=create", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json, json!({"ok": false, "error": TITLE_ERROR}));
    }

    assert!(list(&router).await.is_empty());
}

#[tokio::test]
async fn test_create_title_length_bound() {
    let router = router(memory_store().await);

    let too_long = post(&router, "/?action=create", json!({"title": "a".repeat(201)})).await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    assert!(list(&router).await.is_empty());

    let at_limit = post(&router, "/?action=create", json!({"title": "a".repeat(200)})).await;
    assert_eq!(at_limit.status, StatusCode::OK);
    assert_eq!(list(&router).await.len(), 1);
}

#[tokio::test]
async fn test_create_with_invalid_body_stores_empty_body() {
    let router = router(memory_store().await);

    for body in [json!("x".repeat(10_001)), json!("   "), json!(null), json!(12)] {
        let response = post(&router, "/?action=create", json!({"title": "t", "body": body})).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json["data"]["body"], "");
    }

    let at_limit = post(
        &router,
        "/?action=create",
        json!({"title": "t", "body": "x".repeat(10_000)}),
    )
    .await;
    assert_eq!(at_limit.json["data"]["body"].as_str().unwrap().len(), 10_000);
}

#[tokio::test]
async fn test_create_with_malformed_body_is_title_error() {
    let router = router(memory_store().await);

    for raw in ["", "{not json", "[\"title\"]", "\"Milk\""] {
        let response = post_raw(&router, "/?action=create", raw).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json["error"], TITLE_ERROR);
    }
}

// =============================================================================
// Update and Delete
// =============================================================================

#[tokio::test]
async fn test_update_rejects_invalid_id_before_title() {
    let router = router(memory_store().await);

    for id in [json!(0), json!(-1), json!("abc"), json!(null), json!(true)] {
        let response = post(&router, "/?action=update", json!({"id": id, "title": ""})).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json, json!({"ok": false, "error": "Invalid ID"}));
    }

    let response = post(&router, "/?action=update", json!({"title": "x"})).await;
    assert_eq!(response.json["error"], "Invalid ID");
}

#[tokio::test]
async fn test_update_rejects_invalid_title_without_writing() {
    let router = router(memory_store().await);
    let id = create(&router, "Keep me", "body").await;

    let response = post(&router, "/?action=update", json!({"id": id, "title": "  "})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], TITLE_ERROR);

    let notes = list(&router).await;
    assert_eq!(notes[0]["title"], "Keep me");
    assert_eq!(notes[0]["body"], "body");
}

#[tokio::test]
async fn test_update_missing_id_succeeds_without_effect() {
    let router = router(memory_store().await);
    let id = create(&router, "Only", "note").await;
    let before = list(&router).await;

    let response = post(
        &router,
        "/?action=update",
        json!({"id": id + 100, "title": "Ghost", "body": ""}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({"ok": true}));

    assert_eq!(list(&router).await, before);
}

#[tokio::test]
async fn test_update_accepts_numeric_string_id() {
    let router = router(memory_store().await);
    let id = create(&router, "Before", "").await;

    let response = post(
        &router,
        "/?action=update",
        json!({"id": id.to_string(), "title": "After"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["data"]["title"], "After");
}

#[tokio::test]
async fn test_delete_missing_id_succeeds_without_effect() {
    let router = router(memory_store().await);
    create(&router, "a", "").await;
    create(&router, "b", "").await;

    let response = post(&router, "/?action=delete", json!({"id": 999})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({"ok": true}));
    assert_eq!(list(&router).await.len(), 2);
}

#[tokio::test]
async fn test_delete_removes_exactly_one_note() {
    let router = router(memory_store().await);
    let a = create(&router, "a", "").await;
    let b = create(&router, "b", "").await;
    let c = create(&router, "c", "").await;

    let response = post(&router, "/?action=delete", json!({"id": format!("{}", b)})).await;
    assert_eq!(response.status, StatusCode::OK);

    let ids: Vec<i64> = list(&router)
        .await
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![c, a]);
}

#[tokio::test]
async fn test_delete_rejects_invalid_id() {
    let router = router(memory_store().await);
    create(&router, "a", "").await;

    let response = post(&router, "/?action=delete", json!({"id": "0"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "Invalid ID");
    assert_eq!(list(&router).await.len(), 1);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_is_case_insensitive_over_title_and_body() {
    let router = router(memory_store().await);
    let in_title = create(&router, "Milk", "2%").await;
    let in_body = create(&router, "Groceries", "buy MILK and bread").await;
    create(&router, "Eggs", "a dozen").await;

    let response = get(&router, "/?action=list&search=milk").await;
    let ids: Vec<i64> = response.json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![in_body, in_title]);
}

#[tokio::test]
async fn test_invalid_search_returns_everything() {
    let router = router(memory_store().await);
    create(&router, "Milk", "").await;
    create(&router, "Eggs", "").await;
    let all = list(&router).await;

    let empty = get(&router, "/?action=list&search=").await;
    assert_eq!(empty.json["data"].as_array().unwrap(), &all);

    let blank = get(&router, "/?action=list&search=%20%20").await;
    assert_eq!(blank.json["data"].as_array().unwrap(), &all);

    let too_long = get(&router, &format!("/?action=list&search={}", "m".repeat(101))).await;
    assert_eq!(too_long.status, StatusCode::OK);
    assert_eq!(too_long.json["data"].as_array().unwrap(), &all);
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let router = router(memory_store().await);
    let percent = create(&router, "Milk", "2%").await;
    create(&router, "Apples", "20 of them").await;

    let response = get(&router, "/?action=list&search=2%25").await;
    let data = response.json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], percent);

    let response = get(&router, "/?action=list&search=_").await;
    assert!(response.json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_works_on_post() {
    let router = router(memory_store().await);
    create(&router, "Milk", "").await;
    create(&router, "Eggs", "").await;

    let response = post(&router, "/?action=list&search=eggs", json!({})).await;
    assert_eq!(response.json["data"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Output Encoding
// =============================================================================

#[tokio::test]
async fn test_note_text_is_html_escaped_in_responses() {
    let store = memory_store().await;
    let router = router(store.clone());

    let created = post(
        &router,
        "/?action=create",
        json!({"title": "<b>Tom & Jerry</b>", "body": "it's \"quoted\""}),
    )
    .await;
    assert_eq!(created.json["data"]["title"], "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
    assert_eq!(created.json["data"]["body"], "it&#039;s &quot;quoted&quot;");

    let notes = list(&router).await;
    assert_eq!(notes[0]["title"], "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");

    // storage keeps the plain text
    let id = created.json["data"]["id"].as_i64().unwrap();
    let stored = store.find_note(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "<b>Tom & Jerry</b>");
    assert_eq!(stored.body, "it's \"quoted\"");
}

#[tokio::test]
async fn test_escaping_can_be_disabled() {
    let router = router_without_escaping(memory_store().await);

    let created = post(&router, "/?action=create", json!({"title": "a & b"})).await;
    assert_eq!(created.json["data"]["title"], "a & b");
}

// =============================================================================
// Errors and Headers
// =============================================================================

#[tokio::test]
async fn test_unknown_action() {
    let router = router(memory_store().await);

    for uri in ["/?action=purge", "/?action=", "/?action=LIST"] {
        let response = post(&router, uri, json!({})).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json, json!({"ok": false, "error": "Unknown action"}));
    }
}

#[tokio::test]
async fn test_store_failure_is_500_envelope() {
    // no migration: the notes table does not exist
    let store = notesd::NoteStore::connect(&notesd::DatabaseConfig::sqlite_memory())
        .await
        .unwrap();
    let router = router(std::sync::Arc::new(store));

    let response = get(&router, "/?action=list").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["ok"], false);
    assert!(response.json["error"].as_str().unwrap().contains("notes"));

    // validation still wins over store access
    let response = post(&router, "/?action=create", json!({"title": ""})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let router = router(memory_store().await);

    for response in [
        get(&router, "/?action=list").await,
        post(&router, "/?action=create", json!({})).await,
        get(&router, "/?action=nope").await,
        get(&router, "/health").await,
        get(&router, "/missing").await,
    ] {
        assert_eq!(response.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(response.headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(
            response.headers[header::STRICT_TRANSPORT_SECURITY],
            "max-age=31536000; includeSubDomains"
        );
        assert_eq!(response.headers[header::CONTENT_TYPE], "application/json");
    }
}

#[tokio::test]
async fn test_oversized_body_is_envelope() {
    let router = router(memory_store().await);

    let response = post_raw(&router, "/?action=create", "x".repeat(3 * 1024 * 1024)).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(response.headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(response.json["ok"], false);
    assert!(response.json["error"].as_str().unwrap().contains("length limit exceeded"));

    assert!(list(&router).await.is_empty());
}

#[tokio::test]
async fn test_same_origin_header_reflection() {
    let router = router(memory_store().await);

    let same = Request::builder()
        .method(Method::GET)
        .uri("/?action=list")
        .header(header::HOST, "notes.local")
        .header(header::ORIGIN, "https://notes.local")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, same).await;
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://notes.local"
    );
    assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let foreign = Request::builder()
        .method(Method::GET)
        .uri("/?action=list")
        .header(header::HOST, "notes.local")
        .header(header::ORIGIN, "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, foreign).await;
    assert!(response.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_health_and_not_found() {
    let router = router(memory_store().await);

    let health = get(&router, "/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json["status"], "ok");
    assert_eq!(health.json["version"], env!("CARGO_PKG_VERSION"));

    let missing = get(&router, "/nowhere").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json, json!({"ok": false, "error": "Not found"}));
}
