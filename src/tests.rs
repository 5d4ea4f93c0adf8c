//! Integration tests for the Grail backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::config::{parse_season_start, Config, DEFAULT_SEASON_START};
use crate::db::{init_database, Repository};
use crate::models::{Item, ItemType, SubType};
use crate::season::SeasonClock;
use crate::{create_router, AppState};

fn test_items() -> Vec<Item> {
    let item = |id, name: &str, item_type, sub_type, points| Item {
        id,
        item_name: name.to_string(),
        item_type,
        sub_type,
        points,
    };
    vec![
        item(1, "Ber Rune", ItemType::Rune, SubType::None, 60),
        item(2, "Jah Rune", ItemType::Rune, SubType::None, 55),
        item(3, "Harlequin Crest", ItemType::UniqueItem, SubType::Helmet, 30),
        item(4, "Tal Rasha's Guardianship", ItemType::SetItem, SubType::Chest, 35),
        item(5, "Annihilus", ItemType::UniqueItem, SubType::Charm, 70),
        item(6, "Tal Rasha's Horadric Crest", ItemType::SetItem, SubType::Helmet, 20),
    ]
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    season_id: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));
        let catalog = Arc::new(Catalog::new(test_items()).expect("Failed to build catalog"));

        let config = Config {
            api_psk: psk.clone(),
            db_path,
            catalog_path: temp_dir.path().join("items.json"),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            season_start: parse_season_start(DEFAULT_SEASON_START).unwrap(),
        };
        let clock = SeasonClock::new(config.season_start);

        let state = AppState {
            repo,
            catalog,
            clock,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            season_id: clock.current_season_id(),
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn sign_in(&self, user_id: &str, display_name: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "userId": user_id, "displayName": display_name }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn mark_found(&self, user_id: &str, item_id: i64, scope: &str) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(&format!("/api/users/{}/found?scope={}", user_id, scope)))
            .json(&json!({ "itemId": item_id }))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn unmark(&self, user_id: &str, item_id: i64, scope: &str) -> (u16, Value) {
        let resp = self
            .client
            .delete(self.url(&format!(
                "/api/users/{}/found/{}?scope={}",
                user_id, item_id, scope
            )))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().or_else(|| v["Id"].as_i64()).unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/season"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["seasonId"], fixture.season_id.as_str());
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/season"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = Client::new()
        .get(fixture.url("/api/season"))
        .header("Authorization", "Bearer test-api-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_auth_disabled_without_psk() {
    let fixture = TestFixture::with_psk(None).await;

    let (status, body) = fixture.get("/api/season").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_season_endpoint() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/season").await;
    assert_eq!(status, 200);
    assert_eq!(body["seasonId"], fixture.season_id.as_str());
    assert_eq!(body["data"]["seasonId"], fixture.season_id.as_str());
    assert!(body["data"]["number"].as_i64().unwrap() >= 1);
    assert!(body["data"]["startsAt"].is_string());
    assert!(body["data"]["endsAt"].is_string());
}

#[tokio::test]
async fn test_sign_in_and_get_user() {
    let fixture = TestFixture::new().await;

    let body = fixture.sign_in("google-123", "Deckard Cain").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["userId"], "google-123");
    assert_eq!(body["data"]["displayName"], "Deckard Cain");

    // A second sign-in keeps the stored name
    let body = fixture.sign_in("google-123", "Renamed").await;
    assert_eq!(body["data"]["displayName"], "Deckard Cain");

    let (status, body) = fixture.get("/api/users/google-123").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["displayName"], "Deckard Cain");

    let (status, body) = fixture.get("/api/users/nobody").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_sign_in_requires_user_id() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/users"))
        .json(&json!({ "userId": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_found_item_lifecycle() {
    let fixture = TestFixture::new().await;
    fixture.sign_in("u1", "Akara").await;

    let (status, body) = fixture.mark_found("u1", 3, "season").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["itemId"], 3);
    assert_eq!(body["data"]["points"], 30);

    // Marking twice keeps a single record
    fixture.mark_found("u1", 3, "season").await;
    fixture.mark_found("u1", 1, "season").await;

    let (_, body) = fixture.get("/api/users/u1/found?scope=season").await;
    let mut found = ids(&body["data"]["itemIds"]);
    found.sort();
    assert_eq!(found, vec![1, 3]);
    assert_eq!(body["data"]["totalPoints"], 90);

    // Season writes are mirrored into all-time
    let (_, body) = fixture.get("/api/users/u1/found?scope=all-time").await;
    assert_eq!(body["data"]["totalPoints"], 90);

    let (status, body) = fixture.unmark("u1", 3, "season").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["removed"], true);

    let (_, body) = fixture.get("/api/users/u1/found").await;
    assert_eq!(ids(&body["data"]["itemIds"]), vec![1]);
    assert_eq!(body["data"]["totalPoints"], 60);

    // Removing from the season leaves all-time untouched
    let (_, body) = fixture.get("/api/users/u1/found?scope=all-time").await;
    assert_eq!(body["data"]["totalPoints"], 90);

    let (_, body) = fixture.unmark("u1", 3, "season").await;
    assert_eq!(body["data"]["removed"], false);
}

#[tokio::test]
async fn test_found_item_errors() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.mark_found("ghost", 1, "season").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    fixture.sign_in("u1", "Akara").await;
    let (status, body) = fixture.mark_found("u1", 999, "season").await;
    assert_eq!(status, 404);
    assert!(body["error"]["message"].as_str().unwrap().contains("999"));

    let (status, _) = fixture.unmark("ghost", 1, "all-time").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let fixture = TestFixture::new().await;
    fixture.sign_in("u1", "Akara").await;

    for path in [
        "/api/users/u1/found?scope=weekly",
        "/api/leaderboard?limit=-1",
        "/api/items/abc",
        "/api/items?view=everything",
    ] {
        let (status, body) = fixture.get(path).await;
        assert_eq!(status, 400, "{}", path);
        assert_eq!(body["success"], false, "{}", path);
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{}", path);
        assert_eq!(body["seasonId"], fixture.season_id.as_str(), "{}", path);
    }

    let resp = fixture
        .client
        .post(fixture.url("/api/users"))
        .header("content-type", "application/json")
        .body("{\"userId\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["seasonId"], fixture.season_id.as_str());

    let resp = fixture
        .client
        .post(fixture.url("/api/users/u1/found"))
        .body("itemId=3")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Nothing was recorded by the rejected write
    let (_, body) = fixture.get("/api/users/u1/found").await;
    assert!(ids(&body["data"]["itemIds"]).is_empty());
}

#[tokio::test]
async fn test_items_filter_and_sort() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/items").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body["data"]), vec![5, 1, 2, 4, 3, 6]);

    let (_, body) = fixture.get("/api/items?types=SetItem&sort=points-low").await;
    assert_eq!(ids(&body["data"]), vec![6, 4]);

    let (_, body) = fixture.get("/api/items?subTypes=Helmet&search=CREST&sort=name-asc").await;
    assert_eq!(ids(&body["data"]), vec![3, 6]);

    let (_, body) = fixture.get("/api/items?types=Rune,UniqueItem&sort=name-desc").await;
    assert_eq!(ids(&body["data"]), vec![2, 3, 1, 5]);

    let (status, body) = fixture.get("/api/items?types=Potion").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_items_view_partition() {
    let fixture = TestFixture::new().await;
    fixture.sign_in("u1", "Akara").await;
    fixture.mark_found("u1", 5, "season").await;
    fixture.mark_found("u1", 6, "season").await;

    let (_, body) = fixture.get("/api/items?userId=u1&view=found").await;
    assert_eq!(ids(&body["data"]), vec![5, 6]);

    let (_, body) = fixture.get("/api/items?userId=u1").await;
    assert_eq!(ids(&body["data"]), vec![1, 2, 4, 3]);

    let (_, body) = fixture.get("/api/items?view=found").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_item_lookup_and_suggestions() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/items/3").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["ItemName"], "Harlequin Crest");
    assert_eq!(body["data"]["SubType"], "Helmet");

    let (status, _) = fixture.get("/api/items/42").await;
    assert_eq!(status, 404);

    let (_, body) = fixture.get("/api/items/suggestions?q=ta").await;
    assert_eq!(ids(&body["data"]), vec![4, 6]);

    let (_, body) = fixture.get("/api/items/suggestions?q=t").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_progress() {
    let fixture = TestFixture::new().await;
    fixture.sign_in("u1", "Akara").await;
    fixture.mark_found("u1", 5, "season").await;

    let (status, body) = fixture.get("/api/users/u1/progress").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["currentPoints"], 70);
    assert_eq!(body["data"]["maxPoints"], 270);
    assert_eq!(body["data"]["foundItems"], 1);
    assert_eq!(body["data"]["maxItems"], 6);
    assert_eq!(body["data"]["percentage"], 26);
}

#[tokio::test]
async fn test_leaderboard() {
    let fixture = TestFixture::new().await;
    fixture.sign_in("u1", "Charsi").await;
    fixture.sign_in("u2", "Gheed").await;
    fixture.sign_in("u3", "Idle").await;

    fixture.mark_found("u1", 3, "season").await;
    fixture.mark_found("u2", 5, "season").await;
    fixture.mark_found("u2", 6, "season").await;
    fixture.mark_found("u3", 1, "all-time").await;

    let (status, body) = fixture.get("/api/leaderboard?scope=season").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["scope"], "season");
    assert_eq!(
        body["data"]["title"],
        format!("{} HIGHSCORE", fixture.season_id.to_uppercase())
    );

    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["userId"], "u2");
    assert_eq!(entries[0]["displayName"], "Gheed");
    assert_eq!(entries[0]["totalPoints"], 90);
    assert_eq!(entries[0]["itemCount"], 2);
    assert_eq!(entries[1]["userId"], "u1");

    let (_, body) = fixture.get("/api/leaderboard?scope=all-time").await;
    assert_eq!(body["data"]["title"], "ALL-TIME HIGHSCORE");
    let points: Vec<i64> = body["data"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["totalPoints"].as_i64().unwrap())
        .collect();
    assert_eq!(points, vec![90, 60, 30]);
}

#[tokio::test]
async fn test_leaderboard_reports_user_below_cut() {
    let fixture = TestFixture::new().await;
    fixture.sign_in("u1", "Charsi").await;
    fixture.sign_in("u2", "Gheed").await;

    fixture.mark_found("u1", 5, "season").await;
    fixture.mark_found("u2", 6, "season").await;

    let (_, body) = fixture.get("/api/leaderboard?limit=1&userId=u2").await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["currentUser"]["rank"], 2);
    assert_eq!(body["data"]["currentUser"]["entry"]["userId"], "u2");

    let (_, body) = fixture.get("/api/leaderboard?limit=1&userId=u1").await;
    assert!(body["data"].get("currentUser").is_none());
}
