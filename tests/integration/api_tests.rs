//! API integration tests

use bookshelf_api::{create_router, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Start a server on an ephemeral port and return its base URL
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("No local address");
    let app = create_router(AppState::new());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}", addr)
}

async fn add_book(client: &Client, base: &str, body: Value) -> String {
    let response = client
        .post(format!("{}/add-book", base))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["bookId"]
        .as_str()
        .expect("No book id in response")
        .to_string()
}

async fn list(client: &Client, base: &str, query: &str) -> Vec<Value> {
    let response = client
        .get(format!("{}/book{}", base, query))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    body["data"]["books"]
        .as_array()
        .expect("books is not an array")
        .clone()
}

fn war_and_peace() -> Value {
    json!({
        "name": "War and Peace",
        "year": 1869,
        "author": "Leo Tolstoy",
        "summary": "Napoleonic wars",
        "publisher": "The Russian Messenger",
        "pageCount": 1225,
        "readPage": 1225,
        "reading": false
    })
}

fn oliver_twist() -> Value {
    json!({
        "name": "Oliver Twist",
        "year": 1838,
        "author": "Charles Dickens",
        "summary": "Orphan in London",
        "publisher": "Bentley's Miscellany",
        "pageCount": 608,
        "readPage": 120,
        "reading": true
    })
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_add_book_returns_id() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/add-book", base))
        .json(&war_and_peace())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    assert_eq!(body["data"]["bookId"].as_str().map(str::len), Some(16));
}

#[tokio::test]
async fn test_add_book_without_name() {
    let base = spawn_server().await;
    let client = Client::new();

    for body in [json!({"pageCount": 10, "readPage": 20}), json!({"name": ""})] {
        let response = client
            .post(format!("{}/add-book", base))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
    }

    assert!(list(&client, &base, "").await.is_empty());
}

#[tokio::test]
async fn test_add_book_read_page_too_large() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/add-book", base))
        .json(&json!({"name": "Overread", "pageCount": 10, "readPage": 11}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );
}

#[tokio::test]
async fn test_add_book_null_page_count() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/add-book", base))
        .json(&json!({"name": "Null pages", "pageCount": null, "readPage": 5}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let id = add_book(&client, &base, json!({"name": "No pages", "readPage": 5})).await;
    let body: Value = client
        .get(format!("{}/book/{}", base, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["data"]["book"]["finished"], false);
    assert!(body["data"]["book"].get("pageCount").is_none());
}

#[tokio::test]
async fn test_add_book_malformed_body() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/add-book", base))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_get_book_details() {
    let base = spawn_server().await;
    let client = Client::new();
    let id = add_book(&client, &base, war_and_peace()).await;

    let response = client
        .get(format!("{}/book/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book = &body["data"]["book"];
    assert_eq!(book["id"], id.as_str());
    assert_eq!(book["name"], "War and Peace");
    assert_eq!(book["year"], 1869);
    assert_eq!(book["author"], "Leo Tolstoy");
    assert_eq!(book["pageCount"], 1225);
    assert_eq!(book["readPage"], 1225);
    assert_eq!(book["reading"], false);
    assert_eq!(book["finished"], true);
    assert_eq!(book["insertedAt"], book["updatedAt"]);
    assert!(book["insertedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_list_and_filter_books() {
    let base = spawn_server().await;
    let client = Client::new();
    let war = add_book(&client, &base, war_and_peace()).await;
    let oliver = add_book(&client, &base, oliver_twist()).await;

    let all = list(&client, &base, "").await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["id"], war.as_str());
    assert_eq!(all[1]["id"], oliver.as_str());
    assert_eq!(all[0]["publisher"], "The Russian Messenger");
    assert!(all[0].get("year").is_none());

    let by_name = list(&client, &base, "?name=WAR").await;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0]["name"], "War and Peace");

    let reading = list(&client, &base, "?reading=1").await;
    assert_eq!(reading.len(), 1);
    assert_eq!(reading[0]["id"], oliver.as_str());

    let not_reading = list(&client, &base, "?reading=0").await;
    assert_eq!(not_reading.len(), 1);
    assert_eq!(not_reading[0]["id"], war.as_str());

    let finished = list(&client, &base, "?finished=1").await;
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0]["id"], war.as_str());

    let unfinished = list(&client, &base, "?finished=yes").await;
    assert_eq!(unfinished.len(), 1);
    assert_eq!(unfinished[0]["id"], oliver.as_str());

    assert!(list(&client, &base, "?name=war&reading=1").await.is_empty());
}

#[tokio::test]
async fn test_list_books_with_repeated_keys() {
    let base = spawn_server().await;
    let client = Client::new();
    add_book(&client, &base, war_and_peace()).await;
    let oliver = add_book(&client, &base, oliver_twist()).await;

    let by_last_name = list(&client, &base, "?name=war&name=twist").await;
    assert_eq!(by_last_name.len(), 1);
    assert_eq!(by_last_name[0]["id"], oliver.as_str());

    // repeated flags coerce to false
    let reading = list(&client, &base, "?reading=1&reading=1").await;
    assert_eq!(reading.len(), 1);
    assert_eq!(reading[0]["name"], "War and Peace");

    let finished = list(&client, &base, "?finished=1&finished=1").await;
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0]["id"], oliver.as_str());

    let hex_reading = list(&client, &base, "?reading=0x1").await;
    assert_eq!(hex_reading.len(), 1);
    assert_eq!(hex_reading[0]["id"], oliver.as_str());
}

#[tokio::test]
async fn test_update_book() {
    let base = spawn_server().await;
    let client = Client::new();
    let id = add_book(&client, &base, oliver_twist()).await;

    let before: Value = client
        .get(format!("{}/book/{}", base, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = client
        .put(format!("{}/book/{}", base, id))
        .json(&json!({
            "name": "Oliver Twist (Revised)",
            "year": 1846,
            "author": "Charles Dickens",
            "summary": "Revised edition",
            "publisher": "Chapman & Hall",
            "pageCount": 608,
            "readPage": 300,
            "reading": true
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil diperbarui");

    let after: Value = client
        .get(format!("{}/book/{}", base, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let (before, after) = (&before["data"]["book"], &after["data"]["book"]);
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
    assert_eq!(after["name"], "Oliver Twist (Revised)");
    assert_eq!(after["publisher"], "Chapman & Hall");
    assert_eq!(after["readPage"], 300);
}

#[tokio::test]
async fn test_delete_book() {
    let base = spawn_server().await;
    let client = Client::new();
    let war = add_book(&client, &base, war_and_peace()).await;
    let oliver = add_book(&client, &base, oliver_twist()).await;

    let response = client
        .delete(format!("{}/book/{}", base, war))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Buku berhasil dihapus");

    let remaining = list(&client, &base, "").await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], oliver.as_str());

    let response = client
        .get(format!("{}/book/{}", base, war))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_id_messages() {
    let base = spawn_server().await;
    let client = Client::new();
    let url = format!("{}/book/does-not-exist", base);

    let cases = [
        (client.get(&url), "Buku tidak ditemukan"),
        (
            client.put(&url).json(&json!({"name": "Ghost"})),
            "Gagal memperbarui buku. Id tidak ditemukan",
        ),
        (client.delete(&url), "Buku gagal dihapus. Id tidak ditemukan"),
    ];

    for (request, message) in cases {
        let response = request.send().await.expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], message);
    }

    assert!(list(&client, &base, "").await.is_empty());
}

#[tokio::test]
async fn test_openapi_document() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/add-book"].is_object());
}
