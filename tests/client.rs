use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use recordbook_tui::messages::{ApiCommand, ApiResponse};
use recordbook_tui::models::{Food, Visibility};
use recordbook_tui::network::actor::execute;
use recordbook_tui::{ApiDialect, ApiError, Operation, RecordFields, RemoteClient};

fn fields(title: &str) -> RecordFields {
    RecordFields {
        title: title.to_string(),
        content: String::from("body"),
        ..Default::default()
    }
}

#[tokio::test]
async fn list_keeps_server_order_and_tolerates_loose_types() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "title": "C", "public_type": "private", "food_apple": 1, "pub_date1": "" },
            { "id": 1, "title": "A", "content": null, "is_public": true, "completed": false },
            { "id": 2, "title": 42, "qty1": 7, "pub_date1": "2024-02-29" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Items);
    let records = client.list().await.unwrap();

    let ids: Vec<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, [Some(3), Some(1), Some(2)]);
    assert_eq!(records[0].fields.visibility, Visibility::Private);
    assert!(records[0].fields.foods.get(Food::Apple));
    assert!(records[0].fields.schedule[0].date.is_none());
    assert_eq!(records[1].fields.content, "");
    assert_eq!(records[2].fields.title, "42");
    assert_eq!(records[2].fields.schedule[0].qty, "7");
    assert!(records[2].fields.schedule[0].date.is_some());
}

#[tokio::test]
async fn non_success_status_is_a_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Todos);
    let err = client.list().await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::RequestFailed { operation: Operation::List, status: 500 }
    ));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn get_fetches_single_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "title": "Seven" })))
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Items);
    let record = client.get(7).await.unwrap();
    assert_eq!(record.id, Some(7));
    assert_eq!(record.fields.title, "Seven");
}

#[tokio::test]
async fn create_accepts_acknowledgement_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create"))
        .and(body_partial_json(json!({ "title": "New", "public_type": "public", "food_apple": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Items);
    let mut new = fields("New");
    new.foods.set(Food::Apple, true);

    let echoed = client.create(&new).await.unwrap();
    assert!(echoed.is_none());
}

#[tokio::test]
async fn create_returns_echoed_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 11, "title": "New" })))
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Todos);
    let echoed = client.create(&fields("New")).await.unwrap().unwrap();
    assert_eq!(echoed.id, Some(11));
}

#[tokio::test]
async fn items_update_puts_to_record_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/items/5"))
        .and(body_partial_json(json!({ "title": "Renamed" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Items);
    let echoed = client.update(5, &fields("Renamed")).await.unwrap();
    assert!(echoed.is_none());

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn todos_update_posts_id_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/update"))
        .and(body_partial_json(json!({ "id": 5, "title": "Renamed", "is_public": true, "completed": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Todos);
    client.update(5, &fields("Renamed")).await.unwrap();
}

#[tokio::test]
async fn delete_posts_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/delete"))
        .and(body_partial_json(json!({ "id": 9 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Items);
    client.delete(9).await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Nothing listens on the discard port
    let client = RemoteClient::with_base_url("http://127.0.0.1:9", ApiDialect::Items);
    let err = client.delete(1).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { operation: Operation::Delete, .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn execute_reports_failures_for_the_banner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/create"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = RemoteClient::with_base_url(server.uri(), ApiDialect::Items);
    let response = execute(&client, ApiCommand::Create { id: 4, fields: fields("x") })
        .await
        .unwrap();

    match response {
        ApiResponse::Failed { id, operation, message, status } => {
            assert_eq!(id, 4);
            assert_eq!(operation, Operation::Create);
            assert_eq!(status, Some(500));
            assert!(message.contains("create item"));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    assert!(execute(&client, ApiCommand::Shutdown).await.is_none());
}
