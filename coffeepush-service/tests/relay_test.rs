mod common;

use common::TestApp;
use coffeepush_service::services::PushMessage;
use reqwest::{Client, StatusCode};

// =============================================================================
// Relay (POST /push/{recipient})
// =============================================================================

#[tokio::test]
async fn purchase_is_relayed_to_recipient() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/push/abc123", app.address))
        .body(r#"{"response":{"supporter_email":"user@example.com","number_of_coffees":"1","total_amount":"3"}}"#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().is_empty());

    assert_eq!(
        app.provider.sent(),
        vec![PushMessage {
            recipient: "abc123".to_string(),
            message: "user@example.com bought 1 coffee(s) for $3".to_string(),
        }]
    );
}

#[tokio::test]
async fn anonymous_purchase_uses_placeholder() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/push/xyz", app.address))
        .header("content-type", "application/json")
        .body(r#"{"response":{"number_of_coffees":"2","total_amount":"5"}}"#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let sent = app.provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "xyz");
    assert_eq!(sent[0].message, "Somebody bought 2 coffee(s) for $5");
}

#[tokio::test]
async fn malformed_body_is_rejected_without_sending() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/push/xyz", app.address))
        .body("not-json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Bad Request");
    assert_eq!(app.provider.send_count(), 0);
}

#[tokio::test]
async fn delivery_failure_is_bad_gateway() {
    let app = TestApp::spawn_failing().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/push/xyz", app.address))
        .body(r#"{"response":{"number_of_coffees":"1","total_amount":"3"}}"#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.text().await.unwrap(), "Bad Gateway");
    assert_eq!(app.provider.send_count(), 1);
}

#[tokio::test]
async fn each_request_is_relayed_independently() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    for (recipient, count) in [("alice", "1"), ("bob", "2"), ("carol", "3")] {
        let response = client
            .post(&format!("{}/push/{}", app.address, recipient))
            .body(format!(
                r#"{{"response":{{"number_of_coffees":"{}","total_amount":"9"}}}}"#,
                count
            ))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::OK);
    }

    let recipients: Vec<String> = app
        .provider
        .sent()
        .into_iter()
        .map(|push| push.recipient)
        .collect();
    assert_eq!(recipients, vec!["alice", "bob", "carol"]);
}

// =============================================================================
// Static surface
// =============================================================================

#[tokio::test]
async fn root_page_is_served() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("coffeepush"));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/anything-else", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
