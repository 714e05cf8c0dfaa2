use encore_client::{ClientError, DashboardClient};
use futures_util::StreamExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn trigger_posts_to_endpoint_and_returns_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/trigger-spotify-listeners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"queued": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DashboardClient::new(server.uri());
    let result = client
        .trigger_job("/api/admin/trigger-spotify-listeners")
        .await
        .expect("trigger ok");

    assert_eq!(result, Some(serde_json::json!({"queued": true})));
}

#[tokio::test]
async fn trigger_accepts_empty_and_non_json_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("started"))
        .mount(&server)
        .await;

    let client = DashboardClient::new(server.uri());
    assert_eq!(client.trigger_job("/empty").await.unwrap(), None);
    assert_eq!(client.trigger_job("/text").await.unwrap(), None);
}

#[tokio::test]
async fn trigger_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/trigger-youtube-metrics"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = DashboardClient::new(server.uri());
    let err = client
        .trigger_job("/api/admin/trigger-youtube-metrics")
        .await
        .unwrap_err();

    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn trigger_reports_transport_failure() {
    // Nothing listens on the discard port.
    let client = DashboardClient::new("http://127.0.0.1:9");
    let err = client.trigger_job("/api/admin/x").await.unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed(_)));
}

#[tokio::test]
async fn subscribe_decodes_event_stream() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let body = concat!(
        ": connected\n\n",
        "data: {\"type\":\"spotify-followers\",\"status\":\"completed\"}\n\n",
        "event: heartbeat\ndata: {}\n\n",
    );
    Mock::given(method("GET"))
        .and(path("/api/metrics-sse"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = DashboardClient::new(server.uri());
    let events: Vec<_> = client
        .subscribe_events("/api/metrics-sse")
        .await?
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_, _>>()?;

    assert_eq!(events.len(), 2);
    assert!(events[0].is_message());
    assert_eq!(
        events[0].data,
        r#"{"type":"spotify-followers","status":"completed"}"#
    );
    assert_eq!(events[1].event, "heartbeat");
    Ok(())
}

#[tokio::test]
async fn subscribe_rejects_error_status_and_wrong_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html/>", "text/html"))
        .mount(&server)
        .await;

    let client = DashboardClient::new(server.uri());

    let err = client.subscribe_events("/down").await.err().unwrap();
    assert!(err.is_server_error());
    assert!(err.to_string().contains("maintenance"));

    let err = client.subscribe_events("/html").await.err().unwrap();
    assert!(matches!(err, ClientError::NotAnEventStream(ct) if ct == "text/html"));
}
