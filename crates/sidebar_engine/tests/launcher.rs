use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use sidebar_core::{
    AutoTradeRequest, ChatMessage, ChatRequest, ClientId, FollowupRequest, JobRequest,
    ResearchRequest,
};
use sidebar_engine::{EngineSettings, HttpJobLauncher, JobLauncher, LaunchError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn launcher_for(server: &MockServer) -> HttpJobLauncher {
    let settings = EngineSettings {
        api_base_url: server.uri(),
        ..EngineSettings::default()
    };
    HttpJobLauncher::new(&settings).expect("launcher")
}

fn chat_request() -> JobRequest {
    JobRequest::Chat(ChatRequest {
        client_id: ClientId::new("client_1_abc"),
        request_id: 3,
        messages: vec![ChatMessage::user("Will the Fed cut?")],
        event_slug: Some("fed-decision".to_string()),
    })
}

#[tokio::test]
async fn chat_posts_body_with_client_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "client_id": "client_1_abc",
            "request_id": 3,
            "messages": [{"role": "user", "content": "Will the Fed cut?"}],
            "event_slug": "fed-decision",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "started"})))
        .expect(1)
        .mount(&server)
        .await;

    launcher_for(&server).launch(&chat_request()).await.unwrap();
}

#[tokio::test]
async fn research_and_followup_use_their_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/research"))
        .and(body_json(json!({
            "client_id": "client_1_abc",
            "request_id": 1,
            "market_title": "Fed decision in January?",
            "event_slug": null,
            "custom_notes": "",
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/research/followup"))
        .and(body_json(json!({
            "client_id": "client_1_abc",
            "request_id": 1,
            "messages": [
                {"role": "assistant", "content": "Report"},
                {"role": "user", "content": "Why?"},
            ],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let launcher = launcher_for(&server);
    launcher
        .launch(&JobRequest::Research(ResearchRequest {
            client_id: ClientId::new("client_1_abc"),
            request_id: 1,
            market_title: "Fed decision in January?".to_string(),
            event_slug: None,
            custom_notes: String::new(),
        }))
        .await
        .unwrap();
    launcher
        .launch(&JobRequest::Followup(FollowupRequest {
            client_id: ClientId::new("client_1_abc"),
            request_id: 1,
            messages: vec![ChatMessage::assistant("Report"), ChatMessage::user("Why?")],
        }))
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_request_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = launcher_for(&server).launch(&chat_request()).await.unwrap_err();
    assert_eq!(err, LaunchError::HttpStatus(503));
}

#[tokio::test]
async fn slow_launcher_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let settings = EngineSettings {
        api_base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..EngineSettings::default()
    };
    let launcher = HttpJobLauncher::new(&settings).unwrap();
    let err = launcher.launch(&chat_request()).await.unwrap_err();
    assert_eq!(err, LaunchError::Timeout);
}

#[tokio::test]
async fn base_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let settings = EngineSettings {
        api_base_url: format!("{}/api", server.uri()),
        ..EngineSettings::default()
    };
    HttpJobLauncher::new(&settings)
        .unwrap()
        .launch(&chat_request())
        .await
        .unwrap();
}

#[tokio::test]
async fn autotrade_posts_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/autotrade"))
        .and(body_json(json!({
            "client_id": "client_1_abc",
            "request_id": 2,
            "market_slug": "fed-decision-in-january",
            "x_handles": ["@fedwatch", "@nick"],
            "condition": "a handle reports a cut",
            "amount": 25.0,
            "limit": 0.62,
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    launcher_for(&server)
        .launch(&JobRequest::AutoTrade(AutoTradeRequest {
            client_id: ClientId::new("client_1_abc"),
            request_id: 2,
            market_slug: "fed-decision-in-january".to_string(),
            x_handles: vec!["@fedwatch".to_string(), "@nick".to_string()],
            condition: "a handle reports a cut".to_string(),
            amount: 25.0,
            limit: 0.62,
        }))
        .await
        .unwrap();
}
