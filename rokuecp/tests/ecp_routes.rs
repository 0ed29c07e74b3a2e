//! Tests des routes ECP via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode, header};
use parking_lot::Mutex;
use rokubus::CommandBus;
use rokuecp::{AppRegistry, DeviceIdentity, EcpContext, ecp_router};
use tower::ServiceExt;

/// Bus enregistrant les publications au lieu de les envoyer
#[derive(Default)]
struct RecordingBus(Mutex<Vec<(String, String)>>);

impl CommandBus for RecordingBus {
    fn publish(&self, topic: &str, payload: &str) {
        self.0.lock().push((topic.to_string(), payload.to_string()));
    }
}

impl RecordingBus {
    fn published(&self) -> Vec<(String, String)> {
        self.0.lock().clone()
    }
}

fn test_app(apps: &str) -> (Router, EcpContext, Arc<RecordingBus>) {
    let bus = Arc::new(RecordingBus::default());
    let ctx = EcpContext::new(
        AppRegistry::from_config_str(apps).unwrap(),
        bus.clone(),
        DeviceIdentity::new("1f0e5a4c-2b7d-5e8f-9a01-23456789abcd", "192.168.1.20", 8060),
        "Roku",
    );
    (ecp_router(ctx.clone()), ctx, bus)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, String, Option<String>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (
        status,
        String::from_utf8(body.to_vec()).expect("utf8"),
        content_type,
    )
}

#[tokio::test]
async fn landing_page_identifies_the_server() {
    let (app, _, _) = test_app("Netflix");
    let (status, body, _) = send(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Roku ECP emulation server");
}

#[tokio::test]
async fn apps_are_listed_in_order_with_sentinel() {
    let (app, _, _) = test_app("Netflix Hulu YouTube Plex");
    let (status, body, content_type) = send(&app, "GET", "/query/apps").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/xml; charset=utf-8"));
    assert_eq!(
        body,
        concat!(
            "<apps>",
            r#"<app id="0">Netflix</app>"#,
            r#"<app id="1">Hulu</app>"#,
            r#"<app id="2">YouTube</app>"#,
            r#"<app id="3">Plex</app>"#,
            r#"<app id="999">Dummy</app>"#,
            "</apps>"
        )
    );
}

#[tokio::test]
async fn launch_then_active_app_reports_selection() {
    let (app, ctx, _) = test_app("Netflix Hulu YouTube");

    let (_, body, _) = send(&app, "GET", "/query/active-app").await;
    assert_eq!(body, r#"<active-app><app id="0">Netflix</app></active-app>"#);

    for _ in 0..2 {
        let (status, body, _) = send(&app, "POST", "/launch/1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (_, body, _) = send(&app, "GET", "/query/active-app").await;
        assert_eq!(body, r#"<active-app><app id="1">Hulu</app></active-app>"#);
    }
    assert_eq!(ctx.selection.get(), 1);
}

#[tokio::test]
async fn out_of_range_launch_reports_none() {
    let (app, ctx, _) = test_app("Netflix Hulu YouTube");

    let (status, _, _) = send(&app, "POST", "/launch/7").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body, _) = send(&app, "GET", "/query/active-app").await;
    assert_eq!(body, r#"<active-app><app id="7">None</app></active-app>"#);

    let (status, _, _) = send(&app, "POST", "/launch/-1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body, _) = send(&app, "GET", "/query/active-app").await;
    assert_eq!(body, r#"<active-app><app id="-1">None</app></active-app>"#);
    assert_eq!(ctx.selection.get(), -1);
}

#[tokio::test]
async fn non_numeric_launch_is_rejected_without_state_change() {
    let (app, ctx, _) = test_app("Netflix Hulu YouTube");
    send(&app, "POST", "/launch/2").await;

    let (status, body, content_type) = send(&app, "POST", "/launch/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("text/xml"));
    assert_eq!(
        body,
        "<error><status>400</status><message>Invalid application id: abc</message></error>"
    );
    assert_eq!(ctx.selection.get(), 2);
}

#[tokio::test]
async fn keypress_publishes_once_on_active_app_topic() {
    let (app, _, bus) = test_app("Netflix Hulu YouTube");
    send(&app, "POST", "/launch/2").await;

    let (status, body, _) = send(&app, "POST", "/keypress/Select").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(
        bus.published(),
        vec![("Roku/YouTube".to_string(), "Select".to_string())]
    );
}

#[tokio::test]
async fn keypress_succeeds_without_connected_bus() {
    // Bus MQTT jamais démarré : la publication est ignorée
    let bus = Arc::new(rokubus::MqttBus::new("127.0.0.1:1", "roku-test").unwrap());
    let ctx = EcpContext::new(
        AppRegistry::from_config_str("Netflix").unwrap(),
        bus,
        DeviceIdentity::new("abcd", "127.0.0.1", 8060),
        "Roku",
    );
    let app = ecp_router(ctx);

    let (status, _, _) = send(&app, "POST", "/keypress/Home").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn keydown_and_keyup_never_publish() {
    let (app, _, bus) = test_app("Netflix");

    let (down, _, _) = send(&app, "POST", "/keydown/Up").await;
    let (up, _, _) = send(&app, "POST", "/keyup/Up").await;
    assert_eq!(down, StatusCode::OK);
    assert_eq!(up, StatusCode::OK);
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn input_and_search_are_accepted() {
    let (app, _, bus) = test_app("Netflix");

    for uri in [
        "/input?literal=a",
        "/search?keyword=ghibli",
        "/search/browse?keyword=ghibli&type=movie",
        "/search",
    ] {
        let (status, _, _) = send(&app, "POST", uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
    }
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn device_info_describes_identity() {
    let (app, _, _) = test_app("Netflix");
    let (status, body, content_type) = send(&app, "GET", "/query/device-info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/xml; charset=utf-8"));
    assert!(body.starts_with("<device-info>"));
    assert!(body.contains("<udn>1f0e5a4c-2b7d-5e8f-9a01-23456789abcd</udn>"));
    assert!(body.contains("<vendor-name>Roku</vendor-name>"));
    assert!(body.contains("<power-mode>PowerOn</power-mode>"));
}

#[tokio::test]
async fn icon_and_unknown_routes_return_not_found_envelope() {
    let (app, _, bus) = test_app("Netflix");

    let (status, body, content_type) = send(&app, "GET", "/query/icon/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type.as_deref(), Some("text/xml"));
    assert!(body.starts_with("<error><status>404</status>"));

    let (status, body, _) = send(&app, "GET", "/no/such/route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("/no/such/route"));

    // Mauvaise méthode sur une route existante
    let (status, _, _) = send(&app, "GET", "/keypress/Select").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn undecodable_path_parameters_return_bad_request_envelope() {
    let (app, ctx, bus) = test_app("Netflix Hulu YouTube");
    send(&app, "POST", "/launch/1").await;

    for uri in ["/keypress/%FF", "/keydown/%FF", "/keyup/%FF", "/launch/%FF"] {
        let (status, body, content_type) = send(&app, "POST", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(content_type.as_deref(), Some("text/xml"), "{}", uri);
        assert!(
            body.starts_with("<error><status>400</status><message>Invalid path parameter:"),
            "{}: {}",
            uri,
            body
        );
    }

    assert!(bus.published().is_empty());
    assert_eq!(ctx.selection.get(), 1);
}

#[tokio::test]
async fn keypress_with_out_of_range_selection_publishes_to_none() {
    let (app, _, bus) = test_app("Netflix Hulu YouTube");
    send(&app, "POST", "/launch/42").await;

    let (status, _, _) = send(&app, "POST", "/keypress/Play").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        bus.published(),
        vec![("Roku/None".to_string(), "Play".to_string())]
    );
}
