//! End-to-end submission tests against a stub user service.

use std::io::Write;
use std::net::TcpListener;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use registration::domain::{
    FAILURE_MESSAGE, FormState, RegistrationFlow, SUCCESS_MESSAGE, SubmitReport,
};
use registration::outbound::users_api::{HttpUserRegistry, users_endpoint};
use rstest::rstest;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;

use support::{CapturedLogs, valid_form};

fn flow_for(base: &str) -> RegistrationFlow {
    let base = Url::parse(base).expect("valid base url");
    let endpoint = users_endpoint(&base).expect("users endpoint");
    let registry = HttpUserRegistry::new(endpoint).expect("client builds");
    RegistrationFlow::new(Arc::new(registry))
}

/// Serve one connection that sends a 500 head and part of its body, then
/// stalls until the returned sender is dropped.
fn stalled_error_body_base() -> (String, mpsc::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let (release, held) = mpsc::channel::<()>();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        stream
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 1000\r\n\r\npartial",
            )
            .expect("write partial response");
        stream.flush().expect("flush partial response");
        let _released = held.recv();
    });
    (format!("http://{addr}"), release)
}

fn unused_local_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

#[rstest]
#[tokio::test]
async fn posts_registration_json_and_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "name": "Ana",
            "age": 30,
            "email": "ana@x.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow_for(&server.uri());
    let report = flow.submit(&valid_form()).await;

    assert!(report.is_success());
    assert_eq!(report.status_message(), Some(SUCCESS_MESSAGE));
    assert_eq!(flow.state(), FormState::Succeeded);
}

#[rstest]
#[tokio::test]
async fn keeps_base_url_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow_for(&format!("{}/api", server.uri()));
    assert!(flow.submit(&valid_form()).await.is_success());
}

#[rstest]
#[tokio::test]
async fn rejected_registration_shows_generic_message_and_logs_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(409).set_body_string("email already registered"))
        .expect(1)
        .mount(&server)
        .await;
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let flow = flow_for(&server.uri());
    let report = flow.submit(&valid_form()).await;

    assert_eq!(report.status_message(), Some(FAILURE_MESSAGE));
    assert_eq!(flow.state(), FormState::Failed);
    let captured = logs.contents();
    assert!(captured.contains("user registration failed"), "{captured}");
    assert!(
        captured.contains("status 409: email already registered"),
        "{captured}"
    );
    assert!(!captured.contains("secret"), "passwords must not be logged");
}

#[rstest]
#[tokio::test]
async fn network_failure_shows_generic_message_and_logs_raw_error() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let flow = flow_for(&unused_local_base());
    let report = flow.submit(&valid_form()).await;

    let SubmitReport::Submitted(outcome) = &report else {
        panic!("expected a submission attempt, got {report:?}");
    };
    assert_eq!(outcome.message(), FAILURE_MESSAGE);
    assert_eq!(flow.state(), FormState::Failed);
    let captured = logs.contents();
    assert!(captured.contains("user service transport failed"), "{captured}");
    assert!(captured.contains("a***@x.com"), "{captured}");
}

#[rstest]
#[tokio::test]
async fn invalid_form_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = valid_form();
    form.name = String::new();
    form.age = Some("101".to_owned());

    let flow = flow_for(&server.uri());
    let report = flow.submit(&form).await;

    let SubmitReport::Invalid(errors) = &report else {
        panic!("expected validation failure, got {report:?}");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(flow.state(), FormState::Invalid);
    flow.note_edit();
    assert_eq!(flow.state(), FormState::Idle);
}

#[rstest]
#[tokio::test]
async fn stalled_error_body_still_settles_as_failure() {
    let (base, _release) = stalled_error_body_base();
    let endpoint = users_endpoint(&Url::parse(&base).expect("valid base url")).expect("endpoint");
    let registry = HttpUserRegistry::new(endpoint)
        .expect("client builds")
        .with_error_body_timeout(Duration::from_millis(200));
    let flow = RegistrationFlow::new(Arc::new(registry));
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let report = tokio::time::timeout(Duration::from_secs(5), flow.submit(&valid_form()))
        .await
        .expect("submission settles once the status is known");

    assert_eq!(report.status_message(), Some(FAILURE_MESSAGE));
    assert_eq!(flow.state(), FormState::Failed);
    let captured = logs.contents();
    assert!(captured.contains("status 500: partial"), "{captured}");

    let mut edited = valid_form();
    edited.email = "abc".to_owned();
    let next = flow.submit(&edited).await;
    assert!(
        matches!(next, SubmitReport::Invalid(_)),
        "form should accept a new attempt, got {next:?}"
    );
}
