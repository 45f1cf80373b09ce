//! Submitter integration against a local relay stub.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::runtime::Handle;

use savepoint::config::ContactConfig;
use savepoint::contact::{ContactForm, SubmitOutcome, Submitter};

async fn spawn_relay(status: StatusCode) -> (String, Arc<Mutex<Option<Value>>>) {
    let captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();
    let app = Router::new().route(
        "/submit",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(body);
                (status, Json(json!({ "success": status.is_success() })))
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/submit"), captured)
}

async fn wait_for_outcome(rx: &crossbeam_channel::Receiver<SubmitOutcome>) -> SubmitOutcome {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(outcome) = rx.try_recv() {
            return outcome;
        }
        assert!(Instant::now() < deadline, "timed out waiting for outcome");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn filled_form() -> ContactForm {
    let mut form = ContactForm::new();
    form.name = "Ada Lovelace".to_string();
    form.email = "ada@example.com".to_string();
    form.company = "Analytical Engines".to_string();
    form.message = "Interested in your solutions".to_string();
    form
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn accepted_submission_posts_the_full_body() {
    let (endpoint, captured) = spawn_relay(StatusCode::OK).await;
    let config = ContactConfig {
        endpoint,
        access_key: "test-key".to_string(),
        to: "john@savepoint.com.au".to_string(),
    };
    let (submitter, outcomes) = Submitter::new(config.clone(), Handle::current());

    let form = filled_form();
    submitter.submit(form.body(&config));

    assert!(matches!(
        wait_for_outcome(&outcomes).await,
        SubmitOutcome::Accepted
    ));

    let body = captured.lock().unwrap().clone().expect("relay saw a body");
    assert_eq!(body["access_key"], "test-key");
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["company"], "Analytical Engines");
    assert_eq!(body["message"], "Interested in your solutions");
    // The destination is fixed in configuration, never user input.
    assert_eq!(body["to"], "john@savepoint.com.au");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_submission_reports_the_failure() {
    let (endpoint, _captured) = spawn_relay(StatusCode::UNPROCESSABLE_ENTITY).await;
    let config = ContactConfig {
        endpoint,
        access_key: "test-key".to_string(),
        to: "john@savepoint.com.au".to_string(),
    };
    let (submitter, outcomes) = Submitter::new(config.clone(), Handle::current());

    submitter.submit(filled_form().body(&config));

    match wait_for_outcome(&outcomes).await {
        SubmitOutcome::Rejected(err) => {
            assert!(err.to_string().contains("submission failed"), "{err}");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_relay_is_a_rejection_not_a_panic() {
    // Nothing listens on this port.
    let config = ContactConfig {
        endpoint: "http://127.0.0.1:1/submit".to_string(),
        access_key: "test-key".to_string(),
        to: "john@savepoint.com.au".to_string(),
    };
    let (submitter, outcomes) = Submitter::new(config.clone(), Handle::current());

    submitter.submit(filled_form().body(&config));

    assert!(matches!(
        wait_for_outcome(&outcomes).await,
        SubmitOutcome::Rejected(_)
    ));
}
