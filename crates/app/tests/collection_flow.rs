//! End-to-end scenario against an in-process collection service.
//!
//! Mirrors an admin session: check the main page, submit two collections,
//! verify a duplicate is rejected, check the listing views, then tear the
//! collections down again and check the listings are empty.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{FakeService, OWNER, TOKEN, first_collection, form_field, second_collection};
use pretty_assertions::assert_eq;
use probe_application::{ApplicationError, CollectionSession, CompareOutcome};
use probe_application::HttpClientError;
use probe_domain::{Header, Headers};
use wiremock::MockServer;

fn accept_text() -> Headers {
    [Header::new("Accept", "text/plain")].into_iter().collect()
}

#[tokio::test]
async fn test_main_page_matches_after_admin_login() {
    let service = FakeService::start().await;
    let harness = service.harness();

    let outcome = harness
        .get("/", "after_admin_login", accept_text())
        .await
        .unwrap();

    match outcome {
        CompareOutcome::Matched(report) => {
            assert!(report.all_passed());
            assert_eq!(report.fixture, "GET / [after_admin_login]");
        }
        CompareOutcome::Recorded { .. } => panic!("nothing should be recorded"),
    }
}

#[tokio::test]
async fn test_create_and_delete_collections() {
    let service = FakeService::start().await;
    let harness = service.harness();
    let mut session = CollectionSession::new(&harness, OWNER);

    session
        .submit(&first_collection(), "submit_test_BBa")
        .await
        .unwrap();

    let err = session
        .submit(&first_collection(), "submit_already_in_use")
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), Some(400));

    session
        .submit(&second_collection(), "create_2")
        .await
        .unwrap();

    harness
        .get("manage", "two_submissions", Headers::new())
        .await
        .unwrap();
    harness
        .get("submit", "two_submissions", Headers::new())
        .await
        .unwrap();

    assert_eq!(service.collections.ids(), vec!["testid", "testid2"]);

    session.teardown().await.unwrap();
    assert!(session.created().is_empty());
    assert!(service.collections.ids().is_empty());

    // Teardown frees the id for the next run.
    session
        .submit(&first_collection(), "submit_test_BBa")
        .await
        .unwrap();
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_submission_sends_token_and_multipart_fields() {
    let service = FakeService::start().await;
    let harness = service.harness();
    let mut session = CollectionSession::new(&harness, OWNER);

    session
        .submit(&first_collection(), "submit_test_BBa")
        .await
        .unwrap();

    let requests = service.server.received_requests().await.unwrap();
    let submit = requests
        .iter()
        .find(|r| r.url.path() == "/submit")
        .unwrap();

    let token = submit.headers.get("x-authorization").unwrap();
    assert_eq!(token.to_str().unwrap(), TOKEN);
    assert_eq!(
        submit.headers.get("accept").unwrap().to_str().unwrap(),
        "text/plain"
    );

    for (name, value) in [
        ("id", "testid"),
        ("version", "1"),
        ("name", "testcollection"),
        ("description", "testdescription"),
        ("citations", "none"),
        ("overwrite_merge", "0"),
    ] {
        assert_eq!(form_field(&submit.body, name).as_deref(), Some(value), "field {name}");
    }

    let body = String::from_utf8_lossy(&submit.body);
    assert!(body.contains("name=\"file\"; filename=\"BBa_I0462.xml\""));
    assert!(body.contains("<sbol:displayId>BBa_I0462</sbol:displayId>"));

    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_listing_mismatch_reports_diff() {
    let service = FakeService::start().await;
    let harness = service.harness();
    let mut session = CollectionSession::new(&harness, OWNER);

    // Only one collection exists, so the two-submission listing differs.
    session
        .submit(&first_collection(), "submit_test_BBa")
        .await
        .unwrap();

    let err = harness
        .get("manage", "two_submissions", Headers::new())
        .await
        .unwrap_err();

    let report = err.mismatch().unwrap();
    assert_eq!(report.failed, 1);
    let diff = report.failures().next().unwrap().diff.clone().unwrap();
    assert!(diff.contains("-testid2"));

    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_teardown_reports_unremovable_collections() {
    let service = FakeService::start().await;
    let harness = service.harness();
    let mut session = CollectionSession::new(&harness, OWNER);

    session
        .submit(&first_collection(), "submit_test_BBa")
        .await
        .unwrap();
    let first = session.created()[0].clone();
    session.remove(&first).await.unwrap();
    session
        .submit(&second_collection(), "create_2")
        .await
        .unwrap();
    // Removed behind the session's back.
    service.collections.clear();

    let err = session.teardown().await.unwrap_err();
    match err {
        ApplicationError::Teardown { failed, first } => {
            assert_eq!(failed, 1);
            assert_eq!(first.http_status(), Some(404));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.created().len(), 1);
}

#[tokio::test]
async fn test_listings_empty_before_and_after_submissions() {
    let service = FakeService::start().await;
    let harness = service.harness();
    let mut session = CollectionSession::new(&harness, OWNER);

    for path in ["submit", "manage"] {
        let outcome = harness.get(path, "", Headers::new()).await.unwrap();
        match outcome {
            CompareOutcome::Matched(report) => {
                assert_eq!(report.fixture, format!("GET /{path}"));
            }
            CompareOutcome::Recorded { .. } => panic!("nothing should be recorded"),
        }
    }

    session
        .submit(&first_collection(), "submit_test_BBa")
        .await
        .unwrap();
    let err = harness.get("submit", "", Headers::new()).await.unwrap_err();
    assert!(err.mismatch().is_some());

    session.teardown().await.unwrap();
    harness.get("submit", "", Headers::new()).await.unwrap();
    harness.get("manage", "", Headers::new()).await.unwrap();
}

#[tokio::test]
async fn test_absolute_path_is_not_sent_elsewhere() {
    let service = FakeService::start().await;
    let other = MockServer::start().await;
    let harness = service.harness();

    let err = harness
        .get(&format!("{}/steal", other.uri()), "", Headers::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApplicationError::Transport(HttpClientError::InvalidUrl(_))),
        "unexpected error: {err}"
    );
    assert!(other.received_requests().await.unwrap().is_empty());
    assert!(service.server.received_requests().await.unwrap().is_empty());
}
