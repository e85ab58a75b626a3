//! Shared setup for end-to-end suites: an in-process stand-in for the
//! collection service, built on wiremock.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use probe_domain::{CollectionSubmission, HarnessConfig};
use probe_infrastructure::{Harness, build_harness, init_test_tracing};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Token the fake service accepts.
pub const TOKEN: &str = "e35054aa-04e3-425c-afd2-66cb95ff66e1";

/// Owner collections are created under.
pub const OWNER: &str = "testuser";

const TEXT: &str = "text/plain; charset=utf-8";

/// Collection ids currently stored by the fake service.
#[derive(Clone, Default)]
pub struct Collections(Arc<Mutex<BTreeSet<String>>>);

impl Collections {
    pub fn ids(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().cloned().collect()
    }

    /// Forgets every collection, as if removed outside the harness.
    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    fn listing(&self, title: &str) -> String {
        let mut body = format!("{title}\n");
        for id in self.ids() {
            body.push_str(&id);
            body.push('\n');
        }
        body
    }
}

/// Extracts a text field from a multipart body.
pub fn form_field(body: &[u8], name: &str) -> Option<String> {
    let body = String::from_utf8_lossy(body);
    let marker = format!("name=\"{name}\"\r\n\r\n");
    let start = body.find(&marker)? + marker.len();
    let end = body[start..].find("\r\n")?;
    Some(body[start..start + end].to_string())
}

struct Submit(Collections);

impl Respond for Submit {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(id) = form_field(&request.body, "id") else {
            return ResponseTemplate::new(400).set_body_raw("Missing id", TEXT);
        };
        let overwrite = form_field(&request.body, "overwrite_merge").unwrap_or_default();

        let inserted = self.0.0.lock().unwrap().insert(id);
        if inserted || overwrite == "1" || overwrite == "3" {
            ResponseTemplate::new(200).set_body_raw("Successfully uploaded", TEXT)
        } else {
            ResponseTemplate::new(400)
                .set_body_raw("Submission id and version already in use", TEXT)
        }
    }
}

struct Listing(Collections, &'static str);

impl Respond for Listing {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(self.0.listing(self.1), TEXT)
    }
}

struct Remove(Collections);

impl Respond for Remove {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        // /user/<owner>/<id>/<id>_collection/<version>/removeCollection
        let id = request
            .url
            .path_segments()
            .and_then(|mut segments| segments.nth(2))
            .unwrap_or_default()
            .to_string();
        if self.0.0.lock().unwrap().remove(&id) {
            ResponseTemplate::new(200).set_body_raw("", TEXT)
        } else {
            ResponseTemplate::new(404).set_body_raw("Collection not found", TEXT)
        }
    }
}

/// A running fake service and the state behind it.
pub struct FakeService {
    pub server: MockServer,
    pub collections: Collections,
}

impl FakeService {
    pub async fn start() -> Self {
        init_test_tracing();
        let server = MockServer::start().await;
        let collections = Collections::default();

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("accept", "text/plain"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("SynBioHub\nLogged in as testuser\n", TEXT),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(header("x-authorization", TOKEN))
            .respond_with(Submit(collections.clone()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/submit"))
            .respond_with(Listing(collections.clone(), "Submissions"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/manage"))
            .respond_with(Listing(collections.clone(), "Manage Submissions"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path_regex(
                r"^/user/[^/]+/[^/]+/[^/]+_collection/[^/]+/removeCollection$",
            ))
            .and(header("x-authorization", TOKEN))
            .respond_with(Remove(collections.clone()))
            .mount(&server)
            .await;

        Self {
            server,
            collections,
        }
    }

    /// Configuration pointing at this service and the committed fixtures.
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig {
            data_dir: Some(data_dir()),
            ..HarnessConfig::new(self.server.uri())
                .with_fixture_dir(fixture_dir())
                .with_auth_token(TOKEN)
        }
    }

    pub fn harness(&self) -> Harness {
        build_harness(&self.config()).unwrap()
    }

    pub fn harness_with(&self, config: &HarnessConfig) -> Harness {
        build_harness(config).unwrap()
    }
}

pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

/// The first collection submitted by the scenario.
pub fn first_collection() -> CollectionSubmission {
    CollectionSubmission::new("testid", "testcollection", "BBa_I0462.xml")
        .with_description("testdescription")
}

/// The second collection submitted by the scenario.
pub fn second_collection() -> CollectionSubmission {
    CollectionSubmission::new("testid2", "testcollection2", "BBa_I0462.xml")
        .with_description("testdescription")
}
