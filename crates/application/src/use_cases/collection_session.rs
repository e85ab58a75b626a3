//! Collection Session Use Case
//!
//! Submits collections through the comparator and removes them again in an
//! explicit teardown, so scenarios do not leak collections into each other.

use probe_domain::{CollectionRef, CollectionSubmission};
use tracing::{info, warn};

use super::{CompareOutcome, CompareRequest};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{FixtureStore, HttpClient, ResponseComparator};

/// Tracks collections created during one scenario.
pub struct CollectionSession<'a, C, S, R> {
    compare: &'a CompareRequest<C, S, R>,
    owner: String,
    created: Vec<CollectionRef>,
}

impl<'a, C, S, R> CollectionSession<'a, C, S, R>
where
    C: HttpClient,
    S: FixtureStore,
    R: ResponseComparator,
{
    /// Starts a session for collections owned by `owner`.
    pub fn new(compare: &'a CompareRequest<C, S, R>, owner: impl Into<String>) -> Self {
        Self {
            compare,
            owner: owner.into(),
            created: Vec::new(),
        }
    }

    /// Collections created so far, oldest first.
    #[must_use]
    pub fn created(&self) -> &[CollectionRef] {
        &self.created
    }

    /// Submits a collection and compares the response with `test_name`.
    ///
    /// The collection is remembered for teardown as soon as the service
    /// accepts it, even if the response then mismatches the fixture.
    ///
    /// # Errors
    ///
    /// Returns `HttpStatus` when the service rejects the submission (for
    /// example a duplicate id) and any error of [`CompareRequest::execute`].
    pub async fn submit(
        &mut self,
        submission: &CollectionSubmission,
        test_name: &str,
    ) -> ApplicationResult<CompareOutcome> {
        let request = submission.to_request()?;
        let result = self.compare.execute(&request, test_name).await;

        if !matches!(
            result,
            Err(ApplicationError::HttpStatus { .. }
                | ApplicationError::Transport(_)
                | ApplicationError::Domain(_))
        ) {
            let reference = submission.reference(self.owner.clone());
            info!(collection = %reference, "collection submitted");
            if !self.created.contains(&reference) {
                self.created.push(reference);
            }
        }
        result
    }

    /// Removes one collection.
    ///
    /// # Errors
    ///
    /// Returns `Transport` or `HttpStatus` if the removal request fails.
    pub async fn remove(&mut self, reference: &CollectionRef) -> ApplicationResult<()> {
        self.compare.send(&reference.removal_request()).await?;
        self.created.retain(|r| r != reference);
        info!(collection = %reference, "collection removed");
        Ok(())
    }

    /// Removes every collection created in this session, newest first.
    ///
    /// Every removal is attempted; collections that could not be removed
    /// stay tracked.
    ///
    /// # Errors
    ///
    /// Returns `Teardown` carrying the first failure if any removal failed.
    pub async fn teardown(&mut self) -> ApplicationResult<()> {
        let mut failed = 0;
        let mut first = None;

        for reference in std::mem::take(&mut self.created).into_iter().rev() {
            match self.compare.send(&reference.removal_request()).await {
                Ok(_) => info!(collection = %reference, "collection removed"),
                Err(err) => {
                    warn!(collection = %reference, error = %err, "failed to remove collection");
                    failed += 1;
                    first.get_or_insert(err);
                    self.created.insert(0, reference);
                }
            }
        }

        match first {
            None => Ok(()),
            Some(first) => Err(ApplicationError::Teardown {
                failed,
                first: Box::new(first),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::{FixtureStoreError, HttpClientError, HttpClientFuture};
    use probe_domain::{
        ComparisonReport, Fixture, FixtureKey, RecordMode, RequestSpec, ResponseSpec,
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Fake service: accepts each collection id once, removes on request.
    #[derive(Default)]
    struct FakeService {
        stored: Mutex<HashSet<String>>,
        fail_removals: bool,
        paths: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn reply(status: u16, body: &str) -> Result<ResponseSpec, HttpClientError> {
            Ok(ResponseSpec::new(
                status,
                Vec::new(),
                body.as_bytes().to_vec(),
                Duration::ZERO,
            ))
        }
    }

    impl HttpClient for FakeService {
        fn execute(&self, request: &RequestSpec) -> HttpClientFuture<'_> {
            let path = request.normalized_path();
            self.paths.lock().unwrap().push(path.clone());

            let result = if path == "/submit" {
                let id = request
                    .form
                    .as_ref()
                    .and_then(|f| f.text_value("id"))
                    .unwrap_or_default()
                    .to_string();
                if self.stored.lock().unwrap().insert(id) {
                    Self::reply(200, "Successfully uploaded")
                } else {
                    Self::reply(400, "Collection ID/Version already in use")
                }
            } else if path.ends_with("/removeCollection") && !self.fail_removals {
                let id = path.split('/').nth(3).unwrap_or_default().to_string();
                self.stored.lock().unwrap().remove(&id);
                Self::reply(200, "")
            } else {
                Self::reply(404, "Not Found")
            };
            Box::pin(async move { result })
        }
    }

    struct NullStore;

    impl FixtureStore for NullStore {
        fn location(&self, key: &FixtureKey) -> String {
            key.file_name()
        }

        async fn load(&self, _key: &FixtureKey) -> Result<Option<Fixture>, FixtureStoreError> {
            Ok(None)
        }

        async fn save(&self, _fixture: &Fixture) -> Result<(), FixtureStoreError> {
            Ok(())
        }
    }

    struct AcceptAll;

    impl ResponseComparator for AcceptAll {
        fn normalize_body(&self, response: &ResponseSpec) -> String {
            response.body_text()
        }

        fn tracks_header(&self, _name: &str) -> bool {
            false
        }

        fn compare(&self, fixture: &Fixture, _response: &ResponseSpec) -> ComparisonReport {
            ComparisonReport::new(fixture.path.clone(), Vec::new())
        }
    }

    type Harness = CompareRequest<FakeService, NullStore, AcceptAll>;

    fn compare(service: FakeService) -> Harness {
        with_service(service).1
    }

    fn with_service(service: FakeService) -> (Arc<FakeService>, Harness) {
        let service = Arc::new(service);
        let compare = CompareRequest::new(
            Arc::clone(&service),
            Arc::new(NullStore),
            Arc::new(AcceptAll),
        )
        .with_record_mode(RecordMode::Always);
        (service, compare)
    }

    fn submission(id: &str) -> CollectionSubmission {
        CollectionSubmission::new(id, format!("{id} collection"), "BBa_I0462.xml")
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_http_error() {
        let compare = compare(FakeService::default());
        let mut session = CollectionSession::new(&compare, "testuser");

        session.submit(&submission("testid"), "submit_test_BBa").await.unwrap();
        let err = session
            .submit(&submission("testid"), "submit_already_in_use")
            .await
            .unwrap_err();

        assert_eq!(err.http_status(), Some(400));
        assert_eq!(session.created().len(), 1);
    }

    #[tokio::test]
    async fn test_teardown_removes_newest_first() {
        let (service, compare) = with_service(FakeService::default());
        let mut session = CollectionSession::new(&compare, "testuser");

        session.submit(&submission("testid"), "submit_test_BBa").await.unwrap();
        session.submit(&submission("testid2"), "create_2").await.unwrap();
        session.teardown().await.unwrap();

        assert!(session.created().is_empty());
        let paths = service.paths.lock().unwrap().clone();
        assert_eq!(
            paths[2..].to_vec(),
            vec![
                "/user/testuser/testid2/testid2_collection/1/removeCollection".to_string(),
                "/user/testuser/testid/testid_collection/1/removeCollection".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_teardown_allows_resubmission() {
        let compare = compare(FakeService::default());
        let mut session = CollectionSession::new(&compare, "testuser");

        session.submit(&submission("testid"), "").await.unwrap();
        session.teardown().await.unwrap();
        session.submit(&submission("testid"), "").await.unwrap();
    }

    #[tokio::test]
    async fn test_teardown_failure_keeps_tracking() {
        let compare = compare(FakeService {
            fail_removals: true,
            ..FakeService::default()
        });
        let mut session = CollectionSession::new(&compare, "testuser");

        session.submit(&submission("testid"), "").await.unwrap();
        session.submit(&submission("testid2"), "").await.unwrap();
        let err = session.teardown().await.unwrap_err();

        match err {
            ApplicationError::Teardown { failed, first } => {
                assert_eq!(failed, 2);
                assert_eq!(first.http_status(), Some(404));
            }
            other => panic!("unexpected error: {other}"),
        }
        let ids: Vec<_> = session.created().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["testid", "testid2"]);
    }

    #[tokio::test]
    async fn test_remove_single() {
        let compare = compare(FakeService::default());
        let mut session = CollectionSession::new(&compare, "testuser");

        session.submit(&submission("testid"), "").await.unwrap();
        let reference = session.created()[0].clone();
        session.remove(&reference).await.unwrap();
        assert!(session.created().is_empty());
    }
}
