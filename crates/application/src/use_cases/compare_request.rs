//! Compare Request Use Case
//!
//! Issues one request against the service under test and checks the
//! response against the stored fixture for that request and test name.
//!
//! The flow is strictly sequential: send, check status, load fixture,
//! compare (or record). Nothing is retried.

use std::sync::Arc;

use probe_domain::{
    ComparisonReport, Fixture, FixtureKey, FormData, Headers, RecordMode, RequestSpec,
    ResponseSpec, StatusExpectation,
};
use tracing::{debug, info, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{FixtureStore, HttpClient, ResponseComparator};

/// Outcome of a successful comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    /// The live response matched the stored fixture.
    Matched(ComparisonReport),
    /// The live response was written as the fixture.
    Recorded {
        /// Where the fixture was written.
        location: String,
    },
}

impl CompareOutcome {
    /// Returns true if the fixture was (re)written.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

/// Use case comparing live responses with fixtures.
///
/// # Example
///
/// ```ignore
/// let compare = CompareRequest::new(client, store, comparator);
///
/// let headers: Headers = [("Accept", "text/plain")].into_iter().collect();
/// compare.get("/", "after_admin_login", headers).await?;
/// ```
pub struct CompareRequest<C, S, R> {
    client: Arc<C>,
    store: Arc<S>,
    comparator: Arc<R>,
    record_mode: RecordMode,
}

impl<C, S, R> CompareRequest<C, S, R>
where
    C: HttpClient,
    S: FixtureStore,
    R: ResponseComparator,
{
    /// Creates the use case with read-only fixtures.
    pub const fn new(client: Arc<C>, store: Arc<S>, comparator: Arc<R>) -> Self {
        Self {
            client,
            store,
            comparator,
            record_mode: RecordMode::Never,
        }
    }

    /// Sets the record mode (builder pattern).
    #[must_use]
    pub const fn with_record_mode(mut self, mode: RecordMode) -> Self {
        self.record_mode = mode;
        self
    }

    /// Returns the configured record mode.
    #[must_use]
    pub const fn record_mode(&self) -> RecordMode {
        self.record_mode
    }

    /// Issues `GET path` and compares the response with its fixture.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn get(
        &self,
        path: &str,
        test_name: &str,
        headers: Headers,
    ) -> ApplicationResult<CompareOutcome> {
        let request = RequestSpec::get(path).with_headers(headers);
        self.execute(&request, test_name).await
    }

    /// Issues a multipart `POST path` and compares the response with its fixture.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn post(
        &self,
        path: &str,
        form: FormData,
        test_name: &str,
        headers: Headers,
    ) -> ApplicationResult<CompareOutcome> {
        let request = RequestSpec::post(path, form).with_headers(headers);
        self.execute(&request, test_name).await
    }

    /// Sends the request and fails on any non-2xx status.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if no response arrived and `HttpStatus` for a
    /// non-2xx status.
    pub async fn send(&self, request: &RequestSpec) -> ApplicationResult<ResponseSpec> {
        request.validate()?;
        let path = request.normalized_path();
        debug!(method = %request.method, path = %path, "sending request");

        let response = self.client.execute(request).await?;
        debug!(
            method = %request.method,
            path = %path,
            status = response.status,
            elapsed = %response.duration_display(),
            "received response"
        );

        if StatusExpectation::success().matches(response.status) {
            Ok(response)
        } else {
            Err(ApplicationError::HttpStatus {
                method: request.method,
                path,
                status: response.status,
                body: response.body_text(),
            })
        }
    }

    /// Sends the request and compares the response with the fixture named
    /// `test_name` (empty for the endpoint's default fixture).
    ///
    /// # Errors
    ///
    /// - `Domain` for an invalid request or test name (checked before sending)
    /// - `Transport` / `HttpStatus` from [`Self::send`]
    /// - `FixtureMissing` when no fixture exists and recording is off
    /// - `Fixture` when the store fails
    /// - `Mismatch` when any check fails
    pub async fn execute(
        &self,
        request: &RequestSpec,
        test_name: &str,
    ) -> ApplicationResult<CompareOutcome> {
        let key = FixtureKey::for_request(request, test_name)?;
        let response = self.send(request).await?;

        if self.record_mode == RecordMode::Always {
            return self.record(&key, &response).await;
        }

        match self.store.load(&key).await? {
            Some(fixture) => self.compare(&key, &fixture, &response),
            None if self.record_mode == RecordMode::Missing => self.record(&key, &response).await,
            None => Err(ApplicationError::FixtureMissing {
                key: key.to_string(),
                location: self.store.location(&key),
            }),
        }
    }

    fn compare(
        &self,
        key: &FixtureKey,
        fixture: &Fixture,
        response: &ResponseSpec,
    ) -> ApplicationResult<CompareOutcome> {
        let report = self.comparator.compare(fixture, response);
        if report.all_passed() {
            debug!(fixture = %key, checks = report.total, "response matches fixture");
            Ok(CompareOutcome::Matched(report))
        } else {
            warn!(fixture = %key, failed = report.failed, "response does not match fixture");
            Err(ApplicationError::Mismatch(Box::new(report)))
        }
    }

    async fn record(
        &self,
        key: &FixtureKey,
        response: &ResponseSpec,
    ) -> ApplicationResult<CompareOutcome> {
        let body = self.comparator.normalize_body(response);
        let fixture = Fixture::capture(key, response, &self.tracked_headers(response), body);
        self.store.save(&fixture).await?;

        let location = self.store.location(key);
        info!(fixture = %key, location = %location, "recorded fixture");
        Ok(CompareOutcome::Recorded { location })
    }

    fn tracked_headers(&self, response: &ResponseSpec) -> Vec<String> {
        response
            .headers
            .keys()
            .filter(|name| self.comparator.tracks_header(name))
            .cloned()
            .collect()
    }
}
