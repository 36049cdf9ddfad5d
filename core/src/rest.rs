// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic code for HTTP handlers.
//!
//! All applications should implement an `app` function in this module that returns the `Router`
//! for the application.
//!
//! Every page should be put in its own `.rs` file, using a name like `<entity>_<action>.rs`.  This
//! may seem overkill, but putting every page in its own file makes it easy to ensure all the
//! integration tests for the given page truly belong to that page.
//!
//! More specifically, the `tests` module within a page should define a `route` method that
//! returns the HTTP method and the path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired page.
//!
//! It is also useful for the tests in this layer to define a `TestContext` in a `testutils` module
//! that allows interacting with the database layer directly, using simplified types.

use crate::driver::DriverError;
use crate::model::ModelError;
use crate::template;
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::response::{Html, IntoResponse};
use log::{error, warn};

/// HTML document rendered for any request that fails.
const ERROR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>%title%</title></head>

<body>
<h1>%title%</h1>

<p class="error">%message%</p>

<p><a href="/">Back to the home page</a></p>
</body>
</html>
"#;

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl RestError {
    /// Returns the HTTP status code and the page title that describe this error.
    fn status(&self) -> (http::StatusCode, &'static str) {
        match self {
            RestError::InternalError(_) => {
                (http::StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            RestError::InvalidRequest(_) => (http::StatusCode::BAD_REQUEST, "Invalid request"),
            RestError::NotFound(_) => (http::StatusCode::NOT_FOUND, "Not found"),
            RestError::PayloadNotEmpty => (http::StatusCode::PAYLOAD_TOO_LARGE, "Invalid request"),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let (status, title) = self.status();
        match self {
            RestError::InternalError(ref message) => error!("Request failed: {}", message),
            ref e => warn!("Request rejected with {}: {}", status, e),
        }

        let message = template::escape(&self.to_string());
        let body = template::apply(ERROR_TEMPLATE, &[("title", title), ("message", &message)]);

        (status, Html(body)).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// A request body extractor that forbids any content.
///
/// Any page that doesn't expect a body should use this to ensure we don't get garbage data that
/// we don't care about.  This future-proofs the application.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Common test code for the HTTP server.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::http;
    use serde::Serialize;
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 256 * 1024;

    /// Builder for a single request to the application.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: axum::http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(self) -> ResponseChecker {
            let request = self.builder.body(axum::body::Body::empty()).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(axum::body::Body::from(text.into()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a form encoded in the body as the
        /// payload.
        ///
        /// Passing a slice of pairs allows the same key to appear more than once, which is how
        /// browsers submit multi-valued fields such as groups of checkboxes.
        pub async fn send_form<T: Serialize>(self, request: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
                .body(axum::body::Body::from(serde_urlencoded::to_string(&request).unwrap()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }
    }

    /// Type alias for the complex type returned by the `oneshot` function.
    type HttpResponse = hyper::Response<axum::body::Body>;

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: HttpResponse,

        /// Expected HTTP status code in the response above.
        exp_status: http::StatusCode,
    }

    impl From<HttpResponse> for ResponseChecker {
        fn from(response: HttpResponse) -> Self {
            Self { response, exp_status: http::StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Consumes the response and returns its body as UTF-8.
        async fn into_text(self) -> String {
            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            String::from_utf8(body.to_vec()).unwrap()
        }

        /// Finishes checking the response and expects it to be an error page whose message
        /// matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            self.verify();

            let body = self.into_text().await;
            assert!(body.contains("class=\"error\""), "Body is not an error page: {}", body);
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Error page '{}' does not match re '{}'", body, exp_re);
        }

        /// Finishes checking the response and expects it to be a redirection to `exp_location`.
        pub async fn expect_redirect(mut self, exp_location: &str) {
            self.exp_status = http::StatusCode::SEE_OTHER;
            self.verify();

            let location = self
                .response
                .headers()
                .get(http::header::LOCATION)
                .expect("Redirections must carry a Location header")
                .to_str()
                .unwrap();
            assert_eq!(exp_location, location);
        }

        /// Finishes checking the response and expects its body to be valid UTF-8 and to match
        /// `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use take_body_as_text to validate empty responses");

            self.verify();

            let body = self.into_text().await;
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
        }

        /// Finishes checking the response and returns the body of the response as UTF-8.
        pub async fn take_body_as_text(self) -> String {
            self.verify();

            self.into_text().await
        }

        /// Finishes checking the response and returns the response itself for out of band
        /// validation of properties not supported by the `ResponseChecker`.
        pub async fn take_response(self) -> HttpResponse {
            self.verify();

            self.response
        }
    }

    /// Generates a test to verify that a page that does not expect a payload fails as necessary.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;

    /// Generates a test to verify that a form endpoint rejects payloads that are not forms.
    #[macro_export]
    macro_rules! test_payload_must_be_form {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_form() {
                // Form rejections are produced by axum and are not funneled through RestError,
                // so they are plain text instead of error pages.
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("this is not a form")
                    .await
                    .expect_status(axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE)
                    .expect_text("Content-Type")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_form;
}
