use std::process::{ExitCode, Termination};

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use serde::Serialize;

use kernel::KernelError;

use crate::validation::ValidationError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    errors: Vec<String>,
}

fn bad_request(errors: Vec<String>) -> Response {
    (StatusCode::BAD_REQUEST, axum::Json(ErrorResponse { errors })).into_response()
}

#[derive(Debug)]
pub enum ErrorStatus {
    Kernel(Report<KernelError>),
    Validation(ValidationError),
    /// The request could not be extracted at all (malformed json, wrong content type, bad path or query).
    Rejection(String),
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus::Kernel(e)
    }
}

impl From<ValidationError> for ErrorStatus {
    fn from(e: ValidationError) -> Self {
        ErrorStatus::Validation(e)
    }
}

impl From<JsonRejection> for ErrorStatus {
    fn from(e: JsonRejection) -> Self {
        ErrorStatus::Rejection(e.body_text())
    }
}

impl From<QueryRejection> for ErrorStatus {
    fn from(e: QueryRejection) -> Self {
        ErrorStatus::Rejection(e.body_text())
    }
}

impl From<PathRejection> for ErrorStatus {
    fn from(e: PathRejection) -> Self {
        ErrorStatus::Rejection(e.body_text())
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        match self {
            ErrorStatus::Validation(error) => {
                let fields = error
                    .violations()
                    .iter()
                    .map(|violation| violation.field())
                    .collect::<Vec<_>>();
                tracing::debug!(?fields, "Rejected invalid book");
                bad_request(
                    error
                        .violations()
                        .iter()
                        .map(|violation| violation.message().to_string())
                        .collect(),
                )
            }
            ErrorStatus::Rejection(message) => bad_request(vec![message]),
            ErrorStatus::Kernel(report) => match report.current_context() {
                KernelError::DuplicateIsbn | KernelError::InvalidArgument => {
                    bad_request(vec![report.current_context().to_string()])
                }
                KernelError::Timeout => {
                    tracing::error!("{report:?}");
                    StatusCode::REQUEST_TIMEOUT.into_response()
                }
                KernelError::Internal => {
                    tracing::error!("{report:?}");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use error_stack::Report;
    use serde_json::{json, Value};

    use kernel::KernelError;

    use crate::error::ErrorStatus;

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body")
            .to_vec()
    }

    async fn kernel_response(error: KernelError) -> (StatusCode, Vec<u8>) {
        let response = ErrorStatus::Kernel(Report::new(error)).into_response();
        let status = response.status();
        (status, body_of(response).await)
    }

    #[tokio::test]
    async fn duplicate_isbn_is_bad_request() {
        let (status, body) = kernel_response(KernelError::DuplicateIsbn).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body, json!({ "errors": ["ISBN already registered"] }));
    }

    #[tokio::test]
    async fn missing_id_is_bad_request() {
        let (status, body) = kernel_response(KernelError::InvalidArgument).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body, json!({ "errors": ["Book id must be set"] }));
    }

    #[tokio::test]
    async fn timeout_is_request_timeout() {
        let (status, body) = kernel_response(KernelError::Timeout).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn internal_error_hides_the_report() {
        let (status, body) = kernel_response(KernelError::Internal).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.is_empty());
    }
}
