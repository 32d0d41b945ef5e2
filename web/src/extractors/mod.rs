pub(crate) mod authenticated_claims;

use axum::http::StatusCode;

type RejectionType = (StatusCode, String);
