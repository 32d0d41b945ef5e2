use crate::controller::ApiResponse;
use crate::extractors::authenticated_claims::AuthenticatedClaims;
use crate::response::flow::PrivateView;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use log::*;

/// GET a protected page
#[utoipa::path(
    get,
    path = "/private/",
    operation_id = "private_index",
    responses(
        (status = 200, description = "The access token was verified", body = PrivateView),
        (status = 302, description = "Redirect to /login without a token, or home when it fails verification"),
    )
)]
pub async fn index(AuthenticatedClaims(claims): AuthenticatedClaims, uri: Uri) -> impl IntoResponse {
    debug!("GET {} for subject {:?}", uri.path(), claims.sub);

    Json(ApiResponse::new(
        StatusCode::OK.into(),
        PrivateView::new(uri.path(), &claims),
    ))
}
