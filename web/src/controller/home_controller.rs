use crate::controller::ApiResponse;
use crate::response::flow::FlowView;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::oauth_flow;
use log::*;

/// GET the current flow state and what the token store holds
#[utoipa::path(
    get,
    path = "/",
    operation_id = "home_index",
    responses(
        (status = 200, description = "Current flow state", body = FlowView),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    let snapshot = oauth_flow::snapshot(&app_state.token_store, &app_state.login_states);
    debug!("GET home view in state {:?}", snapshot.flow_state);

    Json(ApiResponse::new(
        StatusCode::OK.into(),
        FlowView::from(snapshot),
    ))
}
