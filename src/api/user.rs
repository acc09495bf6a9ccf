use crate::api::RequestContext;
use crate::api::middleware::bearer_token;
use crate::common::axum_ip::IpAddrInfo;
use crate::common::axum_json::JsonBody;
use crate::common::error::ServiceResponse;
use crate::common::state::AppState;
use crate::models::users::{LoginArgs, LoginResponse, LogoutResponse};
use crate::usecases::sessions;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/user/login", post(login))
        .route("/api/user/logout", post(logout))
}

pub async fn login(
    ctx: RequestContext,
    request_ip: IpAddrInfo,
    JsonBody(args): JsonBody<LoginArgs>,
) -> ServiceResponse<LoginResponse> {
    info!(ip = ?request_ip.ip_addr, "Login attempt");
    let session = sessions::create(&ctx, args).await?;
    Ok(Json(LoginResponse {
        user_id: session.user_id,
        name: session.name,
        email: session.email,
        token: session.session_id,
    }))
}

pub async fn logout(ctx: RequestContext, headers: HeaderMap) -> ServiceResponse<LogoutResponse> {
    if let Some(session_id) = bearer_token(&headers) {
        sessions::delete(&ctx, session_id).await?;
    }
    Ok(Json(LogoutResponse { success: true }))
}
