use crate::api::RequestContext;
use crate::api::middleware::require_operator;
use crate::common::axum_json::JsonBody;
use crate::common::error::{ServiceResponse, ServiceResult};
use crate::common::state::AppState;
use crate::models::contacts::{
    ContactIdArgs, ContactListResponse, MarkReadResponse, SUBMIT_CONFIRMATION, SubmitContactArgs,
    SubmitContactResponse,
};
use crate::usecases::contacts;
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router, middleware};

pub fn router(state: AppState) -> Router<AppState> {
    let operator = || middleware::from_fn_with_state(state.clone(), require_operator);
    let collection = get(list).route_layer(operator()).post(submit);
    Router::new()
        .route("/api/contact", collection.clone())
        .route("/api/contact/", collection)
        .route("/api/contact/read", put(mark_read).route_layer(operator()))
        .route("/api/contact/delete", delete(remove).route_layer(operator()))
}

pub async fn submit(
    ctx: RequestContext,
    JsonBody(args): JsonBody<SubmitContactArgs>,
) -> ServiceResult<(StatusCode, Json<SubmitContactResponse>)> {
    let contact = contacts::submit(&ctx, args).await?;
    let response = SubmitContactResponse {
        success: true,
        message: SUBMIT_CONFIRMATION,
        contact,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list(ctx: RequestContext) -> ServiceResponse<ContactListResponse> {
    let messages = contacts::fetch_all(&ctx).await?;
    Ok(Json(ContactListResponse {
        success: true,
        messages,
    }))
}

pub async fn mark_read(
    ctx: RequestContext,
    JsonBody(args): JsonBody<ContactIdArgs>,
) -> ServiceResponse<MarkReadResponse> {
    let message = contacts::mark_read(&ctx, &args.id).await?;
    let messages = contacts::fetch_all(&ctx).await?;
    Ok(Json(MarkReadResponse {
        success: true,
        message,
        messages,
    }))
}

pub async fn remove(
    ctx: RequestContext,
    JsonBody(args): JsonBody<ContactIdArgs>,
) -> ServiceResponse<ContactListResponse> {
    contacts::delete(&ctx, &args.id).await?;
    let messages = contacts::fetch_all(&ctx).await?;
    Ok(Json(ContactListResponse {
        success: true,
        messages,
    }))
}
