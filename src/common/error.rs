use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

/// Underlying text of an unexpected error, carried in the response
/// extensions so that a layer holding the app state can decide to show it.
#[derive(Debug, Clone)]
pub struct UnexpectedDetail(pub String);

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    let e = e.into();
    error!("An unexpected error has occurred at {caller}: {e}");
    Err(AppError::Unexpected(e.to_string()))
}

#[derive(Debug)]
pub enum AppError {
    Unexpected(String),
    Unauthorized,
    DecodingRequestFailed,
    RouteNotFound,

    ContactsMissingFields,
    ContactsInvalidId,

    SessionsMissingCredentials,
    SessionsInvalidCredentials,

    UsersEmailTaken,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        match unexpected::<(), E>(e) {
            Err(e) => e,
            Ok(()) => unreachable!(),
        }
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected(_) => "unexpected",
            AppError::Unauthorized => "unauthorized",
            AppError::DecodingRequestFailed => "decoding_request_failed",
            AppError::RouteNotFound => "not_found",

            AppError::ContactsMissingFields => "contacts.missing_fields",
            AppError::ContactsInvalidId => "contacts.invalid_id",

            AppError::SessionsMissingCredentials => "sessions.missing_credentials",
            AppError::SessionsInvalidCredentials => "sessions.invalid_credentials",

            AppError::UsersEmailTaken => "users.email_taken",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected(_) => "Server Error",
            AppError::Unauthorized => "You are not authorized to perform this action.",
            AppError::DecodingRequestFailed => "Failed to decode request",
            AppError::RouteNotFound => "Not Found",

            AppError::ContactsMissingFields => "Please provide all required fields",
            AppError::ContactsInvalidId => "Invalid message id",

            AppError::SessionsMissingCredentials => "Please provide email and password",
            AppError::SessionsInvalidCredentials => "Invalid email or password",

            AppError::UsersEmailTaken => "A user with this email already exists.",
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed
            | AppError::ContactsMissingFields
            | AppError::ContactsInvalidId
            | AppError::SessionsMissingCredentials => StatusCode::BAD_REQUEST,

            AppError::Unauthorized | AppError::SessionsInvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }

            AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::UsersEmailTaken => StatusCode::CONFLICT,

            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_response(&self, expose_details: bool) -> ErrorResponse {
        let error = match self {
            AppError::Unexpected(detail) if expose_details => Some(detail.clone()),
            _ => None,
        };
        ErrorResponse {
            success: false,
            code: self.code(),
            message: self.message(),
            error,
        }
    }

    pub fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        (self.http_status_code(), Json(self.error_response(false)))
    }
}

/// Re-renders an unexpected error's body with its detail included.
/// Any other response is returned untouched.
pub fn expose_details(response: Response) -> Response {
    let detail = response.extensions().get::<UnexpectedDetail>().cloned();
    let Some(UnexpectedDetail(detail)) = detail else {
        return response;
    };
    let status = response.status();
    let body = AppError::Unexpected(detail).error_response(true);
    (status, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.response_parts().into_response();
        if let AppError::Unexpected(detail) = self {
            response.extensions_mut().insert(UnexpectedDetail(detail));
        }
        response
    }
}
