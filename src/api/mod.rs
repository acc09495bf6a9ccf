use crate::common::context::Context;
use crate::common::error::AppError;
use crate::common::init;
use crate::common::state::AppState;
use crate::repositories::contacts::ContactsRepository;
use crate::repositories::sessions::SessionsRepository;
use crate::repositories::users::UsersRepository;
use crate::settings::AppSettings;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod contact;
pub mod middleware;
pub mod user;

pub struct RequestContext {
    pub state: AppState,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(contact::router(state.clone()))
        .merge(user::router())
        .fallback(not_found)
        .layer(from_fn(middleware::sanitize_request))
        .layer(from_fn_with_state(state.clone(), middleware::render_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn cors_layer(frontend_urls: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = frontend_urls
        .iter()
        .map(|url| HeaderValue::from_str(url))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true))
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = init::initialize_state(settings).await?;
    let app = router(state).layer(cors_layer(&settings.frontend_urls)?);

    let address = SocketAddr::new(settings.app_host, settings.app_port);
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}

pub async fn index() -> &'static str {
    concat!("Running recycling-site-service v", env!("CARGO_PKG_VERSION"))
}

pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self { state: state.clone() })
    }
}

impl Context for RequestContext {
    fn contacts(&self) -> &dyn ContactsRepository {
        self.state.contacts()
    }

    fn users(&self) -> &dyn UsersRepository {
        self.state.users()
    }

    fn sessions(&self) -> &dyn SessionsRepository {
        self.state.sessions()
    }
}
