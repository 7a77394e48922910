use crate::handlers::account_handler::{self, AppState};
use crate::handlers::health_handler;
use crate::middleware::auth::{require_account_owner, require_session};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Upper bound on a single request, including bcrypt work.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Install the global Prometheus recorder.
///
/// Can only succeed once per process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Build the application routes.
///
/// Routes:
/// - Public: `/create`, `/login`, `/list_accounts`, `/health`, `/ready`, `/metrics`
/// - Owner-only (token must be for the account in the path):
///   `/accounts/:id`, `/accounts/:id/delete`
/// - Any valid session: `/transfer`
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    // route_layer so the middleware runs after routing and sees `:id`.
    let owner_routes = Router::new()
        .route("/accounts/:id", get(account_handler::handle_get_account))
        .route(
            "/accounts/:id/delete",
            delete(account_handler::handle_delete_account),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_account_owner,
        ));

    let session_routes = Router::new()
        .route("/transfer", post(account_handler::handle_transfer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let public_routes = Router::new()
        .route("/create", post(account_handler::handle_create_account))
        .route("/login", post(account_handler::handle_login))
        .route("/list_accounts", get(account_handler::handle_list_accounts))
        .route("/health", get(health_handler::health_check))
        .route("/ready", get(health_handler::readiness_check))
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        );

    Router::new()
        .merge(public_routes)
        .merge(owner_routes)
        .merge(session_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}
