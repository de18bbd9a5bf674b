pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod utils;
pub mod validation;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::config::Config;
use crate::gateway::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: GatewayConfig,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::checkout::create_checkout,
        handlers::payment_return::payment_return,
        handlers::ipn::ipn,
    ),
    components(schemas(
        handlers::HealthStatus,
        handlers::checkout::CheckoutRequest,
        handlers::checkout::CheckoutResponse,
        handlers::payment_return::PaymentReturnResponse,
        handlers::ipn::IpnResponse,
        domain::PaymentOutcome,
        domain::CallbackResult,
    )),
    tags(
        (name = "Payments", description = "Hosted-checkout redirect and callback endpoints"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_app(state: AppState) -> Router {
    // The IPN route alone sits behind the gateway source-IP allowlist;
    // the return route is hit by shopper browsers.
    let ipn_route = Router::new()
        .route("/payments/vnpay/ipn", get(handlers::ipn::ipn))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::ip_allowlist::ipn_ip_allowlist,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/payments/checkout", post(handlers::checkout::create_checkout))
        .route(
            "/payments/vnpay/return",
            get(handlers::payment_return::payment_return),
        )
        .merge(ipn_route)
        .route("/openapi.json", get(openapi_json))
        .layer(axum::middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
