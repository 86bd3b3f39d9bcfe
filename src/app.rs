use axum::routing::{get, post};
use axum::Router;
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::swagger_config::serve_openapi;
use crate::handlers::{
    bank_transactions::list_bank_transactions, deposit_history::member_deposit_history,
    deposits::sync_deposits, events::subscribe_events, health::health_check,
};
use crate::models::AppState;

pub fn create_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Router {
    let api_router = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/events", get(subscribe_events))
        .route("/api/admin/deposits/sync", post(sync_deposits))
        .route("/api/admin/bank-transactions", get(list_bank_transactions))
        .route(
            "/api/members/{member_id}/deposit-history",
            get(member_deposit_history),
        )
        .route("/api-docs/openapi.json", get(serve_openapi));

    Router::new()
        .merge(api_router)
        .route("/metrics", get(move || async move { metric_handle.render() }))
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024)) // 2MB limit
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http()),
        )
        .layer(metric_layer)
        .with_state(state)
}
