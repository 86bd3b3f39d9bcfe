use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use axum_prometheus::{PrometheusMetricLayer, PrometheusMetricLayerBuilder};

/// Layer/handle pair: the layer records per-route HTTP metrics under the
/// `fruitline_` prefix, the handle renders them for the `/metrics` route.
pub fn setup_metrics() -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    PrometheusMetricLayerBuilder::new()
        .with_prefix("fruitline")
        .with_default_metrics()
        .build_pair()
}
