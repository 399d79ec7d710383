use warp::Filter;

use super::PrometheusReporter;

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Serve `/metrics` and `/health` until `shutdown` resolves
pub async fn serve_metrics(port: u16, shutdown: impl std::future::Future<Output = ()> + Send + 'static) {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["Content-Type"]);

    let metrics_route = warp::path("metrics").map(|| {
        let body = PrometheusReporter::gather_metrics();
        warp::reply::with_header(body, "content-type", "text/plain; version=0.0.4; charset=utf-8")
    });

    let health_route = warp::path("health").map(|| {
        warp::reply::json(&HealthResponse {
            status: "healthy",
            service: "pipeline-webrtc-session",
            version: env!("CARGO_PKG_VERSION"),
        })
    });

    let routes = metrics_route.or(health_route).with(cors);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], port), shutdown);

    tracing::info!("Metrics server listening on http://{}", addr);
    server.await;
}
