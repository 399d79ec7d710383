use warp::{Filter, Rejection, Reply};

use super::PrometheusReporter;

/// Health check response structure
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// `/metrics`, `/health`, `/livez` and `/readyz`
pub fn metrics_routes() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let metrics_route = warp::path("metrics").and(warp::path::end()).map(|| {
        let body = PrometheusReporter::gather_metrics();
        warp::reply::with_header(body, "content-type", "text/plain; version=0.0.4; charset=utf-8")
    });

    let health_route = warp::path("health").and(warp::path::end()).map(|| {
        let response = HealthResponse {
            status: "healthy",
            service: "pipeline-live-input",
            version: env!("CARGO_PKG_VERSION"),
        };
        warp::reply::json(&response)
    });

    // Liveness probe endpoint (minimal check - is the process running?)
    let liveness_route = warp::path("livez")
        .and(warp::path::end())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Readiness probe endpoint (can the service accept traffic?)
    let readiness_route = warp::path("readyz").and(warp::path::end()).map(|| {
        let response = HealthResponse {
            status: "ready",
            service: "pipeline-live-input",
            version: env!("CARGO_PKG_VERSION"),
        };
        warp::reply::json(&response)
    });

    warp::get()
        .and(
            metrics_route
                .or(health_route)
                .or(liveness_route)
                .or(readiness_route),
        )
}

pub async fn serve_metrics(port: u16) {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["Content-Type"]);

    tracing::info!("Metrics server starting on port {}", port);

    warp::serve(metrics_routes().with(cors))
        .run(([0, 0, 0, 0], port))
        .await;
}
