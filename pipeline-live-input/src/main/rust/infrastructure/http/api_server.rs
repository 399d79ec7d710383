use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::application::services::StreamControlService;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::ServerConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse<'a> {
    live_input_id: &'a str,
    whip_url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayResponse<'a> {
    live_input_id: &'a str,
    whep_url: &'a str,
}

#[derive(Serialize)]
struct EndResponse {
    success: bool,
    ended: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct PingResponse {
    status: &'static str,
    timestamp: String,
    service: String,
}

#[derive(Debug)]
struct Unauthorized;

impl warp::reject::Reject for Unauthorized {}

fn error_reply(status: StatusCode, error: impl Into<String>) -> Response {
    let body = ErrorResponse {
        success: false,
        error: error.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

fn domain_error_reply(e: &DomainError) -> Response {
    let status = if e.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_reply(status, e.to_string())
}

/// Passes when no token is configured or the request carries
/// `Authorization: Bearer <token>`
fn authorized(token: Option<Arc<str>>) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and_then(move |header: Option<String>| {
            let token = token.clone();
            async move {
                let Some(expected) = token else {
                    return Ok(());
                };
                let presented = header
                    .as_deref()
                    .and_then(|value| value.strip_prefix("Bearer "));
                if presented == Some(&*expected) {
                    Ok(())
                } else {
                    Err(warp::reject::custom(Unauthorized))
                }
            }
        })
        .untuple_one()
}

fn with_service(
    service: Arc<StreamControlService>,
) -> impl Filter<Extract = (Arc<StreamControlService>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&service))
}

async fn publish(service: Arc<StreamControlService>) -> Result<Response, Infallible> {
    match service.publish().await {
        // The notification task runs detached
        Ok(dispatched) => {
            let input = dispatched.value;
            Ok(warp::reply::json(&PublishResponse {
                live_input_id: input.id(),
                whip_url: input.ingest_url(),
            })
            .into_response())
        }
        Err(e) => Ok(domain_error_reply(&e)),
    }
}

async fn play(service: Arc<StreamControlService>) -> Result<Response, Infallible> {
    match service.play().await {
        Ok(input) => Ok(warp::reply::json(&PlayResponse {
            live_input_id: input.id(),
            whep_url: input.playback_url(),
        })
        .into_response()),
        Err(e) => Ok(domain_error_reply(&e)),
    }
}

async fn end(service: Arc<StreamControlService>) -> Result<Response, Infallible> {
    let dispatched = service.end().await;
    Ok(warp::reply::json(&EndResponse {
        success: true,
        ended: dispatched.value,
    })
    .into_response())
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.find::<Unauthorized>().is_some() {
        return Ok(error_reply(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    if err.is_not_found() {
        return Ok(error_reply(StatusCode::NOT_FOUND, "Not found"));
    }
    if err.find::<warp::filters::cors::CorsForbidden>().is_some() {
        return Ok(error_reply(StatusCode::FORBIDDEN, "CORS request forbidden"));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"));
    }

    tracing::warn!("Unhandled rejection: {:?}", err);
    Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
}

/// `/stream/{publish,play,end}` and `/ping`
pub fn api_routes(
    service: Arc<StreamControlService>,
    config: &ServerConfig,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let token: Option<Arc<str>> = config.access_token().map(Arc::from);
    let service_name = config.service_name().to_string();

    let publish_route = warp::post()
        .and(warp::path!("stream" / "publish"))
        .and(authorized(token.clone()))
        .and(with_service(Arc::clone(&service)))
        .and_then(publish);

    let play_route = warp::get()
        .and(warp::path!("stream" / "play"))
        .and(authorized(token.clone()))
        .and(with_service(Arc::clone(&service)))
        .and_then(play);

    let end_route = warp::post()
        .and(warp::path!("stream" / "end"))
        .and(authorized(token))
        .and(with_service(service))
        .and_then(end);

    let ping_route = warp::get().and(warp::path!("ping")).map(move || {
        warp::reply::json(&PingResponse {
            status: "ok",
            timestamp: Utc::now().to_rfc3339(),
            service: service_name.clone(),
        })
    });

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["Content-Type", "Authorization"]);

    publish_route
        .or(play_route)
        .or(end_route)
        .or(ping_route)
        .with(cors)
        .recover(handle_rejection)
}

/// Serve the API on `config.port()` until `shutdown` resolves
pub async fn serve_api(
    service: Arc<StreamControlService>,
    config: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) {
    let routes = api_routes(service, &config);
    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], config.port()), shutdown);

    tracing::info!("Stream API listening on http://{}", addr);
    server.await;
}
