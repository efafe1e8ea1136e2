use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Rejection;
use warp::Reply;

use crate::metrics::encode_metrics;
use crate::Error;
use crate::Submission;
use crate::WatchEngine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub key: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestNotificationRequest {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestNotificationResponse {
    pub delivered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::DuplicateWatch { .. } => StatusCode::CONFLICT,
        Error::Fetch(_) | Error::Delivery(_) => StatusCode::BAD_GATEWAY,
        Error::Persist(_) | Error::Config(_) | Error::InvalidConfig(_) | Error::Fatal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_reply(error: &Error) -> Response {
    let status = status_for(error);
    debug!(%status, "admin request failed: {}", error);
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: error.to_string(),
        }),
        status,
    )
    .into_response()
}

fn json_reply<T: Serialize>(
    body: &T,
    status: StatusCode,
) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

pub(crate) async fn submit_watch(
    submission: Submission,
    engine: WatchEngine,
) -> Result<Response, Rejection> {
    Ok(match engine.submit(submission).await {
        Ok(request) => json_reply(&request, StatusCode::CREATED),
        Err(e) => error_reply(&e),
    })
}

pub(crate) async fn cancel_watch(
    request: CancelRequest,
    engine: WatchEngine,
) -> Result<Response, Rejection> {
    Ok(match engine.cancel(&request.key, &request.email) {
        Ok(removed) => json_reply(&CancelResponse { removed }, StatusCode::OK),
        Err(e) => error_reply(&e),
    })
}

pub(crate) async fn engine_status(engine: WatchEngine) -> Result<Response, Rejection> {
    Ok(json_reply(&engine.status(), StatusCode::OK))
}

pub(crate) async fn engine_health(engine: WatchEngine) -> Result<Response, Rejection> {
    Ok(json_reply(&engine.health(), StatusCode::OK))
}

pub(crate) async fn lookup_course(
    key: String,
    engine: WatchEngine,
) -> Result<Response, Rejection> {
    Ok(match engine.lookup(&key).await {
        Ok(lookup) => json_reply(&lookup, StatusCode::OK),
        Err(e) => error_reply(&e),
    })
}

pub(crate) async fn send_test_notification(
    request: TestNotificationRequest,
    engine: WatchEngine,
) -> Result<Response, Rejection> {
    Ok(match engine.send_test_notification(&request.address).await {
        Ok(()) => json_reply(&TestNotificationResponse { delivered: true }, StatusCode::OK),
        Err(e) => error_reply(&e),
    })
}

pub(crate) async fn metrics_handler() -> Result<impl Reply, Rejection> {
    Ok(encode_metrics())
}
