//! HTTP/JSON admin surface over a [`WatchEngine`].
//!
//! The routes only translate between JSON and engine calls; every decision
//! stays in the engine. Errors map to status codes in [`status_for`].
mod handlers;
pub use handlers::*;


use std::convert::Infallible;
use std::net::SocketAddr;

use tokio::sync::watch;
use tracing::info;
use warp::Filter;
use warp::Rejection;
use warp::Reply;

use crate::Error;
use crate::Result;
use crate::WatchEngine;

const MAX_BODY_IN_BYTES: u64 = 16 * 1024;

pub fn routes(engine: WatchEngine) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let submit = warp::path!("watches")
        .and(warp::post())
        .and(json_body())
        .and(with_engine(engine.clone()))
        .and_then(submit_watch);

    let cancel = warp::path!("watches" / "cancel")
        .and(warp::post())
        .and(json_body())
        .and(with_engine(engine.clone()))
        .and_then(cancel_watch);

    let status = warp::path!("status")
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(engine_status);

    let health = warp::path!("health")
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(engine_health);

    let course = warp::path!("courses" / String)
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(lookup_course);

    let test_notification = warp::path!("notifications" / "test")
        .and(warp::post())
        .and(json_body())
        .and(with_engine(engine))
        .and_then(send_test_notification);

    let metrics = warp::path!("metrics").and(warp::get()).and_then(metrics_handler);

    submit
        .or(cancel)
        .or(status)
        .or(health)
        .or(course)
        .or(test_notification)
        .or(metrics)
}

/// Serves [`routes`] on `addr` until `shutdown_signal` fires.
pub async fn start_server(
    addr: SocketAddr,
    engine: WatchEngine,
    mut shutdown_signal: watch::Receiver<()>,
) -> Result<()> {
    let (bound, server) = warp::serve(routes(engine))
        .try_bind_with_graceful_shutdown(addr, async move {
            let _ = shutdown_signal.changed().await;
        })
        .map_err(|e| Error::Fatal(format!("admin server could not bind {addr}: {e}")))?;

    info!(%bound, "admin server listening");
    server.await;
    info!("admin server stopped");
    Ok(())
}

fn with_engine(engine: WatchEngine) -> impl Filter<Extract = (WatchEngine,), Error = Infallible> + Clone {
    warp::any().map(move || engine.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_IN_BYTES).and(warp::body::json())
}
