use crate::webhooks::Dispatcher;
use std::{convert::Infallible, sync::Arc};
use tracing::{info, Span};
use warp::{
    http::StatusCode,
    trace::{trace, Info, Trace},
    Filter, Rejection, Reply,
};

mod errors;
mod handlers;
pub mod lambda;

pub use errors::recover;

/// Build the routes for the API
pub fn routes(
    dispatcher: Arc<Dispatcher>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    // Github webhook route
    let github = warp::path("github")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(1024 * 64))
        .and(warp::header::headers_cloned())
        .and(warp::body::bytes())
        .and(with_dispatcher(dispatcher))
        .and_then(handlers::github)
        .with(named_trace("github"));

    // Health check route
    let health = warp::path("health")
        .and(warp::get())
        .map(|| {
            info!("alive and healthy!");
            StatusCode::NO_CONTENT
        })
        .with(named_trace("health"));

    github.or(health)
}

/// Share the dispatcher with every request
fn with_dispatcher(
    dispatcher: Arc<Dispatcher>,
) -> impl Filter<Extract = (Arc<Dispatcher>,), Error = Infallible> + Clone {
    warp::any().map(move || dispatcher.clone())
}

/// Wrap the request with some information allowing it
/// to be traced through the logs. Built off of the
/// `warp::trace::request` implementation
fn named_trace(name: &'static str) -> Trace<impl Fn(Info) -> Span + Clone> {
    use tracing::field::{display, Empty};

    trace(move |info: Info| {
        let span = tracing::info_span!(
            "request",
            %name,
            remote.addr = Empty,
            method = %info.method(),
            path = %info.path(),
            version = ?info.version(),
            id = %uuid::Uuid::new_v4(),
        );

        // Record optional fields
        if let Some(remote_addr) = info.remote_addr() {
            span.record("remote.addr", &display(remote_addr));
        }

        tracing::debug!(parent: &span, "received request");

        span
    })
}
