//! Adapter for invocations through AWS Lambda behind API Gateway

use crate::webhooks::Dispatcher;
use lambda_http::{http::header::CONTENT_TYPE, service_fn, Body, Error, Request, Response};
use serde_json::json;
use std::sync::Arc;

/// Process invocations until the runtime shuts down
pub async fn run(dispatcher: Arc<Dispatcher>) -> Result<(), Error> {
    lambda_http::run(service_fn(move |request: Request| {
        let dispatcher = dispatcher.clone();
        async move { handle(&dispatcher, request).await }
    }))
    .await
}

/// Translate a single invocation into a webhook delivery
async fn handle(dispatcher: &Dispatcher, request: Request) -> Result<Response<Body>, Error> {
    let (parts, body) = request.into_parts();

    let (status, message) = match dispatcher.handle(&parts.headers, &body).await {
        Ok(status) => (status, "ok"),
        Err(e) => (e.status(), e.message()),
    };

    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "code": status.as_u16(),
                "message": message,
            })
            .to_string(),
        ))?;
    Ok(response)
}
