use crate::webhooks::Dispatcher;
use bytes::Bytes;
use std::sync::Arc;
use warp::{http::HeaderMap, reject, Rejection, Reply};

/// Handle webhooks from the GitHub app
pub async fn github(
    headers: HeaderMap,
    raw_body: Bytes,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl Reply, Rejection> {
    dispatcher
        .handle(&headers, &raw_body)
        .await
        .map_err(reject::custom)
}
