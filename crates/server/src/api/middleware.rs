//! Metrics middleware for the conversion routes.

use axum::{
    body::Body,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use pixup_core::resolve;

use crate::metrics::{
    normalize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};

/// Image format label for a response, from its `Content-Type`.
///
/// Only `image/*` types count, so JSON and text bodies map to "none".
pub(crate) fn response_format(response: &Response) -> &'static str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|ct| ct.starts_with("image/"))
        .and_then(resolve)
        .map(|f| f.as_str())
        .unwrap_or("none")
}

/// Records duration (labelled with the output image format), request count
/// and requests in flight.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();
    let response = next.run(request).await;
    HTTP_REQUESTS_IN_FLIGHT.dec();

    let status = response.status().as_u16().to_string();
    let format = response_format(&response);

    HTTP_REQUEST_DURATION
        .with_label_values(&[method.as_str(), path.as_str(), status.as_str(), format])
        .observe(start.elapsed().as_secs_f64());
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}
