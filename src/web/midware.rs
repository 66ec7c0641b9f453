use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    utils::ErrorChain,
    web::{log, ClientError, Error, REQUEST_ID_HEADER},
};

/// Turns an `Error` stashed in the response extensions into the `{"message": ..}` client body
/// and writes a log line for every request.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    // The request id set by `SetRequestIdLayer`, a fresh one if it is missing.
    let uuid = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    // Server errors raised by middleware (e.g. the request timeout) carry no `Error`,
    // they still get the generic client body.
    let client_status_and_error = web_error
        .map(Error::status_code_and_client_error)
        .or_else(|| {
            resp.status()
                .is_server_error()
                .then(|| (resp.status(), ClientError::ServiceError))
        });

    if web_error.is_none() && resp.status().is_server_error() {
        tracing::error!(req_id = %uuid, "SERVER ERROR: status {} without error detail", resp.status());
    }

    if let (Some(er), Some((status, _))) = (web_error, &client_status_and_error) {
        if status.is_server_error() {
            tracing::error!(req_id = %uuid, "SERVER ERROR: {er:?}");
        } else {
            tracing::info!(req_id = %uuid, "CLIENT ERROR: {}", ErrorChain(er));
        }
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let client_error_body = json!({ "message": cl_err.to_string() });

        (*status, Json(client_error_body)).into_response()
    });

    log::log_request(
        uuid,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}
