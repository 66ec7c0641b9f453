use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    subscription::SubscribeOutcome,
    web::{Error, WebResult},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
    email: Option<String>,
}

#[tracing::instrument(name = "Handling a subscribe request", skip(app_state, payload))]
pub async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscribeBody>, JsonRejection>,
) -> WebResult<Json<Value>> {
    let Json(body) = payload.map_err(|er| Error::BodyRejected(er.body_text()))?;

    let message = match app_state.subscription_svc.subscribe(body.email).await? {
        SubscribeOutcome::Subscribed(_) => "Subscribed successfully!",
        SubscribeOutcome::AlreadySubscribed => "Already subscribed",
    };

    Ok(Json(json!({ "message": message })))
}
