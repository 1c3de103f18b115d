//! `/api/phone` — configuration handed to the browser telephony SDK.
//! Only public values go out; the SDK authenticates the user itself.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/phone/config", get(phone_config))
}

#[derive(Serialize)]
struct PhoneConfig {
    client_id:  String,
    server_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sip_domain: Option<String>,
}

async fn phone_config(State(state): State<AppState>) -> AppResult<Json<PhoneConfig>> {
    let config = &state.config;
    let client_id = config
        .ringcentral_client_id
        .clone()
        .ok_or_else(|| AppError::Misconfigured("RINGCENTRAL_CLIENT_ID".into()))?;

    Ok(Json(PhoneConfig {
        client_id,
        server_url: config.ringcentral_server_url.clone(),
        sip_domain: config.ringcentral_sip_domain.clone(),
    }))
}
