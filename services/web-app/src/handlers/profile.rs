use axum::{
    extract::{Path, State},
    response::Json,
};

use healthbot_models::{ProfilePayload, Record, StatusResponse};
use healthbot_utils::HealthBotResult;

use crate::extract::ApiJson;
use crate::AppState;

/// GET /save_profile
pub async fn get_profile(State(state): State<AppState>) -> Json<ProfilePayload> {
    Json(state.storage.user_data.load().await.profile_payload())
}

/// POST /save_profile
pub async fn save_profile(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProfilePayload>,
) -> HealthBotResult<Json<StatusResponse>> {
    state.storage.user_data.save_profile(payload).await?;
    Ok(Json(StatusResponse::ok("Profile saved")))
}

/// GET /save_medication
pub async fn get_medications(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.storage.user_data.load().await.medications)
}

/// POST /save_medication
pub async fn save_medication(
    State(state): State<AppState>,
    ApiJson(medication): ApiJson<Record>,
) -> HealthBotResult<Json<StatusResponse>> {
    let medications = state.storage.user_data.add_medication(medication).await?;
    tracing::info!(count = medications.len(), "Medication saved");
    Ok(Json(StatusResponse::ok("Medication saved")))
}

/// DELETE /delete_medication/:index
pub async fn delete_medication(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> HealthBotResult<Json<StatusResponse>> {
    state.storage.user_data.delete_medication(index).await?;
    Ok(Json(StatusResponse::ok("Medication deleted")))
}

/// GET /save_emergency_contact
pub async fn get_emergency_contacts(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.storage.user_data.load().await.emergency_contacts)
}

/// POST /save_emergency_contact
pub async fn save_emergency_contact(
    State(state): State<AppState>,
    ApiJson(contact): ApiJson<Record>,
) -> HealthBotResult<Json<StatusResponse>> {
    let contacts = state.storage.user_data.add_emergency_contact(contact).await?;
    tracing::info!(count = contacts.len(), "Emergency contact saved");
    Ok(Json(StatusResponse::ok("Emergency contact saved")))
}

/// DELETE /delete_emergency_contact/:index
pub async fn delete_emergency_contact(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> HealthBotResult<Json<StatusResponse>> {
    state.storage.user_data.delete_emergency_contact(index).await?;
    Ok(Json(StatusResponse::ok("Emergency contact deleted")))
}
