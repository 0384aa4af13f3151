//! Event lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::event::{
        AddEquipments, ChecklistResult, CreateEvent, EventDetails, EventQuery, EventSummary,
        TemplateWithChecklist, UpdateEventStatus,
    },
};

use super::{AuthenticatedUser, CreatedResponse, MessageResponse};

/// List events with optional status and period filters
#[utoipa::path(
    get,
    path = "/eventos",
    tag = "eventos",
    security(("bearer_auth" = [])),
    params(EventQuery),
    responses(
        (status = 200, description = "Event list", body = Vec<EventSummary>)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<Vec<EventSummary>>> {
    let events = state.services.events.list(&query).await?;
    Ok(Json(events))
}

/// List event templates with their checklists
#[utoipa::path(
    get,
    path = "/eventos/templates",
    tag = "eventos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Templates", body = Vec<TemplateWithChecklist>)
    )
)]
pub async fn list_templates(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<TemplateWithChecklist>>> {
    let templates = state.services.events.templates().await?;
    Ok(Json(templates))
}

/// Get event details with staffers and assigned equipment
#[utoipa::path(
    get,
    path = "/eventos/{id}",
    tag = "eventos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventDetails),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EventDetails>> {
    let event = state.services.events.get(id).await?;
    Ok(Json(event))
}

/// Create an event, optionally with its staffers
#[utoipa::path(
    post,
    path = "/eventos",
    tag = "eventos",
    security(("bearer_auth" = [])),
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = CreatedResponse),
        (status = 400, description = "Missing fields or bad dates")
    )
)]
pub async fn create_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.events.create(&data, claims.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Evento criado com sucesso".to_string(),
            id,
        }),
    ))
}

/// Assign equipment to an event
#[utoipa::path(
    post,
    path = "/eventos/{id}/equipamentos",
    tag = "eventos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = AddEquipments,
    responses(
        (status = 200, description = "Equipment assigned", body = MessageResponse),
        (status = 400, description = "Empty equipment list"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn add_equipments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AddEquipments>,
) -> AppResult<Json<MessageResponse>> {
    state.services.events.add_equipments(id, &data).await?;
    Ok(Json(MessageResponse {
        message: "Equipamentos adicionados com sucesso".to_string(),
    }))
}

/// Advisory checklist validation for an event
#[utoipa::path(
    get,
    path = "/eventos/{id}/validar-checklist",
    tag = "eventos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Checklist verdict and warnings", body = ChecklistResult),
        (status = 404, description = "Event not found")
    )
)]
pub async fn validate_checklist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ChecklistResult>> {
    let result = state.services.events.validate_checklist(id).await?;
    Ok(Json(result))
}

/// Update event status, gated on the mandatory checklist for approval
#[utoipa::path(
    put,
    path = "/eventos/{id}/status",
    tag = "eventos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventStatus,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Invalid status or mandatory checklist unmet"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEventStatus>,
) -> AppResult<Json<MessageResponse>> {
    state.services.events.update_status(id, &data).await?;
    Ok(Json(MessageResponse {
        message: "Status atualizado com sucesso".to_string(),
    }))
}
