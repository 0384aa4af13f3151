//! Equipment registry endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::category::Category,
    models::equipment::{
        CreateEquipment, EquipmentDetails, EquipmentListItem, EquipmentQuery, ReportProblem,
        UpdateEquipment,
    },
};

use super::{AuthenticatedUser, CreatedResponse, MessageResponse};

/// Creation response carrying the generated tracking tag
#[derive(Serialize, ToSchema)]
pub struct EquipmentCreated {
    pub message: String,
    pub id: i32,
    pub tombamento: String,
}

/// List equipment with optional filters
#[utoipa::path(
    get,
    path = "/equipamentos",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list with open problems", body = Vec<EquipmentListItem>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<EquipmentListItem>>> {
    let equipment = state.services.equipment.list(&query).await?;
    Ok(Json(equipment))
}

/// List equipment categories
#[utoipa::path(
    get,
    path = "/equipamentos/categorias",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category list", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.equipment.list_categories().await?;
    Ok(Json(categories))
}

/// Look an equipment up by its tracking tag
#[utoipa::path(
    get,
    path = "/equipamentos/tombamento/{tombamento}",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    params(("tombamento" = String, Path, description = "Tracking tag")),
    responses(
        (status = 200, description = "Equipment", body = EquipmentListItem),
        (status = 404, description = "Unknown tag")
    )
)]
pub async fn get_by_tombamento(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(tombamento): Path<String>,
) -> AppResult<Json<EquipmentListItem>> {
    let equipment = state.services.equipment.get_by_tombamento(&tombamento).await?;
    Ok(Json(equipment))
}

/// Get equipment details with problems and movement history
#[utoipa::path(
    get,
    path = "/equipamentos/{id}",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentDetails),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentDetails>> {
    let equipment = state.services.equipment.get(id).await?;
    Ok(Json(equipment))
}

/// Register a new equipment
#[utoipa::path(
    post,
    path = "/equipamentos",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = EquipmentCreated),
        (status = 400, description = "Missing or invalid fields, or duplicate code")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<EquipmentCreated>)> {
    let (id, tombamento) = state.services.equipment.create(&data, claims.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(EquipmentCreated {
            message: "Equipamento criado com sucesso".to_string(),
            id,
            tombamento,
        }),
    ))
}

/// Update equipment fields
#[utoipa::path(
    put,
    path = "/equipamentos/{id}",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = MessageResponse),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<MessageResponse>> {
    state.services.equipment.update(id, &data, claims.id).await?;
    Ok(Json(MessageResponse {
        message: "Equipamento atualizado com sucesso".to_string(),
    }))
}

/// Report a problem on an equipment
#[utoipa::path(
    post,
    path = "/equipamentos/{id}/problemas",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = ReportProblem,
    responses(
        (status = 201, description = "Problem recorded", body = CreatedResponse),
        (status = 400, description = "Missing description or severity"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn report_problem(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ReportProblem>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let problem_id = state
        .services
        .equipment
        .report_problem(id, &data, claims.id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Problema reportado com sucesso".to_string(),
            id: problem_id,
        }),
    ))
}

/// Mark a problem as resolved
#[utoipa::path(
    put,
    path = "/equipamentos/{id}/problemas/{problema_id}/resolver",
    tag = "equipamentos",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID"),
        ("problema_id" = i32, Path, description = "Problem ID")
    ),
    responses(
        (status = 200, description = "Problem resolved", body = MessageResponse),
        (status = 404, description = "Problem not found")
    )
)]
pub async fn resolve_problem(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, problema_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .equipment
        .resolve_problem(id, problema_id, claims.id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Problema resolvido com sucesso".to_string(),
    }))
}
