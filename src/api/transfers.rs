//! Transfer workflow endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::enums::TransferStatus,
    models::transfer::{
        ApproveTransfer, CancelTransfer, CreateTransfer, CrossEventTransfer, QuickTransfer,
        TransferDetails, TransferQuery, TransferSummary,
    },
};

use super::{AuthenticatedUser, CreatedResponse, MessageResponse};

/// Approval response carrying the status the workflow landed on
#[derive(Serialize, ToSchema)]
pub struct ApprovalResult {
    pub message: String,
    pub status: TransferStatus,
}

/// Quick-transfer response
#[derive(Serialize, ToSchema)]
pub struct QuickTransferResult {
    pub message: String,
    pub transferencia_id: i32,
}

/// List transfers the authenticated user takes part in
#[utoipa::path(
    get,
    path = "/transferencias",
    tag = "transferencias",
    security(("bearer_auth" = [])),
    params(TransferQuery),
    responses(
        (status = 200, description = "Transfer list", body = Vec<TransferSummary>)
    )
)]
pub async fn list_transfers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<TransferQuery>,
) -> AppResult<Json<Vec<TransferSummary>>> {
    let transfers = state.services.transfers.list(claims.id, &query).await?;
    Ok(Json(transfers))
}

/// Get transfer details
#[utoipa::path(
    get,
    path = "/transferencias/{id}",
    tag = "transferencias",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Transfer details", body = TransferDetails),
        (status = 404, description = "Transfer not found")
    )
)]
pub async fn get_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<TransferDetails>> {
    let transfer = state.services.transfers.get(id).await?;
    Ok(Json(transfer))
}

/// Request a transfer
#[utoipa::path(
    post,
    path = "/transferencias",
    tag = "transferencias",
    security(("bearer_auth" = [])),
    request_body = CreateTransfer,
    responses(
        (status = 201, description = "Transfer requested", body = CreatedResponse),
        (status = 400, description = "Missing fields or equipment under maintenance"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTransfer>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.transfers.create(&data, claims.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Transferência solicitada com sucesso".to_string(),
            id,
        }),
    ))
}

/// Record one of the three approvals
#[utoipa::path(
    post,
    path = "/transferencias/{id}/aprovar",
    tag = "transferencias",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transfer ID")),
    request_body = ApproveTransfer,
    responses(
        (status = 200, description = "Approval recorded", body = ApprovalResult),
        (status = 400, description = "Invalid approval kind or transfer finalized"),
        (status = 403, description = "Caller is not the designated approver"),
        (status = 404, description = "Transfer not found")
    )
)]
pub async fn approve_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ApproveTransfer>,
) -> AppResult<Json<ApprovalResult>> {
    let status = state.services.transfers.approve(id, &data, &claims).await?;
    Ok(Json(ApprovalResult {
        message: "Aprovação registrada com sucesso".to_string(),
        status,
    }))
}

/// Cancel a transfer
#[utoipa::path(
    post,
    path = "/transferencias/{id}/cancelar",
    tag = "transferencias",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transfer ID")),
    request_body = CancelTransfer,
    responses(
        (status = 200, description = "Transfer cancelled", body = MessageResponse),
        (status = 400, description = "Transfer already completed"),
        (status = 403, description = "Caller may not cancel this transfer"),
        (status = 404, description = "Transfer not found")
    )
)]
pub async fn cancel_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CancelTransfer>,
) -> AppResult<Json<MessageResponse>> {
    state.services.transfers.cancel(id, &data, &claims).await?;
    Ok(Json(MessageResponse {
        message: "Transferência cancelada com sucesso".to_string(),
    }))
}

/// Hand an equipment to another responsible inside the same event
#[utoipa::path(
    post,
    path = "/transferencias/rapida",
    tag = "transferencias",
    security(("bearer_auth" = [])),
    request_body = QuickTransfer,
    responses(
        (status = 200, description = "Equipment handed over", body = QuickTransferResult),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Equipment not assigned to this event")
    )
)]
pub async fn quick_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<QuickTransfer>,
) -> AppResult<Json<QuickTransferResult>> {
    let transferencia_id = state.services.transfers.quick(&data, claims.id).await?;
    Ok(Json(QuickTransferResult {
        message: "Equipamento transferido com sucesso".to_string(),
        transferencia_id,
    }))
}

/// Urgent transfer between two simultaneously running events
#[utoipa::path(
    post,
    path = "/transferencias/entre-eventos",
    tag = "transferencias",
    security(("bearer_auth" = [])),
    request_body = CrossEventTransfer,
    responses(
        (status = 201, description = "Transfer requested", body = CreatedResponse),
        (status = 400, description = "Events not simultaneously active or periods disjoint"),
        (status = 404, description = "Event or equipment not found")
    )
)]
pub async fn cross_event_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CrossEventTransfer>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.transfers.cross_event(&data, claims.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Transferência solicitada com sucesso".to_string(),
            id,
        }),
    ))
}
