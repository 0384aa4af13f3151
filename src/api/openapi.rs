//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, events, health, transfers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Palco API",
        version = "1.0.0",
        description = "Sound & Lighting Equipment Tracking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Palco Team", email = "contato@palco.app")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Equipment
        equipment::list_equipment,
        equipment::list_categories,
        equipment::get_by_tombamento,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::report_problem,
        equipment::resolve_problem,
        // Events
        events::list_events,
        events::list_templates,
        events::get_event,
        events::create_event,
        events::add_equipments,
        events::validate_checklist,
        events::update_status,
        // Transfers
        transfers::list_transfers,
        transfers::get_transfer,
        transfers::create_transfer,
        transfers::approve_transfer,
        transfers::cancel_transfer,
        transfers::quick_transfer,
        transfers::cross_event_transfer,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::User,
            crate::models::user::UserProfile,
            crate::models::user::LoginRequest,
            crate::models::user::RegisterRequest,
            crate::models::user::AuthResponse,
            crate::models::enums::UserRole,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentSummary,
            crate::models::equipment::EquipmentListItem,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::Problem,
            crate::models::equipment::ProblemWithReporter,
            crate::models::equipment::HistoryEntry,
            crate::models::equipment::HistoryEntryWithUser,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::ReportProblem,
            crate::models::category::Category,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::EquipmentCondition,
            crate::models::enums::ProblemSeverity,
            equipment::EquipmentCreated,
            // Events
            crate::models::event::Event,
            crate::models::event::EventSummary,
            crate::models::event::EventDetails,
            crate::models::event::EventStaffer,
            crate::models::event::EventAssignment,
            crate::models::event::Template,
            crate::models::event::TemplateWithChecklist,
            crate::models::event::ChecklistItemDetail,
            crate::models::event::CreateEvent,
            crate::models::event::CreateEventStaffer,
            crate::models::event::AddEquipments,
            crate::models::event::AddEquipmentItem,
            crate::models::event::UpdateEventStatus,
            crate::models::event::ChecklistResult,
            crate::models::enums::EventStatus,
            crate::workflow::checklist::ChecklistWarning,
            // Transfers
            crate::models::transfer::Transfer,
            crate::models::transfer::TransferSummary,
            crate::models::transfer::TransferDetails,
            crate::models::transfer::CreateTransfer,
            crate::models::transfer::ApproveTransfer,
            crate::models::transfer::CancelTransfer,
            crate::models::transfer::QuickTransfer,
            crate::models::transfer::CrossEventTransfer,
            crate::models::enums::TransferStatus,
            crate::models::enums::PartyKind,
            crate::models::enums::ApprovalKind,
            transfers::ApprovalResult,
            transfers::QuickTransferResult,
            // Shared
            crate::api::MessageResponse,
            crate::api::CreatedResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "equipamentos", description = "Equipment registry and problem reports"),
        (name = "eventos", description = "Event lifecycle and checklist validation"),
        (name = "transferencias", description = "Custody transfer workflow")
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme referenced by the handlers
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
