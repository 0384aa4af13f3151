//! Events service: lifecycle, equipment assignment and checklist validation

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::enums::{EquipmentStatus, EventStatus},
    models::event::{
        AddEquipments, ChecklistResult, CreateEvent, EventDetails, EventQuery, EventSummary,
        TemplateWithChecklist, UpdateEventStatus,
    },
    repository::Repository,
    workflow::checklist,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
}

impl EventsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<EventSummary>> {
        self.repository.events.list(query).await
    }

    /// Full event detail with staffers and equipment assignments
    pub async fn get(&self, id: i32) -> AppResult<EventDetails> {
        let summary = self.repository.events.get_summary(id).await?;
        let responsaveis = self.repository.events.staffers(id).await?;
        let equipamentos = self.repository.events.assignments(id).await?;
        Ok(EventDetails {
            evento: summary,
            responsaveis,
            equipamentos,
        })
    }

    /// Create an event with its initial staffers, returning the new id
    pub async fn create(&self, data: &CreateEvent, user_id: i32) -> AppResult<i32> {
        let (nome, local, inicio, fim) =
            match (&data.nome, &data.local, &data.data_inicio, &data.data_fim) {
                (Some(nome), Some(local), Some(inicio), Some(fim)) => (nome, local, inicio, fim),
                _ => {
                    return Err(AppError::Validation(
                        "Nome, local e datas são obrigatórios".to_string(),
                    ))
                }
            };
        let data_inicio = parse_datetime(inicio)
            .ok_or_else(|| AppError::Validation("Formato de data inválido".to_string()))?;
        let data_fim = parse_datetime(fim)
            .ok_or_else(|| AppError::Validation("Formato de data inválido".to_string()))?;

        let mut tx = self.repository.pool.begin().await?;
        let id = self
            .repository
            .events
            .insert(
                &mut tx,
                nome,
                local,
                data.template_id,
                data_inicio,
                data_fim,
                data.observacoes.as_deref(),
                user_id,
            )
            .await?;
        for staffer in &data.responsaveis {
            self.repository
                .events
                .insert_staffer(
                    &mut tx,
                    id,
                    staffer.usuario_id,
                    staffer.area.as_deref(),
                    staffer.tipo.as_deref(),
                )
                .await?;
        }
        tx.commit().await?;

        Ok(id)
    }

    /// Assign equipment to an event; each assigned unit goes into service
    pub async fn add_equipments(&self, event_id: i32, data: &AddEquipments) -> AppResult<()> {
        if data.equipamentos.is_empty() {
            return Err(AppError::Validation(
                "Lista de equipamentos vazia".to_string(),
            ));
        }
        self.repository.events.get(event_id).await?;

        let mut tx = self.repository.pool.begin().await?;
        for item in &data.equipamentos {
            self.repository
                .events
                .insert_assignment(&mut tx, event_id, item)
                .await?;
            self.repository
                .equipment
                .set_status(&mut tx, item.equipamento_id, EquipmentStatus::EmUso)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Advisory checklist run: reports every shortfall
    pub async fn validate_checklist(&self, event_id: i32) -> AppResult<ChecklistResult> {
        let event = self.repository.events.get(event_id).await?;

        let Some(template_id) = event.template_id else {
            return Ok(ChecklistResult {
                valido: true,
                mensagem: "Evento sem template - validação não aplicável".to_string(),
                avisos: Vec::new(),
            });
        };

        let requirements = self
            .repository
            .events
            .checklist_requirements(template_id)
            .await?;
        let counts = self.repository.events.assignment_counts(event_id).await?;

        let outcome = checklist::evaluate(&requirements, &counts);
        let mensagem = if outcome.valido {
            "Checklist validado com sucesso".to_string()
        } else {
            "Checklist incompleto - itens obrigatórios faltando".to_string()
        };

        Ok(ChecklistResult {
            valido: outcome.valido,
            mensagem,
            avisos: outcome.avisos,
        })
    }

    /// Change the event status. Moving to aprovado re-runs the checklist
    /// restricted to mandatory rules and rejects on the first deficit.
    pub async fn update_status(&self, event_id: i32, data: &UpdateEventStatus) -> AppResult<()> {
        let status: EventStatus = data
            .status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| AppError::Validation("Status inválido".to_string()))?;

        let event = self.repository.events.get(event_id).await?;

        if status == EventStatus::Aprovado {
            if let Some(template_id) = event.template_id {
                let requirements = self
                    .repository
                    .events
                    .checklist_requirements(template_id)
                    .await?;
                let counts = self.repository.events.assignment_counts(event_id).await?;
                if let Some(deficit) = checklist::first_mandatory_deficit(&requirements, &counts) {
                    return Err(AppError::ChecklistIncomplete {
                        mensagem: format!(
                            "Faltam itens obrigatórios: {} ({}/{})",
                            deficit.categoria, deficit.quantidade_atual, deficit.quantidade_minima
                        ),
                    });
                }
            }
        }

        self.repository.events.set_status(event_id, status).await
    }

    /// Templates with their checklist rules
    pub async fn templates(&self) -> AppResult<Vec<TemplateWithChecklist>> {
        self.repository.events.templates_with_checklist().await
    }
}

/// Parse the datetime strings the dashboard sends. Accepts RFC 3339 as
/// well as the datetime-local flavors without timezone or seconds, and a
/// bare date (taken as midnight UTC).
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        for s in [
            "2025-08-01T08:00:00Z",
            "2025-08-01T08:00:00",
            "2025-08-01T08:00",
            "2025-08-01 08:00:00",
            "2025-08-01 08:00",
        ] {
            let dt = parse_datetime(s).unwrap();
            assert_eq!(dt.to_rfc3339(), "2025-08-01T08:00:00+00:00", "input {}", s);
        }
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let dt = parse_datetime("2025-08-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-08-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("amanhã").is_none());
        assert!(parse_datetime("01/08/2025").is_none());
        assert!(parse_datetime("").is_none());
    }
}
