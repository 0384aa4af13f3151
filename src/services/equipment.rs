//! Equipment service: registry, categories, problem reports

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use rand::Rng;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::category::Category,
    models::enums::{EquipmentCondition, EquipmentStatus, ProblemSeverity},
    models::equipment::{
        CreateEquipment, EquipmentDetails, EquipmentListItem, EquipmentQuery, Problem,
        ReportProblem, UpdateEquipment,
    },
    repository::Repository,
    services::cache::CategoryCache,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    categories_cache: CategoryCache,
}

impl EquipmentService {
    pub fn new(repository: Repository, categories_cache: CategoryCache) -> Self {
        Self {
            repository,
            categories_cache,
        }
    }

    /// List equipment with filters, each entry carrying its unresolved
    /// problem reports
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<EquipmentListItem>> {
        let summaries = self.repository.equipment.list(query).await?;

        let ids: Vec<i32> = summaries.iter().map(|s| s.equipamento.id).collect();
        let mut by_equipment: HashMap<i32, Vec<Problem>> = HashMap::new();
        if !ids.is_empty() {
            for problem in self.repository.equipment.unresolved_problems(&ids).await? {
                by_equipment
                    .entry(problem.equipamento_id)
                    .or_default()
                    .push(problem);
            }
        }

        Ok(summaries
            .into_iter()
            .map(|summary| {
                let problemas_ativos = by_equipment
                    .remove(&summary.equipamento.id)
                    .unwrap_or_default();
                EquipmentListItem {
                    equipamento: summary,
                    problemas_ativos,
                }
            })
            .collect())
    }

    /// Full equipment detail with problems and recent history
    pub async fn get(&self, id: i32) -> AppResult<EquipmentDetails> {
        let summary = self.repository.equipment.get_summary(id).await?;
        let problemas = self.repository.equipment.problems_with_reporter(id).await?;
        let historico = self.repository.equipment.history_with_user(id).await?;
        Ok(EquipmentDetails {
            equipamento: summary,
            problemas,
            historico,
        })
    }

    /// Look an equipment up by its tracking tag (QR code scans)
    pub async fn get_by_tombamento(&self, tombamento: &str) -> AppResult<EquipmentListItem> {
        let summary = self.repository.equipment.get_by_tombamento(tombamento).await?;
        let problemas_ativos = self
            .repository
            .equipment
            .unresolved_problems(&[summary.equipamento.id])
            .await?;
        Ok(EquipmentListItem {
            equipamento: summary,
            problemas_ativos,
        })
    }

    /// Category list, served from the read-through cache
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        if let Some(categories) = self.categories_cache.get().await {
            return Ok(categories);
        }
        let categories = self.repository.categories.list().await?;
        self.categories_cache.put(categories.clone()).await;
        Ok(categories)
    }

    /// Register equipment, generating a unique tracking tag. Returns the
    /// new id and the tag.
    pub async fn create(&self, data: &CreateEquipment, user_id: i32) -> AppResult<(i32, String)> {
        let (codigo, nome, categoria_id) = match (&data.codigo, &data.nome, data.categoria_id) {
            (Some(codigo), Some(nome), Some(categoria_id)) => (codigo, nome, categoria_id),
            _ => {
                return Err(AppError::Validation(
                    "Código, nome e categoria são obrigatórios".to_string(),
                ))
            }
        };
        data.validate()?;

        if self.repository.equipment.codigo_exists(codigo).await? {
            return Err(AppError::Conflict("Código já existe".to_string()));
        }

        let tombamento = self.generate_tombamento().await?;
        let condicao = data.condicao.unwrap_or(EquipmentCondition::Bom);

        let destino = match data.deposito_id {
            Some(deposito_id) => format!("Depósito ID: {}", deposito_id),
            None => "Sem depósito".to_string(),
        };

        let mut tx = self.repository.pool.begin().await?;
        let id = self
            .repository
            .equipment
            .insert(&mut tx, data, codigo, nome, categoria_id, &tombamento, condicao)
            .await?;
        self.repository
            .equipment
            .insert_history(
                &mut tx,
                id,
                "criacao",
                None,
                Some(&destino),
                user_id,
                "Equipamento criado",
            )
            .await?;
        tx.commit().await?;

        Ok((id, tombamento))
    }

    /// Update equipment data
    pub async fn update(&self, id: i32, data: &UpdateEquipment, user_id: i32) -> AppResult<()> {
        // 404 before any write
        self.repository.equipment.get(id).await?;

        let mut tx = self.repository.pool.begin().await?;
        self.repository.equipment.update(&mut tx, id, data).await?;
        self.repository
            .equipment
            .insert_history(
                &mut tx,
                id,
                "atualizacao",
                None,
                None,
                user_id,
                "Dados do equipamento atualizados",
            )
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Report a problem. High and critical severities take the equipment
    /// out of service and degrade its condition in the same step.
    pub async fn report_problem(
        &self,
        equipment_id: i32,
        data: &ReportProblem,
        user_id: i32,
    ) -> AppResult<i32> {
        let (descricao, gravidade) = match (&data.descricao, data.gravidade) {
            (Some(descricao), Some(gravidade)) => (descricao, gravidade),
            _ => {
                return Err(AppError::Validation(
                    "Descrição e gravidade são obrigatórios".to_string(),
                ))
            }
        };

        self.repository.equipment.get(equipment_id).await?;

        let mut tx = self.repository.pool.begin().await?;
        let id = self
            .repository
            .equipment
            .insert_problem(&mut tx, equipment_id, descricao, gravidade, user_id)
            .await?;

        if gravidade.is_blocking() {
            let condicao = if gravidade == ProblemSeverity::Critica {
                EquipmentCondition::Quebrado
            } else {
                EquipmentCondition::Ruim
            };
            self.repository
                .equipment
                .set_status_condition(&mut tx, equipment_id, EquipmentStatus::ComProblema, condicao)
                .await?;
        }
        tx.commit().await?;

        Ok(id)
    }

    /// Resolve a problem. Clearing the last unresolved one puts the
    /// equipment back in service.
    pub async fn resolve_problem(
        &self,
        equipment_id: i32,
        problem_id: i32,
        user_id: i32,
    ) -> AppResult<()> {
        self.repository
            .equipment
            .get_problem(equipment_id, problem_id)
            .await?;

        let mut tx = self.repository.pool.begin().await?;
        self.repository
            .equipment
            .resolve_problem(&mut tx, problem_id, user_id)
            .await?;

        let remaining = self
            .repository
            .equipment
            .count_unresolved(&mut tx, equipment_id)
            .await?;
        if remaining == 0 {
            self.repository
                .equipment
                .set_status_condition(
                    &mut tx,
                    equipment_id,
                    EquipmentStatus::Disponivel,
                    EquipmentCondition::Bom,
                )
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Generate a TOMB-YYYY-NNNNNN tag, retrying on the rare collision
    async fn generate_tombamento(&self) -> AppResult<String> {
        let year = Utc::now().year();
        loop {
            let number: u32 = {
                let mut rng = rand::thread_rng();
                rng.gen_range(0..1_000_000)
            };
            let tombamento = format!("TOMB-{}-{:06}", year, number);
            if !self.repository.equipment.tombamento_exists(&tombamento).await? {
                return Ok(tombamento);
            }
        }
    }
}
