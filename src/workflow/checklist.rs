//! Event checklist engine
//!
//! Evaluates an event's equipment assignments against its template's
//! minimum-quantity rules. The advisory path reports every shortfall; the
//! approval gate stops at the first mandatory one.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

/// One checklist rule, already joined with its category
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistRequirement {
    pub categoria_id: i32,
    pub categoria: String,
    pub tipo: String,
    pub quantidade_minima: i32,
    pub obrigatorio: bool,
}

/// Shortfall warning for one category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChecklistWarning {
    pub categoria: String,
    pub tipo: String,
    pub quantidade_minima: i32,
    pub quantidade_atual: i64,
    pub deficit: i64,
    pub obrigatorio: bool,
    pub mensagem: String,
}

/// Result of a full checklist evaluation
#[derive(Debug, Clone)]
pub struct ChecklistOutcome {
    pub valido: bool,
    pub avisos: Vec<ChecklistWarning>,
}

/// First unmet mandatory rule, used by the approval gate
#[derive(Debug, Clone, PartialEq)]
pub struct MandatoryDeficit {
    pub categoria: String,
    pub quantidade_atual: i64,
    pub quantidade_minima: i32,
}

/// Evaluates every rule and reports all shortfalls. The outcome is invalid
/// iff at least one mandatory rule is short; optional shortfalls only warn.
pub fn evaluate(
    requirements: &[ChecklistRequirement],
    counts: &HashMap<i32, i64>,
) -> ChecklistOutcome {
    let mut valido = true;
    let mut avisos = Vec::new();

    for req in requirements {
        let atual = counts.get(&req.categoria_id).copied().unwrap_or(0);
        if atual < i64::from(req.quantidade_minima) {
            let deficit = i64::from(req.quantidade_minima) - atual;
            if req.obrigatorio {
                valido = false;
            }
            avisos.push(ChecklistWarning {
                categoria: req.categoria.clone(),
                tipo: req.tipo.clone(),
                quantidade_minima: req.quantidade_minima,
                quantidade_atual: atual,
                deficit,
                obrigatorio: req.obrigatorio,
                mensagem: format!(
                    "{}: {}/{} - Faltam {}",
                    req.categoria, atual, req.quantidade_minima, deficit
                ),
            });
        }
    }

    ChecklistOutcome { valido, avisos }
}

/// Walks the rules in order and returns the first mandatory shortfall,
/// skipping optional rules entirely.
pub fn first_mandatory_deficit(
    requirements: &[ChecklistRequirement],
    counts: &HashMap<i32, i64>,
) -> Option<MandatoryDeficit> {
    requirements
        .iter()
        .filter(|req| req.obrigatorio)
        .find_map(|req| {
            let atual = counts.get(&req.categoria_id).copied().unwrap_or(0);
            (atual < i64::from(req.quantidade_minima)).then(|| MandatoryDeficit {
                categoria: req.categoria.clone(),
                quantidade_atual: atual,
                quantidade_minima: req.quantidade_minima,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: i32, nome: &str, minima: i32, obrigatorio: bool) -> ChecklistRequirement {
        ChecklistRequirement {
            categoria_id: id,
            categoria: nome.to_string(),
            tipo: "som".to_string(),
            quantidade_minima: minima,
            obrigatorio,
        }
    }

    fn counts(pairs: &[(i32, i64)]) -> HashMap<i32, i64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_all_requirements_met() {
        let reqs = vec![req(1, "Microfone com Fio", 2, true), req(5, "Refletor LED", 4, false)];
        let outcome = evaluate(&reqs, &counts(&[(1, 2), (5, 4)]));
        assert!(outcome.valido);
        assert!(outcome.avisos.is_empty());
    }

    #[test]
    fn test_mandatory_and_optional_shortfalls() {
        let reqs = vec![req(1, "Microfone com Fio", 2, true), req(5, "Refletor LED", 4, false)];
        let outcome = evaluate(&reqs, &counts(&[(1, 1), (5, 1)]));
        assert!(!outcome.valido);
        assert_eq!(outcome.avisos.len(), 2);
        assert_eq!(outcome.avisos[0].deficit, 1);
        assert!(outcome.avisos[0].obrigatorio);
        assert_eq!(outcome.avisos[1].deficit, 3);
        assert!(!outcome.avisos[1].obrigatorio);
    }

    #[test]
    fn test_optional_shortfall_stays_valid() {
        let reqs = vec![req(1, "Mesa de Som", 1, true), req(7, "Par LED", 8, false)];
        let outcome = evaluate(&reqs, &counts(&[(1, 1)]));
        assert!(outcome.valido);
        assert_eq!(outcome.avisos.len(), 1);
        assert_eq!(outcome.avisos[0].quantidade_atual, 0);
        assert_eq!(outcome.avisos[0].deficit, 8);
    }

    #[test]
    fn test_unassigned_category_counts_as_zero() {
        let reqs = vec![req(3, "Caixa de Som", 4, true)];
        let outcome = evaluate(&reqs, &HashMap::new());
        assert!(!outcome.valido);
        assert_eq!(outcome.avisos[0].quantidade_atual, 0);
        assert_eq!(outcome.avisos[0].deficit, 4);
    }

    #[test]
    fn test_warning_message_format() {
        let reqs = vec![req(3, "Caixa de Som", 4, true)];
        let outcome = evaluate(&reqs, &counts(&[(3, 1)]));
        assert_eq!(outcome.avisos[0].mensagem, "Caixa de Som: 1/4 - Faltam 3");
    }

    #[test]
    fn test_surplus_is_not_a_warning() {
        let reqs = vec![req(1, "Microfone com Fio", 2, true)];
        let outcome = evaluate(&reqs, &counts(&[(1, 10)]));
        assert!(outcome.valido);
        assert!(outcome.avisos.is_empty());
    }

    #[test]
    fn test_gate_returns_first_mandatory_shortfall() {
        let reqs = vec![
            req(5, "Refletor LED", 4, false),
            req(1, "Microfone com Fio", 2, true),
            req(3, "Caixa de Som", 4, true),
        ];
        // The optional rule is short too but never reported by the gate
        let deficit = first_mandatory_deficit(&reqs, &counts(&[(1, 0), (3, 0)])).unwrap();
        assert_eq!(deficit.categoria, "Microfone com Fio");
        assert_eq!(deficit.quantidade_atual, 0);
        assert_eq!(deficit.quantidade_minima, 2);
    }

    #[test]
    fn test_gate_passes_when_mandatory_met() {
        let reqs = vec![req(1, "Mesa de Som", 1, true), req(7, "Par LED", 8, false)];
        assert_eq!(first_mandatory_deficit(&reqs, &counts(&[(1, 2)])), None);
    }
}
