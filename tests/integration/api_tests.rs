//! API integration tests
//!
//! These run against a live server with the seeded reference data. The
//! coordinator account below must exist (register it once before running).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3001/api/v1";

const COORD_EMAIL: &str = "coordenador@palco.app";
const COORD_SENHA: &str = "senha123";

/// Helper to get a coordinator auth token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": COORD_EMAIL,
            "senha": COORD_SENHA
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to register an equipment, returning its id
async fn create_equipment(client: &Client, token: &str, codigo: &str) -> i64 {
    let response = client
        .post(format!("{}/equipamentos", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "codigo": codigo,
            "nome": "Microfone de teste",
            "categoria_id": 1,
            "deposito_id": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["tombamento"]
        .as_str()
        .expect("No tombamento")
        .starts_with("TOMB-"));
    body["id"].as_i64().expect("No equipment ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": COORD_EMAIL,
            "senha": COORD_SENHA
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["usuario"]["tipo"], "coordenador");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": COORD_EMAIL,
            "senha": "senha-errada"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], COORD_EMAIL);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipamentos", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_categories() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/equipamentos/categorias", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let categories = body.as_array().expect("Expected an array");
    assert!(categories.iter().any(|c| c["nome"] == "Microfone com Fio"));
}

#[tokio::test]
#[ignore]
async fn test_create_equipment_rejects_bad_code() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/equipamentos", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "codigo": "mic-1",
            "nome": "Microfone",
            "categoria_id": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_transfer_workflow_completes_to_depot() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let equipamento_id = create_equipment(&client, &token, "TWF0001").await;

    // Request the transfer; no designated approvers, so the coordinator
    // account can sign all three legs
    let response = client
        .post(format!("{}/transferencias", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "equipamento_id": equipamento_id,
            "origem_tipo": "deposito",
            "origem_id": 1,
            "destino_tipo": "deposito",
            "destino_id": 2,
            "motivo": "Realocação de estoque"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let transfer_id = body["id"].as_i64().expect("No transfer ID");

    // Equipment is parked while the workflow runs
    let body: Value = client
        .get(format!("{}/equipamentos/{}", BASE_URL, equipamento_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["status"], "transferencia");

    // Receipt before the others must not complete the transfer
    let approve = |tipo: &'static str| {
        let client = client.clone();
        let token = token.clone();
        async move {
            let response = client
                .post(format!("{}/transferencias/{}/aprovar", BASE_URL, transfer_id))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({ "tipo_aprovacao": tipo }))
                .send()
                .await
                .expect("Failed to send request");
            assert!(response.status().is_success());
            let body: Value = response.json().await.expect("Failed to parse response");
            body["status"].as_str().expect("No status").to_string()
        }
    };

    assert_eq!(approve("recebimento").await, "pendente");
    assert_eq!(approve("coordenador").await, "aprovada_coordenador");
    assert_eq!(approve("entrega").await, "concluida");

    // Completion relocated the equipment to the destination depot
    let body: Value = client
        .get(format!("{}/equipamentos/{}", BASE_URL, equipamento_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["status"], "disponivel");
    assert_eq!(body["deposito_id"], 2);

    // Finalized transfers accept no further approvals
    let response = client
        .post(format!("{}/transferencias/{}/aprovar", BASE_URL, transfer_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "tipo_aprovacao": "coordenador" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_cancel_transfer_frees_equipment() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let equipamento_id = create_equipment(&client, &token, "TWF0002").await;

    let response = client
        .post(format!("{}/transferencias", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "equipamento_id": equipamento_id,
            "origem_tipo": "deposito",
            "origem_id": 1,
            "destino_tipo": "deposito",
            "destino_id": 3
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let transfer_id = body["id"].as_i64().expect("No transfer ID");

    let response = client
        .post(format!("{}/transferencias/{}/cancelar", BASE_URL, transfer_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "motivo": "Pedido duplicado" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = client
        .get(format!("{}/equipamentos/{}", BASE_URL, equipamento_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["status"], "disponivel");
}

#[tokio::test]
#[ignore]
async fn test_event_without_template_is_trivially_valid() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/eventos", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "nome": "Ensaio sem template",
            "local": "Galpão 2",
            "data_inicio": "2026-09-01T08:00",
            "data_fim": "2026-09-01T22:00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let evento_id = body["id"].as_i64().expect("No event ID");

    let body: Value = client
        .get(format!("{}/eventos/{}/validar-checklist", BASE_URL, evento_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["valido"], true);
    assert_eq!(body["avisos"].as_array().expect("avisos array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_checklist_gates_event_approval() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Template 2 (Evento Médio) requires 2 wired microphones among others
    let response = client
        .post(format!("{}/eventos", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "nome": "Festival incompleto",
            "local": "Praça Central",
            "template_id": 2,
            "data_inicio": "2026-10-10T10:00",
            "data_fim": "2026-10-12T23:00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let evento_id = body["id"].as_i64().expect("No event ID");

    // Advisory run reports the mandatory shortfalls
    let body: Value = client
        .get(format!("{}/eventos/{}/validar-checklist", BASE_URL, evento_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["valido"], false);
    assert!(!body["avisos"].as_array().expect("avisos array").is_empty());

    // The approval gate rejects the transition
    let response = client
        .put(format!("{}/eventos/{}/status", BASE_URL, evento_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "status": "aprovado" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Other transitions stay unrestricted
    let response = client
        .put(format!("{}/eventos/{}/status", BASE_URL, evento_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "status": "cancelado" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_problem_report_and_resolution_cycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let equipamento_id = create_equipment(&client, &token, "TWF0003").await;

    let response = client
        .post(format!("{}/equipamentos/{}/problemas", BASE_URL, equipamento_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "descricao": "Cápsula danificada",
            "gravidade": "critica"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let problema_id = body["id"].as_i64().expect("No problem ID");

    let body: Value = client
        .get(format!("{}/equipamentos/{}", BASE_URL, equipamento_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["status"], "com_problema");
    assert_eq!(body["condicao"], "quebrado");

    let response = client
        .put(format!(
            "{}/equipamentos/{}/problemas/{}/resolver",
            BASE_URL, equipamento_id, problema_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = client
        .get(format!("{}/equipamentos/{}", BASE_URL, equipamento_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["status"], "disponivel");
    assert_eq!(body["condicao"], "bom");
}

#[tokio::test]
#[ignore]
async fn test_cross_event_transfer_requires_overlap() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let equipamento_id = create_equipment(&client, &token, "TWF0004").await;

    let create_event = |nome: &'static str, inicio: &'static str, fim: &'static str| {
        let client = client.clone();
        let token = token.clone();
        async move {
            let response = client
                .post(format!("{}/eventos", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({
                    "nome": nome,
                    "local": "Arena",
                    "data_inicio": inicio,
                    "data_fim": fim
                }))
                .send()
                .await
                .expect("Failed to send request");
            assert_eq!(response.status(), 201);
            let body: Value = response.json().await.expect("Failed to parse response");
            let id = body["id"].as_i64().expect("No event ID");

            // Events without a template can be approved directly
            let response = client
                .put(format!("{}/eventos/{}/status", BASE_URL, id))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({ "status": "em_andamento" }))
                .send()
                .await
                .expect("Failed to send request");
            assert!(response.status().is_success());
            id
        }
    };

    let a = create_event("Evento A", "2026-01-01T08:00", "2026-01-03T22:00").await;
    let b = create_event("Evento B", "2026-01-05T08:00", "2026-01-07T22:00").await;
    let c = create_event("Evento C", "2026-01-03T08:00", "2026-01-06T22:00").await;

    // Disjoint periods are rejected
    let response = client
        .post(format!("{}/transferencias/entre-eventos", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "equipamento_id": equipamento_id,
            "evento_origem_id": a,
            "evento_destino_id": b
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Overlapping periods are accepted
    let response = client
        .post(format!("{}/transferencias/entre-eventos", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "equipamento_id": equipamento_id,
            "evento_origem_id": a,
            "evento_destino_id": c
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
}
