//! Testes do fluxo de compras
//!
//! Aritmética pura do workflow: total derivado, ida-e-volta do estoque
//! (criar + excluir) e a semântica "substitui, não mescla" do update.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use validator::Validate;

use varejo_backend::handlers::purchases::PurchasePayload;
use varejo_backend::models::purchase::PurchaseItemInput;
use varejo_backend::services::purchase_service::purchase_total;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(quantity: i32, unit_cost: &str) -> PurchaseItemInput {
    serde_json::from_value(serde_json::json!({
        "productId": uuid::Uuid::new_v4(),
        "quantity": quantity,
        "unitCost": unit_cost.parse::<f64>().unwrap(),
    }))
    .unwrap()
}

// ============================================================================
// Total da compra
// ============================================================================

#[test]
fn total_de_um_item() {
    let items = vec![item(10, "100")];
    assert_eq!(purchase_total(&items), dec("1000"));
}

#[test]
fn total_soma_todos_os_itens() {
    let items = vec![item(4, "25.00"), item(1, "7.50")];
    assert_eq!(purchase_total(&items), dec("107.50"));
}

// ============================================================================
// Ida-e-volta e substituição
// ============================================================================

/// Criar uma compra soma a quantidade; excluir subtrai a mesma quantidade.
/// O estoque volta exatamente ao valor anterior.
#[test]
fn criar_e_excluir_restaura_o_estoque() {
    let stock0 = 37i32;
    let qty = 10;

    let after_create = stock0 + qty;
    assert_eq!(after_create, 47);

    let after_delete = after_create - qty;
    assert_eq!(after_delete, stock0);
}

/// Update substitui os itens: reverte os 10 antigos e aplica os 3 novos,
/// efeito líquido de -7 sobre o estado pós-criação.
#[test]
fn update_substitui_em_vez_de_mesclar() {
    let stock0 = 50i32;
    let after_create = stock0 + 10;

    let after_update = after_create - 10 + 3;
    assert_eq!(after_update - after_create, -7);
    assert_eq!(after_update, stock0 + 3);
}

// ============================================================================
// Validação dos payloads
// ============================================================================

#[test]
fn payload_sem_itens_e_rejeitado() {
    let payload: PurchasePayload = serde_json::from_value(serde_json::json!({
        "supplierId": uuid::Uuid::new_v4(),
        "invoiceNo": "NF-0001",
        "date": "2025-06-01",
        "items": [],
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn payload_sem_numero_de_fatura_e_rejeitado() {
    let payload: PurchasePayload = serde_json::from_value(serde_json::json!({
        "supplierId": uuid::Uuid::new_v4(),
        "invoiceNo": "",
        "date": "2025-06-01",
        "items": [{
            "productId": uuid::Uuid::new_v4(),
            "quantity": 1,
            "unitCost": 5.0,
        }],
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn payload_com_custo_zero_e_rejeitado() {
    let payload: PurchasePayload = serde_json::from_value(serde_json::json!({
        "supplierId": uuid::Uuid::new_v4(),
        "invoiceNo": "NF-0002",
        "date": "2025-06-01",
        "items": [{
            "productId": uuid::Uuid::new_v4(),
            "quantity": 1,
            "unitCost": 0.0,
        }],
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn payload_valido_passa() {
    let payload: PurchasePayload = serde_json::from_value(serde_json::json!({
        "supplierId": uuid::Uuid::new_v4(),
        "invoiceNo": "NF-0003",
        "date": "2025-06-01",
        "items": [
            { "productId": uuid::Uuid::new_v4(), "quantity": 10, "unitCost": 100.0 },
            { "productId": uuid::Uuid::new_v4(), "quantity": 2, "unitCost": 3.25 },
        ],
    }))
    .unwrap();

    assert!(payload.validate().is_ok());
}

// ============================================================================
// Propriedades
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Ida-e-volta: criar e excluir qualquer conjunto de itens devolve
        /// o estoque de cada produto ao valor original.
        #[test]
        fn prop_ida_e_volta_por_produto(
            stocks in prop::collection::vec(0i32..=10_000, 1..10),
            qtys in prop::collection::vec(1i32..=500, 1..10)
        ) {
            let n = stocks.len().min(qtys.len());

            for i in 0..n {
                let after_create = stocks[i] + qtys[i];
                let after_delete = after_create - qtys[i];
                prop_assert_eq!(after_delete, stocks[i]);
            }
        }

        /// O total nunca é negativo e cresce com os itens.
        #[test]
        fn prop_total_monotonico(
            itens in prop::collection::vec((1i32..=100, 1i64..=10_000i64), 1..10)
        ) {
            let inputs: Vec<PurchaseItemInput> = itens
                .iter()
                .map(|(qty, cents)| item(*qty, &format!("{}.{:02}", cents / 100, cents % 100)))
                .collect();

            let total = purchase_total(&inputs);
            prop_assert!(total > Decimal::ZERO);

            // acrescentar um item só aumenta o total
            let mut maior = inputs.clone();
            maior.push(item(1, "0.01"));
            prop_assert!(purchase_total(&maior) > total);
        }
    }
}
