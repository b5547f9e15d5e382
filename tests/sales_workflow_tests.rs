//! Testes do fluxo de vendas (PDV)
//!
//! Cobrem a aritmética pura do workflow e a validação dos payloads:
//! - total derivado dos itens
//! - não-negatividade do estoque sob sequências criar/atualizar/excluir
//! - atomicidade da pré-checagem (nenhum item passa se um falha)

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use validator::Validate;

use varejo_backend::handlers::sales::SalePayload;
use varejo_backend::models::sales::SaleItemInput;
use varejo_backend::services::sales_service::sale_total;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(quantity: i32, unit_price: &str) -> SaleItemInput {
    serde_json::from_value(serde_json::json!({
        "productId": uuid::Uuid::new_v4(),
        "quantity": quantity,
        "unitPrice": unit_price.parse::<f64>().unwrap(),
    }))
    .unwrap()
}

// ============================================================================
// Total da venda
// ============================================================================

#[test]
fn total_de_um_item() {
    let items = vec![item(5, "1000")];
    assert_eq!(sale_total(&items), dec("5000"));
}

#[test]
fn total_soma_todos_os_itens() {
    let items = vec![item(2, "10.50"), item(3, "4.00")];
    // 2 × 10.50 + 3 × 4.00 = 33.00
    assert_eq!(sale_total(&items), dec("33.00"));
}

#[test]
fn total_de_lista_vazia_e_zero() {
    assert_eq!(sale_total(&[]), Decimal::ZERO);
}

// ============================================================================
// Cenário do ciclo completo (aritmética de estoque)
// ============================================================================

/// O mesmo encadeamento que o workflow executa no banco: criar baixa o
/// estoque, atualizar reverte e reaplica, excluir devolve tudo.
#[test]
fn ciclo_completo_devolve_o_estoque() {
    let mut stock = 20i32;

    // criar venda de 5 unidades
    let qty_v1 = 5;
    stock -= qty_v1;
    assert_eq!(stock, 15);
    assert_eq!(sale_total(&[item(qty_v1, "1000")]), dec("5000"));

    // atualizar para 8 unidades: reverte as 5, aplica as 8
    let qty_v2 = 8;
    stock += qty_v1;
    stock -= qty_v2;
    assert_eq!(stock, 12);
    assert_eq!(sale_total(&[item(qty_v2, "1000")]), dec("8000"));

    // excluir: devolve as 8
    stock += qty_v2;
    assert_eq!(stock, 20);
}

#[test]
fn pre_checagem_barra_a_venda_inteira() {
    // Dois itens; o segundo pede mais do que há. A pré-checagem percorre
    // todos antes de qualquer escrita, então nenhum deles é aplicado.
    let stocks = [10i32, 3];
    let requested = [4i32, 5];

    let all_ok = stocks
        .iter()
        .zip(requested.iter())
        .all(|(stock, qty)| stock >= qty);
    assert!(!all_ok);

    // estoque permanece intacto
    assert_eq!(stocks, [10, 3]);
}

// ============================================================================
// Validação dos payloads
// ============================================================================

#[test]
fn payload_sem_itens_e_rejeitado() {
    let payload: SalePayload = serde_json::from_value(serde_json::json!({
        "customerId": null,
        "date": "2025-06-01",
        "items": [],
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn payload_com_quantidade_zero_e_rejeitado() {
    let payload: SalePayload = serde_json::from_value(serde_json::json!({
        "customerId": null,
        "date": "2025-06-01",
        "items": [{
            "productId": uuid::Uuid::new_v4(),
            "quantity": 0,
            "unitPrice": 10.0,
        }],
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn payload_com_preco_zero_e_rejeitado() {
    let payload: SalePayload = serde_json::from_value(serde_json::json!({
        "customerId": null,
        "date": "2025-06-01",
        "items": [{
            "productId": uuid::Uuid::new_v4(),
            "quantity": 2,
            "unitPrice": 0.0,
        }],
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn payload_valido_passa() {
    let payload: SalePayload = serde_json::from_value(serde_json::json!({
        "customerId": uuid::Uuid::new_v4(),
        "date": "2025-06-01",
        "items": [{
            "productId": uuid::Uuid::new_v4(),
            "quantity": 2,
            "unitPrice": 49.90,
        }],
    }))
    .unwrap();

    assert!(payload.validate().is_ok());
}

// ============================================================================
// Propriedades
// ============================================================================

mod property_tests {
    use super::*;

    fn qty_strategy() -> impl Strategy<Value = i32> {
        1i32..=1000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total = Σ quantidade × preço, para qualquer lista de itens.
        #[test]
        fn prop_total_e_a_soma_dos_subtotais(
            itens in prop::collection::vec((qty_strategy(), 1i64..=100_000i64), 1..20)
        ) {
            let inputs: Vec<SaleItemInput> = itens
                .iter()
                .map(|(qty, cents)| item(*qty, &format!("{}.{:02}", cents / 100, cents % 100)))
                .collect();

            let expected: Decimal = inputs
                .iter()
                .map(|i| Decimal::from(i.quantity) * i.unit_price)
                .sum();

            prop_assert_eq!(sale_total(&inputs), expected);
        }

        /// Reverter e reaplicar (o padrão do update) preserva o estoque
        /// quando as quantidades são iguais, e desloca exatamente a
        /// diferença quando não são.
        #[test]
        fn prop_update_desloca_a_diferenca(
            stock0 in 0i32..=10_000,
            old_qty in qty_strategy(),
            new_qty in qty_strategy()
        ) {
            // estado após a venda original
            let after_create = stock0 - old_qty;
            // update: reverte a antiga, aplica a nova
            let after_update = after_create + old_qty - new_qty;

            prop_assert_eq!(after_update - after_create, old_qty - new_qty);
            prop_assert_eq!(after_update, stock0 - new_qty);
        }

        /// A baixa só é permitida quando o saldo comporta; o saldo
        /// resultante nunca é negativo.
        #[test]
        fn prop_baixa_condicional_nunca_negativa(
            stock in 0i32..=1000,
            qty in qty_strategy()
        ) {
            // mesmo predicado do UPDATE condicional (stock + delta >= 0)
            let allowed = stock - qty >= 0;
            if allowed {
                prop_assert!(stock - qty >= 0);
            } else {
                // a instrução não afeta nenhuma linha; o saldo fica como está
                prop_assert!(stock >= 0);
            }
        }
    }
}
