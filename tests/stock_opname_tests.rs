//! Testes da conferência de estoque (stock opname)
//!
//! - cálculo da divergência (contado - sistema)
//! - recálculo contra o estoque ATUAL na edição (comportamento documentado:
//!   a divergência significa "relativa ao estoque na última edição")
//! - idempotência do apply-adjustment

use proptest::prelude::*;

use varejo_backend::services::stock_opname_service::discrepancy;

// ============================================================================
// Divergência
// ============================================================================

#[test]
fn contagem_maior_da_divergencia_positiva() {
    assert_eq!(discrepancy(12, 10), 2);
}

#[test]
fn contagem_menor_da_divergencia_negativa() {
    assert_eq!(discrepancy(7, 10), -3);
}

#[test]
fn contagem_igual_da_divergencia_zero() {
    assert_eq!(discrepancy(10, 10), 0);
}

#[test]
fn contagem_zero_e_valida() {
    // Prateleira vazia: contado = 0 é um registro legítimo.
    assert_eq!(discrepancy(0, 25), -25);
}

// ============================================================================
// Recálculo na edição
// ============================================================================

/// Na edição, a divergência é recalculada contra o estoque ATUAL — que pode
/// ter andado desde o registro. Duas edições seguidas podem mudar o que a
/// divergência "quer dizer"; é o comportamento documentado, não um bug.
#[test]
fn recalculo_usa_o_estoque_atualizado() {
    // registro criado com sistema em 10
    let d1 = discrepancy(8, 10);
    assert_eq!(d1, -2);

    // o estoque andou (uma compra chegou): sistema agora em 15.
    // editar a contagem para 8 de novo recalcula contra 15, não contra 10.
    let d2 = discrepancy(8, 15);
    assert_eq!(d2, -7);
    assert_ne!(d1, d2);
}

// ============================================================================
// Apply-adjustment
// ============================================================================

/// Aplicar o ajuste iguala o estoque à contagem e zera a divergência.
/// Reaplicar é um no-op: o estoque já é a contagem.
#[test]
fn apply_adjustment_e_idempotente() {
    let counted = 42i32;
    let mut stock = 50i32;
    let mut recorded_discrepancy = discrepancy(counted, stock);
    assert_eq!(recorded_discrepancy, -8);

    // primeira aplicação
    stock = counted;
    recorded_discrepancy = 0;
    assert_eq!(stock, 42);

    // segunda aplicação: nada muda
    stock = counted;
    assert_eq!(stock, 42);
    assert_eq!(recorded_discrepancy, 0);

    // e uma recontagem agora bate com o sistema
    assert_eq!(discrepancy(counted, stock), 0);
}

// ============================================================================
// Propriedades
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// discrepancy é exatamente a subtração, para qualquer par.
        #[test]
        fn prop_divergencia_e_subtracao(counted in 0i32..=100_000, stock in 0i32..=100_000) {
            prop_assert_eq!(discrepancy(counted, stock), counted - stock);
        }

        /// Após aplicar o ajuste, a divergência recalculada é sempre zero.
        #[test]
        fn prop_apply_zera_a_divergencia(counted in 0i32..=100_000) {
            let stock_after = counted; // set_absolute
            prop_assert_eq!(discrepancy(counted, stock_after), 0);
        }

        /// Sinal da divergência: positivo = sobra física, negativo = falta.
        #[test]
        fn prop_sinal_da_divergencia(counted in 0i32..=1000, stock in 0i32..=1000) {
            let d = discrepancy(counted, stock);
            if counted > stock {
                prop_assert!(d > 0);
            } else if counted < stock {
                prop_assert!(d < 0);
            } else {
                prop_assert_eq!(d, 0);
            }
        }
    }
}
