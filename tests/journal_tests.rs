//! Testes do diário contábil
//!
//! - exclusividade débito/crédito por lançamento
//! - saldo corrente (razão da conta)
//! - totais do balancete e o flag is_balanced

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use varejo_backend::models::ledger::{AccountKind, JournalEntry, TrialBalanceRow};
use varejo_backend::services::ledger_service::{
    running_balance, summarize_trial_balance, validate_entry_amounts,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn entry(debit: &str, credit: &str, day: u32) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4(),
        account_id: Uuid::new_v4(),
        entry_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        debit: dec(debit),
        credit: dec(credit),
        description: "lançamento de teste".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn tb_row(name: &str, debit: &str, credit: &str) -> TrialBalanceRow {
    TrialBalanceRow {
        account_id: Uuid::new_v4(),
        account_name: name.to_string(),
        account_kind: AccountKind::Asset,
        total_debit: dec(debit),
        total_credit: dec(credit),
        net: dec(debit) - dec(credit),
    }
}

// ============================================================================
// Exclusividade débito/crédito
// ============================================================================

#[test]
fn debito_e_credito_juntos_sao_rejeitados() {
    assert!(validate_entry_amounts(dec("100"), dec("50")).is_err());
}

#[test]
fn ambos_zerados_sao_rejeitados() {
    assert!(validate_entry_amounts(Decimal::ZERO, Decimal::ZERO).is_err());
}

#[test]
fn so_debito_e_aceito() {
    assert!(validate_entry_amounts(dec("100"), Decimal::ZERO).is_ok());
}

#[test]
fn so_credito_e_aceito() {
    assert!(validate_entry_amounts(Decimal::ZERO, dec("250.75")).is_ok());
}

#[test]
fn valores_negativos_sao_rejeitados() {
    assert!(validate_entry_amounts(dec("-1"), Decimal::ZERO).is_err());
    assert!(validate_entry_amounts(Decimal::ZERO, dec("-1")).is_err());
}

// ============================================================================
// Saldo corrente (razão)
// ============================================================================

#[test]
fn saldo_corrente_acumula_na_ordem() {
    let entries = vec![
        entry("500", "0", 1),
        entry("0", "200", 2),
        entry("300", "0", 3),
    ];

    let lines = running_balance(Decimal::ZERO, entries);
    let balances: Vec<Decimal> = lines.iter().map(|l| l.balance).collect();
    assert_eq!(balances, vec![dec("500"), dec("300"), dec("600")]);
}

#[test]
fn saldo_corrente_parte_da_abertura() {
    let entries = vec![entry("0", "150", 10)];
    let lines = running_balance(dec("1000"), entries);
    assert_eq!(lines[0].balance, dec("850"));
}

#[test]
fn razao_sem_lancamentos_fica_na_abertura() {
    let lines = running_balance(dec("77.50"), vec![]);
    assert!(lines.is_empty());
}

// ============================================================================
// Balancete
// ============================================================================

#[test]
fn balancete_do_exemplo_classico() {
    // contaA: débito 500, crédito 200 (net 300); contaB: débito 200.
    let rows = vec![tb_row("Caixa", "500", "200"), tb_row("Estoque", "200", "0")];

    assert_eq!(rows[0].net, dec("300"));
    assert_eq!(rows[1].net, dec("200"));

    let (totals, is_balanced) = summarize_trial_balance(&rows);
    assert_eq!(totals.total_debit, dec("700"));
    assert_eq!(totals.total_credit, dec("200"));
    assert!(!is_balanced); // 700 != 200
}

#[test]
fn balancete_equilibrado() {
    let rows = vec![tb_row("Caixa", "300", "0"), tb_row("Receita", "0", "300")];
    let (totals, is_balanced) = summarize_trial_balance(&rows);
    assert_eq!(totals.total_debit, totals.total_credit);
    assert!(is_balanced);
}

#[test]
fn balancete_vazio_e_equilibrado() {
    let (totals, is_balanced) = summarize_trial_balance(&[]);
    assert_eq!(totals.total_debit, Decimal::ZERO);
    assert_eq!(totals.total_credit, Decimal::ZERO);
    assert!(is_balanced);
}

// ============================================================================
// Propriedades
// ============================================================================

mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10_000_000i64).prop_map(|c| Decimal::new(c, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Exatamente um lado positivo passa; os outros três quadrantes não.
        #[test]
        fn prop_exclusividade(debit in amount_strategy(), credit in amount_strategy()) {
            prop_assert!(validate_entry_amounts(debit, Decimal::ZERO).is_ok());
            prop_assert!(validate_entry_amounts(Decimal::ZERO, credit).is_ok());
            prop_assert!(validate_entry_amounts(debit, credit).is_err());
            prop_assert!(validate_entry_amounts(Decimal::ZERO, Decimal::ZERO).is_err());
        }

        /// O saldo final é abertura + Σ(débito - crédito), qualquer sequência.
        #[test]
        fn prop_saldo_final_e_a_soma(
            opening in amount_strategy(),
            sides in prop::collection::vec((any::<bool>(), amount_strategy()), 1..30)
        ) {
            let entries: Vec<JournalEntry> = sides
                .iter()
                .map(|(is_debit, amount)| {
                    if *is_debit {
                        entry(&amount.to_string(), "0", 1)
                    } else {
                        entry("0", &amount.to_string(), 1)
                    }
                })
                .collect();

            let expected = opening
                + entries.iter().map(|e| e.debit - e.credit).sum::<Decimal>();

            let lines = running_balance(opening, entries);
            prop_assert_eq!(lines.last().unwrap().balance, expected);
        }

        /// O balancete fecha exatamente quando Σdébitos == Σcréditos.
        #[test]
        fn prop_is_balanced(
            pares in prop::collection::vec((amount_strategy(), amount_strategy()), 1..15)
        ) {
            let rows: Vec<TrialBalanceRow> = pares
                .iter()
                .map(|(d, c)| tb_row("conta", &d.to_string(), &c.to_string()))
                .collect();

            let total_debit: Decimal = rows.iter().map(|r| r.total_debit).sum();
            let total_credit: Decimal = rows.iter().map(|r| r.total_credit).sum();

            let (totals, is_balanced) = summarize_trial_balance(&rows);
            prop_assert_eq!(totals.total_debit, total_debit);
            prop_assert_eq!(totals.total_credit, total_credit);
            prop_assert_eq!(is_balanced, total_debit == total_credit);
        }
    }
}
