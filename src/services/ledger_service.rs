// src/services/ledger_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LedgerRepository,
    models::ledger::{
        Account, AccountKind, GeneralLedgerReport, JournalEntry, JournalEntryPatch,
        JournalEntryRow, JournalStats, LedgerLine, TrialBalanceReport, TrialBalanceRow,
        TrialBalanceTotals,
    },
};

// ---
// Aritmética contábil pura (fora do banco, para ser testável isolada)
// ---

/// Partida simples: exatamente um dos lados precisa ser positivo.
pub fn validate_entry_amounts(debit: Decimal, credit: Decimal) -> Result<(), AppError> {
    if debit < Decimal::ZERO || credit < Decimal::ZERO {
        return Err(AppError::BusinessRule(
            "Débito e crédito não podem ser negativos.".to_string(),
        ));
    }
    let has_debit = debit > Decimal::ZERO;
    let has_credit = credit > Decimal::ZERO;
    if has_debit == has_credit {
        return Err(AppError::BusinessRule(
            "Informe débito OU crédito, nunca ambos nem nenhum.".to_string(),
        ));
    }
    Ok(())
}

/// Saldo corrente: abertura + Σ(débito - crédito), lançamento a lançamento.
pub fn running_balance(opening: Decimal, entries: Vec<JournalEntry>) -> Vec<LedgerLine> {
    let mut balance = opening;
    entries
        .into_iter()
        .map(|entry| {
            balance += entry.debit - entry.credit;
            LedgerLine { entry, balance }
        })
        .collect()
}

/// Totais do balancete; `is_balanced` quando débitos == créditos no geral.
pub fn summarize_trial_balance(rows: &[TrialBalanceRow]) -> (TrialBalanceTotals, bool) {
    let total_debit: Decimal = rows.iter().map(|r| r.total_debit).sum();
    let total_credit: Decimal = rows.iter().map(|r| r.total_credit).sum();
    let is_balanced = total_debit == total_credit;
    (
        TrialBalanceTotals {
            total_debit,
            total_credit,
        },
        is_balanced,
    )
}

#[derive(Clone)]
pub struct LedgerService {
    pool: PgPool,
    ledger_repo: LedgerRepository,
}

impl LedgerService {
    pub fn new(pool: PgPool, ledger_repo: LedgerRepository) -> Self {
        Self { pool, ledger_repo }
    }

    // ---
    // Plano de contas
    // ---

    pub async fn create_account(&self, name: &str, kind: AccountKind) -> Result<Account, AppError> {
        self.ledger_repo.create_account(&self.pool, name, kind).await
    }

    pub async fn update_account(
        &self,
        id: Uuid,
        name: &str,
        kind: AccountKind,
    ) -> Result<Account, AppError> {
        self.ledger_repo
            .update_account(&self.pool, id, name, kind)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conta {id} não encontrada")))
    }

    pub async fn delete_account(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.ledger_repo.delete_account(&self.pool, id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("Conta {id} não encontrada")));
        }
        Ok(())
    }

    pub async fn account(&self, id: Uuid) -> Result<Account, AppError> {
        self.ledger_repo
            .find_account(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conta {id} não encontrada")))
    }

    pub async fn list_accounts(
        &self,
        search: Option<&str>,
        kind: Option<AccountKind>,
    ) -> Result<Vec<Account>, AppError> {
        self.ledger_repo.list_accounts(&self.pool, search, kind).await
    }

    // ---
    // Lançamentos
    // ---

    pub async fn create_entry(
        &self,
        account_id: Uuid,
        entry_date: NaiveDate,
        debit: Decimal,
        credit: Decimal,
        description: &str,
    ) -> Result<JournalEntryRow, AppError> {
        validate_entry_amounts(debit, credit)?;

        self.ledger_repo
            .find_account(&self.pool, account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conta {account_id} não encontrada")))?;

        let entry = self
            .ledger_repo
            .insert_entry(&self.pool, account_id, entry_date, debit, credit, description)
            .await?;
        self.entry(entry.id).await
    }

    pub async fn update_entry(
        &self,
        id: Uuid,
        patch: JournalEntryPatch,
    ) -> Result<JournalEntryRow, AppError> {
        let existing = self
            .ledger_repo
            .find_entry(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lançamento {id} não encontrado")))?;

        // Campos ausentes mantêm o valor atual; a exclusividade
        // débito/crédito vale para o par resultante.
        let account_id = patch.account_id.unwrap_or(existing.account_id);
        let entry_date = patch.entry_date.unwrap_or(existing.entry_date);
        let debit = patch.debit.unwrap_or(existing.debit);
        let credit = patch.credit.unwrap_or(existing.credit);
        let description = patch.description.unwrap_or(existing.description);

        validate_entry_amounts(debit, credit)?;

        if patch.account_id.is_some() {
            self.ledger_repo
                .find_account(&self.pool, account_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Conta {account_id} não encontrada")))?;
        }

        self.ledger_repo
            .update_entry(&self.pool, id, account_id, entry_date, debit, credit, &description)
            .await?;
        self.entry(id).await
    }

    pub async fn delete_entry(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.ledger_repo.delete_entry(&self.pool, id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("Lançamento {id} não encontrado")));
        }
        Ok(())
    }

    pub async fn entry(&self, id: Uuid) -> Result<JournalEntryRow, AppError> {
        self.ledger_repo
            .entry_row(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lançamento {id} não encontrado")))
    }

    pub async fn list_entries(
        &self,
        search: Option<&str>,
        account_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        debit_side: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<JournalEntryRow>, i64), AppError> {
        let rows = self
            .ledger_repo
            .list_entries(
                &self.pool, search, account_id, start_date, end_date, debit_side, limit, offset,
            )
            .await?;
        let total = self
            .ledger_repo
            .count_entries(&self.pool, search, account_id, start_date, end_date, debit_side)
            .await?;
        Ok((rows, total))
    }

    pub async fn search_entries(&self, query: &str) -> Result<Vec<JournalEntryRow>, AppError> {
        self.ledger_repo.search_entries(&self.pool, query).await
    }

    // ---
    // Relatórios
    // ---

    /// Balancete: `period` aceita 'YYYY' ou 'YYYY-MM'; vazio = tudo.
    pub async fn trial_balance(&self, period: Option<&str>) -> Result<TrialBalanceReport, AppError> {
        let (month, year) = match period {
            Some(p) if p.len() == 7 => (Some(p), None),
            Some(p) if p.len() == 4 => (None, Some(p)),
            Some(_) => {
                return Err(AppError::BusinessRule(
                    "Período inválido: use 'YYYY' ou 'YYYY-MM'.".to_string(),
                ));
            }
            None => (None, None),
        };

        let rows = self
            .ledger_repo
            .trial_balance_rows(&self.pool, month, year)
            .await?;
        let (totals, is_balanced) = summarize_trial_balance(&rows);

        Ok(TrialBalanceReport {
            period: period.unwrap_or("todos os períodos").to_string(),
            accounts: rows,
            totals,
            is_balanced,
        })
    }

    /// Razão da conta: saldo de abertura + saldo corrente por lançamento.
    pub async fn general_ledger(
        &self,
        account_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<GeneralLedgerReport, AppError> {
        let account = self.account(account_id).await?;

        let opening_balance = match start_date {
            Some(start) => {
                self.ledger_repo
                    .balance_before(&self.pool, account_id, start)
                    .await?
            }
            None => Decimal::ZERO,
        };

        let entries = self
            .ledger_repo
            .entries_for_ledger(&self.pool, account_id, start_date, end_date)
            .await?;

        let total_debit: Decimal = entries.iter().map(|e| e.debit).sum();
        let total_credit: Decimal = entries.iter().map(|e| e.credit).sum();

        let lines = running_balance(opening_balance, entries);
        let closing_balance = lines.last().map(|l| l.balance).unwrap_or(opening_balance);

        Ok(GeneralLedgerReport {
            account,
            start_date,
            end_date,
            opening_balance,
            entries: lines,
            closing_balance,
            total_debit,
            total_credit,
        })
    }

    pub async fn stats(&self) -> Result<JournalStats, AppError> {
        let overview = self.ledger_repo.overview(&self.pool).await?;
        let by_kind = self.ledger_repo.balance_by_kind(&self.pool).await?;
        let balance_check = overview.total_debit == overview.total_credit;
        Ok(JournalStats {
            overview,
            balance_check,
            by_kind,
        })
    }
}
