// src/db/ledger_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ledger::{
        Account, AccountKind, JournalEntry, JournalEntryRow, JournalOverview, KindBalanceRow,
        TrialBalanceRow,
    },
};

const ENTRY_SELECT: &str = r#"
    SELECT
        j.id,
        j.account_id,
        a.name AS account_name,
        a.kind AS account_kind,
        j.entry_date,
        j.debit,
        j.credit,
        j.description,
        j.created_at,
        j.updated_at
    FROM journal_entries j
    JOIN accounts a ON a.id = j.account_id
"#;

#[derive(Clone)]
pub struct LedgerRepository;

impl LedgerRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Plano de contas
    // ---

    pub async fn find_account<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(account)
    }

    pub async fn list_accounts<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        kind: Option<AccountKind>,
    ) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::account_kind IS NULL OR kind = $2)
            ORDER BY kind, name ASC
            "#,
        )
        .bind(search)
        .bind(kind)
        .fetch_all(executor)
        .await?;
        Ok(accounts)
    }

    pub async fn create_account<'e, E>(
        &self,
        executor: E,
        name: &str,
        kind: AccountKind,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (name, kind) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(kind)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::map_unique_violation(e, "Já existe uma conta com este nome."))
    }

    pub async fn update_account<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        kind: AccountKind,
    ) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = $2, kind = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(kind)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::map_unique_violation(e, "Já existe uma conta com este nome."))
    }

    pub async fn delete_account<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Lançamentos
    // ---

    pub async fn find_entry<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<JournalEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry =
            sqlx::query_as::<_, JournalEntry>("SELECT * FROM journal_entries WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(entry)
    }

    pub async fn entry_row<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<JournalEntryRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{ENTRY_SELECT} WHERE j.id = $1");
        let row = sqlx::query_as::<_, JournalEntryRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Filtro por lado: `Some(true)` = só débitos, `Some(false)` = só créditos.
    pub async fn list_entries<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        account_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        debit_side: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JournalEntryRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{ENTRY_SELECT}
            WHERE ($1::text IS NULL OR j.description ILIKE '%' || $1 || '%' OR a.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR j.account_id = $2)
              AND ($3::date IS NULL OR j.entry_date >= $3)
              AND ($4::date IS NULL OR j.entry_date <= $4)
              AND ($5::bool IS NULL OR ($5 AND j.debit > 0) OR (NOT $5 AND j.credit > 0))
            ORDER BY j.entry_date DESC, j.created_at DESC
            LIMIT $6 OFFSET $7
            "#
        );
        let rows = sqlx::query_as::<_, JournalEntryRow>(&sql)
            .bind(search)
            .bind(account_id)
            .bind(start_date)
            .bind(end_date)
            .bind(debit_side)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn count_entries<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        account_id: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        debit_side: Option<bool>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM journal_entries j
            JOIN accounts a ON a.id = j.account_id
            WHERE ($1::text IS NULL OR j.description ILIKE '%' || $1 || '%' OR a.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR j.account_id = $2)
              AND ($3::date IS NULL OR j.entry_date >= $3)
              AND ($4::date IS NULL OR j.entry_date <= $4)
              AND ($5::bool IS NULL OR ($5 AND j.debit > 0) OR (NOT $5 AND j.credit > 0))
            "#,
        )
        .bind(search)
        .bind(account_id)
        .bind(start_date)
        .bind(end_date)
        .bind(debit_side)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn search_entries<'e, E>(
        &self,
        executor: E,
        query: &str,
    ) -> Result<Vec<JournalEntryRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{ENTRY_SELECT}
            WHERE j.description ILIKE '%' || $1 || '%' OR a.name ILIKE '%' || $1 || '%'
            ORDER BY j.entry_date DESC
            LIMIT 20
            "#
        );
        let rows = sqlx::query_as::<_, JournalEntryRow>(&sql)
            .bind(query)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn insert_entry<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        entry_date: NaiveDate,
        debit: Decimal,
        credit: Decimal,
        description: &str,
    ) -> Result<JournalEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (account_id, entry_date, debit, credit, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(entry_date)
        .bind(debit)
        .bind(credit)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    /// Débito e crédito andam juntos: o service sempre manda o par completo.
    pub async fn update_entry<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        account_id: Uuid,
        entry_date: NaiveDate,
        debit: Decimal,
        credit: Decimal,
        description: &str,
    ) -> Result<JournalEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            UPDATE journal_entries
            SET account_id = $2, entry_date = $3, debit = $4, credit = $5,
                description = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(account_id)
        .bind(entry_date)
        .bind(debit)
        .bind(credit)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn delete_entry<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Agregações contábeis
    // ---

    /// Linhas do balancete por conta; período opcional em 'YYYY' ou 'YYYY-MM'.
    pub async fn trial_balance_rows<'e, E>(
        &self,
        executor: E,
        month: Option<&str>,
        year: Option<&str>,
    ) -> Result<Vec<TrialBalanceRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TrialBalanceRow>(
            r#"
            SELECT
                a.id AS account_id,
                a.name AS account_name,
                a.kind AS account_kind,
                COALESCE(SUM(j.debit), 0) AS total_debit,
                COALESCE(SUM(j.credit), 0) AS total_credit,
                COALESCE(SUM(j.debit), 0) - COALESCE(SUM(j.credit), 0) AS net
            FROM accounts a
            LEFT JOIN journal_entries j ON j.account_id = a.id
                AND ($1::text IS NULL OR to_char(j.entry_date, 'YYYY-MM') = $1)
                AND ($2::text IS NULL OR to_char(j.entry_date, 'YYYY') = $2)
            GROUP BY a.id, a.name, a.kind
            ORDER BY a.kind, a.name
            "#,
        )
        .bind(month)
        .bind(year)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Saldo de abertura: débitos - créditos anteriores ao início do período.
    pub async fn balance_before<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        before: NaiveDate,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(debit), 0) - COALESCE(SUM(credit), 0)
            FROM journal_entries
            WHERE account_id = $1 AND entry_date < $2
            "#,
        )
        .bind(account_id)
        .bind(before)
        .fetch_one(executor)
        .await?;
        Ok(balance)
    }

    /// Lançamentos da conta em ordem cronológica, desempatados pela ordem de
    /// inserção (created_at) para o saldo corrente.
    pub async fn entries_for_ledger<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT * FROM journal_entries
            WHERE account_id = $1
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
            ORDER BY entry_date ASC, created_at ASC
            "#,
        )
        .bind(account_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    pub async fn overview<'e, E>(&self, executor: E) -> Result<JournalOverview, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let overview = sqlx::query_as::<_, JournalOverview>(
            r#"
            SELECT
                COUNT(*) AS total_entries,
                COALESCE(SUM(debit), 0) AS total_debit,
                COALESCE(SUM(credit), 0) AS total_credit,
                COUNT(*) FILTER (
                    WHERE date_trunc('month', entry_date) = date_trunc('month', CURRENT_DATE)
                ) AS entries_this_month
            FROM journal_entries
            "#,
        )
        .fetch_one(executor)
        .await?;
        Ok(overview)
    }

    pub async fn balance_by_kind<'e, E>(&self, executor: E) -> Result<Vec<KindBalanceRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, KindBalanceRow>(
            r#"
            SELECT
                a.kind,
                COUNT(j.id) AS entry_count,
                COALESCE(SUM(j.debit), 0) AS total_debit,
                COALESCE(SUM(j.credit), 0) AS total_credit,
                COALESCE(SUM(j.debit), 0) - COALESCE(SUM(j.credit), 0) AS net
            FROM accounts a
            LEFT JOIN journal_entries j ON j.account_id = a.id
            GROUP BY a.kind
            ORDER BY a.kind
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
