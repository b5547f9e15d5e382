// src/models/ledger.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- 1. Plano de contas ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Lançamentos (partida simples: débito OU crédito) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub account_id: Uuid,
    pub entry_date: NaiveDate,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub account_name: String,
    pub account_kind: AccountKind,
    pub entry_date: NaiveDate,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct JournalEntryPatch {
    pub account_id: Option<Uuid>,
    pub entry_date: Option<NaiveDate>,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub description: Option<String>,
}

// --- 3. Balancete (neraca de verificação) ---

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceRow {
    pub account_id: Uuid,
    pub account_name: String,
    pub account_kind: AccountKind,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceTotals {
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceReport {
    pub period: String,
    pub accounts: Vec<TrialBalanceRow>,
    pub totals: TrialBalanceTotals,
    pub is_balanced: bool,
}

// --- 4. Razão por conta (saldo corrente) ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLine {
    #[serde(flatten)]
    pub entry: JournalEntry,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedgerReport {
    pub account: Account,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub opening_balance: Decimal,
    pub entries: Vec<LedgerLine>,
    pub closing_balance: Decimal,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

// --- 5. Estatísticas ---

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JournalOverview {
    pub total_entries: i64,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub entries_this_month: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct KindBalanceRow {
    pub kind: AccountKind,
    pub entry_count: i64,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    pub overview: JournalOverview,
    pub balance_check: bool,
    pub by_kind: Vec<KindBalanceRow>,
}
