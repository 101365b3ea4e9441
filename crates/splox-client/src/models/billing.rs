use serde::{Deserialize, Serialize};

use super::JsonObject;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserBalance {
    pub balance_microdollars: i64,
    pub balance_usd: f64,
    pub currency: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTransaction {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_charge_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionPagination {
    pub page: u32,
    pub limit: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionHistoryResponse {
    pub transactions: Vec<BalanceTransaction>,
    pub pagination: TransactionPagination,
}

/// Optional filters for transaction history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionHistoryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Comma-separated: `credit`, `debit`, `refund`.
    pub types: Option<String>,
    /// Comma-separated: `pending`, `completed`, `failed`.
    pub statuses: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub search: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityStats {
    pub balance: f64,
    pub total_requests: u64,
    pub total_spending: f64,
    pub avg_cost_per_request: f64,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyActivity {
    pub date: String,
    pub total_cost: f64,
    pub request_count: u64,
    pub node_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyActivityResponse {
    pub data: Vec<DailyActivity>,
    pub days: u32,
}
