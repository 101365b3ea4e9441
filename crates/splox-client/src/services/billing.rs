use std::sync::Arc;

use crate::errors::SploxError;
use crate::models::{
    ActivityStats, DailyActivityResponse, TransactionHistoryParams, TransactionHistoryResponse,
    UserBalance,
};
use crate::transport::{Call, Query, Transport};

/// Balance, transactions and usage statistics.
#[derive(Clone)]
pub struct Billing {
    transport: Arc<Transport>,
}

impl Billing {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn balance(&self) -> Result<UserBalance, SploxError> {
        self.transport.send_json(Call::get("/billing/balance")).await
    }

    /// Paginated, filterable transaction history.
    pub async fn transactions(
        &self,
        params: &TransactionHistoryParams,
    ) -> Result<TransactionHistoryResponse, SploxError> {
        let query = Query::new()
            .positive("page", params.page)
            .positive("limit", params.limit)
            .text("types", params.types.as_deref())
            .text("statuses", params.statuses.as_deref())
            .text("start_date", params.start_date.as_deref())
            .text("end_date", params.end_date.as_deref())
            .amount("min_amount", params.min_amount)
            .amount("max_amount", params.max_amount)
            .text("search", params.search.as_deref());
        self.transport
            .send_json(Call::get("/billing/transactions").query(query))
            .await
    }

    pub async fn activity_stats(&self) -> Result<ActivityStats, SploxError> {
        self.transport.send_json(Call::get("/activity/stats")).await
    }

    /// Daily spending over the last `days` days (server default 30).
    pub async fn daily_activity(&self, days: Option<u32>) -> Result<DailyActivityResponse, SploxError> {
        let query = Query::new().positive("days", days);
        self.transport
            .send_json(Call::get("/activity/daily").query(query))
            .await
    }
}
