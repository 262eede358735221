//! 账本示例：交易、银行连接与预算
//!
use crate::store::{LedgerStore, StoreError, Transaction};
use async_trait::async_trait;
use chrono::Utc;
use finance_messaging::{
    CommandHandler, DispatchContext, NotificationHandler, QueryHandler, command, notification, query,
};
use finance_results::{Outcome, Problem, Validate, ValidationErrors};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use ulid::Ulid;

#[command(name = "ledger.create_transaction", response = String)]
pub struct CreateTransaction {
    pub category: String,
    pub amount_cents: i64,
    pub description: String,
}

impl Validate for CreateTransaction {
    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .ensure(!self.category.trim().is_empty(), "category", "category is required")
            .ensure(self.amount_cents != 0, "amount_cents", "amount must not be zero")
            .ensure(
                self.description.len() <= 140,
                "description",
                "description must be at most 140 characters",
            );
    }
}

#[query(name = "ledger.get_transactions", response = Vec<Transaction>)]
pub struct GetTransactions {
    pub category: Option<String>,
}

#[command(name = "ledger.store_connection")]
pub struct StoreConnection {
    pub institution: String,
    pub external_id: String,
}

#[notification(name = "ledger.transaction_created")]
pub struct TransactionCreated {
    pub transaction_id: String,
    pub category: String,
    pub amount_cents: i64,
}

pub struct LedgerHandlers {
    store: Arc<LedgerStore>,
}

impl LedgerHandlers {
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler<CreateTransaction> for LedgerHandlers {
    async fn handle(&self, _ctx: &DispatchContext, cmd: CreateTransaction) -> anyhow::Result<Outcome<String>> {
        let id = Ulid::new().to_string();
        self.store.insert_transaction(Transaction {
            id: id.clone(),
            category: cmd.category,
            amount_cents: cmd.amount_cents,
            description: cmd.description,
            booked_at: Utc::now(),
        })?;
        Ok(Outcome::success(id))
    }
}

#[async_trait]
impl QueryHandler<GetTransactions> for LedgerHandlers {
    async fn handle(
        &self,
        _ctx: &DispatchContext,
        q: GetTransactions,
    ) -> anyhow::Result<Outcome<Vec<Transaction>>> {
        Ok(Outcome::success(self.store.transactions(q.category.as_deref())?))
    }
}

#[async_trait]
impl CommandHandler<StoreConnection> for LedgerHandlers {
    async fn handle(&self, _ctx: &DispatchContext, cmd: StoreConnection) -> anyhow::Result<Outcome> {
        // 重复连接是业务冲突，其余存储错误仍按运行期错误上抛
        match self.store.insert_connection(&cmd.institution, &cmd.external_id) {
            Ok(()) => Ok(Outcome::success(())),
            Err(err @ StoreError::DuplicateConnection { .. }) => {
                Ok(Outcome::failure(Problem::conflict("Connection exists", err.to_string())))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// 预算跟踪：类别支出超过上限时告警
pub struct BudgetTracker {
    store: Arc<LedgerStore>,
    limits: HashMap<String, i64>,
}

impl BudgetTracker {
    pub fn new(store: Arc<LedgerStore>, limits: HashMap<String, i64>) -> Self {
        Self { store, limits }
    }
}

#[async_trait]
impl NotificationHandler<TransactionCreated> for BudgetTracker {
    fn handler_name(&self) -> &str {
        "budget"
    }

    async fn handle(&self, _ctx: &DispatchContext, n: &TransactionCreated) -> anyhow::Result<()> {
        let spent = self.store.add_spent(&n.category, n.amount_cents)?;
        match self.limits.get(&n.category) {
            Some(limit) if spent > *limit => {
                warn!(category = %n.category, spent, limit, "budget exceeded");
            }
            _ => info!(category = %n.category, spent, "budget updated"),
        }
        Ok(())
    }
}

/// 审计：记录每笔新交易
pub struct AuditTrail {
    store: Arc<LedgerStore>,
}

impl AuditTrail {
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationHandler<TransactionCreated> for AuditTrail {
    fn handler_name(&self) -> &str {
        "audit"
    }

    async fn handle(&self, ctx: &DispatchContext, n: &TransactionCreated) -> anyhow::Result<()> {
        self.store.append_audit(format!(
            "{} {} {} by {}",
            n.transaction_id,
            n.category,
            n.amount_cents,
            ctx.actor_id().unwrap_or("system")
        ))?;
        Ok(())
    }
}
