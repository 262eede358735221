mod ledger;
mod store;

use anyhow::Context;
use finance_messaging::behaviors::{LoggingBehavior, TimeoutBehavior, ValidationBehavior};
use finance_messaging::{BehaviorScope, DispatchContext, Mediator, MediatorConfig};
use finance_results::Outcome;
use ledger::{
    AuditTrail, BudgetTracker, CreateTransaction, GetTransactions, LedgerHandlers, StoreConnection,
    TransactionCreated,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use store::LedgerStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_mediator(store: Arc<LedgerStore>) -> anyhow::Result<Mediator> {
    let handlers = Arc::new(LedgerHandlers::new(store.clone()));
    let limits = HashMap::from([("groceries".to_string(), 10_000)]);

    let mediator = Mediator::builder()
        .config(MediatorConfig::default())
        .command_handler::<CreateTransaction, _>(handlers.clone())?
        .command_handler::<StoreConnection, _>(handlers.clone())?
        .query_handler::<GetTransactions, _>(handlers)?
        .notification_handler::<TransactionCreated, _>(Arc::new(BudgetTracker::new(store.clone(), limits)))
        .notification_handler::<TransactionCreated, _>(Arc::new(AuditTrail::new(store)))
        .open_behavior(BehaviorScope::All, Arc::new(LoggingBehavior))
        .open_behavior(BehaviorScope::All, Arc::new(TimeoutBehavior::new(Duration::from_secs(5))))
        .behavior::<CreateTransaction, _>(Arc::new(ValidationBehavior))
        .build();

    Ok(mediator)
}

/// 记账：创建交易成功后广播通知
async fn record(
    mediator: &Mediator,
    ctx: &DispatchContext,
    category: &str,
    amount_cents: i64,
    description: &str,
) -> anyhow::Result<Outcome<String>> {
    let outcome = mediator
        .send(
            ctx,
            CreateTransaction {
                category: category.to_string(),
                amount_cents,
                description: description.to_string(),
            },
        )
        .await?;

    if let Some(id) = outcome.value() {
        mediator
            .publish(
                ctx,
                TransactionCreated {
                    transaction_id: id.clone(),
                    category: category.to_string(),
                    amount_cents,
                },
            )
            .await?;
    }

    Ok(outcome)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,finance_messaging=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(LedgerStore::default());
    let mediator = build_mediator(store.clone())?;
    let ctx = DispatchContext::builder()
        .correlation_id("demo-1".into())
        .actor_id("u-1".into())
        .build();

    for (category, amount, description) in [
        ("groceries", 6_500, "weekly shop"),
        ("groceries", 4_200, "farmers market"),
        ("rent", 120_000, "october"),
    ] {
        let outcome = record(&mediator, &ctx, category, amount, description).await?;
        tracing::info!(category, amount, id = ?outcome.value(), "recorded");
    }

    // 校验失败：以 Problem 返回，处理器不执行
    let rejected = record(&mediator, &ctx, " ", 0, "nothing").await?;
    if let Some(problem) = rejected.problem() {
        tracing::info!(
            status = problem.kind().status_code(),
            body = %serde_json::to_string(problem).context("serialize problem")?,
            "transaction rejected"
        );
    }

    // 重复连接：冲突
    for _ in 0..2 {
        let outcome = mediator
            .send(
                &ctx,
                StoreConnection {
                    institution: "first-bank".into(),
                    external_id: "acc-42".into(),
                },
            )
            .await?;
        match outcome.problem() {
            None => tracing::info!("connection stored"),
            Some(problem) => tracing::info!(status = problem.kind().status_code(), %problem, "connection rejected"),
        }
    }

    let groceries = mediator
        .send(
            &ctx,
            GetTransactions {
                category: Some("groceries".into()),
            },
        )
        .await?
        .into_result()?;
    tracing::info!(
        count = groceries.len(),
        json = %serde_json::to_string(&groceries).context("serialize transactions")?,
        "groceries"
    );

    tracing::info!(
        audit = store.audit_len(),
        cache = ?mediator.cache_stats(),
        requests = ?mediator.registered_requests(),
        "done"
    );
    Ok(())
}
