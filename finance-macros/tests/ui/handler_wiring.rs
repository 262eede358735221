use async_trait::async_trait;
use finance_messaging::{
    CommandHandler, DispatchContext, Mediator, NotificationHandler, Outcome, QueryHandler, command,
    notification, query,
};
use std::sync::Arc;

#[command(response = u64)]
struct OpenAccount {
    owner: String,
}

#[query(response = Option<String>)]
struct FindOwner {
    account_id: u64,
}

#[notification]
struct AccountOpened {
    account_id: u64,
}

struct Accounts;

#[async_trait]
impl CommandHandler<OpenAccount> for Accounts {
    async fn handle(&self, _ctx: &DispatchContext, cmd: OpenAccount) -> anyhow::Result<Outcome<u64>> {
        Ok(Outcome::success(cmd.owner.len() as u64))
    }
}

#[async_trait]
impl QueryHandler<FindOwner> for Accounts {
    async fn handle(&self, _ctx: &DispatchContext, q: FindOwner) -> anyhow::Result<Outcome<Option<String>>> {
        Ok(Outcome::success(Some(q.account_id.to_string())))
    }
}

#[async_trait]
impl NotificationHandler<AccountOpened> for Accounts {
    async fn handle(&self, _ctx: &DispatchContext, _n: &AccountOpened) -> anyhow::Result<()> {
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let accounts = Arc::new(Accounts);
    let mediator = Mediator::builder()
        .command_handler::<OpenAccount, _>(accounts.clone())?
        .query_handler::<FindOwner, _>(accounts.clone())?
        .notification_handler::<AccountOpened, _>(accounts)
        .build();

    assert_eq!(mediator.registered_requests(), vec!["FindOwner", "OpenAccount"]);
    assert_eq!(mediator.registered_notifications(), vec!["AccountOpened"]);
    Ok(())
}
