use finance_messaging::notification;
use finance_messaging::notification::{AnyNotification, Notification};

#[notification(name = "ledger.transaction_created")]
struct TransactionCreated {
    transaction_id: String,
    amount_cents: i64,
}

#[notification]
enum ConnectionEvent {
    Linked { connection_id: u64 },
    Revoked { connection_id: u64 },
}

fn assert_notification<N: Notification>() {}

fn main() {
    assert_notification::<TransactionCreated>();
    assert_notification::<ConnectionEvent>();

    assert_eq!(TransactionCreated::NAME, "ledger.transaction_created");
    assert_eq!(ConnectionEvent::NAME, "ConnectionEvent");

    let created = TransactionCreated {
        transaction_id: "t-1".into(),
        amount_cents: 250,
    };

    // Clone 与 Debug 默认派生
    let copy = created.clone();
    let _ = format!("{:?}", copy);

    let erased: &dyn AnyNotification = &created;
    assert_eq!(erased.notification_name(), "ledger.transaction_created");
    assert!(erased.as_any().downcast_ref::<TransactionCreated>().is_some());

    let _ = ConnectionEvent::Linked { connection_id: 1 };
    let _ = ConnectionEvent::Revoked { connection_id: 1 };
}
