use finance_messaging::command;
use finance_messaging::command::Command;
use finance_messaging::request::Request;

#[command]
struct ArchiveCategory {
    category_id: u64,
}

#[command(name = "ledger.create_transaction", response = String)]
struct CreateTransaction {
    amount_cents: i64,
    description: String,
}

#[command(debug = false)]
struct NonDebugCommand(u8);

fn assert_command<C: Command>() {}

fn main() {
    assert_command::<ArchiveCategory>();
    assert_command::<CreateTransaction>();
    assert_command::<NonDebugCommand>();

    // 默认名称为类型名，默认响应为 ()
    assert_eq!(ArchiveCategory::NAME, "ArchiveCategory");
    let _unit: <ArchiveCategory as Request>::Response = ();

    assert_eq!(CreateTransaction::NAME, "ledger.create_transaction");
    let _id: <CreateTransaction as Request>::Response = String::new();

    // Debug 默认开启
    let _ = format!("{:?}", ArchiveCategory { category_id: 1 });
    let _ = format!(
        "{:?}",
        CreateTransaction {
            amount_cents: 100,
            description: "coffee".into()
        }
    );
    let _ = NonDebugCommand(1).0;
}
