use finance_messaging::query;
use finance_messaging::query::Query;
use finance_messaging::request::Request;

#[derive(Clone, Debug)]
struct TransactionView {
    id: String,
}

#[query(response = Vec<TransactionView>)]
struct GetTransactions {
    limit: usize,
}

#[query(name = "ledger.get_balance", response = i64)]
#[derive(Clone, PartialEq)]
struct GetBalance;

fn assert_query<Q: Query>() {}

fn main() {
    assert_query::<GetTransactions>();
    assert_query::<GetBalance>();

    assert_eq!(GetTransactions::NAME, "GetTransactions");
    assert_eq!(GetBalance::NAME, "ledger.get_balance");

    let views: <GetTransactions as Request>::Response = vec![TransactionView { id: "t-1".into() }];
    assert_eq!(views[0].id, "t-1");
    let _balance: <GetBalance as Request>::Response = 0i64;

    // 已有 derive 与默认派生合并
    assert_eq!(GetBalance.clone(), GetBalance);
    let _ = format!("{:?}", GetTransactions { limit: 10 });
}
