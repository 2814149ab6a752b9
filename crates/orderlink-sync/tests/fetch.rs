mod common;

use common::{pacing, records, FakeApi, ORDERS};
use orderlink_core::{RecordId, TableId};
use orderlink_sync::{fetch_all, PageRequest, SyncError};
use serde_json::{json, Value};

fn numbered_orders(count: usize) -> Vec<orderlink_core::Record> {
    let rows: Vec<Value> = (0..count)
        .map(|idx| json!({"id": idx as i64 + 1, "email": format!("c{idx}@shop.it")}))
        .collect();
    records(Value::Array(rows))
}

fn orders_table() -> TableId {
    TableId::new(ORDERS).expect("table")
}

#[test]
fn short_last_page_ends_pagination() {
    let api = FakeApi::new().with_table(ORDERS, numbered_orders(250));
    let fetched = fetch_all(&api, &orders_table(), "orders", &pacing(100)).expect("fetch");

    assert_eq!(fetched.len(), 250);
    assert_eq!(
        api.page_requests_for(ORDERS),
        vec![
            PageRequest { limit: 100, offset: 0 },
            PageRequest { limit: 100, offset: 100 },
            PageRequest { limit: 100, offset: 200 },
        ]
    );
}

#[test]
fn exact_multiple_needs_one_empty_page() {
    let api = FakeApi::new().with_table(ORDERS, numbered_orders(200));
    let fetched = fetch_all(&api, &orders_table(), "orders", &pacing(100)).expect("fetch");

    assert_eq!(fetched.len(), 200);
    let requests = api.page_requests_for(ORDERS);
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].offset, 200);
}

#[test]
fn request_count_matches_ceiling_rule() {
    for (count, page_size) in [(1, 1), (7, 3), (9, 3), (99, 10), (100, 10), (5, 100)] {
        let api = FakeApi::new().with_table(ORDERS, numbered_orders(count));
        let fetched =
            fetch_all(&api, &orders_table(), "orders", &pacing(page_size)).expect("fetch");
        let expected = if count % page_size == 0 {
            count / page_size + 1
        } else {
            count.div_ceil(page_size)
        };
        assert_eq!(fetched.len(), count);
        assert_eq!(
            api.page_requests_for(ORDERS).len(),
            expected,
            "{count} records, page size {page_size}"
        );
    }
}

#[test]
fn empty_table_returns_empty_sequence() {
    let api = FakeApi::new().with_table(ORDERS, Vec::new());
    let fetched = fetch_all(&api, &orders_table(), "orders", &pacing(100)).expect("fetch");

    assert!(fetched.is_empty());
    assert_eq!(api.page_requests_for(ORDERS).len(), 1);
}

#[test]
fn records_keep_remote_order() {
    let api = FakeApi::new().with_table(ORDERS, numbered_orders(5));
    let fetched = fetch_all(&api, &orders_table(), "orders", &pacing(2)).expect("fetch");
    let ids: Vec<RecordId> = fetched.iter().filter_map(|record| record.id()).collect();
    assert_eq!(ids, (1..=5).map(RecordId::Int).collect::<Vec<_>>());
}

#[test]
fn failed_page_aborts_fetch() {
    let api = FakeApi::new().failing_table(ORDERS);
    let err = fetch_all(&api, &orders_table(), "orders", &pacing(100)).unwrap_err();

    match err {
        SyncError::Fetch {
            collection, offset, ..
        } => {
            assert_eq!(collection, "orders");
            assert_eq!(offset, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}
