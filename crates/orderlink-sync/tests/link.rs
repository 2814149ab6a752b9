mod common;

use common::{records, FakeApi, RecordingReporter, CLIENTS, LINK_FIELD};
use orderlink_core::{group_by_email, RecordId, TableId};
use orderlink_sync::link::MAX_REPORTED_FAILURES;
use orderlink_sync::{submit_links, LinkSettings};
use serde_json::{json, Value};
use std::time::Duration;

fn settings(table: &TableId, dry_run: bool) -> LinkSettings<'_> {
    LinkSettings {
        table,
        link_field_id: LINK_FIELD,
        link_field_name: "Orders",
        email_field: "email",
        delay: Duration::ZERO,
        dry_run,
    }
}

fn clients_table() -> TableId {
    TableId::new(CLIENTS).expect("table")
}

#[test]
fn client_without_matching_orders_is_skipped_without_request() {
    let clients = records(json!([
        {"id": 1, "email": "lonely@shop.it"},
        {"id": 2, "email": null},
        {"id": 3},
    ]));
    let orders = records(json!([{"id": 10, "email": "other@shop.it"}]));
    let grouping = group_by_email(&orders, "email");
    let api = FakeApi::new();
    let table = clients_table();

    let outcome = submit_links(
        &api,
        &clients,
        &grouping.index,
        &settings(&table, false),
        &mut RecordingReporter::default(),
    );

    assert_eq!(outcome.skipped, 3);
    assert_eq!(outcome.updated, 0);
    assert!(api.link_calls.borrow().is_empty());
}

#[test]
fn link_request_targets_client_and_relation_field() {
    let clients = records(json!([{"id": 7, "email": " Ada@Shop.it"}]));
    let orders = records(json!([
        {"id": 10, "email": "ada@shop.it"},
        {"id": 11, "email": "ADA@shop.it"},
    ]));
    let grouping = group_by_email(&orders, "email");
    let api = FakeApi::new();
    let table = clients_table();

    let outcome = submit_links(
        &api,
        &clients,
        &grouping.index,
        &settings(&table, false),
        &mut RecordingReporter::default(),
    );

    assert_eq!(outcome.updated, 1);
    let calls = api.link_calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].table, CLIENTS);
    assert_eq!(calls[0].link_field_id, LINK_FIELD);
    assert_eq!(calls[0].client, RecordId::Int(7));
    assert_eq!(calls[0].payload, json!([{"Id": 10}, {"Id": 11}]));
}

#[test]
fn failure_is_isolated_to_one_client() {
    let clients = records(json!([
        {"id": 1, "email": "a@shop.it"},
        {"id": 2, "email": "b@shop.it"},
        {"id": 3, "email": "c@shop.it"},
    ]));
    let orders = records(json!([
        {"id": 10, "email": "a@shop.it"},
        {"id": 20, "email": "b@shop.it"},
        {"id": 30, "email": "c@shop.it"},
    ]));
    let grouping = group_by_email(&orders, "email");
    let api = FakeApi::new().failing_client(RecordId::Int(2));
    let table = clients_table();

    let outcome = submit_links(
        &api,
        &clients,
        &grouping.index,
        &settings(&table, false),
        &mut RecordingReporter::default(),
    );

    assert_eq!(outcome.updated, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(
        api.linked_clients(),
        vec![RecordId::Int(1), RecordId::Int(2), RecordId::Int(3)]
    );
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].client, RecordId::Int(2));
    assert_eq!(outcome.failures[0].email.as_str(), "b@shop.it");
    assert_eq!(outcome.failures[0].status, Some(422));
}

#[test]
fn failure_details_are_bounded_but_all_counted() {
    let client_rows: Vec<Value> = (1..=8)
        .map(|id| json!({"id": id, "email": format!("c{id}@shop.it")}))
        .collect();
    let order_rows: Vec<Value> = (1..=8)
        .map(|id| json!({"id": id * 100, "email": format!("c{id}@shop.it")}))
        .collect();
    let clients = records(Value::Array(client_rows));
    let orders = records(Value::Array(order_rows));
    let grouping = group_by_email(&orders, "email");
    let mut api = FakeApi::new();
    for id in 1..=8 {
        api = api.failing_client(RecordId::Int(id));
    }
    let table = clients_table();

    let outcome = submit_links(
        &api,
        &clients,
        &grouping.index,
        &settings(&table, false),
        &mut RecordingReporter::default(),
    );

    assert_eq!(outcome.failed, 8);
    assert_eq!(outcome.failures.len(), MAX_REPORTED_FAILURES);
}

#[test]
fn progress_is_reported_on_first_and_every_tenth_update() {
    let client_rows: Vec<Value> = (1..=25)
        .map(|id| json!({"id": id, "email": format!("c{id}@shop.it")}))
        .collect();
    let order_rows: Vec<Value> = (1..=25)
        .map(|id| json!({"id": id * 100, "email": format!("c{id}@shop.it")}))
        .collect();
    let clients = records(Value::Array(client_rows));
    let orders = records(Value::Array(order_rows));
    let grouping = group_by_email(&orders, "email");
    let api = FakeApi::new();
    let table = clients_table();
    let mut reporter = RecordingReporter::default();

    let outcome = submit_links(
        &api,
        &clients,
        &grouping.index,
        &settings(&table, false),
        &mut reporter,
    );

    assert_eq!(outcome.updated, 25);
    let updates: Vec<usize> = reporter.progress.iter().map(|entry| entry.0).collect();
    assert_eq!(updates, vec![1, 10, 20]);
    assert_eq!(reporter.progress[0].1, 4);
    assert_eq!(reporter.progress[1].2, "c10@shop.it");
}

#[test]
fn dry_run_counts_matches_without_sending() {
    let clients = records(json!([
        {"id": 1, "email": "a@shop.it"},
        {"id": 2, "email": "nobody@shop.it"},
    ]));
    let orders = records(json!([{"id": 10, "email": "a@shop.it"}]));
    let grouping = group_by_email(&orders, "email");
    let api = FakeApi::new().failing_client(RecordId::Int(1));
    let table = clients_table();

    let outcome = submit_links(
        &api,
        &clients,
        &grouping.index,
        &settings(&table, true),
        &mut RecordingReporter::default(),
    );

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.failed, 0);
    assert!(api.link_calls.borrow().is_empty());
}

#[test]
fn matched_client_without_id_is_skipped() {
    let clients = records(json!([{"email": "a@shop.it"}]));
    let orders = records(json!([{"id": 10, "email": "a@shop.it"}]));
    let grouping = group_by_email(&orders, "email");
    let api = FakeApi::new();
    let table = clients_table();

    let outcome = submit_links(
        &api,
        &clients,
        &grouping.index,
        &settings(&table, false),
        &mut RecordingReporter::default(),
    );

    assert_eq!(outcome.skipped, 1);
    assert!(api.link_calls.borrow().is_empty());
}
