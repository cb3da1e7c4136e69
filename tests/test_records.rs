/// Typed records over the item store
#[path = "common/mod.rs"]
mod common;

use aws_sdk_dynamodb::types::AttributeValue;
use awskit_core::AwsKitError;
use awskit_core::models::attributes::{
    get_bool, get_number, get_optional_string, get_string, get_timestamp, item_from_json,
    item_to_json, to_ticks,
};
use awskit_core::models::{AttributeScalar, Item, ItemBuilder, MappingError, Record};
use awskit_core::services::{
    InMemoryItemStore, ItemStore, KeyCondition, RecordTable, SortKeyCondition,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Invoice {
    customer_id: String,
    issued_at: DateTime<Utc>,
    amount_cents: i64,
    paid: bool,
    note: Option<String>,
}

impl Record for Invoice {
    const PARTITION_KEY: &'static str = "customerId";
    const SORT_KEY: Option<&'static str> = Some("issuedAt");

    fn to_item(&self) -> Result<Item, MappingError> {
        ItemBuilder::new()
            .set("customerId", &self.customer_id)
            .set("issuedAt", self.issued_at)
            .set("amountCents", self.amount_cents)
            .set("paid", self.paid)
            .set_opt("note", self.note.clone())
            .build()
    }

    fn from_item(item: &Item) -> Result<Self, MappingError> {
        Ok(Self {
            customer_id: get_string(item, "customerId")?,
            issued_at: get_timestamp(item, "issuedAt")?,
            amount_cents: get_number(item, "amountCents")?,
            paid: get_bool(item, "paid")?,
            note: get_optional_string(item, "note")?,
        })
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
}

fn invoice(customer: &str, d: u32, amount_cents: i64) -> Invoice {
    Invoice {
        customer_id: customer.to_string(),
        issued_at: day(d),
        amount_cents,
        paid: false,
        note: None,
    }
}

fn table() -> RecordTable {
    let store = InMemoryItemStore::new().with_table("invoices", "customerId", Some("issuedAt"));
    RecordTable::new(Arc::new(store), "invoices")
}

#[tokio::test]
async fn test_invoice_lifecycle() {
    let invoices = table();
    let mut first = invoice("c-1", 1, 1_500);
    invoices.create(&first).await.unwrap();

    assert!(matches!(
        invoices.create(&first).await,
        Err(AwsKitError::AlreadyExists(_))
    ));

    first.paid = true;
    first.note = Some("paid by card".to_string());
    invoices.put(&first).await.unwrap();

    let loaded: Invoice = invoices.get(first.key().unwrap(), true).await.unwrap().unwrap();
    assert_eq!(loaded, first);

    invoices.delete(&first).await.unwrap();
    assert!(invoices.get::<Invoice>(first.key().unwrap(), true).await.unwrap().is_none());
}

#[tokio::test]
async fn test_query_by_timestamp_range() {
    let invoices = table();
    for d in [1, 5, 10, 20] {
        invoices.put(&invoice("c-1", d, d as i64 * 100)).await.unwrap();
    }
    invoices.put(&invoice("c-2", 5, 999)).await.unwrap();

    let found: Vec<Invoice> = invoices
        .query(
            KeyCondition::partition("customerId", "c-1").sort(
                "issuedAt",
                SortKeyCondition::Between(AttributeScalar::from(day(4)), AttributeScalar::from(day(10))),
            ),
            None,
        )
        .await
        .unwrap();

    let mut amounts: Vec<i64> = found.iter().map(|i| i.amount_cents).collect();
    amounts.sort();
    assert_eq!(amounts, vec![500, 1_000]);
}

#[tokio::test]
async fn test_timestamps_are_stored_as_ticks() {
    let store = Arc::new(InMemoryItemStore::new().with_table("invoices", "customerId", Some("issuedAt")));
    let invoices = RecordTable::new(store.clone(), "invoices");
    let inv = invoice("c-1", 1, 100);
    invoices.put(&inv).await.unwrap();

    let items = store.scan("invoices", None).await.unwrap();
    assert_eq!(
        items[0]["issuedAt"],
        AttributeValue::N(to_ticks(day(1)).unwrap().to_string())
    );
}

#[test]
fn test_dynamic_json_mapping() {
    let item = item_from_json(&json!({"id": "a-1", "count": 3, "active": true})).unwrap();
    assert_eq!(item["id"], AttributeValue::S("a-1".to_string()));
    assert_eq!(item["count"], AttributeValue::N("3".to_string()));
    assert_eq!(item["active"], AttributeValue::Bool(true));
    assert_eq!(item_to_json(&item)["count"], json!(3));

    assert!(matches!(
        item_from_json(&json!({"tags": ["a"]})),
        Err(MappingError::UnsupportedType { .. })
    ));
    assert_eq!(item_from_json(&json!("x")), Err(MappingError::NotAnObject));
}

#[test]
fn test_mapping_errors_name_the_field() {
    let mut item = invoice("c-1", 1, 100).to_item().unwrap();
    item.remove("paid");
    assert_eq!(
        Invoice::from_item(&item),
        Err(MappingError::MissingField("paid".to_string()))
    );
}

#[tokio::test]
async fn test_out_of_range_timestamp_is_rejected() {
    let store = Arc::new(InMemoryItemStore::new().with_table("invoices", "customerId", Some("issuedAt")));
    let invoices = RecordTable::new(store.clone(), "invoices");
    let mut inv = invoice("c-1", 1, 100);
    inv.issued_at = DateTime::<Utc>::MAX_UTC;

    assert!(matches!(
        invoices.put(&inv).await,
        Err(AwsKitError::Mapping(MappingError::InvalidValue { .. }))
    ));
    assert!(store.scan("invoices", None).await.unwrap().is_empty());
}
