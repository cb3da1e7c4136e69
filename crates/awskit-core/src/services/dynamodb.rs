/// DynamoDB item store and the typed record layer
use crate::error::AwsKitError;
use crate::models::attributes::{AttributeScalar, Item, MappingError, Record};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// An expression plus the placeholders it references
///
/// `#pk`, `#sk`, `:pk`, `:sk` and `:sk2` are reserved for key conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: Item,
}

impl Expression {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, placeholder: &str, attribute: &str) -> Self {
        self.names
            .insert(placeholder.to_string(), attribute.to_string());
        self
    }

    pub fn value(
        mut self,
        placeholder: &str,
        value: impl Into<AttributeScalar>,
    ) -> Result<Self, MappingError> {
        let av = AttributeValue::try_from(value.into())?;
        self.values.insert(placeholder.to_string(), av);
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortKeyCondition {
    Equals(AttributeScalar),
    LessThan(AttributeScalar),
    LessThanOrEqual(AttributeScalar),
    GreaterThan(AttributeScalar),
    GreaterThanOrEqual(AttributeScalar),
    Between(AttributeScalar, AttributeScalar),
    BeginsWith(String),
}

/// Partition key equality with an optional sort key condition
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    partition_key: String,
    partition_value: AttributeScalar,
    sort: Option<(String, SortKeyCondition)>,
}

impl KeyCondition {
    pub fn partition(name: impl Into<String>, value: impl Into<AttributeScalar>) -> Self {
        Self {
            partition_key: name.into(),
            partition_value: value.into(),
            sort: None,
        }
    }

    pub fn sort(mut self, name: impl Into<String>, condition: SortKeyCondition) -> Self {
        self.sort = Some((name.into(), condition));
        self
    }

    /// Renders the key condition expression
    pub fn to_expression(&self) -> Result<Expression, MappingError> {
        let expr = Expression::new("#pk = :pk")
            .name("#pk", &self.partition_key)
            .value(":pk", self.partition_value.clone())?;

        let Some((sort_key, condition)) = &self.sort else {
            return Ok(expr);
        };

        let expr = expr.name("#sk", sort_key);
        let (clause, expr) = match condition {
            SortKeyCondition::Equals(v) => ("#sk = :sk", expr.value(":sk", v.clone())?),
            SortKeyCondition::LessThan(v) => ("#sk < :sk", expr.value(":sk", v.clone())?),
            SortKeyCondition::LessThanOrEqual(v) => ("#sk <= :sk", expr.value(":sk", v.clone())?),
            SortKeyCondition::GreaterThan(v) => ("#sk > :sk", expr.value(":sk", v.clone())?),
            SortKeyCondition::GreaterThanOrEqual(v) => {
                ("#sk >= :sk", expr.value(":sk", v.clone())?)
            }
            SortKeyCondition::Between(low, high) => (
                "#sk BETWEEN :sk AND :sk2",
                expr.value(":sk", low.clone())?.value(":sk2", high.clone())?,
            ),
            SortKeyCondition::BeginsWith(prefix) => {
                ("begins_with(#sk, :sk)", expr.value(":sk", prefix.as_str())?)
            }
        };

        Ok(Expression {
            expression: format!("{} AND {}", expr.expression, clause),
            ..expr
        })
    }

    /// Evaluates the condition against an item without a round trip.
    /// A value that cannot be mapped matches nothing.
    pub fn matches(&self, item: &Item) -> bool {
        let Ok(partition) = AttributeValue::try_from(self.partition_value.clone()) else {
            return false;
        };
        if item.get(&self.partition_key) != Some(&partition) {
            return false;
        }

        let Some((sort_key, condition)) = &self.sort else {
            return true;
        };
        let Some(actual) = item.get(sort_key) else {
            return false;
        };

        let cmp = |expected: &AttributeScalar| {
            AttributeValue::try_from(expected.clone())
                .ok()
                .and_then(|expected| compare(actual, &expected))
        };
        match condition {
            SortKeyCondition::Equals(v) => cmp(v) == Some(Ordering::Equal),
            SortKeyCondition::LessThan(v) => cmp(v) == Some(Ordering::Less),
            SortKeyCondition::LessThanOrEqual(v) => {
                matches!(cmp(v), Some(Ordering::Less | Ordering::Equal))
            }
            SortKeyCondition::GreaterThan(v) => cmp(v) == Some(Ordering::Greater),
            SortKeyCondition::GreaterThanOrEqual(v) => {
                matches!(cmp(v), Some(Ordering::Greater | Ordering::Equal))
            }
            SortKeyCondition::Between(low, high) => {
                matches!(cmp(low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(cmp(high), Some(Ordering::Less | Ordering::Equal))
            }
            SortKeyCondition::BeginsWith(prefix) => actual
                .as_s()
                .map(|s| s.starts_with(prefix.as_str()))
                .unwrap_or(false),
        }
    }
}

fn compare(a: &AttributeValue, b: &AttributeValue) -> Option<Ordering> {
    match (a, b) {
        (AttributeValue::S(x), AttributeValue::S(y)) => Some(x.cmp(y)),
        // integers first: tick counts exceed f64 precision
        (AttributeValue::N(x), AttributeValue::N(y)) => match (x.parse::<i128>(), y.parse::<i128>()) {
            (Ok(x), Ok(y)) => Some(x.cmp(&y)),
            _ => x.parse::<f64>().ok()?.partial_cmp(&y.parse::<f64>().ok()?),
        },
        (AttributeValue::Bool(x), AttributeValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn non_empty<V>(map: HashMap<String, V>) -> Option<HashMap<String, V>> {
    (!map.is_empty()).then_some(map)
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Inserts `item`, failing with [`AwsKitError::AlreadyExists`] if an item
    /// with the same key is present
    async fn create(&self, table: &str, item: Item, partition_key: &str)
    -> Result<(), AwsKitError>;

    async fn get(
        &self,
        table: &str,
        key: Item,
        consistent_read: bool,
    ) -> Result<Option<Item>, AwsKitError>;

    /// Insert or replace
    async fn put(&self, table: &str, item: Item) -> Result<(), AwsKitError>;

    /// Deleting a missing item succeeds
    async fn delete(&self, table: &str, key: Item) -> Result<(), AwsKitError>;

    /// Reads the whole table, following pagination
    async fn scan(&self, table: &str, filter: Option<Expression>)
    -> Result<Vec<Item>, AwsKitError>;

    async fn query(
        &self,
        table: &str,
        key: KeyCondition,
        filter: Option<Expression>,
    ) -> Result<Vec<Item>, AwsKitError>;
}

pub struct DynamoDbItemStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoDbItemStore {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemStore for DynamoDbItemStore {
    async fn create(
        &self,
        table: &str,
        item: Item,
        partition_key: &str,
    ) -> Result<(), AwsKitError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", partition_key)
            .send()
            .await
            .map_err(|e| {
                let text = format!("DynamoDB put_item failed: {}", DisplayErrorContext(&e));
                if e.into_service_error().is_conditional_check_failed_exception() {
                    AwsKitError::AlreadyExists(format!("{} in {}", partition_key, table))
                } else {
                    AwsKitError::Database(text)
                }
            })?;

        info!(table = table, "Created item");
        Ok(())
    }

    async fn get(
        &self,
        table: &str,
        key: Item,
        consistent_read: bool,
    ) -> Result<Option<Item>, AwsKitError> {
        let response = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .consistent_read(consistent_read)
            .send()
            .await
            .map_err(|e| {
                AwsKitError::Database(format!(
                    "DynamoDB get_item failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(response.item)
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), AwsKitError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                AwsKitError::Database(format!(
                    "DynamoDB put_item failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(table = table, "Put item");
        Ok(())
    }

    async fn delete(&self, table: &str, key: Item) -> Result<(), AwsKitError> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| {
                AwsKitError::Database(format!(
                    "DynamoDB delete_item failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(table = table, "Deleted item");
        Ok(())
    }

    async fn scan(
        &self,
        table: &str,
        filter: Option<Expression>,
    ) -> Result<Vec<Item>, AwsKitError> {
        let filter = filter.unwrap_or_default();
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(table)
                .set_filter_expression(
                    (!filter.expression.is_empty()).then(|| filter.expression.clone()),
                )
                .set_expression_attribute_names(non_empty(filter.names.clone()))
                .set_expression_attribute_values(non_empty(filter.values.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    AwsKitError::Database(format!(
                        "DynamoDB scan failed: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            items.extend(response.items.unwrap_or_default());
            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(table = table, count = items.len(), "Scanned table");
        Ok(items)
    }

    async fn query(
        &self,
        table: &str,
        key: KeyCondition,
        filter: Option<Expression>,
    ) -> Result<Vec<Item>, AwsKitError> {
        let key_expr = key.to_expression()?;
        let filter = filter.unwrap_or_default();

        let mut names = key_expr.names;
        names.extend(filter.names);
        let mut values = key_expr.values;
        values.extend(filter.values);

        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .query()
                .table_name(table)
                .key_condition_expression(key_expr.expression.clone())
                .set_filter_expression(
                    (!filter.expression.is_empty()).then(|| filter.expression.clone()),
                )
                .set_expression_attribute_names(Some(names.clone()))
                .set_expression_attribute_values(Some(values.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    AwsKitError::Database(format!(
                        "DynamoDB query failed: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            items.extend(response.items.unwrap_or_default());
            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(table = table, count = items.len(), "Queried table");
        Ok(items)
    }
}

struct MemoryTable {
    partition_key: String,
    sort_key: Option<String>,
    items: BTreeMap<String, Item>,
}

impl MemoryTable {
    fn key_of(&self, item: &Item) -> Result<String, AwsKitError> {
        let render = |name: &str| {
            item.get(name)
                .map(|v| format!("{:?}", v))
                .ok_or_else(|| AwsKitError::Validation(format!("missing key attribute {}", name)))
        };
        let mut key = render(&self.partition_key)?;
        if let Some(sort_key) = &self.sort_key {
            key.push('|');
            key.push_str(&render(sort_key)?);
        }
        Ok(key)
    }
}

/// In-memory item store for testing
///
/// Filter expressions are not evaluated; passing one is an error.
pub struct InMemoryItemStore {
    tables: tokio::sync::Mutex<HashMap<String, MemoryTable>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self {
            tables: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn with_table(mut self, name: &str, partition_key: &str, sort_key: Option<&str>) -> Self {
        self.tables.get_mut().insert(
            name.to_string(),
            MemoryTable {
                partition_key: partition_key.to_string(),
                sort_key: sort_key.map(str::to_string),
                items: BTreeMap::new(),
            },
        );
        self
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_table(table: &str) -> AwsKitError {
    AwsKitError::Database(format!("Requested resource not found: table {}", table))
}

fn reject_filter(filter: &Option<Expression>) -> Result<(), AwsKitError> {
    match filter {
        Some(_) => Err(AwsKitError::Validation(
            "filter expressions are not supported by the in-memory store".to_string(),
        )),
        None => Ok(()),
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn create(
        &self,
        table: &str,
        item: Item,
        partition_key: &str,
    ) -> Result<(), AwsKitError> {
        let mut tables = self.tables.lock().await;
        let data = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;
        let key = data.key_of(&item)?;
        if data.items.contains_key(&key) {
            return Err(AwsKitError::AlreadyExists(format!(
                "{} in {}",
                partition_key, table
            )));
        }
        data.items.insert(key, item);
        Ok(())
    }

    async fn get(
        &self,
        table: &str,
        key: Item,
        _consistent_read: bool,
    ) -> Result<Option<Item>, AwsKitError> {
        let tables = self.tables.lock().await;
        let data = tables.get(table).ok_or_else(|| unknown_table(table))?;
        Ok(data.items.get(&data.key_of(&key)?).cloned())
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), AwsKitError> {
        let mut tables = self.tables.lock().await;
        let data = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;
        let key = data.key_of(&item)?;
        data.items.insert(key, item);
        Ok(())
    }

    async fn delete(&self, table: &str, key: Item) -> Result<(), AwsKitError> {
        let mut tables = self.tables.lock().await;
        let data = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;
        let key = data.key_of(&key)?;
        data.items.remove(&key);
        Ok(())
    }

    async fn scan(
        &self,
        table: &str,
        filter: Option<Expression>,
    ) -> Result<Vec<Item>, AwsKitError> {
        reject_filter(&filter)?;
        let tables = self.tables.lock().await;
        let data = tables.get(table).ok_or_else(|| unknown_table(table))?;
        Ok(data.items.values().cloned().collect())
    }

    async fn query(
        &self,
        table: &str,
        key: KeyCondition,
        filter: Option<Expression>,
    ) -> Result<Vec<Item>, AwsKitError> {
        reject_filter(&filter)?;
        let tables = self.tables.lock().await;
        let data = tables.get(table).ok_or_else(|| unknown_table(table))?;
        Ok(data
            .items
            .values()
            .filter(|item| key.matches(item))
            .cloned()
            .collect())
    }
}

/// Typed access to one table
#[derive(Clone)]
pub struct RecordTable {
    store: Arc<dyn ItemStore>,
    table: String,
}

impl RecordTable {
    pub fn new(store: Arc<dyn ItemStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.table
    }

    pub async fn create<R: Record>(&self, record: &R) -> Result<(), AwsKitError> {
        self.store
            .create(&self.table, record.to_item()?, R::PARTITION_KEY)
            .await
    }

    pub async fn get<R: Record>(
        &self,
        key: Item,
        consistent_read: bool,
    ) -> Result<Option<R>, AwsKitError> {
        match self.store.get(&self.table, key, consistent_read).await? {
            Some(item) => Ok(Some(R::from_item(&item)?)),
            None => Ok(None),
        }
    }

    pub async fn put<R: Record>(&self, record: &R) -> Result<(), AwsKitError> {
        self.store.put(&self.table, record.to_item()?).await
    }

    pub async fn delete<R: Record>(&self, record: &R) -> Result<(), AwsKitError> {
        self.store.delete(&self.table, record.key()?).await
    }

    pub async fn scan<R: Record>(&self, filter: Option<Expression>) -> Result<Vec<R>, AwsKitError> {
        let items = self.store.scan(&self.table, filter).await?;
        Ok(items
            .iter()
            .map(R::from_item)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn query<R: Record>(
        &self,
        key: KeyCondition,
        filter: Option<Expression>,
    ) -> Result<Vec<R>, AwsKitError> {
        let items = self.store.query(&self.table, key, filter).await?;
        Ok(items
            .iter()
            .map(R::from_item)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
