/// Service modules
pub mod clients;
pub mod config;
pub mod dynamodb;
pub mod s3;
pub mod ses;
pub mod sns;
pub mod storage;

pub use clients::AwsClients;
pub use config::EnvConfigProvider;
pub use dynamodb::{
    DynamoDbItemStore, Expression, InMemoryItemStore, ItemStore, KeyCondition, RecordTable,
    SortKeyCondition,
};
pub use s3::{ObjectStore, ObjectStoreError, S3ObjectStore};
pub use ses::{EmailSender, EmailService, SesEmailSender, validate_message};
pub use sns::{EventBus, MessagePublisher, SnsPublisher, publish_json};
pub use storage::{LoadOutcome, StorageService};
