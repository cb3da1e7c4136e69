/// Data models
pub mod attributes;
pub mod config;
pub mod email;
pub mod events;

pub use attributes::{AttributeScalar, Item, ItemBuilder, MappingError, Record};
pub use config::*;
pub use email::*;
pub use events::*;
