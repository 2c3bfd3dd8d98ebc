pub mod config;
pub mod context;
pub mod error;
pub mod inmemory_schema_registry;
pub mod instance;
pub mod outcome;
pub mod resolver;
pub mod schema_source;
pub mod service;

pub use inmemory_schema_registry::InMemorySchemaRegistry;
pub use instance::ServiceInstance;
pub use service::Service;
