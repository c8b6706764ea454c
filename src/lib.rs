pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod model;
pub mod server;
pub mod store;

pub use config::{load_config, AppConfig, EditorConfig, ServerConfig, StorageConfig};
pub use db::{DatabaseConfig, DatabaseEndpoint, DesignDatabase};
pub use editor::{BuilderAction, EditorSession, Notice, NoticeLevel, StoreBuilder};
pub use error::{BuilderError, BuilderResult};
pub use model::*;
pub use store::{open_store, DocumentStore, InMemoryDocumentStore, SurrealDocumentStore};
