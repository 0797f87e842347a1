//! Storage seam of the service.
//!
//! Handlers validate input and then hand it to a single [`Store`] injected
//! through the application state. Every method issues exactly one statement
//! against the backend; nothing is retried.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::AppError;
use crate::models::encomenda::{Encomenda, EncomendaPatch, NewEncomenda};
use crate::models::usuario::{NewUsuario, Usuario};

#[async_trait]
pub trait EncomendaStore: Send + Sync {
    /// All records, highest id first.
    async fn list_encomendas(&self) -> Result<Vec<Encomenda>, AppError>;

    async fn get_encomenda(&self, id: i64) -> Result<Option<Encomenda>, AppError>;

    /// Persists a new record and returns it with the assigned id.
    async fn create_encomenda(&self, new: NewEncomenda) -> Result<Encomenda, AppError>;

    /// Overwrites every business field. `None` when no row has this id.
    async fn replace_encomenda(&self, id: i64, new: NewEncomenda) -> Result<Option<Encomenda>, AppError>;

    /// Overwrites only the fields present in `patch`. `None` when no row has this id.
    async fn update_encomenda(&self, id: i64, patch: EncomendaPatch) -> Result<Option<Encomenda>, AppError>;

    /// Returns whether a row was removed.
    async fn delete_encomenda(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UsuarioStore: Send + Sync {
    async fn list_usuarios(&self) -> Result<Vec<Usuario>, AppError>;

    async fn get_usuario(&self, id: i64) -> Result<Option<Usuario>, AppError>;

    async fn find_usuario_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create_usuario(&self, new: NewUsuario) -> Result<Usuario, AppError>;

    async fn delete_usuario(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait Store: EncomendaStore + UsuarioStore {
    /// Releases backend resources. The store must not be used afterwards.
    async fn shutdown(&self);
}

/// Builds the store selected by the configuration: Postgres when a
/// `DATABASE_URL` is set, the in-memory store otherwise.
pub async fn init(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match &config.database_url {
        Some(url) => {
            let store = postgres::PgStore::connect(url, config.database_max_connections).await?;
            store.init_schema().await?;
            tracing::info!("Using Postgres store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(memory::MemoryStore::new()))
        }
    }
}
