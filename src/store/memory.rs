use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{EncomendaStore, Store, UsuarioStore};
use crate::error::AppError;
use crate::models::encomenda::{Encomenda, EncomendaPatch, NewEncomenda};
use crate::models::usuario::{NewUsuario, Usuario};

/// Table with a serial id, like a Postgres `BIGSERIAL` primary key.
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: BTreeMap::new(), next_id: 1 }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Process-local store used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    encomendas: RwLock<Table<Encomenda>>,
    usuarios: RwLock<Table<Usuario>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EncomendaStore for MemoryStore {
    async fn list_encomendas(&self) -> Result<Vec<Encomenda>, AppError> {
        let table = self.encomendas.read().await;
        Ok(table.rows.values().rev().cloned().collect())
    }

    async fn get_encomenda(&self, id: i64) -> Result<Option<Encomenda>, AppError> {
        Ok(self.encomendas.read().await.rows.get(&id).cloned())
    }

    async fn create_encomenda(&self, new: NewEncomenda) -> Result<Encomenda, AppError> {
        let mut table = self.encomendas.write().await;
        let id = table.next_id();
        let record = Encomenda::from_new(id, new);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn replace_encomenda(&self, id: i64, new: NewEncomenda) -> Result<Option<Encomenda>, AppError> {
        let mut table = self.encomendas.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            *row = Encomenda::from_new(id, new);
            row.clone()
        }))
    }

    async fn update_encomenda(&self, id: i64, patch: EncomendaPatch) -> Result<Option<Encomenda>, AppError> {
        let mut table = self.encomendas.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            row.apply(patch);
            row.clone()
        }))
    }

    async fn delete_encomenda(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.encomendas.write().await.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl UsuarioStore for MemoryStore {
    async fn list_usuarios(&self) -> Result<Vec<Usuario>, AppError> {
        let table = self.usuarios.read().await;
        Ok(table.rows.values().rev().cloned().collect())
    }

    async fn get_usuario(&self, id: i64) -> Result<Option<Usuario>, AppError> {
        Ok(self.usuarios.read().await.rows.get(&id).cloned())
    }

    async fn find_usuario_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let table = self.usuarios.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn create_usuario(&self, new: NewUsuario) -> Result<Usuario, AppError> {
        let mut table = self.usuarios.write().await;
        if table.rows.values().any(|u| u.email == new.email) {
            return Err(AppError::conflict("email já cadastrado"));
        }
        let id = table.next_id();
        let usuario = Usuario {
            id,
            nome: new.nome,
            email: new.email,
            senha_hash: new.senha_hash,
            criado_em: Utc::now(),
        };
        table.rows.insert(id, usuario.clone());
        Ok(usuario)
    }

    async fn delete_usuario(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.usuarios.write().await.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn shutdown(&self) {}
}
