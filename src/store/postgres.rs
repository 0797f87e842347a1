use async_trait::async_trait;
use sqlx::{postgres::PgPool, Error as SqlxError};

use super::{EncomendaStore, Store, UsuarioStore};
use crate::database;
use crate::error::AppError;
use crate::models::encomenda::{Encomenda, EncomendaPatch, NewEncomenda};
use crate::models::usuario::{NewUsuario, Usuario};

const SCHEMA: &str = include_str!("../../db/schema.sql");

const ENCOMENDA_COLUMNS: &str = r#""id", "usuarios_id", "material", "chumbo", "peso_laco", "cor""#;

const USUARIO_COLUMNS: &str = "id, nome, email, senha_hash, criado_em";

fn map_unique_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::conflict(message)
        }
        other => other.into(),
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = database::create_pool(database_url, max_connections)
            .await
            .map_err(AppError::db)?;
        Ok(Self { pool })
    }

    /// Creates the tables when they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(())
    }
}

#[async_trait]
impl EncomendaStore for PgStore {
    async fn list_encomendas(&self) -> Result<Vec<Encomenda>, AppError> {
        sqlx::query_as::<_, Encomenda>(&format!(
            r#"SELECT {ENCOMENDA_COLUMNS} FROM "Encomendas" ORDER BY "id" DESC"#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    async fn get_encomenda(&self, id: i64) -> Result<Option<Encomenda>, AppError> {
        sqlx::query_as::<_, Encomenda>(&format!(
            r#"SELECT {ENCOMENDA_COLUMNS} FROM "Encomendas" WHERE "id" = $1"#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    async fn create_encomenda(&self, new: NewEncomenda) -> Result<Encomenda, AppError> {
        sqlx::query_as::<_, Encomenda>(&format!(
            r#"INSERT INTO "Encomendas" ("usuarios_id", "material", "chumbo", "peso_laco", "cor")
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {ENCOMENDA_COLUMNS}"#
        ))
        .bind(new.usuarios_id)
        .bind(&new.material)
        .bind(new.chumbo)
        .bind(new.peso_laco)
        .bind(&new.cor)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    async fn replace_encomenda(&self, id: i64, new: NewEncomenda) -> Result<Option<Encomenda>, AppError> {
        sqlx::query_as::<_, Encomenda>(&format!(
            r#"UPDATE "Encomendas" SET
                "usuarios_id" = $1,
                "material" = $2,
                "chumbo" = $3,
                "peso_laco" = $4,
                "cor" = $5
               WHERE "id" = $6
               RETURNING {ENCOMENDA_COLUMNS}"#
        ))
        .bind(new.usuarios_id)
        .bind(&new.material)
        .bind(new.chumbo)
        .bind(new.peso_laco)
        .bind(&new.cor)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    async fn update_encomenda(&self, id: i64, patch: EncomendaPatch) -> Result<Option<Encomenda>, AppError> {
        // Business columns are NOT NULL, so a NULL parameter can only mean "not sent"
        sqlx::query_as::<_, Encomenda>(&format!(
            r#"UPDATE "Encomendas" SET
                "usuarios_id" = COALESCE($1, "usuarios_id"),
                "material" = COALESCE($2, "material"),
                "chumbo" = COALESCE($3, "chumbo"),
                "peso_laco" = COALESCE($4, "peso_laco"),
                "cor" = COALESCE($5, "cor")
               WHERE "id" = $6
               RETURNING {ENCOMENDA_COLUMNS}"#
        ))
        .bind(patch.usuarios_id)
        .bind(patch.material)
        .bind(patch.chumbo)
        .bind(patch.peso_laco)
        .bind(patch.cor)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    async fn delete_encomenda(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(r#"DELETE FROM "Encomendas" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UsuarioStore for PgStore {
    async fn list_usuarios(&self) -> Result<Vec<Usuario>, AppError> {
        sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {USUARIO_COLUMNS} FROM usuarios ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    async fn get_usuario(&self, id: i64) -> Result<Option<Usuario>, AppError> {
        sqlx::query_as::<_, Usuario>(&format!("SELECT {USUARIO_COLUMNS} FROM usuarios WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db)
    }

    async fn find_usuario_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        sqlx::query_as::<_, Usuario>(&format!("SELECT {USUARIO_COLUMNS} FROM usuarios WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db)
    }

    async fn create_usuario(&self, new: NewUsuario) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(&format!(
            "INSERT INTO usuarios (nome, email, senha_hash) VALUES ($1, $2, $3) RETURNING {USUARIO_COLUMNS}"
        ))
        .bind(&new.nome)
        .bind(&new.email)
        .bind(&new.senha_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email já cadastrado"))
    }

    async fn delete_usuario(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn shutdown(&self) {
        self.pool.close().await;
    }
}
