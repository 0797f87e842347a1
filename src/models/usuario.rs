use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUsuario {
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
}
