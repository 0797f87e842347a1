use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::usuario::Usuario;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize)]
pub struct RegisterUsuarioRequest {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: String,
}

impl RegisterUsuarioRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nome.trim().is_empty() {
            return Err(AppError::validation("nome é obrigatório"));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("email inválido"));
        }
        if self.senha.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation("senha deve ter pelo menos 6 caracteres"));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: String,
}

#[derive(Debug, Serialize)]
pub struct UsuarioResponse {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub criado_em: DateTime<Utc>,
}

impl From<Usuario> for UsuarioResponse {
    fn from(usuario: Usuario) -> Self {
        Self {
            id: usuario.id,
            nome: usuario.nome,
            email: usuario.email,
            criado_em: usuario.criado_em,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in_seconds: i64,
}
