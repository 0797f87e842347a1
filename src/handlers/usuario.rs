use bcrypt::{hash, verify};
use crate::dtos::usuario::{RegisterUsuarioRequest, UsuarioResponse, LoginRequest, LoginResponse};
use crate::auth::jwt::sign_token;
use crate::error::{AppError, NOT_FOUND_MESSAGE};
use crate::models::usuario::NewUsuario;
use axum::{extract::{Path, State}, http::StatusCode, Json};
use crate::state::AppState;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;
use tracing::instrument;

use super::{parse_id, AppJson};

#[instrument(skip(state, payload))]
pub async fn register_usuario(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterUsuarioRequest>,
) -> Result<(StatusCode, Json<UsuarioResponse>), AppError> {
    payload.validate()?;

    let cost = state.config.bcrypt_cost;
    let senha = payload.senha;
    // bcrypt is CPU bound, keep it off the async workers
    let senha_hash = tokio::task::spawn_blocking(move || hash(senha, cost))
        .await
        .map_err(|e| AppError::internal(format!("Hash task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let usuario = state
        .store
        .create_usuario(NewUsuario {
            nome: payload.nome.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            senha_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UsuarioResponse::from(usuario))))
}

#[instrument(skip(state, payload))]
pub async fn login_usuario(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::validation("email é obrigatório"));
    }
    if payload.senha.is_empty() {
        return Err(AppError::validation("senha é obrigatória"));
    }

    let usuario = state
        .store
        .find_usuario_by_email(&payload.email.trim().to_lowercase())
        .await?
        .ok_or_else(|| AppError::unauthorized("credenciais inválidas"))?;

    let senha_hash = usuario.senha_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify(payload.senha, &senha_hash))
        .await
        .map_err(|e| AppError::internal(format!("Verify task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;

    if !ok {
        return Err(AppError::unauthorized("credenciais inválidas"));
    }

    let ttl_hours = state.config.token_ttl_hours;
    let token = sign_token(usuario.id, &usuario.email, &state.config.jwt_secret, ttl_hours)?;

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in_seconds: ttl_hours * 60 * 60,
    }))
}

// Authenticated endpoint: returns the caller's profile using the id in AuthContext
#[instrument(skip_all)]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UsuarioResponse>, AppError> {
    tracing::debug!(user_id = auth.user_id, email = %auth.email, "Profile requested");

    let usuario = state
        .store
        .get_usuario(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    Ok(Json(UsuarioResponse::from(usuario)))
}

#[instrument(skip(state))]
pub async fn list_usuarios(State(state): State<AppState>) -> Result<Json<Vec<UsuarioResponse>>, AppError> {
    let usuarios = state.store.list_usuarios().await?;
    Ok(Json(usuarios.into_iter().map(UsuarioResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_usuario(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UsuarioResponse>, AppError> {
    let id = parse_id(&id)?;

    let usuario = state
        .store
        .get_usuario(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    Ok(Json(UsuarioResponse::from(usuario)))
}

#[instrument(skip(state))]
pub async fn delete_usuario(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    if !state.store.delete_usuario(id).await? {
        return Err(AppError::not_found(NOT_FOUND_MESSAGE));
    }

    Ok(StatusCode::NO_CONTENT)
}
