pub mod encomenda;
pub mod usuario;

use axum::extract::FromRequest;

use crate::error::AppError;

pub const INVALID_ID: &str = "id inválido";

/// `Json` extractor whose rejections come back as `{"erro": ...}` 400s.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path ids are taken as text so malformed ones get the same error body as
/// every other validation failure.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| AppError::validation(INVALID_ID))
}
