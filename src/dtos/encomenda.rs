// src/dtos/encomenda.rs
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::encomenda::{EncomendaPatch, NewEncomenda};

pub const INVALID_BODY: &str = "Dados obrigatórios inválidos";
pub const NOTHING_TO_UPDATE: &str = "É necessário enviar pelo menos um dado para atualizar";
pub const INVALID_USUARIO_ID: &str = "usuarios_id deve ser um número inteiro maior ou igual a 1";
pub const INVALID_MATERIAL: &str = "material deve ser um texto não vazio";
pub const INVALID_CHUMBO: &str = "chumbo deve ser um número maior ou igual a 0";
pub const INVALID_PESO_LACO: &str = "peso_laco deve ser um número maior ou igual a 0";
pub const INVALID_COR: &str = "cor deve ser um texto não vazio";

/// A body field tagged with whether the client sent it at all.
///
/// `null` is a value the client sent, so it is `Present(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field {
    #[default]
    Absent,
    Present(Value),
}

impl Field {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    fn value(&self) -> Option<&Value> {
        match self {
            Field::Absent => None,
            Field::Present(v) => Some(v),
        }
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Field::Present)
    }
}

/// Raw body of POST, PUT and PATCH. Values are coerced during validation.
///
/// Build it from the body object with `TryFrom<Map<String, Value>>`: a
/// derived `Deserialize` would also fill the fields from a JSON array.
#[derive(Debug, Default, Deserialize)]
pub struct EncomendaRequest {
    #[serde(default, alias = "ownerUserId")]
    pub usuarios_id: Field,
    #[serde(default)]
    pub material: Field,
    #[serde(default, alias = "leadAmount")]
    pub chumbo: Field,
    #[serde(default, alias = "loopWeight")]
    pub peso_laco: Field,
    #[serde(default, alias = "color")]
    pub cor: Field,
}

impl TryFrom<Map<String, Value>> for EncomendaRequest {
    type Error = AppError;

    fn try_from(body: Map<String, Value>) -> Result<Self, AppError> {
        // Both spellings of one field end up here as a duplicate field error
        serde_json::from_value(Value::Object(body))
            .map_err(|e| AppError::validation(format!("corpo JSON inválido: {e}")))
    }
}

impl EncomendaRequest {
    /// Validation for create and full replace: every field is required and any
    /// failure is reported with the same generic message.
    pub fn into_new(self) -> Result<NewEncomenda, AppError> {
        let invalid = || AppError::validation(INVALID_BODY);

        let material = self.material.value().and_then(as_text).ok_or_else(invalid)?;
        let cor = self.cor.value().and_then(as_text).ok_or_else(invalid)?;
        let usuarios_id = self.usuarios_id.value().and_then(as_user_id).ok_or_else(invalid)?;
        let chumbo = self.chumbo.value().and_then(as_non_negative).ok_or_else(invalid)?;
        let peso_laco = self.peso_laco.value().and_then(as_non_negative).ok_or_else(invalid)?;

        Ok(NewEncomenda { usuarios_id, material, chumbo, peso_laco, cor })
    }

    /// Validation for PATCH: at least one field, each present field checked on
    /// its own with a message naming it.
    pub fn into_patch(self) -> Result<EncomendaPatch, AppError> {
        if self.usuarios_id.is_absent()
            && self.material.is_absent()
            && self.chumbo.is_absent()
            && self.peso_laco.is_absent()
            && self.cor.is_absent()
        {
            return Err(AppError::validation(NOTHING_TO_UPDATE));
        }

        Ok(EncomendaPatch {
            chumbo: check(&self.chumbo, as_non_negative, INVALID_CHUMBO)?,
            peso_laco: check(&self.peso_laco, as_non_negative, INVALID_PESO_LACO)?,
            usuarios_id: check(&self.usuarios_id, as_user_id, INVALID_USUARIO_ID)?,
            material: check(&self.material, as_text, INVALID_MATERIAL)?,
            cor: check(&self.cor, as_text, INVALID_COR)?,
        })
    }
}

fn check<T>(
    field: &Field,
    coerce: fn(&Value) -> Option<T>,
    message: &'static str,
) -> Result<Option<T>, AppError> {
    match field.value() {
        None => Ok(None),
        Some(v) => coerce(v).map(Some).ok_or_else(|| AppError::validation(message)),
    }
}

/// JSON numbers and numeric strings, finite only.
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { s.parse::<f64>().ok() }
        }
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn as_non_negative(value: &Value) -> Option<f64> {
    as_number(value).filter(|n| *n >= 0.0)
}

fn as_user_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return (id >= 1).then_some(id);
    }
    as_number(value)
        .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n < i64::MAX as f64)
        .map(|n| n as i64)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
