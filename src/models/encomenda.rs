use serde::Serialize;
use sqlx::FromRow;

/// Row of the `"Encomendas"` table as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Encomenda {
    pub id: i64,
    pub usuarios_id: i64,
    pub material: String,
    pub chumbo: f64,
    pub peso_laco: f64,
    pub cor: String,
}

/// Fully validated business fields, used by create and full replace.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEncomenda {
    pub usuarios_id: i64,
    pub material: String,
    pub chumbo: f64,
    pub peso_laco: f64,
    pub cor: String,
}

/// Validated partial update. `None` means the field was not sent and the
/// stored value is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncomendaPatch {
    pub usuarios_id: Option<i64>,
    pub material: Option<String>,
    pub chumbo: Option<f64>,
    pub peso_laco: Option<f64>,
    pub cor: Option<String>,
}

impl Encomenda {
    pub fn from_new(id: i64, new: NewEncomenda) -> Self {
        Self {
            id,
            usuarios_id: new.usuarios_id,
            material: new.material,
            chumbo: new.chumbo,
            peso_laco: new.peso_laco,
            cor: new.cor,
        }
    }

    pub fn apply(&mut self, patch: EncomendaPatch) {
        if let Some(usuarios_id) = patch.usuarios_id {
            self.usuarios_id = usuarios_id;
        }
        if let Some(material) = patch.material {
            self.material = material;
        }
        if let Some(chumbo) = patch.chumbo {
            self.chumbo = chumbo;
        }
        if let Some(peso_laco) = patch.peso_laco {
            self.peso_laco = peso_laco;
        }
        if let Some(cor) = patch.cor {
            self.cor = cor;
        }
    }
}
