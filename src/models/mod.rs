pub mod encomenda;
pub mod usuario;
