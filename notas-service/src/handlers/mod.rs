pub mod health;
pub mod notas;
