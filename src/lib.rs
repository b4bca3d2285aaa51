// Cliente de lotes de movimentação de estoque: máquina de estados do
// lote, ledger de itens, busca de produtos e o contrato HTTP com o
// backend.

pub mod api;
pub mod common;
pub mod config;
pub mod models;
pub mod services;

pub use api::{BackendApi, BackendClient};
pub use common::error::AppError;
pub use config::Config;
pub use services::lote_service::LoteController;
