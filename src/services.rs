pub mod busca;
pub use busca::{BuscaProduto, ResultadoBusca};
pub mod conversao;
pub mod itens;
pub use itens::LedgerItens;
pub mod localizacao;
pub use localizacao::{CampoLocalizacao, SelecaoLocalizacao};
pub mod lote_service;
pub use lote_service::LoteController;
