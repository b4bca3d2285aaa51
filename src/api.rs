pub mod client;
pub use client::BackendClient;

#[cfg(test)]
pub mod simulado;

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::models::catalogo::{Local, Produto, Setor, UnidadesProduto};
use crate::models::lote::{
    DetalheLote, EditarItemPayload, FinalizacaoResposta, IniciarLotePayload, NivelControle,
    NovoItemPayload,
};

// Fronteira de I/O do cliente: tudo que fala com o backend passa por aqui.
// Os serviços recebem a implementação injetada, o que permite testar o
// fluxo inteiro com um backend em memória.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn nivel_controle(&self) -> Result<NivelControle, AppError>;

    async fn listar_setores(&self) -> Result<Vec<Setor>, AppError>;

    async fn listar_locais(&self) -> Result<Vec<Local>, AppError>;

    /// Busca de produtos por termo (mínimo de 2 caracteres é regra do
    /// chamador; aqui só repassa a query).
    async fn buscar_produtos(&self, termo: &str) -> Result<Vec<Produto>, AppError>;

    async fn unidades_do_produto(&self, id_produto: i64) -> Result<UnidadesProduto, AppError>;

    /// Cria o lote em rascunho e devolve o id atribuído pelo backend.
    async fn iniciar_lote(&self, payload: &IniciarLotePayload) -> Result<i64, AppError>;

    async fn obter_lote(&self, id_lote: i64) -> Result<DetalheLote, AppError>;

    /// Devolve o id do item criado (o item completo vem no re-fetch do lote).
    async fn adicionar_item(&self, id_lote: i64, payload: &NovoItemPayload)
    -> Result<i64, AppError>;

    async fn editar_item(
        &self,
        id_lote: i64,
        item_id: i64,
        payload: &EditarItemPayload,
    ) -> Result<(), AppError>;

    async fn remover_item(&self, id_lote: i64, item_id: i64) -> Result<(), AppError>;

    async fn finalizar_lote(&self, id_lote: i64) -> Result<FinalizacaoResposta, AppError>;
}
