// src/services/itens.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};
use validator::Validate;

use crate::api::BackendApi;
use crate::common::error::AppError;
use crate::models::catalogo::{Produto, Unidade};
use crate::models::lote::{
    AjustePreco, Confirmacao, EditarItemPayload, ItemLote, NovoItemPayload, TipoLote,
};

/// Lista de itens do lote aberto. O backend é a fonte da verdade: toda
/// mutação re-busca a lista autoritativa em vez de aplicar um patch
/// otimista local. As mutações tomam `&mut self`, então nunca há duas
/// em andamento ao mesmo tempo.
pub struct LedgerItens<A: BackendApi> {
    api: Arc<A>,
    id_lote: i64,
    tipo: TipoLote,
    itens: Vec<ItemLote>,
}

impl<A: BackendApi> std::fmt::Debug for LedgerItens<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerItens")
            .field("id_lote", &self.id_lote)
            .field("tipo", &self.tipo)
            .field("itens", &self.itens)
            .finish_non_exhaustive()
    }
}

impl<A: BackendApi> LedgerItens<A> {
    pub(crate) fn new(api: Arc<A>, id_lote: i64, tipo: TipoLote) -> Self {
        Self {
            api,
            id_lote,
            tipo,
            itens: Vec::new(),
        }
    }

    pub fn id_lote(&self) -> i64 {
        self.id_lote
    }

    pub fn itens(&self) -> &[ItemLote] {
        &self.itens
    }

    pub fn esta_vazio(&self) -> bool {
        self.itens.is_empty()
    }

    pub fn por_id(&self, item_id: i64) -> Option<&ItemLote> {
        self.itens.iter().find(|i| i.id == item_id)
    }

    /// Valor total do lote: sempre derivado, nunca armazenado.
    pub fn total(&self) -> Decimal {
        self.itens.iter().map(ItemLote::subtotal).sum()
    }

    /// Re-busca a lista autoritativa do backend.
    pub async fn recarregar(&mut self) -> Result<(), AppError> {
        let detalhe = self.api.obter_lote(self.id_lote).await?;
        self.itens = detalhe.itens;
        Ok(())
    }

    fn validar_preco(&self, preco_custo: Option<Decimal>) -> Result<(), AppError> {
        if self.tipo.captura_preco_custo() && preco_custo.is_none() {
            return Err(AppError::validacao(
                "O preço de custo é obrigatório em lotes de entrada.",
            ));
        }
        if !self.tipo.captura_preco_custo() && preco_custo.is_some() {
            return Err(AppError::validacao(
                "Preço de custo só se aplica a lotes de entrada.",
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, produto, unidade), fields(id_lote = self.id_lote))]
    pub async fn adicionar(
        &mut self,
        produto: &Produto,
        quantidade: Decimal,
        unidade: &Unidade,
        preco_custo: Option<Decimal>,
        observacao: Option<String>,
    ) -> Result<i64, AppError> {
        self.validar_preco(preco_custo)?;

        let payload = NovoItemPayload {
            id_produto: produto.id,
            quantidade_original: quantidade,
            unidade_movimentacao: unidade.sigla.clone(),
            fator_conversao: unidade.fator,
            preco_custo_unitario: preco_custo,
            observacao,
        };
        payload.validate()?;

        let item_id = self.api.adicionar_item(self.id_lote, &payload).await?;
        self.recarregar().await?;

        info!(item_id, produto = %produto.nome, "Item adicionado ao lote");
        Ok(item_id)
    }

    /// Edita quantidade e/ou preço de custo. Unidade e fator de conversão
    /// são imutáveis depois da criação do item.
    #[instrument(skip(self), fields(id_lote = self.id_lote))]
    pub async fn editar(
        &mut self,
        item_id: i64,
        quantidade: Decimal,
        ajuste_preco: AjustePreco,
    ) -> Result<(), AppError> {
        if self.por_id(item_id).is_none() {
            return Err(AppError::NotFound(format!("Item {item_id}")));
        }
        if !self.tipo.captura_preco_custo() && ajuste_preco != AjustePreco::Manter {
            return Err(AppError::validacao(
                "Preço de custo só se aplica a lotes de entrada.",
            ));
        }

        let payload = EditarItemPayload::new(quantidade, ajuste_preco);
        payload.validate()?;

        self.api
            .editar_item(self.id_lote, item_id, &payload)
            .await?;
        self.recarregar().await
    }

    /// Remove um item. Exige confirmação prévia; cancelar devolve `false`
    /// sem tocar no backend.
    #[instrument(skip(self), fields(id_lote = self.id_lote))]
    pub async fn remover(
        &mut self,
        item_id: i64,
        confirmacao: Confirmacao,
    ) -> Result<bool, AppError> {
        if self.por_id(item_id).is_none() {
            return Err(AppError::NotFound(format!("Item {item_id}")));
        }
        if !confirmacao.confirmada() {
            return Ok(false);
        }

        self.api.remover_item(self.id_lote, item_id).await?;
        self.recarregar().await?;

        info!(item_id, "Item removido do lote");
        Ok(true)
    }
}
