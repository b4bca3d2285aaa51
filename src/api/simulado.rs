// src/api/simulado.rs
//
// Backend em memória para os testes: implementa o mesmo contrato do
// cliente HTTP, com injeção de falhas e contadores de chamadas.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::api::BackendApi;
use crate::common::error::AppError;
use crate::models::catalogo::{Local, Produto, Setor, UnidadesProduto};
use crate::models::lote::{
    DetalheLote, EditarItemPayload, FinalizacaoResposta, IniciarLotePayload, ItemLote, LoteResumo,
    NivelControle, NovoItemPayload,
};

/// Falha a ser injetada na próxima chamada.
#[derive(Debug, Clone)]
pub enum Falha {
    Backend(String),
    Rede,
}

struct LoteSimulado {
    payload: IniciarLotePayload,
    itens: Vec<ItemLote>,
    status: String,
}

struct Estado {
    nivel: NivelControle,
    setores: Vec<Setor>,
    locais: Vec<Local>,
    produtos: Vec<Produto>,
    unidades: HashMap<i64, UnidadesProduto>,
    lotes: HashMap<i64, LoteSimulado>,
    proximo_lote: i64,
    proximo_item: i64,
    buscas: Vec<String>,
    falha_proxima: Option<Falha>,
    demora_busca: Option<Duration>,
}

pub struct BackendSimulado {
    estado: Mutex<Estado>,
}

impl BackendSimulado {
    pub fn new(nivel: NivelControle) -> Self {
        Self {
            estado: Mutex::new(Estado {
                nivel,
                setores: Vec::new(),
                locais: Vec::new(),
                produtos: Vec::new(),
                unidades: HashMap::new(),
                lotes: HashMap::new(),
                proximo_lote: 1,
                proximo_item: 1,
                buscas: Vec::new(),
                falha_proxima: None,
                demora_busca: None,
            }),
        }
    }

    pub fn com_setores(self, setores: Vec<Setor>) -> Self {
        self.estado.lock().unwrap().setores = setores;
        self
    }

    pub fn com_locais(self, locais: Vec<Local>) -> Self {
        self.estado.lock().unwrap().locais = locais;
        self
    }

    pub fn com_produto(self, produto: Produto, unidades: UnidadesProduto) -> Self {
        {
            let mut estado = self.estado.lock().unwrap();
            estado.unidades.insert(produto.id, unidades);
            estado.produtos.push(produto);
        }
        self
    }

    /// Toda busca de produto passa a demorar o tempo informado antes
    /// de responder, simulando uma rede lenta.
    pub fn com_demora_busca(self, demora: Duration) -> Self {
        self.estado.lock().unwrap().demora_busca = Some(demora);
        self
    }

    /// A próxima chamada (qualquer uma) devolve a falha informada.
    pub fn falhar_proxima(&self, falha: Falha) {
        self.estado.lock().unwrap().falha_proxima = Some(falha);
    }

    /// Quantas buscas de produto chegaram de fato ao "servidor".
    pub fn total_buscas(&self) -> usize {
        self.estado.lock().unwrap().buscas.len()
    }

    pub fn status_do_lote(&self, id_lote: i64) -> Option<String> {
        self.estado
            .lock()
            .unwrap()
            .lotes
            .get(&id_lote)
            .map(|l| l.status.clone())
    }

    fn checar_falha(estado: &mut Estado) -> Result<(), AppError> {
        match estado.falha_proxima.take() {
            Some(Falha::Backend(msg)) => Err(AppError::Backend(msg)),
            Some(Falha::Rede) => Err(AppError::Network("simulado: rede fora".into())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BackendApi for BackendSimulado {
    async fn nivel_controle(&self) -> Result<NivelControle, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;
        Ok(estado.nivel)
    }

    async fn listar_setores(&self) -> Result<Vec<Setor>, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;
        Ok(estado.setores.clone())
    }

    async fn listar_locais(&self) -> Result<Vec<Local>, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;
        Ok(estado.locais.clone())
    }

    async fn buscar_produtos(&self, termo: &str) -> Result<Vec<Produto>, AppError> {
        // O lock não pode atravessar o sleep.
        let demora = self.estado.lock().unwrap().demora_busca;
        if let Some(demora) = demora {
            tokio::time::sleep(demora).await;
        }

        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;
        estado.buscas.push(termo.to_string());

        let termo = termo.to_lowercase();
        Ok(estado
            .produtos
            .iter()
            .filter(|p| p.nome.to_lowercase().contains(&termo))
            .cloned()
            .collect())
    }

    async fn unidades_do_produto(&self, id_produto: i64) -> Result<UnidadesProduto, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;
        estado
            .unidades
            .get(&id_produto)
            .cloned()
            .ok_or_else(|| AppError::Backend("Produto não encontrado".into()))
    }

    async fn iniciar_lote(&self, payload: &IniciarLotePayload) -> Result<i64, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;

        let id = estado.proximo_lote;
        estado.proximo_lote += 1;
        estado.lotes.insert(
            id,
            LoteSimulado {
                payload: payload.clone(),
                itens: Vec::new(),
                status: "RASCUNHO".into(),
            },
        );
        Ok(id)
    }

    async fn obter_lote(&self, id_lote: i64) -> Result<DetalheLote, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;

        let lote = estado
            .lotes
            .get(&id_lote)
            .ok_or_else(|| AppError::Backend("Lote não encontrado".into()))?;

        Ok(DetalheLote {
            lote: LoteResumo {
                id: id_lote,
                tipo: lote.payload.tipo,
                motivo: lote.payload.motivo.clone(),
                status: Some(lote.status.clone()),
                setor_origem_id: lote.payload.setor_origem_id,
                local_origem_id: lote.payload.local_origem_id,
                setor_destino_id: lote.payload.setor_destino_id,
                local_destino_id: lote.payload.local_destino_id,
                data_criacao: None,
            },
            itens: lote.itens.clone(),
        })
    }

    async fn adicionar_item(
        &self,
        id_lote: i64,
        payload: &NovoItemPayload,
    ) -> Result<i64, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;

        let produto = estado
            .produtos
            .iter()
            .find(|p| p.id == payload.id_produto)
            .cloned();
        let (produto_nome, sigla_padrao) = match produto {
            Some(p) => (p.nome, Some(p.unidade_simbolo)),
            None => (String::new(), None),
        };

        let id = estado.proximo_item;
        estado.proximo_item += 1;

        let lote = estado
            .lotes
            .get_mut(&id_lote)
            .ok_or_else(|| AppError::Backend("Lote não encontrado".into()))?;
        lote.itens.push(ItemLote {
            id,
            id_produto: payload.id_produto,
            produto_nome,
            quantidade_original: payload.quantidade_original,
            unidade_movimentacao: payload.unidade_movimentacao.clone(),
            fator_conversao: payload.fator_conversao,
            preco_custo_unitario: payload.preco_custo_unitario,
            observacao: payload.observacao.clone(),
            unidade_padrao_sigla: sigla_padrao,
            created_at: None,
        });
        Ok(id)
    }

    async fn editar_item(
        &self,
        id_lote: i64,
        item_id: i64,
        payload: &EditarItemPayload,
    ) -> Result<(), AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;

        let lote = estado
            .lotes
            .get_mut(&id_lote)
            .ok_or_else(|| AppError::Backend("Lote não encontrado".into()))?;
        let item = lote
            .itens
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| AppError::Backend("Item não encontrado".into()))?;

        if payload.quantidade_original > Decimal::ZERO {
            item.quantidade_original = payload.quantidade_original;
        }
        if let Some(ajuste) = payload.preco_custo_unitario {
            item.preco_custo_unitario = ajuste;
        }
        Ok(())
    }

    async fn remover_item(&self, id_lote: i64, item_id: i64) -> Result<(), AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;

        let lote = estado
            .lotes
            .get_mut(&id_lote)
            .ok_or_else(|| AppError::Backend("Lote não encontrado".into()))?;
        lote.itens.retain(|i| i.id != item_id);
        Ok(())
    }

    async fn finalizar_lote(&self, id_lote: i64) -> Result<FinalizacaoResposta, AppError> {
        let mut estado = self.estado.lock().unwrap();
        Self::checar_falha(&mut estado)?;

        let lote = estado
            .lotes
            .get_mut(&id_lote)
            .ok_or_else(|| AppError::Backend("Lote não encontrado".into()))?;

        if lote.status != "RASCUNHO" {
            return Err(AppError::Backend("Lote já finalizado".into()));
        }
        if lote.itens.is_empty() {
            return Err(AppError::Backend("Lote sem itens".into()));
        }

        lote.status = "PENDENTE_APROVACAO".into();
        Ok(FinalizacaoResposta {
            message: format!("Lote #{id_lote} enviado para aprovação do gerente!"),
            total_itens: Some(lote.itens.len() as i64),
            status: Some("PENDENTE_APROVACAO".into()),
        })
    }
}
