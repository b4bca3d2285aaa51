// src/api/client.rs

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::api::BackendApi;
use crate::common::error::AppError;
use crate::config::Config;
use crate::models::catalogo::{Local, Produto, Setor, UnidadesProduto};
use crate::models::lote::{
    DetalheLote, EditarItemPayload, FinalizacaoResposta, IniciarLotePayload, ItemCriadoResposta,
    LoteCriadoResposta, NivelControle, NivelResposta, NovoItemPayload, SucessoResposta,
};

// Corpo de erro padrão do backend: {"erro": "mensagem para o usuário"}.
#[derive(Debug, Deserialize)]
struct ErroResposta {
    #[serde(default)]
    erro: Option<String>,
}

/// Cliente HTTP do backend de estoque.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, caminho: &str) -> String {
        format!("{}{}", self.base_url, caminho)
    }

    // Qualquer falha de transporte vira `Network`; o detalhe fica no log.
    fn erro_de_rede(e: reqwest::Error) -> AppError {
        tracing::error!("Falha de rede ao chamar o backend: {e}");
        AppError::Network(e.to_string())
    }

    // Status de sucesso -> desserializa o corpo esperado.
    // Status de erro -> usa o campo `erro` do corpo, ou a mensagem genérica.
    async fn tratar<T: DeserializeOwned>(resp: Response, generico: &str) -> Result<T, AppError> {
        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| AppError::Backend(format!("Resposta inesperada do servidor: {e}")));
        }

        let mensagem = resp
            .json::<ErroResposta>()
            .await
            .ok()
            .and_then(|corpo| corpo.erro)
            .unwrap_or_else(|| generico.to_string());

        debug!(%status, %mensagem, "Backend respondeu com erro");
        Err(AppError::Backend(mensagem))
    }

    async fn get<T: DeserializeOwned>(&self, caminho: &str, generico: &str) -> Result<T, AppError> {
        let resp = self
            .http
            .get(self.url(caminho))
            .send()
            .await
            .map_err(Self::erro_de_rede)?;
        Self::tratar(resp, generico).await
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn nivel_controle(&self) -> Result<NivelControle, AppError> {
        let resposta: NivelResposta = self
            .get("/api/config/nivel_controle", "Erro ao carregar configurações")
            .await?;
        Ok(resposta.nivel)
    }

    async fn listar_setores(&self) -> Result<Vec<Setor>, AppError> {
        self.get("/api/setores", "Erro ao carregar setores").await
    }

    async fn listar_locais(&self) -> Result<Vec<Local>, AppError> {
        self.get("/api/locais", "Erro ao carregar locais").await
    }

    #[instrument(skip(self))]
    async fn buscar_produtos(&self, termo: &str) -> Result<Vec<Produto>, AppError> {
        let resp = self
            .http
            .get(self.url("/api/produtos/buscar"))
            .query(&[("q", termo)])
            .send()
            .await
            .map_err(Self::erro_de_rede)?;
        Self::tratar(resp, "Erro ao buscar produtos").await
    }

    async fn unidades_do_produto(&self, id_produto: i64) -> Result<UnidadesProduto, AppError> {
        self.get(
            &format!("/api/produto/{id_produto}/unidades"),
            "Erro ao carregar unidades do produto",
        )
        .await
    }

    #[instrument(skip(self, payload))]
    async fn iniciar_lote(&self, payload: &IniciarLotePayload) -> Result<i64, AppError> {
        let resp = self
            .http
            .post(self.url("/lotes/iniciar"))
            .json(payload)
            .send()
            .await
            .map_err(Self::erro_de_rede)?;
        let criado: LoteCriadoResposta = Self::tratar(resp, "Erro ao criar lote").await?;
        Ok(criado.id_lote)
    }

    async fn obter_lote(&self, id_lote: i64) -> Result<DetalheLote, AppError> {
        self.get(&format!("/lotes/{id_lote}"), "Erro ao carregar itens")
            .await
    }

    #[instrument(skip(self, payload))]
    async fn adicionar_item(
        &self,
        id_lote: i64,
        payload: &NovoItemPayload,
    ) -> Result<i64, AppError> {
        let resp = self
            .http
            .post(self.url(&format!("/lotes/{id_lote}/item")))
            .json(payload)
            .send()
            .await
            .map_err(Self::erro_de_rede)?;
        let criado: ItemCriadoResposta = Self::tratar(resp, "Erro ao adicionar item").await?;
        Ok(criado.item_id)
    }

    #[instrument(skip(self, payload))]
    async fn editar_item(
        &self,
        id_lote: i64,
        item_id: i64,
        payload: &EditarItemPayload,
    ) -> Result<(), AppError> {
        let resp = self
            .http
            .put(self.url(&format!("/lotes/{id_lote}/item/{item_id}")))
            .json(payload)
            .send()
            .await
            .map_err(Self::erro_de_rede)?;
        let _: SucessoResposta = Self::tratar(resp, "Erro ao atualizar item").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remover_item(&self, id_lote: i64, item_id: i64) -> Result<(), AppError> {
        let resp = self
            .http
            .delete(self.url(&format!("/lotes/{id_lote}/item/{item_id}")))
            .send()
            .await
            .map_err(Self::erro_de_rede)?;
        let _: SucessoResposta = Self::tratar(resp, "Erro ao remover item").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn finalizar_lote(&self, id_lote: i64) -> Result<FinalizacaoResposta, AppError> {
        let resp = self
            .http
            .post(self.url(&format!("/lotes/{id_lote}/finalizar")))
            .send()
            .await
            .map_err(Self::erro_de_rede)?;
        Self::tratar(resp, "Erro ao finalizar lote").await
    }
}
