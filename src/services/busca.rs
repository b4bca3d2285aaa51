// src/services/busca.rs
//
// Busca de produtos "enquanto digita", com debounce e descarte de
// respostas obsoletas (a última consulta sempre vence).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::api::BackendApi;
use crate::common::error::AppError;
use crate::models::catalogo::Produto;

/// Tamanho mínimo do termo para consultar o backend.
const MINIMO_CARACTERES: usize = 2;

#[derive(Debug)]
pub enum ResultadoBusca {
    /// Resultado válido para a consulta mais recente.
    Produtos(Vec<Produto>),
    /// Uma tecla mais nova chegou durante a espera; este resultado
    /// não deve ser aplicado na tela.
    Descartada,
}

pub struct BuscaProduto<A: BackendApi> {
    api: Arc<A>,
    quieto: Duration,
    // Cada tecla incrementa a geração; só a geração corrente consulta
    // o backend e aplica o resultado.
    geracao: Arc<AtomicU64>,
}

impl<A: BackendApi> Clone for BuscaProduto<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            quieto: self.quieto,
            geracao: Arc::clone(&self.geracao),
        }
    }
}

impl<A: BackendApi> BuscaProduto<A> {
    pub fn new(api: Arc<A>, quieto: Duration) -> Self {
        Self {
            api,
            quieto,
            geracao: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra uma tecla digitada e, passado o período de silêncio,
    /// consulta o backend, a menos que outra tecla tenha chegado antes.
    pub async fn digitar(&self, termo: &str) -> Result<ResultadoBusca, AppError> {
        let minha_geracao = self.geracao.fetch_add(1, Ordering::SeqCst) + 1;
        let termo = termo.trim().to_string();

        // Termo curto: resultado vazio, sem incomodar o backend.
        // A geração ainda avança: o que o usuário digitou por último manda.
        if termo.chars().count() < MINIMO_CARACTERES {
            return Ok(ResultadoBusca::Produtos(Vec::new()));
        }

        tokio::time::sleep(self.quieto).await;
        if self.geracao.load(Ordering::SeqCst) != minha_geracao {
            debug!(%termo, "Consulta substituída durante o debounce");
            return Ok(ResultadoBusca::Descartada);
        }

        let produtos = self.api.buscar_produtos(&termo).await?;

        // A resposta pode ter chegado depois de uma tecla mais nova.
        if self.geracao.load(Ordering::SeqCst) != minha_geracao {
            debug!(%termo, "Resposta obsoleta descartada");
            return Ok(ResultadoBusca::Descartada);
        }

        Ok(ResultadoBusca::Produtos(produtos))
    }
}
