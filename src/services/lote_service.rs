// src/services/lote_service.rs

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::api::BackendApi;
use crate::common::error::AppError;
use crate::models::catalogo::{Local, Produto, Setor, UnidadesProduto};
use crate::models::lote::{
    AjustePreco, Confirmacao, FinalizacaoResposta, IniciarLotePayload, NivelControle, StatusLote,
    TipoLote,
};
use crate::services::busca::BuscaProduto;
use crate::services::itens::LedgerItens;
use crate::services::localizacao::{CampoLocalizacao, SelecaoLocalizacao, campos_obrigatorios};

/// Controlador da sessão de lote: dono do ciclo de vida
/// CONFIGURANDO -> ABERTO -> FINALIZANDO -> ENVIADO e único componente
/// que conversa com o backend (via `BackendApi`).
///
/// Todo o estado mora aqui, explícito (nada de singleton global).
pub struct LoteController<A: BackendApi> {
    api: Arc<A>,
    busca: BuscaProduto<A>,

    // Dados de referência, carregados uma vez e somente leitura.
    nivel: NivelControle,
    setores: Vec<Setor>,
    locais: Vec<Local>,

    status: StatusLote,
    tipo: Option<TipoLote>,
    motivo: Option<String>,
    selecao: SelecaoLocalizacao,
    origem: Option<String>,
    observacao: Option<String>,

    id_lote: Option<i64>,
    ledger: Option<LedgerItens<A>>,
    produto_selecionado: Option<(Produto, UnidadesProduto)>,
}

impl<A: BackendApi> LoteController<A> {
    /// Abre a sessão: carrega o nível de controle e, conforme o nível,
    /// os setores e locais de referência.
    pub async fn iniciar_sessao(api: Arc<A>, busca_quiet: Duration) -> Result<Self, AppError> {
        let nivel = api.nivel_controle().await?;

        let setores = match nivel {
            NivelControle::Setor | NivelControle::Local => api.listar_setores().await?,
            NivelControle::Central => Vec::new(),
        };
        let locais = match nivel {
            NivelControle::Local => api.listar_locais().await?,
            _ => Vec::new(),
        };

        info!(
            ?nivel,
            setores = setores.len(),
            locais = locais.len(),
            "Sessão de lote iniciada"
        );

        Ok(Self {
            busca: BuscaProduto::new(Arc::clone(&api), busca_quiet),
            api,
            nivel,
            setores,
            locais,
            status: StatusLote::Configurando,
            tipo: None,
            motivo: None,
            selecao: SelecaoLocalizacao::default(),
            origem: None,
            observacao: None,
            id_lote: None,
            ledger: None,
            produto_selecionado: None,
        })
    }

    // --- Acesso ao estado ---

    pub fn status(&self) -> StatusLote {
        self.status
    }

    pub fn nivel(&self) -> NivelControle {
        self.nivel
    }

    pub fn tipo(&self) -> Option<TipoLote> {
        self.tipo
    }

    pub fn motivo(&self) -> Option<&str> {
        self.motivo.as_deref()
    }

    pub fn id_lote(&self) -> Option<i64> {
        self.id_lote
    }

    pub fn setores(&self) -> &[Setor] {
        &self.setores
    }

    pub fn busca(&self) -> &BuscaProduto<A> {
        &self.busca
    }

    pub fn ledger(&self) -> Result<&LedgerItens<A>, AppError> {
        self.ledger
            .as_ref()
            .ok_or_else(|| AppError::validacao("Nenhum lote aberto."))
    }

    /// Acesso de escrita ao ledger. Itens só existem enquanto o lote
    /// está ABERTO, então depois do envio isto é um erro.
    pub fn ledger_mut(&mut self) -> Result<&mut LedgerItens<A>, AppError> {
        self.exigir_status(StatusLote::Aberto, "alterar os itens")?;
        self.ledger
            .as_mut()
            .ok_or_else(|| AppError::validacao("Nenhum lote aberto."))
    }

    pub fn total(&self) -> Decimal {
        self.ledger
            .as_ref()
            .map(LedgerItens::total)
            .unwrap_or(Decimal::ZERO)
    }

    fn exigir_status(&self, esperado: StatusLote, acao: &str) -> Result<(), AppError> {
        if self.status != esperado {
            return Err(AppError::validacao(format!(
                "Não é possível {acao} no estado atual do lote."
            )));
        }
        Ok(())
    }

    // --- Cabeçalho (estado CONFIGURANDO) ---

    /// Motivos válidos para o tipo corrente (vazio sem tipo escolhido).
    pub fn motivos_permitidos(&self) -> &'static [&'static str] {
        self.tipo.map(|t| t.motivos()).unwrap_or(&[])
    }

    /// Campos de localização exigidos pela tabela de decisão para o
    /// tipo corrente.
    pub fn campos_de_localizacao(&self) -> Vec<CampoLocalizacao> {
        match self.tipo {
            Some(tipo) => campos_obrigatorios(self.nivel, tipo),
            None => Vec::new(),
        }
    }

    /// Troca o tipo do lote. Reseta o motivo (a lista muda com o tipo)
    /// e descarta seleções de campos que deixaram de existir.
    pub fn selecionar_tipo(&mut self, tipo: TipoLote) -> Result<(), AppError> {
        self.exigir_status(StatusLote::Configurando, "trocar o tipo")?;

        self.tipo = Some(tipo);
        self.motivo = None;
        let campos = campos_obrigatorios(self.nivel, tipo);
        self.selecao.reter_apenas(&campos);
        Ok(())
    }

    pub fn selecionar_motivo(&mut self, motivo: &str) -> Result<(), AppError> {
        self.exigir_status(StatusLote::Configurando, "trocar o motivo")?;
        let tipo = self
            .tipo
            .ok_or_else(|| AppError::validacao("Selecione o tipo primeiro."))?;

        if !tipo.aceita_motivo(motivo) {
            return Err(AppError::validacao(format!(
                "Motivo '{motivo}' não se aplica a {tipo}."
            )));
        }
        self.motivo = Some(motivo.to_string());
        Ok(())
    }

    /// Texto livre opcional do cabeçalho (origem do documento, observação).
    /// Como o resto do cabeçalho, congela depois que o lote abre.
    pub fn anotar(
        &mut self,
        origem: Option<String>,
        observacao: Option<String>,
    ) -> Result<(), AppError> {
        self.exigir_status(StatusLote::Configurando, "alterar o cabeçalho")?;
        self.origem = origem;
        self.observacao = observacao;
        Ok(())
    }

    /// Seleciona um setor ou local. Setores são validados contra a lista
    /// de referência; locais precisam pertencer ao setor já escolhido da
    /// mesma cascata.
    pub fn selecionar_localizacao(
        &mut self,
        campo: CampoLocalizacao,
        id: i64,
    ) -> Result<(), AppError> {
        self.exigir_status(StatusLote::Configurando, "alterar a localização")?;
        let tipo = self
            .tipo
            .ok_or_else(|| AppError::validacao("Selecione o tipo primeiro."))?;

        if !campos_obrigatorios(self.nivel, tipo).contains(&campo) {
            return Err(AppError::validacao(format!(
                "O campo '{}' não se aplica a este lote.",
                campo.rotulo()
            )));
        }

        if campo.eh_local() {
            let candidato = self
                .selecao
                .candidatos_local(campo, &self.locais)
                .iter()
                .any(|l| l.id == id);
            if !candidato {
                return Err(AppError::NotFound(format!(
                    "{} com id {id}",
                    campo.rotulo()
                )));
            }
        } else if !self.setores.iter().any(|s| s.id == id) {
            return Err(AppError::NotFound(format!("Setor com id {id}")));
        }

        self.selecao.definir(campo, Some(id));
        Ok(())
    }

    /// Candidatos do seletor de local (vazio até o setor pareado ser escolhido).
    pub fn candidatos_local(&self, campo: CampoLocalizacao) -> Vec<&Local> {
        self.selecao.candidatos_local(campo, &self.locais)
    }

    // --- Abertura ---

    /// Cria o lote no backend. Só sai de CONFIGURANDO se o backend
    /// confirmar; qualquer falha deixa tudo como estava.
    #[instrument(skip(self))]
    pub async fn iniciar_lote(&mut self) -> Result<i64, AppError> {
        self.exigir_status(StatusLote::Configurando, "iniciar o lote")?;

        let tipo = self
            .tipo
            .ok_or_else(|| AppError::validacao("O tipo é obrigatório."))?;
        let motivo = self
            .motivo
            .clone()
            .ok_or_else(|| AppError::validacao("O motivo é obrigatório."))?;

        self.selecao.validar(self.nivel, tipo)?;

        let payload = IniciarLotePayload {
            tipo,
            motivo,
            setor_origem_id: self.selecao.setor_origem_id,
            local_origem_id: self.selecao.local_origem_id,
            setor_destino_id: self.selecao.setor_destino_id,
            local_destino_id: self.selecao.local_destino_id,
            origem: self.origem.clone(),
            observacao: self.observacao.clone(),
        };
        payload.validate()?;

        let id = self.api.iniciar_lote(&payload).await?;

        self.id_lote = Some(id);
        self.ledger = Some(LedgerItens::new(Arc::clone(&self.api), id, tipo));
        self.status = StatusLote::Aberto;

        info!(id_lote = id, %tipo, "Lote aberto");
        Ok(id)
    }

    // --- Itens (estado ABERTO) ---

    /// Seleção de um produto vindo da busca: carrega as unidades
    /// permitidas uma única vez e guarda o snapshot para o adicionar.
    pub async fn selecionar_produto(
        &mut self,
        produto: Produto,
    ) -> Result<&UnidadesProduto, AppError> {
        self.exigir_status(StatusLote::Aberto, "selecionar um produto")?;

        let unidades = self.api.unidades_do_produto(produto.id).await?;
        let (_, unidades) = self.produto_selecionado.insert((produto, unidades));
        Ok(unidades)
    }

    pub fn produto_selecionado(&self) -> Option<&Produto> {
        self.produto_selecionado.as_ref().map(|(p, _)| p)
    }

    /// Cancela o "modal" de adição sem efeito colateral.
    pub fn cancelar_selecao(&mut self) {
        self.produto_selecionado = None;
    }

    /// Adiciona o produto selecionado ao lote. Em entradas, quando o
    /// preço não é informado, usa o preço de custo do cadastro (mesmo
    /// pré-preenchimento da tela original).
    pub async fn adicionar_item(
        &mut self,
        quantidade: Decimal,
        id_unidade: i64,
        preco_custo: Option<Decimal>,
        observacao: Option<String>,
    ) -> Result<i64, AppError> {
        self.exigir_status(StatusLote::Aberto, "adicionar itens")?;

        let (produto, unidades) = self
            .produto_selecionado
            .clone()
            .ok_or_else(|| AppError::validacao("Nenhum produto selecionado."))?;
        let unidade = unidades
            .por_id(id_unidade)
            .ok_or_else(|| AppError::NotFound(format!("Unidade com id {id_unidade}")))?;

        let tipo = self
            .tipo
            .ok_or_else(|| AppError::validacao("O tipo é obrigatório."))?;
        let preco = if tipo.captura_preco_custo() {
            Some(preco_custo.unwrap_or_else(|| produto.preco_custo_ou_zero()))
        } else {
            preco_custo
        };

        let ledger = self.ledger_mut()?;
        let item_id = ledger
            .adicionar(&produto, quantidade, &unidade, preco, observacao)
            .await?;

        self.produto_selecionado = None;
        Ok(item_id)
    }

    pub async fn editar_item(
        &mut self,
        item_id: i64,
        quantidade: Decimal,
        ajuste_preco: AjustePreco,
    ) -> Result<(), AppError> {
        self.exigir_status(StatusLote::Aberto, "editar itens")?;
        self.ledger_mut()?
            .editar(item_id, quantidade, ajuste_preco)
            .await
    }

    pub async fn remover_item(
        &mut self,
        item_id: i64,
        confirmacao: Confirmacao,
    ) -> Result<bool, AppError> {
        self.exigir_status(StatusLote::Aberto, "remover itens")?;
        self.ledger_mut()?.remover(item_id, confirmacao).await
    }

    // --- Finalização ---

    /// Envia o lote para aprovação. Exige pelo menos um item e a
    /// confirmação explícita do usuário (a ação não pode ser desfeita).
    /// Cancelar devolve `Ok(None)` sem tocar no backend; uma falha do
    /// backend devolve o lote para ABERTO, como se nada tivesse sido
    /// tentado.
    #[instrument(skip(self))]
    pub async fn finalizar(
        &mut self,
        confirmacao: Confirmacao,
    ) -> Result<Option<FinalizacaoResposta>, AppError> {
        self.exigir_status(StatusLote::Aberto, "finalizar o lote")?;

        let ledger = self.ledger()?;
        if ledger.esta_vazio() {
            return Err(AppError::validacao(
                "Adicione pelo menos um item antes de finalizar.",
            ));
        }

        if !confirmacao.confirmada() {
            return Ok(None);
        }

        let id = self
            .id_lote
            .ok_or_else(|| AppError::validacao("Nenhum lote aberto."))?;

        self.status = StatusLote::Finalizando;
        match self.api.finalizar_lote(id).await {
            Ok(resposta) => {
                self.status = StatusLote::Enviado;
                info!(id_lote = id, "Lote enviado para aprovação");
                Ok(Some(resposta))
            }
            Err(e) => {
                self.status = StatusLote::Aberto;
                warn!(id_lote = id, erro = %e, "Falha ao finalizar lote");
                Err(e)
            }
        }
    }
}
