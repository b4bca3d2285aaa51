// src/models/lote.rs

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// --- 1. Tipo de Movimentação ---
// Mesma convenção do banco: valores SCREAMING_SNAKE no JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoLote {
    Entrada,       // Vira "ENTRADA"
    Saida,         // Vira "SAIDA"
    Transferencia, // Vira "TRANSFERENCIA"
}

impl TipoLote {
    /// Motivos permitidos para cada tipo (lista fixa, definida pelo negócio).
    pub fn motivos(&self) -> &'static [&'static str] {
        match self {
            TipoLote::Entrada => &["COMPRA", "DEVOLUÇÃO", "AJUSTE", "TRANSFERÊNCIA", "OUTROS"],
            TipoLote::Saida => &[
                "VENDA",
                "PRODUÇÃO",
                "PERDA",
                "AJUSTE",
                "TRANSFERÊNCIA",
                "OUTROS",
            ],
            TipoLote::Transferencia => &["REPOSIÇÃO", "REORGANIZAÇÃO", "OUTROS"],
        }
    }

    pub fn aceita_motivo(&self, motivo: &str) -> bool {
        self.motivos().contains(&motivo)
    }

    /// Preço de custo só é capturado em entradas.
    pub fn captura_preco_custo(&self) -> bool {
        matches!(self, TipoLote::Entrada)
    }
}

impl std::fmt::Display for TipoLote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TipoLote::Entrada => "ENTRADA",
            TipoLote::Saida => "SAIDA",
            TipoLote::Transferencia => "TRANSFERENCIA",
        };
        f.write_str(s)
    }
}

// --- 2. Nível de Controle ---
// Granularidade organizacional do estoque. Carregado uma vez da configuração
// do backend e somente leitura a partir daí.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NivelControle {
    Central,
    Setor,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NivelResposta {
    pub nivel: NivelControle,
}

// --- 3. Ciclo de vida do Lote ---
// CONFIGURANDO -> ABERTO -> FINALIZANDO -> ENVIADO (terminal).
// Abandono não é um estado: basta descartar o controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLote {
    Configurando,
    Aberto,
    Finalizando,
    Enviado,
}

// --- 4. Item do Lote ---
// Snapshot autoritativo vindo do backend (GET /lotes/{id}); os campos
// derivados nunca são armazenados, sempre recalculados.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemLote {
    pub id: i64,
    pub id_produto: i64,
    #[serde(default)]
    pub produto_nome: String,
    pub quantidade_original: Decimal,
    #[serde(default)]
    pub unidade_movimentacao: String,
    #[serde(default = "fator_um")]
    pub fator_conversao: Decimal,
    #[serde(default)]
    pub preco_custo_unitario: Option<Decimal>,
    #[serde(default)]
    pub observacao: Option<String>,
    #[serde(default)]
    pub unidade_padrao_sigla: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

fn fator_um() -> Decimal {
    Decimal::ONE
}

impl ItemLote {
    /// Quantidade convertida para a unidade padrão do produto.
    pub fn quantidade_padrao(&self) -> Decimal {
        self.quantidade_original * self.fator_conversao
    }

    /// Subtotal financeiro do item (zero quando não há preço de custo).
    pub fn subtotal(&self) -> Decimal {
        self.quantidade_padrao() * self.preco_custo_unitario.unwrap_or(Decimal::ZERO)
    }

    /// A conversão só aparece na tela quando a unidade não é a padrão.
    pub fn exibe_conversao(&self) -> bool {
        self.fator_conversao != Decimal::ONE
    }
}

// --- 5. Cabeçalho do Lote (como o backend devolve) ---
#[derive(Debug, Clone, Deserialize)]
pub struct LoteResumo {
    pub id: i64,
    pub tipo: TipoLote,
    pub motivo: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub setor_origem_id: Option<i64>,
    #[serde(default)]
    pub local_origem_id: Option<i64>,
    #[serde(default)]
    pub setor_destino_id: Option<i64>,
    #[serde(default)]
    pub local_destino_id: Option<i64>,
    #[serde(default)]
    pub data_criacao: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetalheLote {
    pub lote: LoteResumo,
    pub itens: Vec<ItemLote>,
}

// ---
// Validação Customizada
// ---
fn validate_positivo(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: POST /lotes/iniciar
// ---
#[derive(Debug, Clone, Serialize, Validate)]
pub struct IniciarLotePayload {
    pub tipo: TipoLote,

    #[validate(length(min = 1, message = "O motivo é obrigatório."))]
    pub motivo: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub setor_origem_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_origem_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setor_destino_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_destino_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacao: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoteCriadoResposta {
    pub id_lote: i64,
}

// ---
// Payload: POST /lotes/{id}/item
// ---
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NovoItemPayload {
    pub id_produto: i64,

    #[validate(custom(function = "validate_positivo"))]
    pub quantidade_original: Decimal,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unidade_movimentacao: String,

    #[validate(custom(function = "validate_positivo"))]
    pub fator_conversao: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_custo_unitario: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacao: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemCriadoResposta {
    pub item_id: i64,
}

// ---
// Confirmação explícita do usuário para ações destrutivas
// (finalizar lote, remover item). Cancelar é sempre um no-op.
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmacao {
    Confirmada,
    Cancelada,
}

impl Confirmacao {
    pub fn confirmada(&self) -> bool {
        matches!(self, Confirmacao::Confirmada)
    }
}

// ---
// Edição de item: o que fazer com o preço de custo.
// A tela antiga deixava o campo vazio virar null sem perguntar; aqui a
// intenção precisa ser declarada.
// ---
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AjustePreco {
    /// Não mexe no preço gravado.
    Manter,
    /// Grava um novo preço unitário.
    Definir(Decimal),
    /// Limpa o preço (envia null explícito).
    Remover,
}

// ---
// Payload: PUT /lotes/{id}/item/{item_id} (parcial)
// ---
// `Option<Option<_>>`: campo ausente = mantém, `null` = limpa.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct EditarItemPayload {
    #[validate(custom(function = "validate_positivo"))]
    pub quantidade_original: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_custo_unitario: Option<Option<Decimal>>,
}

impl EditarItemPayload {
    pub fn new(quantidade_original: Decimal, ajuste: AjustePreco) -> Self {
        let preco_custo_unitario = match ajuste {
            AjustePreco::Manter => None,
            AjustePreco::Definir(preco) => Some(Some(preco)),
            AjustePreco::Remover => Some(None),
        };
        Self {
            quantidade_original,
            preco_custo_unitario,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SucessoResposta {
    #[serde(default)]
    pub sucesso: bool,
}

// ---
// Resposta: POST /lotes/{id}/finalizar
// ---
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizacaoResposta {
    pub message: String,
    #[serde(default)]
    pub total_itens: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}
