// src/models/catalogo.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Dados de referência: carregados uma vez no início da sessão e
// somente leitura a partir daí.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setor {
    pub id: i64,
    pub nome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Local {
    pub id: i64,
    pub nome: String,
    pub id_setor: i64,
}

// --- Produto ---
// Snapshot imutável retornado pela busca; o cadastro mestre fica no backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub id_erp: Option<String>,
    #[serde(default)]
    pub gtin: Option<String>,
    #[serde(default)]
    pub estoque_atual: Decimal,
    /// Sigla da unidade padrão de estocagem.
    #[serde(default)]
    pub unidade_simbolo: String,
    #[serde(default)]
    pub preco_custo: Option<Decimal>,
}

impl Produto {
    /// Preço de custo do cadastro (zero quando não informado).
    pub fn preco_custo_ou_zero(&self) -> Decimal {
        self.preco_custo.unwrap_or(Decimal::ZERO)
    }
}

// --- Unidade de medida ---
// `fator` é o multiplicador para a unidade padrão do produto;
// a própria unidade padrão sempre tem fator 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unidade {
    pub id: i64,
    pub sigla: String,
    #[serde(default)]
    pub nome: Option<String>,
    pub fator: Decimal,
}

impl Unidade {
    pub fn eh_padrao(&self) -> bool {
        self.fator == Decimal::ONE
    }
}

// Resposta de GET /api/produto/{id}/unidades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnidadesProduto {
    pub unidade_padrao: Unidade,
    #[serde(default)]
    pub unidades_alternativas: Vec<Unidade>,
}

impl UnidadesProduto {
    /// Lista completa para o seletor, com a padrão primeiro.
    /// O fator da padrão é forçado a 1 independente do que veio do backend.
    pub fn todas(&self) -> Vec<Unidade> {
        let mut padrao = self.unidade_padrao.clone();
        padrao.fator = Decimal::ONE;

        let mut lista = vec![padrao];
        lista.extend(self.unidades_alternativas.iter().cloned());
        lista
    }

    pub fn por_id(&self, id_unidade: i64) -> Option<Unidade> {
        self.todas().into_iter().find(|u| u.id == id_unidade)
    }
}
