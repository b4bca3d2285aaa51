// src/services/localizacao.rs
//
// Resolução dos campos de origem/destino de um lote em função do nível
// de controle configurado e do tipo de movimentação.

use crate::common::error::AppError;
use crate::models::catalogo::Local;
use crate::models::lote::{NivelControle, TipoLote};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampoLocalizacao {
    SetorOrigem,
    LocalOrigem,
    SetorDestino,
    LocalDestino,
}

pub const TODOS_OS_CAMPOS: [CampoLocalizacao; 4] = [
    CampoLocalizacao::SetorOrigem,
    CampoLocalizacao::LocalOrigem,
    CampoLocalizacao::SetorDestino,
    CampoLocalizacao::LocalDestino,
];

impl CampoLocalizacao {
    pub fn rotulo(&self) -> &'static str {
        match self {
            CampoLocalizacao::SetorOrigem => "Setor Origem",
            CampoLocalizacao::LocalOrigem => "Local Origem",
            CampoLocalizacao::SetorDestino => "Setor Destino",
            CampoLocalizacao::LocalDestino => "Local Destino",
        }
    }

    /// Campo de setor do qual um campo de local depende (cascata).
    pub fn setor_pai(&self) -> Option<CampoLocalizacao> {
        match self {
            CampoLocalizacao::LocalOrigem => Some(CampoLocalizacao::SetorOrigem),
            CampoLocalizacao::LocalDestino => Some(CampoLocalizacao::SetorDestino),
            _ => None,
        }
    }

    pub fn eh_local(&self) -> bool {
        self.setor_pai().is_some()
    }
}

/// Tabela de decisão (nivel, tipo) -> campos obrigatórios, em ordem de tela.
pub fn campos_obrigatorios(nivel: NivelControle, tipo: TipoLote) -> Vec<CampoLocalizacao> {
    use CampoLocalizacao::*;

    match (nivel, tipo) {
        // CENTRAL: estoque único, sem campos de localização.
        (NivelControle::Central, _) => vec![],

        (NivelControle::Setor, TipoLote::Entrada) => vec![SetorDestino],
        (NivelControle::Setor, TipoLote::Saida) => vec![SetorOrigem],
        (NivelControle::Setor, TipoLote::Transferencia) => vec![SetorOrigem, SetorDestino],

        (NivelControle::Local, TipoLote::Entrada) => vec![SetorDestino, LocalDestino],
        (NivelControle::Local, TipoLote::Saida) => vec![SetorOrigem, LocalOrigem],
        (NivelControle::Local, TipoLote::Transferencia) => {
            vec![SetorOrigem, LocalOrigem, SetorDestino, LocalDestino]
        }
    }
}

/// Seleção corrente dos quatro campos possíveis. As cascatas de origem e
/// destino são independentes entre si.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelecaoLocalizacao {
    pub setor_origem_id: Option<i64>,
    pub local_origem_id: Option<i64>,
    pub setor_destino_id: Option<i64>,
    pub local_destino_id: Option<i64>,
}

impl SelecaoLocalizacao {
    pub fn obter(&self, campo: CampoLocalizacao) -> Option<i64> {
        match campo {
            CampoLocalizacao::SetorOrigem => self.setor_origem_id,
            CampoLocalizacao::LocalOrigem => self.local_origem_id,
            CampoLocalizacao::SetorDestino => self.setor_destino_id,
            CampoLocalizacao::LocalDestino => self.local_destino_id,
        }
    }

    /// Define um campo. Trocar um setor limpa o local dependente, já que
    /// os candidatos do local são função do setor escolhido.
    pub fn definir(&mut self, campo: CampoLocalizacao, valor: Option<i64>) {
        match campo {
            CampoLocalizacao::SetorOrigem => {
                self.setor_origem_id = valor;
                self.local_origem_id = None;
            }
            CampoLocalizacao::SetorDestino => {
                self.setor_destino_id = valor;
                self.local_destino_id = None;
            }
            CampoLocalizacao::LocalOrigem => self.local_origem_id = valor,
            CampoLocalizacao::LocalDestino => self.local_destino_id = valor,
        }
    }

    /// Descarta seleções de campos que deixaram de ser obrigatórios
    /// (acontece quando o usuário troca o tipo do lote).
    pub fn reter_apenas(&mut self, campos: &[CampoLocalizacao]) {
        for campo in TODOS_OS_CAMPOS {
            if !campos.contains(&campo) {
                match campo {
                    CampoLocalizacao::SetorOrigem => self.setor_origem_id = None,
                    CampoLocalizacao::LocalOrigem => self.local_origem_id = None,
                    CampoLocalizacao::SetorDestino => self.setor_destino_id = None,
                    CampoLocalizacao::LocalDestino => self.local_destino_id = None,
                }
            }
        }
    }

    /// Candidatos do seletor de local: apenas locais do setor escolhido.
    /// Sem setor selecionado, não há candidato válido.
    pub fn candidatos_local<'a>(
        &self,
        campo: CampoLocalizacao,
        locais: &'a [Local],
    ) -> Vec<&'a Local> {
        let Some(pai) = campo.setor_pai() else {
            return Vec::new();
        };
        match self.obter(pai) {
            Some(setor_id) => locais.iter().filter(|l| l.id_setor == setor_id).collect(),
            None => Vec::new(),
        }
    }

    /// Exatamente os campos da tabela de decisão devem estar preenchidos:
    /// faltando um, erro; sobrando um, erro também.
    pub fn validar(&self, nivel: NivelControle, tipo: TipoLote) -> Result<(), AppError> {
        let obrigatorios = campos_obrigatorios(nivel, tipo);

        for campo in &obrigatorios {
            if self.obter(*campo).is_none() {
                return Err(AppError::validacao(format!(
                    "O campo '{}' é obrigatório.",
                    campo.rotulo()
                )));
            }
        }

        for campo in TODOS_OS_CAMPOS {
            if !obrigatorios.contains(&campo) && self.obter(campo).is_some() {
                return Err(AppError::validacao(format!(
                    "O campo '{}' não se aplica a este lote.",
                    campo.rotulo()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CampoLocalizacao::*;

    fn local(id: i64, id_setor: i64) -> Local {
        Local {
            id,
            nome: format!("Local {id}"),
            id_setor,
        }
    }

    #[test]
    fn tabela_de_decisao_completa() {
        use NivelControle::*;
        use TipoLote::*;

        // CENTRAL: nenhum campo, para qualquer tipo.
        for tipo in [Entrada, Saida, Transferencia] {
            assert!(campos_obrigatorios(Central, tipo).is_empty());
        }

        assert_eq!(campos_obrigatorios(Setor, Entrada), vec![SetorDestino]);
        assert_eq!(campos_obrigatorios(Setor, Saida), vec![SetorOrigem]);
        assert_eq!(
            campos_obrigatorios(Setor, Transferencia),
            vec![SetorOrigem, SetorDestino]
        );

        assert_eq!(
            campos_obrigatorios(Local, Entrada),
            vec![SetorDestino, LocalDestino]
        );
        assert_eq!(
            campos_obrigatorios(Local, Saida),
            vec![SetorOrigem, LocalOrigem]
        );
        assert_eq!(
            campos_obrigatorios(Local, Transferencia),
            vec![SetorOrigem, LocalOrigem, SetorDestino, LocalDestino]
        );
    }

    #[test]
    fn trocar_setor_limpa_o_local_dependente() {
        let mut selecao = SelecaoLocalizacao::default();
        selecao.definir(SetorOrigem, Some(1));
        selecao.definir(LocalOrigem, Some(10));
        assert_eq!(selecao.local_origem_id, Some(10));

        selecao.definir(SetorOrigem, Some(2));
        assert_eq!(selecao.setor_origem_id, Some(2));
        assert_eq!(selecao.local_origem_id, None);
    }

    #[test]
    fn cascatas_de_origem_e_destino_sao_independentes() {
        let mut selecao = SelecaoLocalizacao::default();
        selecao.definir(SetorOrigem, Some(1));
        selecao.definir(LocalOrigem, Some(10));
        selecao.definir(SetorDestino, Some(2));
        selecao.definir(LocalDestino, Some(20));

        // Mexer no destino não pode afetar a origem.
        selecao.definir(SetorDestino, Some(3));
        assert_eq!(selecao.local_destino_id, None);
        assert_eq!(selecao.local_origem_id, Some(10));
    }

    #[test]
    fn candidatos_filtrados_pelo_setor() {
        let locais = vec![local(10, 1), local(11, 1), local(20, 2)];
        let mut selecao = SelecaoLocalizacao::default();

        // Sem setor: nenhum candidato.
        assert!(selecao.candidatos_local(LocalOrigem, &locais).is_empty());

        selecao.definir(SetorOrigem, Some(1));
        let candidatos = selecao.candidatos_local(LocalOrigem, &locais);
        assert_eq!(candidatos.len(), 2);
        assert!(candidatos.iter().all(|l| l.id_setor == 1));

        selecao.definir(SetorOrigem, Some(2));
        let candidatos = selecao.candidatos_local(LocalOrigem, &locais);
        assert_eq!(candidatos.len(), 1);
        assert_eq!(candidatos[0].id, 20);
    }

    #[test]
    fn validacao_exige_exatamente_os_campos_da_tabela() {
        let mut selecao = SelecaoLocalizacao::default();
        selecao.definir(SetorDestino, Some(1));

        // ENTRADA em nível LOCAL exige também o local de destino.
        let erro = selecao
            .validar(NivelControle::Local, TipoLote::Entrada)
            .unwrap_err();
        assert!(matches!(erro, AppError::Validation(_)));

        selecao.definir(LocalDestino, Some(10));
        assert!(
            selecao
                .validar(NivelControle::Local, TipoLote::Entrada)
                .is_ok()
        );

        // Campo sobrando também é rejeitado.
        selecao.definir(SetorOrigem, Some(2));
        assert!(
            selecao
                .validar(NivelControle::Local, TipoLote::Entrada)
                .is_err()
        );
    }

    #[test]
    fn nivel_central_nao_aceita_localizacao() {
        let selecao = SelecaoLocalizacao::default();
        assert!(
            selecao
                .validar(NivelControle::Central, TipoLote::Entrada)
                .is_ok()
        );

        let mut com_setor = SelecaoLocalizacao::default();
        com_setor.definir(SetorOrigem, Some(1));
        assert!(
            com_setor
                .validar(NivelControle::Central, TipoLote::Saida)
                .is_err()
        );
    }
}
