use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada ação do usuário termina aqui de forma atômica: ou aplica tudo, ou nada.
#[derive(Debug, Error)]
pub enum AppError {
    // Erro detectado no cliente, antes de qualquer chamada ao backend.
    #[error("Erro de validação: {0}")]
    Validation(String),

    // Validação estrutural dos payloads (via `validator`).
    #[error("Um ou mais campos são inválidos")]
    InvalidPayload(#[from] validator::ValidationErrors),

    // O backend respondeu com status de erro. A mensagem do campo `erro`
    // do corpo é repassada ao usuário sem alteração.
    #[error("{0}")]
    Backend(String),

    // A chamada nem chegou ao backend (rede fora, timeout, DNS...).
    // O detalhe técnico fica no campo; o usuário vê a mensagem genérica.
    #[error("Não foi possível conectar ao servidor")]
    Network(String),

    // Referência local a algo que não existe nos dados carregados.
    #[error("{0} não encontrado")]
    NotFound(String),
}

impl AppError {
    pub fn validacao(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Mensagem pronta para exibição ao usuário.
    pub fn mensagem_usuario(&self) -> String {
        self.to_string()
    }
}
