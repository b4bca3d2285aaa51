// src/config.rs

use std::{env, time::Duration};

/// Configuração do cliente, carregada uma única vez na inicialização.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL base do backend de estoque (ex: http://localhost:5000).
    pub backend_url: String,
    /// Timeout de cada chamada HTTP.
    pub http_timeout: Duration,
    /// Período de silêncio do debounce da busca de produtos.
    pub busca_quiet: Duration,
}

impl Config {
    // A assinatura retorna um Result: se a configuração falhar,
    // quem decide o que fazer é o chamador (no binário, abortar).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("BACKEND_URL")
            .map_err(|_| anyhow::anyhow!("BACKEND_URL deve ser definida"))?;

        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        // 300ms é o mesmo valor usado na tela original de lotes.
        let busca_quiet = env::var("BUSCA_QUIET_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(300));

        Ok(Self {
            backend_url,
            http_timeout,
            busca_quiet,
        })
    }
}
