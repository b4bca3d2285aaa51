//src/main.rs

use std::sync::Arc;

use lotes_client::api::BackendClient;
use lotes_client::config::Config;
use lotes_client::models::lote::NivelControle;
use lotes_client::services::lote_service::LoteController;

// Binário de verificação: conecta no backend configurado e abre uma
// sessão de lote, reportando o nível de controle e os dados de
// referência carregados.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: sem configuração válida não há o que fazer.
    let config = Config::from_env().expect("Falha ao carregar a configuração.");
    let client = BackendClient::new(&config).expect("Falha ao montar o cliente HTTP.");

    let controller = LoteController::iniciar_sessao(Arc::new(client), config.busca_quiet)
        .await
        .expect("Falha ao abrir a sessão de lote no backend.");

    tracing::info!("✅ Conectado ao backend em {}", config.backend_url);
    match controller.nivel() {
        NivelControle::Central => {
            tracing::info!("Nível CENTRAL: estoque único, sem campos de localização.")
        }
        nivel => tracing::info!(
            "Nível {:?}: {} setor(es) de referência carregado(s).",
            nivel,
            controller.setores().len()
        ),
    }
}
