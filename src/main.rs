use anyhow::{Context, Result};
use clap::Parser;
use mockmate::{create_router, AppState, Config, InterviewService, UploadStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mockmate-server", about = "Mock interview backend")]
struct Cli {
    /// Config file path without extension
    #[arg(long, default_value = "config/mockmate")]
    config: String,

    /// Port override (takes precedence over PORT and the config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("MOCKMATE_ENV").as_deref() != Ok("production") {
        dotenvy::dotenv().ok();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut cfg = Config::load(&cli.config).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Transcription: {} ({})", cfg.transcription.model, cfg.transcription.base_url);
    info!("Chat model: {} ({})", cfg.chat.model, cfg.chat.base_url);
    info!("Voice: {} / {}", cfg.speech.model, cfg.speech.voice_id);

    let uploads = UploadStore::new(&cfg.uploads.dir).context("Failed to prepare upload directory")?;
    let service = InterviewService::from_config(&cfg);
    let state = AppState::new(service, uploads, cfg.service.http.max_upload_bytes);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("{} server started on {}", cfg.service.name, addr);

    axum::serve(listener, app).await?;

    Ok(())
}
