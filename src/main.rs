use clap::Parser;
use draftmail::config::mask_secret;
use draftmail::http::serve::serve;
use draftmail::utils::{logger, validation::Validate};
use draftmail::{
    build_router, AppConfig, AppState, CliArgs, FallbackOrchestrator, GroqClient, Result,
    SmtpMailTransport,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // .env 需在解析參數前載入，clap 才讀得到
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    if let Err(e) = run(args).await {
        tracing::error!("❌ FATAL ERROR: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load(&args)?;
    config.validate()?;
    tracing::debug!("Config: {:?}", config);

    log_banner(&config);

    let provider = Arc::new(GroqClient::from_settings(&config.completion)?);
    let mailer = Arc::new(SmtpMailTransport::from_settings(&config.mail)?);

    if !args.skip_probe {
        if let Some(model) = config.completion.models.first().cloned() {
            let provider = provider.clone();
            tokio::spawn(async move {
                tracing::info!("🧪 Testing Groq API connection...");
                match provider.probe(&model).await {
                    Ok(()) => tracing::info!("✅ Groq API connection successful"),
                    Err(e) => tracing::error!("❌ Groq API test failed: {}", e),
                }
            });
        }
    }

    let orchestrator = FallbackOrchestrator::new(provider, config.completion.models.clone());
    let state = AppState::new(orchestrator, mailer);
    let router = build_router(state, config.server.cors_header()?);

    serve(config.server.socket_addr()?, router).await?;
    Ok(())
}

fn log_banner(config: &AppConfig) {
    let key = config
        .completion
        .api_key
        .as_deref()
        .map(mask_secret)
        .unwrap_or_else(|| "Not set".to_string());
    let email_user = config
        .mail
        .username
        .as_deref()
        .unwrap_or("❌ Not set");

    tracing::info!("----------------------------------------");
    tracing::info!("🚀 Starting draftmail on port {}", config.server.port);
    tracing::info!("🔑 Groq API key: {}", key);
    tracing::info!("🤖 Models: {}", config.completion.models.join(", "));
    tracing::info!("📧 Email user: {}", email_user);
    tracing::info!("🌐 CORS origin: {}", config.server.cors_origin);
    tracing::info!("----------------------------------------");
}
