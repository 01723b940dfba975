use anyhow::Context;
use clap::Parser;
use draftmail::utils::{logger, validation::Validate};
use draftmail::{AppConfig, CliArgs, GroqClient};

/// 逐一呼叫每個設定的模型，列出可用與失敗的模型
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();
    logger::init_cli_logger(args.verbose);

    let config = AppConfig::load(&args).context("loading configuration")?;
    config.validate().context("validating configuration")?;
    let client = GroqClient::from_settings(&config.completion)?;

    println!(
        "🧪 Probing {} model(s) at {}",
        config.completion.models.len(),
        config.completion.base_url
    );

    let mut available = 0;
    for model in &config.completion.models {
        match client.probe(model).await {
            Ok(()) => {
                available += 1;
                println!("  ✅ {}", model);
            }
            Err(e) => println!("  ❌ {}: {} ({})", model, e, e.kind()),
        }
    }

    println!(
        "📊 {}/{} model(s) available",
        available,
        config.completion.models.len()
    );

    if available == 0 {
        anyhow::bail!("no configured model answered");
    }
    Ok(())
}
