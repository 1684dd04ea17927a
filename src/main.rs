use claims_translator::{build_service, run_job, AppConfig, DEFAULT_CONFIG_FILE};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let explicit_path = args.get(1).map(|s| s.as_str());

    let config = AppConfig::load_for_cli(explicit_path)?;
    init_logging(&config)?;

    tracing::info!(
        config = %explicit_path.unwrap_or(DEFAULT_CONFIG_FILE),
        input = %config.job.input_file.display(),
        output = %config.job.output_file.display(),
        "Loaded configuration"
    );

    config.validate()?;
    let service = build_service(&config.service)?;
    let summary = run_job(&config, service).await?;

    tracing::info!(
        rows = summary.total_rows,
        batches = summary.batches.len(),
        translated = summary.translated(),
        kept = summary.kept(),
        failed_rows = summary.failed_row_count(),
        failed_chunks = summary.failed_chunks(),
        "Done"
    );

    Ok(())
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("claims_translator={}", config.logging.level).parse()?);

    let json = config.logging.format.eq_ignore_ascii_case("json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let pretty_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();

    Ok(())
}
