use corpus_wrangler::cli::Cli;
use corpus_wrangler::config::Config;
use corpus_wrangler::loader::ServiceLoader;
use corpus_wrangler::logging::{Logging, log_startup};
use corpus_wrangler::supervisor::Supervisor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cli.validate()?;

    let config = Config::from_cli(&cli);
    let logging = Logging::init(cli.debug, cli.enable_otel_logs)?;
    log_startup(&config, cli.debug);

    let mut supervisor = Supervisor::new(ServiceLoader::default(), logging);
    supervisor.run(&config).await?;

    Ok(())
}
