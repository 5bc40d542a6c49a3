use anyhow::{bail, Context, Result};
use bgw_exporter::{logging, platform, AppConfig, Collector, Service};
use std::{path::PathBuf, sync::Arc};

#[derive(Debug)]
struct Cli {
    config_path: Option<PathBuf>,
    once: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);
        let mut config_path: Option<PathBuf> = None;
        let mut once = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                    config_path = Some(value.into());
                }
                "--once" => once = true,
                "--help" | "-h" => {
                    println!(
                        "Usage: bgw-exporter [--config <path>] [--once]\n\
                         --config <path>   Path to TOML configuration (default: {} when present)\n\
                         --once            Run one collection cycle, print the metrics and exit\n\
                         \n\
                         Environment: ROUTER_ADDR (gateway address), ADDR (listen address), PORT (listen port)",
                        AppConfig::default_path()
                    );
                    std::process::exit(0);
                }
                other => bail!("unknown argument '{other}'"),
            }
        }

        Ok(Self { config_path, once })
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse()?;
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load_or_default(cli.config_path.as_deref())
        .context("unable to load configuration")?;
    config.apply_env(|key| std::env::var(key).ok())?;

    logging::init(&config.log_level)?;
    platform::log_platform_guidance();

    let collector = Arc::new(Collector::from_config(&config)?);

    if cli.once {
        let body = collector
            .scrape()
            .await
            .with_context(|| format!("scrape of {} failed", collector.router_url()))?;
        print!("{body}");
        Ok(())
    } else {
        Service::new(config, collector).run().await
    }
}
