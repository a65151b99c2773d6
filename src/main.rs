use anyhow::Context;
use arrondissement::core::ConfigProvider;
use arrondissement::utils::error::{ErrorSeverity, LocatorError};
use arrondissement::utils::{logger, validation::Validate};
use arrondissement::{engine_from_config, CliConfig, DistrictResolver, LookupState, TomlConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting arrondissement lookup");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Some(postal_code) = &cli.postal_code {
        let district = DistrictResolver::new(cli.range_policy()).resolve(Some(postal_code.as_str()));
        match district {
            Some(district) => println!("Arrondissement {}", district),
            None => println!("Not in Paris?\nPostal Code: {}", postal_code),
        }
        return Ok(());
    }

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    cli.apply_to(&mut config);
                    lookup(&config).await
                }
                Err(e) => Err(e),
            }
        }
        None => lookup(&cli).await,
    };

    match outcome {
        Ok(state) => {
            if cli.json {
                let body = serde_json::to_string_pretty(&state)
                    .context("failed to serialize lookup state")?;
                println!("{}", body);
            } else {
                println!("{}", state);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn lookup<C: ConfigProvider + Validate>(config: &C) -> Result<LookupState, LocatorError> {
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    let engine = engine_from_config(config)?;
    Ok(engine.refresh().await)
}
