use anyhow::Context;
use campaign_kit::app::commands;
use campaign_kit::config::{Cli, Command};
use campaign_kit::utils::error::{ErrorSeverity, KitError};
use campaign_kit::utils::{logger, validation::Validate};
use campaign_kit::AppConfig;
use clap::Parser;
use std::io::BufRead;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path).unwrap_or_else(|e| exit_with(&e))
        }
        None => AppConfig::default(),
    };

    match &cli.command {
        Command::Clean(args) => {
            args.apply(&mut config);
            validate_or_exit(&config);

            let inputs = if args.values.is_empty() {
                read_stdin_lines()?
            } else {
                args.values.clone()
            };
            let stdout = std::io::stdout();
            commands::run_clean(args, &config, &inputs, &mut stdout.lock())
                .unwrap_or_else(|e| exit_with(&e));
        }
        Command::CountUp(args) => {
            args.apply(&mut config);
            validate_or_exit(&config);

            let mut stdout = std::io::stdout();
            commands::run_count_up(args.target, &config, &mut stdout)
                .await
                .unwrap_or_else(|e| exit_with(&e));
        }
        Command::Cleanup(args) => {
            args.apply(&mut config);
            validate_or_exit(&config);
            tracing::debug!("Cleanup config: {:?}", config.cleanup);

            let outputs = commands::run_cleanup(config, args.dry_run)
                .await
                .unwrap_or_else(|e| exit_with(&e));
            if !outputs.is_empty() {
                println!("✅ Benefit cleanup completed successfully!");
                for path in outputs {
                    println!("📁 {}", path);
                }
            }
        }
    }

    Ok(())
}

fn read_stdin_lines() -> anyhow::Result<Vec<String>> {
    std::io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .context("failed to read values from stdin")
}

fn validate_or_exit(config: &AppConfig) {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }
}

fn exit_with(e: &KitError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
