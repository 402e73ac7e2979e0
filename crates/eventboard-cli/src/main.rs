//! Eventboard CLI - Command-line dashboard over event and supplier data.

use clap::Parser;
use eventboard_cli::commands;
use eventboard_cli::{Cli, CliError, Clock, Command, Config, Formatter, JsonFileSource, Session};
use eventboard_views::DashboardViews;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr, RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> eventboard_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config, falling back to defaults when the file is absent
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    let data = cli.data.or_else(|| config.data_file.clone());
    let at = cli.at;
    let open = |config: &Config| -> eventboard_cli::Result<Session> {
        let path = data.clone().ok_or(CliError::NoDataFile)?;
        let views = DashboardViews::new(config.views.clone())?;
        Ok(Session::new(JsonFileSource::new(path), Clock::from_option(at), views))
    };

    let output = match cli.command {
        Command::NotifyStatus => commands::execute_notify_status(&config.effective_notifications(), &formatter)?,
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter)?,
        Command::InProgress => commands::execute_in_progress(&mut open(&config)?, &formatter)?,
        Command::Classify(args) => commands::execute_classify(args, &mut open(&config)?, &formatter)?,
        Command::Costs(args) => commands::execute_costs(args, &mut open(&config)?, &formatter)?,
        Command::Rating(args) => commands::execute_rating(args, &mut open(&config)?, &formatter)?,
        Command::Integrity => commands::execute_integrity(&mut open(&config)?, &formatter)?,
        Command::Watch(args) => {
            if let Some(interval) = args.interval {
                config.views.refresh_interval_secs = interval;
            }
            commands::execute_watch(args, open(&config)?, &formatter).await?;
            return Ok(());
        }
    };

    println!("{}", output);
    Ok(())
}
