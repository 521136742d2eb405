use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = daydash::cli::Cli::parse();

    if let Some(directive) = &cli.log_filter {
        daydash::commands::init_tracing(directive)?;
    }

    match cli.command.clone() {
        Some(daydash::cli::CliCommand::Tui) | None => {
            let config = daydash::config::from_cli(&cli)?;
            daydash::tui::run(config)?;
        }
        Some(command) => {
            let config = daydash::config::from_cli(&cli)?;
            let stdout = std::io::stdout();
            let handle = stdout.lock();
            daydash::commands::execute(&config, command, handle)?;
        }
    }

    Ok(())
}
