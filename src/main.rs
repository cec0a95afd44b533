use clap::Parser;
use colored::Colorize;

use ccf_timer::cli::args::{Cli, Commands};
use ccf_timer::cli::commands;
use ccf_timer::config::{ColorSetting, Config, Paths};
use ccf_timer::error::CcfError;
use ccf_timer::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CcfError> {
    let cli = Cli::parse();
    let paths = Paths::resolve(cli.home)?;
    let config = Config::load_from_path(&paths.config_file)?;
    let format = cli.output.unwrap_or(config.general.default_output);
    let target = config.storage.target_ccf_percent;

    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    // The TUI owns the terminal, so its logs go to a file
    if matches!(cli.command, Commands::Run) {
        paths.ensure_dirs()?;
        logging::init(&config.general.log_level, LogTarget::File(&paths.log_file))?;
    } else {
        logging::init(&config.general.log_level, LogTarget::Stderr)?;
    }

    let output = match cli.command {
        Commands::Run => {
            let store = commands::open_store(&paths, &config)?;
            ccf_timer::tui::run(&config, store)?;
            String::new()
        }
        Commands::Replay(args) => commands::replay(&args, &paths, &config, format)?,
        Commands::History { limit } => {
            let store = commands::open_store(&paths, &config)?;
            commands::history(&store, limit, target, format)?
        }
        Commands::Show { id } => {
            let store = commands::open_store(&paths, &config)?;
            commands::show(&store, id, target, format)?
        }
        Commands::Delete { id } => {
            let store = commands::open_store(&paths, &config)?;
            commands::delete(&store, id, format)?
        }
        Commands::Clear { force } => {
            let store = commands::open_store(&paths, &config)?;
            commands::clear(&store, force, format)?
        }
        Commands::Report { period, target: pct } => {
            let store = commands::open_store(&paths, &config)?;
            commands::report(&store, &period, pct.unwrap_or(target), format)?
        }
        Commands::Reasons => commands::reasons(&config, format)?,
        Commands::Config(args) => commands::config(&args.command, &paths, &config, format)?,
        Commands::Completions { shell, install } => commands::completions(shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
