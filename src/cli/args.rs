use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "ccf")]
#[command(about = "A chest-compression-fraction timer for CPR training")]
#[command(long_about = "ccf - chest compression fraction timer

Times a CPR scenario, splitting the session into compressions and
hands-off pauses. Each pause can be tagged with why it happened
(rhythm analysis, shock, airway, ...). Finished sessions are stored
locally and can be listed, reported on and replayed from scripts.

QUICK START:
  ccf run                         Live timer in the terminal
  ccf replay -e \"start; tick 30s; pause Shock; tick 5s; resume; tick 25s; end\"
  ccf history                     Recent sessions
  ccf report -p month             CCF report for this month

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  ccf <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output, or 'json' for
    /// machine-readable output. Defaults to `general.default_output`
    /// from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Data directory (default: ~/.ccf)
    #[arg(long, env = "CCF_HOME", global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the live timer
    ///
    /// Opens a full screen timer. Space starts or resumes compressions,
    /// p pauses, 1-9 tag the pause, e ends and saves the session.
    /// Press ? inside the timer for all keys.
    Run,

    /// Replay a scripted session
    ///
    /// Drives the timer from a script instead of the keyboard. One step
    /// per line (or separated by ';'):
    ///
    ///   start                   begin compressions
    ///   tick 30s                advance the clock (500ms, 1m30s, 12)
    ///   pause Shock, Airway     hands off, optional reasons
    ///   reason + Pulse Check    tag the open pause
    ///   reason - Shock          untag the open pause
    ///   resume                  compressions back on
    ///   end                     finish the session
    ///   reset                   discard and start over
    ///
    /// Reads FILE, the -e script, or stdin.
    ///
    /// # Examples
    ///
    ///   ccf replay drill.ccf
    ///   ccf replay -e "start; tick 1m; pause; tick 8s; resume; tick 1m; end" --save
    Replay(ReplayArgs),

    /// List recent sessions
    #[command(alias = "ls")]
    History {
        /// Number of sessions to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show a saved session with its pause log
    Show {
        /// Session ID
        id: i64,
    },

    /// Delete a saved session
    #[command(alias = "rm")]
    Delete {
        /// Session ID
        id: i64,
    },

    /// Delete every saved session
    Clear {
        /// Required; there is no undo
        #[arg(long)]
        force: bool,
    },

    /// Summarize sessions over a period
    ///
    /// Average, best and worst CCF, hands-off time and where it went.
    ///
    /// Periods: today, week, month, all
    Report {
        /// Period to report on
        #[arg(short, long, default_value = "week")]
        period: String,

        /// Passing CCF in percent (default: storage.target_ccf_percent)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        target: Option<u8>,
    },

    /// List the pause reasons offered by the timer
    Reasons,

    /// Show or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: ccf completions bash > ~/.bash_completion.d/ccf
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Show installation instructions instead
        #[arg(long, short = 'i')]
        install: bool,
    },
}

/// Arguments for `ccf replay`.
#[derive(Args)]
pub struct ReplayArgs {
    /// Script file to replay
    pub file: Option<PathBuf>,

    /// Inline script; steps may be separated by ';'
    #[arg(short = 'e', long = "script", conflicts_with = "file")]
    pub script: Option<String>,

    /// Save every ended session to history
    #[arg(long)]
    pub save: bool,

    /// Skip steps that are not allowed instead of failing
    #[arg(long)]
    pub lenient: bool,
}

/// Arguments for `ccf config`.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_defaults_to_config() {
        let cli = Cli::try_parse_from(["ccf", "history"]).unwrap();
        assert_eq!(cli.output, None);

        let cli = Cli::try_parse_from(["ccf", "history", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_replay_args() {
        let cli = Cli::try_parse_from(["ccf", "replay", "-e", "start; end", "--save"]).unwrap();
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.script.as_deref(), Some("start; end"));
        assert!(args.save);
        assert!(!args.lenient);
        assert!(args.file.is_none());
    }

    #[test]
    fn test_replay_file_conflicts_with_script() {
        assert!(Cli::try_parse_from(["ccf", "replay", "a.ccf", "-e", "start"]).is_err());
    }

    #[test]
    fn test_report_target_range() {
        assert!(Cli::try_parse_from(["ccf", "report", "--target", "101"]).is_err());
        let cli = Cli::try_parse_from(["ccf", "report", "-p", "month", "--target", "85"]).unwrap();
        let Commands::Report { period, target } = cli.command else {
            panic!("expected report");
        };
        assert_eq!(period, "month");
        assert_eq!(target, Some(85));
    }
}
