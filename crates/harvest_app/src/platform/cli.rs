use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use harvest_logging::LogDestination;
use log::LevelFilter;

use super::config::{FetchMode, HarvestConfig};
use super::session::SessionTarget;

/// Scrolls a lazily loaded conversation list to its end, then opens every
/// entry from the bottom up and saves its page and uploaded images.
#[derive(Debug, Parser)]
#[command(name = "harvest", version)]
pub struct Cli {
    /// RON config file. Missing means built-in defaults.
    #[arg(long, value_name = "FILE", default_value = "harvest.ron")]
    pub config: PathBuf,

    /// Attach to a running browser through its DevTools websocket.
    #[arg(long, value_name = "WS_URL", conflicts_with = "launch")]
    pub connect: Option<String>,

    /// Launch a visible browser instead of attaching to one.
    #[arg(long)]
    pub launch: bool,

    /// Page to open when no existing tab matches.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Pick the first open tab whose URL contains this text.
    #[arg(long, value_name = "TEXT")]
    pub page_match: Option<String>,

    /// Directory that receives the snapshots and images.
    #[arg(long, short, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "N")]
    pub stall_threshold: Option<u32>,

    /// Wait after opening an item before capturing it.
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    #[arg(long, value_enum)]
    pub fetch: Option<FetchMode>,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    #[arg(long, value_name = "FILE", default_value = "harvest.log")]
    pub log_file: PathBuf,

    /// Log every scroll tick and file write.
    #[arg(long, short)]
    pub verbose: bool,

    /// Write the effective config to FILE and exit.
    #[arg(long, value_name = "FILE")]
    pub dump_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// The browser to drive. `None` when neither `--connect` nor `--launch` was given.
    pub fn session_target(&self) -> Option<SessionTarget> {
        if self.launch {
            Some(SessionTarget::Launch)
        } else {
            self.connect.clone().map(SessionTarget::Connect)
        }
    }

    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, config: &mut HarvestConfig) {
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(threshold) = self.stall_threshold {
            config.timings.stall_threshold = threshold;
        }
        if let Some(settle) = self.settle_ms {
            config.timings.settle_delay_ms = settle;
        }
        if let Some(mode) = self.fetch {
            config.fetch.mode = mode;
        }
    }
}
