use crate::config::AppConfig;
use crate::core::format::NumberFormat;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "campaign-kit")]
#[command(about = "Benefit-text cleanup and count-up rendering for donation campaigns")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Normalize double-encoded text values
    Clean(CleanArgs),
    /// Render a count-up animation to the terminal
    CountUp(CountUpArgs),
    /// Clean text fields of campaign records from a file or endpoint
    Cleanup(CleanupArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    /// Values to clean; reads one value per line from stdin when empty
    pub values: Vec<String>,

    /// Parse each value as JSON before cleaning
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Print pass count and convergence next to each result
    #[arg(long)]
    pub report: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CountUpArgs {
    #[arg(allow_negative_numbers = true)]
    pub target: f64,

    #[arg(long)]
    pub duration_ms: Option<f64>,

    /// Show the final value immediately
    #[arg(long)]
    pub no_animate: bool,

    #[arg(long, value_enum)]
    pub format: Option<NumberFormat>,

    #[arg(long)]
    pub frame_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct CleanupArgs {
    /// JSON file path or http(s) URL
    #[arg(long)]
    pub source: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub output_formats: Vec<String>,

    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Clean and summarize without writing output files
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(max_iterations) = self.max_iterations {
            config.normalizer.max_iterations = max_iterations;
        }
    }
}

impl CountUpArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(duration_ms) = self.duration_ms {
            config.count_up.duration_ms = duration_ms;
        }
        if self.no_animate {
            config.count_up.enabled = false;
        }
        if let Some(format) = self.format {
            config.count_up.format = format;
        }
        if let Some(interval) = self.frame_interval_ms {
            config.count_up.frame_interval_ms = interval;
        }
    }
}

impl CleanupArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(source) = &self.source {
            config.cleanup.source = Some(source.clone());
        }
        if !self.fields.is_empty() {
            config.cleanup.fields = self.fields.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.cleanup.output_path = output_path.clone();
        }
        if !self.output_formats.is_empty() {
            config.cleanup.output_formats = self.output_formats.clone();
        }
        if let Some(max_iterations) = self.max_iterations {
            config.normalizer.max_iterations = max_iterations;
        }
    }
}
