use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scoutline", version, about = "Automated vulnerability-assessment orchestration engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scan against one target
    Run(RunArgs),
    /// Print the tool-availability table and exit
    CheckTools,
    /// Validate a user-supplied tool-registration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Target web application: root domain, subdomain, IP, or URL with scheme
    pub target: String,

    /// Output directory for scan artefacts (default: scan_results_<target>_<timestamp>/)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Do not attempt to install missing tools; treat absent tools as BLOCKED(tool_not_installed)
    #[arg(long)]
    pub skip_install: bool,

    /// Global wall-clock runtime budget in seconds (default 1800, overridable in config)
    #[arg(long)]
    pub runtime_budget: Option<u64>,

    /// Worker pool size per phase (default 4, overridable in config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Also emit the derived security_report.html alongside execution_report.json
    #[arg(long)]
    pub emit_html: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Tool-registration file to validate (JSON: tool_name -> {command_template, install_hint, verify_command, category})
    pub tools_file: String,
}
