use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::SmtpSecurity;

#[derive(Debug, Parser)]
#[command(
    name = "ses",
    version,
    about = "Report suspicious email to a collection mailbox or threat-intelligence server"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Use this directory as the profile directory")]
    pub profile_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = NotifyMode::Console,
        help = "Where to show notifications"
    )]
    pub notify: NotifyMode,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum NotifyMode {
    Console,
    Desktop,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit the given messages as suspicious
    Report(ReportArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(help = "Raw message files (.eml); `-` reads one message from stdin")]
    pub messages: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the active configuration
    Show,
    /// Choose a new configuration file and keep it in the profile
    Choose(ChooseArgs),
    /// Set the outgoing mail server used for mailto destinations
    Smtp(SmtpArgs),
}

#[derive(Debug, Args)]
pub struct ChooseArgs {
    #[arg(help = "Configuration file (*.json); prompts when omitted")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SmtpArgs {
    #[arg(long, help = "SMTP server host")]
    pub host: Option<String>,
    #[arg(long, help = "SMTP server port")]
    pub port: Option<u16>,
    #[arg(long, value_enum, help = "Connection security")]
    pub security: Option<SmtpSecurity>,
    #[arg(long, help = "SMTP username")]
    pub username: Option<String>,
    #[arg(long, help = "Prompt for the SMTP password")]
    pub ask_password: bool,
    #[arg(long, help = "Sender address for forwarded reports")]
    pub sender: Option<String>,
    #[arg(long, help = "Network timeout in seconds")]
    pub timeout_secs: Option<u64>,
}
