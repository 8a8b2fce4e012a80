//! Mailover CLI
//!
//! A command-line interface for sending mail through the failover sender
//! and probing the configured delivery channels.

mod commands;

use clap::{Parser, Subcommand};
use mailover_sendgrid::SendGridConfig;
use mailover_smtp::SmtpConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// Mailover CLI: send mail with primary/secondary channel failover.
#[derive(Parser, Debug)]
#[command(name = "mailover", version, about)]
struct Cli {
    /// SMTP server hostname for the primary channel.
    #[arg(long, env = "SMTP_HOST", global = true)]
    smtp_host: Option<String>,

    /// SMTP server port.
    #[arg(long, env = "SMTP_PORT", default_value_t = 587, global = true)]
    smtp_port: u16,

    /// SMTP username.
    #[arg(long, env = "SMTP_USERNAME", global = true)]
    smtp_username: Option<String>,

    /// SMTP password or app password.
    #[arg(long, env = "SMTP_PASSWORD", global = true)]
    smtp_password: Option<String>,

    /// SendGrid API key for the secondary channel.
    #[arg(long, env = "SENDGRID_API_KEY", global = true)]
    sendgrid_api_key: Option<String>,

    /// Sender identity applied to messages without an explicit From.
    #[arg(long, env = "MAIL_FROM", global = true)]
    from: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify connectivity and credentials of the configured channels.
    Probe(commands::probe::ProbeArgs),
    /// Send a message through the failover sender.
    Send(commands::send::SendArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let smtp_config = cli.smtp_host.as_ref().map(|host| {
        let mut config = SmtpConfig::new(host).with_port(cli.smtp_port);
        if let (Some(user), Some(pass)) = (&cli.smtp_username, &cli.smtp_password) {
            config = config.with_credentials(user, pass);
        }
        config
    });
    let sendgrid_config = cli.sendgrid_api_key.as_ref().map(SendGridConfig::new);

    match cli.command {
        Command::Probe(args) => commands::probe::run(smtp_config, sendgrid_config, &args).await,
        Command::Send(args) => {
            commands::send::run(smtp_config, sendgrid_config, cli.from, &args, &cli.format).await
        }
    }
}
