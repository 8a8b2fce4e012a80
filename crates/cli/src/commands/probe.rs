use clap::Args;

use mailover_core::Channel;
use mailover_sendgrid::{SendGridChannel, SendGridConfig};
use mailover_smtp::{SmtpChannel, SmtpConfig};

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Probe only the SMTP channel.
    #[arg(long)]
    pub smtp: bool,
    /// Probe only the SendGrid channel.
    #[arg(long)]
    pub sendgrid: bool,
}

pub async fn run(
    smtp_config: Option<SmtpConfig>,
    sendgrid_config: Option<SendGridConfig>,
    args: &ProbeArgs,
) -> anyhow::Result<()> {
    // With no selector flags, probe everything that is configured.
    let probe_all = !args.smtp && !args.sendgrid;
    let mut probed = 0usize;
    let mut failures = 0usize;

    if args.smtp || probe_all {
        if let Some(config) = smtp_config {
            probed += 1;
            match probe_smtp(config).await {
                Ok(()) => println!("smtp: ok"),
                Err(e) => {
                    eprintln!("smtp: {e}");
                    failures += 1;
                }
            }
        } else if args.smtp {
            anyhow::bail!("no SMTP channel configured; set --smtp-host or SMTP_HOST");
        }
    }

    if args.sendgrid || probe_all {
        if let Some(config) = sendgrid_config {
            probed += 1;
            match SendGridChannel::new(config).verify().await {
                Ok(()) => println!("sendgrid: ok"),
                Err(e) => {
                    eprintln!("sendgrid: {e}");
                    failures += 1;
                }
            }
        } else if args.sendgrid {
            anyhow::bail!(
                "no SendGrid channel configured; set --sendgrid-api-key or SENDGRID_API_KEY"
            );
        }
    }

    if probed == 0 {
        anyhow::bail!("no delivery channel configured");
    }
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

async fn probe_smtp(config: SmtpConfig) -> Result<(), mailover_core::ChannelError> {
    SmtpChannel::new(config)?.verify().await
}
