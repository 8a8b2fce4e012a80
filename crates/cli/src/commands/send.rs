use clap::Args;

use mailover::MailSender;
use mailover_core::Message;
use mailover_sendgrid::{SendGridChannel, SendGridConfig};
use mailover_smtp::{SmtpChannel, SmtpConfig};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Recipient address (repeat for multiple recipients).
    #[arg(long, required = true)]
    pub to: Vec<String>,
    /// Subject line.
    #[arg(long)]
    pub subject: Option<String>,
    /// Plain-text body.
    #[arg(long)]
    pub text: Option<String>,
    /// HTML body.
    #[arg(long)]
    pub html: Option<String>,
    /// Reply-To address.
    #[arg(long)]
    pub reply_to: Option<String>,
}

pub async fn run(
    smtp_config: Option<SmtpConfig>,
    sendgrid_config: Option<SendGridConfig>,
    default_from: Option<String>,
    args: &SendArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let default_from = default_from
        .ok_or_else(|| anyhow::anyhow!("no sender identity configured; set --from or MAIL_FROM"))?;

    let mut builder = MailSender::builder().default_from(default_from);
    if let Some(config) = smtp_config {
        builder = builder.primary(Box::new(SmtpChannel::new(config)?));
    }
    if let Some(config) = sendgrid_config {
        builder = builder.secondary(Box::new(SendGridChannel::new(config)));
    }
    let sender = builder.build()?;

    let message = Message {
        to: args.to.clone(),
        subject: args.subject.clone(),
        text: args.text.clone(),
        html: args.html.clone(),
        reply_to: args.reply_to.clone(),
        ..Message::default()
    };

    let delivery = sender.send(message).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&delivery)?);
        }
        OutputFormat::Text => {
            let id = delivery
                .message_id
                .as_deref()
                .map(|id| format!(" (message id {id})"))
                .unwrap_or_default();
            println!(
                "delivered via {} channel: {}{id}",
                delivery.channel, delivery.status
            );
        }
    }

    Ok(())
}
