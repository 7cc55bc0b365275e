//! Command-line interface and run orchestration

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{Config, Mode};
use crate::notify::{md_report, mention_text, remind_text, WecomWebhook};
use crate::services::{add_prefill_date, Aggregator};
use crate::source::BitableSource;

/// Meal registration tally bot
#[derive(Parser)]
#[command(name = "mealtally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the registration reminder for the target date
    Remind,

    /// Fetch registrations and send the headcount report
    Report {
        /// Served date override (YYYY-MM-DD); defaults to today in the
        /// configured timezone, useful for reruns
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    /// Resolve the mode (subcommand wins over the `MODE` variable) and run.
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::from_env()?;
        match self.command {
            Some(Commands::Remind) => run_remind(&config),
            Some(Commands::Report { date }) => run_report(&config, date),
            None => match config.mode {
                Mode::Remind => run_remind(&config),
                Mode::Report => run_report(&config, None),
            },
        }
    }
}

fn run_remind(config: &Config) -> anyhow::Result<()> {
    let target_date = config.target_date();
    let link = if config.form_url.is_empty() {
        None
    } else {
        Some(add_prefill_date(
            &config.form_url,
            target_date,
            config.lock_date,
        ))
    };

    let webhook = WecomWebhook::new(&config.webhook_url)?;
    webhook.send_text(
        &remind_text(target_date, &config.deadline_hhmm, link.as_deref(), config.limits),
        &[],
    )?;
    info!(date = %target_date, "reminder sent");
    Ok(())
}

fn run_report(config: &Config, date_override: Option<NaiveDate>) -> anyhow::Result<()> {
    let kind = config.meal_kind;
    let served_date = date_override.unwrap_or_else(|| config.target_date());
    let base_date = kind
        .base_for(served_date)
        .context("served date is outside the supported calendar range")?;

    let credentials = config.bitable_credentials()?;
    let source = BitableSource::new(&credentials.app_token, &credentials.table_id)?;
    let token = source.tenant_token(&credentials.app_id, &credentials.app_secret)?;
    let records = source.list_by_base_date(&token, base_date)?;
    info!(count = records.len(), base = %base_date, "records fetched");

    let entries = Aggregator::index_latest(&records, config.limits);
    let headcount = Aggregator::sum_for(kind, served_date, &entries);

    let webhook = WecomWebhook::new(&config.webhook_url)?;
    if !config.mention_userids.is_empty() {
        webhook.send_text(
            &mention_text(served_date, kind, headcount),
            &config.mention_userids,
        )?;
    }
    webhook.send_markdown(&md_report(served_date, kind, headcount, config.limits))?;
    info!(
        meal = kind.as_str(),
        served = %served_date,
        adults = headcount.adults,
        children = headcount.children,
        "report sent"
    );
    Ok(())
}
