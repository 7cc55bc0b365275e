//! Notification sink: WeCom group-robot webhook delivery and formatting

mod message;
mod wecom;

pub use message::{md_report, mention_text, remind_text};
pub use wecom::WecomWebhook;
