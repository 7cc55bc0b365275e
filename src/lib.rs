//! mealtally: meal registration tally bot
//!
//! Fetches per-person meal registrations from a Feishu Bitable table,
//! normalizes and deduplicates them into a per-meal headcount, and delivers
//! a formatted report (or a registration reminder) to a WeCom group
//! webhook.

pub mod cli;
pub mod config;
pub mod notify;
pub mod services;
pub mod source;
pub mod types;
