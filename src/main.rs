mod audit;
mod classify;
mod config;
mod gmail;
mod logging;
mod message;
mod paths;
mod prompt;
mod sanitize;
mod sweep;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::audit::AuditLog;
use crate::classify::hosted::HostedBackend;
use crate::classify::local::LocalBackend;
use crate::classify::Classifier;
use crate::config::Profile;
use crate::gmail::GmailClient;

fn main() {
    if let Err(e) = real_main() {
        // Keep stderr noisy for cron mail / shell runs; logs also go to file.
        eprintln!("[mailsweep] fatal error: {e:?}");
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    logging::init_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let profile_path = read_arg_value(&args, "--config").unwrap_or_else(|| "config.json".to_string());
    let profile = Profile::load(Path::new(&profile_path))?;
    log::info!(
        "Loaded profile for {} {} ({} hobbies, {} not-delete entries)",
        profile.user_first_name,
        profile.user_last_name,
        profile.hobbies.len(),
        profile.not_delete.len()
    );

    let system_prompt = prompt::system_prompt(&profile);

    let api_key = require_env(config::env::HOSTED_API_KEY)?;
    let gmail_token = require_env(config::env::GMAIL_TOKEN)?;

    let hosted = HostedBackend::new(
        &env_or(config::env::HOSTED_BASE_URL, config::hosted::DEFAULT_BASE_URL),
        api_key,
        env_or(config::env::HOSTED_MODEL, config::hosted::DEFAULT_MODEL),
    );
    let local = LocalBackend::new(
        &env_or(config::env::LOCAL_BASE_URL, config::local::DEFAULT_BASE_URL),
        env_or(config::env::LOCAL_MODEL, config::local::DEFAULT_MODEL),
    );

    let audit = AuditLog::new(audit_dir()?)?;
    let classifier = Classifier::new(system_prompt, Box::new(hosted), Box::new(local), audit);
    let mailbox = GmailClient::new(&gmail_token);

    let stats = sweep::run_sweep(&mailbox, &classifier);
    log::info!(
        "Sweep complete: {} pages, {} messages seen, {} trashed, {} skipped",
        stats.pages,
        stats.seen,
        stats.trashed,
        stats.skipped
    );

    Ok(())
}

fn audit_dir() -> anyhow::Result<PathBuf> {
    paths::ensure_home_subdir(config::audit::AUDIT_DIR_REL)
        .context("cannot prepare audit directory")
}

fn read_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn require_env(key: &str) -> anyhow::Result<String> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => bail!("required environment variable {key} is not set"),
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
