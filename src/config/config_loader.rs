use anyhow::{Context, Result, bail};

use super::{
    config_model::{Database, DotEnvyConfig, RecordStore, Server, Supabase},
    stage::Stage,
};

/// Seconds an untouched payment form is kept before it is evicted.
pub const DEFAULT_FORM_IDLE_TIMEOUT: u64 = 30 * 60;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

/// Builds the configuration from any key lookup, so tests do not have to touch the
/// process environment.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key)
            .filter(|value| !value.trim().is_empty())
            .with_context(|| format!("{key} is invalid"))
    };

    let server = Server {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
        form_idle_timeout: lookup("FORM_IDLE_TIMEOUT")
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.parse())
            .transpose()
            .context("FORM_IDLE_TIMEOUT is invalid")?
            .unwrap_or(DEFAULT_FORM_IDLE_TIMEOUT),
    };

    let record_store = match lookup("RECORD_STORE")
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "postgres".to_string())
        .trim()
        .to_ascii_lowercase()
        .as_str()
    {
        "postgres" => RecordStore::Postgres(Database {
            url: required("DATABASE_URL")?,
        }),
        "supabase" => RecordStore::Supabase(Supabase {
            project_url: required("SUPABASE_PROJECT_URL")?,
            anon_key: required("SUPABASE_ANON_KEY")?,
            payment_table: lookup("SUPABASE_PAYMENT_TABLE")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "payment_submissions".to_string()),
        }),
        other => bail!("RECORD_STORE is invalid: {other} (expected postgres or supabase)"),
    };

    let stage = lookup("STAGE")
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| Stage::try_from(&raw))
        .transpose()
        .context("STAGE is invalid")?
        .unwrap_or_default();

    Ok(DotEnvyConfig {
        server,
        record_store,
        stage,
    })
}
