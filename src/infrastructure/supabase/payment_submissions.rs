use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::error;
use url::Url;

use crate::{
    config::config_model::Supabase,
    domain::{
        entities::payment_submissions::{InsertPaymentSubmissionEntity, PaymentSubmissionEntity},
        repositories::payment_submissions::PaymentSubmissionRepository,
    },
};

/// Inserts submissions through the Supabase PostgREST endpoint of a project.
pub struct PaymentSubmissionSupabase {
    http: reqwest::Client,
    table_url: Url,
    api_key: String,
}

impl PaymentSubmissionSupabase {
    pub fn new(config: &Supabase) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            table_url: table_url(&config.project_url, &config.payment_table)?,
            api_key: config.anon_key.clone(),
        })
    }

    async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            response_body = %body,
            "supabase: insert request failed"
        );

        anyhow::bail!("Supabase insert failed (status {})", status);
    }
}

#[async_trait]
impl PaymentSubmissionRepository for PaymentSubmissionSupabase {
    async fn insert_submission(
        &self,
        submission: InsertPaymentSubmissionEntity,
    ) -> Result<PaymentSubmissionEntity> {
        let resp = self
            .http
            .post(self.table_url.clone())
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(&submission)
            .send()
            .await
            .context("supabase insert request could not be sent")?;
        let resp = Self::ensure_success(resp).await?;

        let mut rows: Vec<PaymentSubmissionEntity> = resp
            .json()
            .await
            .context("supabase insert returned an unexpected body")?;

        rows.pop()
            .ok_or_else(|| anyhow!("supabase insert returned no rows"))
    }
}

/// `{project_url}/rest/v1/{table}`, tolerant of a trailing slash on the project URL.
fn table_url(project_url: &str, table: &str) -> Result<Url> {
    let base = Url::parse(&format!("{}/", project_url.trim_end_matches('/')))
        .with_context(|| format!("SUPABASE_PROJECT_URL is not a valid URL: {project_url}"))?;
    base.join(&format!("rest/v1/{table}"))
        .context("failed to build Supabase table URL")
}
