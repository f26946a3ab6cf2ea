use crate::config::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub record_store: RecordStore,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// Request body limit in MiB.
    pub body_limit: u64,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Seconds before an untouched payment form is evicted.
    pub form_idle_timeout: u64,
}

#[derive(Debug, Clone)]
pub enum RecordStore {
    Postgres(Database),
    Supabase(Supabase),
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Supabase {
    pub project_url: String,
    pub anon_key: String,
    pub payment_table: String,
}
