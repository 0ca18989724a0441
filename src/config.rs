use std::env;
use anyhow::{bail, Context, Result};

/// Which key-value backend the service binds as its `kv` capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvBackend {
    Memory,
    Spanner,
}

impl KvBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(KvBackend::Memory),
            "spanner" => Ok(KvBackend::Spanner),
            other => bail!("KV_BACKEND must be 'memory' or 'spanner', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl SpannerConfig {
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub kv_backend: KvBackend,
    pub spanner: Option<SpannerConfig>,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kv_backend = KvBackend::parse(
            &lookup("KV_BACKEND").unwrap_or_else(|| "memory".to_string()),
        )?;

        // Spanner settings are only demanded when Spanner is the selected backend
        let spanner = match kv_backend {
            KvBackend::Memory => None,
            KvBackend::Spanner => {
                let required = |name: &str| {
                    lookup(name).with_context(|| {
                        format!("{} environment variable is required when KV_BACKEND=spanner", name)
                    })
                };

                Some(SpannerConfig {
                    emulator_host: lookup("SPANNER_EMULATOR_HOST"),
                    project: required("SPANNER_PROJECT")?,
                    instance: required("SPANNER_INSTANCE")?,
                    database: required("SPANNER_DATABASE")?,
                })
            }
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            kv_backend,
            spanner,
            service_port,
            service_host,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  KV backend: {:?}", self.kv_backend);
        if let Some(spanner) = &self.spanner {
            tracing::info!("  Spanner emulator: {}",
                spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
            tracing::info!("  Spanner database: {}", spanner.database_path());
        }
        tracing::info!("  Service listening on: {}", self.bind_address());
    }
}
