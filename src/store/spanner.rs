use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::mutation::insert_or_update;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::future::Future;
use std::sync::Arc;

use super::KvStore;
use crate::config::SpannerConfig;

const TABLE: &str = "kv_pairs";

const CREATE_TABLE_DDL: &str = r#"
CREATE TABLE kv_pairs (
    name STRING(MAX) NOT NULL,
    value STRING(MAX) NOT NULL,
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (name)
"#;

/// Key-value store backed by a single Spanner table
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
}

impl SpannerStore {
    /// Connect to the configured database, provisioning it first if needed.
    ///
    /// The gcloud-spanner library picks up `SPANNER_EMULATOR_HOST` on its own,
    /// so the same path serves both the emulator and production Spanner.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }
}

#[async_trait]
impl KvStore for SpannerStore {
    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();

        let mutation = insert_or_update(
            TABLE,
            &["name", "value", "updated_at"],
            &[&key, &value, &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write value to Spanner")?;

        tracing::debug!("Upserted key: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut statement = Statement::new("SELECT value FROM kv_pairs WHERE name = @name");
        statement.add_param("name", &key.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query value from Spanner")?;

        match result_set.next().await? {
            Some(row) => {
                let value: String = row.column_by_name("value")?;
                tracing::debug!("Read key: {}", key);
                Ok(Some(value))
            }
            None => {
                tracing::debug!("Key not found: {}", key);
                Ok(None)
            }
        }
    }
}

/// Create the instance, database and table when they don't exist yet
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    let instance_lookup = admin
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.clone(),
                field_mask: None,
            },
            None,
        )
        .await
        .map(|_| ());

    ensure_exists("Instance", &instance_path, instance_lookup, async {
        let request = CreateInstanceRequest {
            parent: project_path.clone(),
            instance_id: config.instance.clone(),
            instance: Some(Instance {
                name: instance_path.clone(),
                config: instance_config_path(config, &project_path),
                display_name: format!("{} instance", config.instance),
                node_count: 1,
                ..Default::default()
            }),
        };
        admin
            .instance()
            .create_instance(request, None)
            .await
            .context("Failed to start instance creation")?
            .wait(None)
            .await
            .context("Failed to create instance")?;
        Ok::<(), anyhow::Error>(())
    })
    .await?;

    let database_lookup = admin
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.clone(),
            },
            None,
        )
        .await
        .map(|_| ());

    ensure_exists("Database", &database_path, database_lookup, async {
        let request = CreateDatabaseRequest {
            parent: instance_path.clone(),
            create_statement: format!("CREATE DATABASE `{}`", config.database),
            extra_statements: vec![],
            encryption_config: None,
            database_dialect: 1, // Google Standard SQL
            proto_descriptors: vec![],
        };
        admin
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?
            .wait(None)
            .await
            .context("Failed to create database")?;
        Ok::<(), anyhow::Error>(())
    })
    .await?;

    ensure_table_exists(&admin, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Run `create` only when `lookup` reported the resource as missing
async fn ensure_exists<F>(
    kind: &str,
    path: &str,
    lookup: Result<(), Status>,
    create: F,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match lookup {
        Ok(()) => {
            tracing::info!("{} already exists: {}", kind, path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, path);
            create.await?;
            tracing::info!("{} created successfully: {}", kind, path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            kind.to_lowercase(),
            e.message()
        )),
    }
}

fn instance_config_path(config: &SpannerConfig, project_path: &str) -> String {
    if config.emulator_host.is_some() {
        format!("{}/instanceConfigs/emulator-config", project_path)
    } else {
        format!("{}/instanceConfigs/regional-us-central1", project_path)
    }
}

/// Whether any DDL statement creates exactly the key-value table
fn ddl_declares_table(statements: &[String]) -> bool {
    statements.iter().any(|stmt| {
        stmt.trim_start()
            .strip_prefix("CREATE TABLE")
            .and_then(|rest| {
                rest.trim_start()
                    .split(|c: char| c.is_whitespace() || c == '(')
                    .next()
            })
            .is_some_and(|name| name.trim_matches('`') == TABLE)
    })
}

async fn ensure_table_exists(admin: &AdminClient, database_path: &str) -> Result<()> {
    let ddl_response = admin
        .database()
        .get_database_ddl(
            GetDatabaseDdlRequest {
                database: database_path.to_string(),
            },
            None,
        )
        .await
        .context("Failed to get database DDL")?;

    if ddl_declares_table(&ddl_response.into_inner().statements) {
        tracing::info!("Table '{}' already exists", TABLE);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", TABLE);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![CREATE_TABLE_DDL.trim().to_string()],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    admin
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", TABLE);
    Ok(())
}
