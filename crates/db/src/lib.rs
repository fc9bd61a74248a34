//! MongoDB client factory and the `db` core module.

use anyhow::Context;
use async_trait::async_trait;
use bson::doc;
use mongodb::{options::ClientOptions, Client, Database};
use shelf_kernel::{settings::DatabaseSettings, InitCtx, Module};

const APP_NAME: &str = "shelf";

/// Open a MongoDB client for the configured URI and select the catalog database.
///
/// The driver connects lazily; call [`ping`] to verify the server is reachable.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<(Client, Database)> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .with_context(|| "failed to parse MongoDB connection string")?;
    options.app_name = Some(APP_NAME.to_string());

    let client = Client::with_options(options).with_context(|| "failed to create MongoDB client")?;
    let database = client.database(&settings.name);

    tracing::info!(
        target: "shelf-db",
        database = %settings.name,
        "MongoDB client created"
    );

    Ok((client, database))
}

/// Round-trip a `ping` command to the server.
pub async fn ping(database: &Database) -> mongodb::error::Result<()> {
    database.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// Core module owning the MongoDB client for the lifetime of the process
pub struct DatabaseModule {
    client: Client,
    database: Database,
}

impl DatabaseModule {
    pub fn new(client: Client, database: Database) -> Self {
        Self { client, database }
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        ping(&self.database)
            .await
            .with_context(|| format!("MongoDB database '{}' is unreachable", self.database.name()))?;

        tracing::info!(
            module = self.name(),
            database = self.database.name(),
            "database connection verified"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.client.clone().shutdown().await;
        tracing::info!(module = self.name(), "database client shut down");
        Ok(())
    }
}
