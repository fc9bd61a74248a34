//! Process wiring: storage handle, module registry, lifecycle and server.

use anyhow::Context;
use std::sync::Arc;

use shelf_db::DatabaseModule;
use shelf_kernel::{
    settings::{Settings, StorageBackend},
    InitCtx, ModuleRegistry,
};

use crate::{
    modules::{
        self,
        books::repository::{InMemoryBookRepository, MongoBookRepository, SharedBookRepository},
    },
    seed,
};

/// Construct the repository for the configured backend and register every
/// module against it. Nothing is contacted until the registry boots.
pub async fn build_registry(
    settings: &Settings,
) -> anyhow::Result<(ModuleRegistry, SharedBookRepository)> {
    let mut registry = ModuleRegistry::new();

    let repository: SharedBookRepository = match settings.database.backend {
        StorageBackend::Mongodb => {
            let (client, database) = shelf_db::connect(&settings.database)
                .await
                .context("failed to set up MongoDB")?;
            registry.register_core(Arc::new(DatabaseModule::new(client, database.clone())));
            Arc::new(MongoBookRepository::new(
                database,
                &settings.database.collection,
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory book storage; records are lost on exit");
            Arc::new(InMemoryBookRepository::new())
        }
    };

    modules::register_all(&mut registry, repository.clone());
    Ok((registry, repository))
}

/// Boot all modules, serve HTTP until shutdown, then stop the modules.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let (registry, _) = build_registry(settings).await?;
    let ctx = InitCtx { settings };

    registry.boot(&ctx).await?;
    tracing::info!("shelf-app bootstrap complete");

    let served = shelf_http::start_server(&registry, settings).await;
    registry.shutdown().await?;
    served
}

/// Boot storage and load the sample catalog, optionally clearing it first.
pub async fn load_sample_catalog(settings: &Settings, reset: bool) -> anyhow::Result<usize> {
    let (registry, repository) = build_registry(settings).await?;
    let ctx = InitCtx { settings };

    registry.boot(&ctx).await?;
    let seeded = seed::seed_catalog(repository.as_ref(), reset).await;
    registry.shutdown().await?;

    Ok(seeded?.len())
}
