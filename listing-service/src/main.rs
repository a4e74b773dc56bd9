use anyhow::Context;
use listing_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config)?;

    match config.backend.kind {
        BackendKind::Memory => {
            let store = match &config.backend.seed_path {
                Some(path) => MemoryStore::from_json_file(path)
                    .await
                    .with_context(|| format!("seeding store from {}", path.display()))?,
                None => MemoryStore::new(),
            };
            run(config, store).await?;
        }
        BackendKind::Rest => run_rest(config).await?,
    }

    Ok(())
}

#[cfg(feature = "rest")]
async fn run_rest(config: Config) -> anyhow::Result<()> {
    let backend = RestBackend::new(&config.backend)?;
    run(config, backend).await?;
    Ok(())
}

#[cfg(not(feature = "rest"))]
async fn run_rest(_config: Config) -> anyhow::Result<()> {
    anyhow::bail!("backend kind 'rest' requires the `rest` feature")
}
