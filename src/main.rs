use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hall_layout::config::EditorConfig;
use hall_layout::element::ElementId;
use hall_layout::engine::EditorCore;
use hall_layout::persistence::{PersistError, PersistenceAdapter};
use hall_layout::store::{MemoryStore, SerializedElement};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid layout JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Merge new elements into a stored layout: snap them onto the stored
/// anchors, renumber seats in reading order, and print the saved rows.
#[derive(Parser, Debug)]
#[command(name = "hall-layout", about = "Study-hall seat plan normalizer")]
struct Cli {
    /// JSON array of serialized layout elements.
    layout: PathBuf,

    /// Container the rows belong to.
    #[arg(default_value = "default", env = "LAYOUT_CONTAINER_ID")]
    container_id: String,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let raw = tokio::fs::read_to_string(&cli.layout)
        .await
        .map_err(|source| CliError::Read { path: cli.layout.clone(), source })?;
    let (stored, added): (Vec<SerializedElement>, Vec<SerializedElement>) =
        serde_json::from_str::<Vec<SerializedElement>>(&raw)?
            .into_iter()
            .map(|row| SerializedElement { container_id: cli.container_id.clone(), ..row })
            .partition(|row| row.id.as_deref().is_some_and(|id| ElementId::new(id).is_persisted()));
    tracing::info!(stored = stored.len(), added = added.len(), container = %cli.container_id, "layout read");

    let store = Arc::new(MemoryStore::with_rows(stored));
    let adapter = PersistenceAdapter::new(Arc::clone(&store), cli.container_id.as_str());
    let mut core = EditorCore::with_config(EditorConfig::from_env());
    adapter.load(&mut core).await?;

    // Rows without a store id are new elements placed against the stored ones.
    for row in added {
        let local = SerializedElement { id: Some(ElementId::local().to_string()), ..row };
        if let Some(element) = local.into_element() {
            core.scene.add(element);
        }
    }
    let aligned = core.align_dirty();
    let reordered = core.reorder_seats();
    let report = adapter.save(&mut core).await?;
    tracing::info!(aligned, reordered, inserted = report.inserted, updated = report.updated, "layout normalized");

    let saved = store.rows().await;
    println!("{}", serde_json::to_string_pretty(&saved)?);
    Ok(())
}
