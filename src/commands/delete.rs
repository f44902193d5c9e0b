use agenda_core::store::{EventStore, FileStore};
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(store: &mut EventStore<FileStore>, id: &str) -> Result<()> {
    let title = store.get(id).map(|e| e.title.clone()).unwrap_or_default();
    store.delete(id)?;
    println!("{}", format!("  Deleted: {}", title).red());
    Ok(())
}
