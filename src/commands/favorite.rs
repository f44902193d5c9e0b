use agenda_core::store::{EventStore, FileStore};
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(store: &mut EventStore<FileStore>, id: &str) -> Result<()> {
    let title = store.get(id).map(|e| e.title.clone()).unwrap_or_default();

    if store.toggle_favorite(id)? {
        println!("  {} {}", "★".yellow(), title);
    } else {
        println!("  {}", format!("Removed from favorites: {}", title).dimmed());
    }
    Ok(())
}
