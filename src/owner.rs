//! Owner identity bootstrap.
//!
//! Every server call is scoped by one opaque client-generated identifier.
//! It is minted lazily on first use, persisted as a single string under a
//! fixed key in the state directory, and never mutated afterwards. The only
//! way it goes away is the explicit delete-owner action, which cascades
//! server-side.

use anyhow::{Context, Result};
use std::path::Path;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::Config;

/// Fixed storage key for the persisted identifier.
const OWNER_KEY: &str = "owner";

/// Returns the persisted owner identifier, minting and storing a fresh UUID
/// on first use.
pub fn load_or_create(state_dir: &Path) -> Result<String> {
    if let Some(existing) = peek(state_dir) {
        return Ok(existing);
    }

    let id = Uuid::new_v4().to_string();
    std::fs::create_dir_all(state_dir)
        .with_context(|| format!("Failed to create state dir {}", state_dir.display()))?;
    let path = state_dir.join(OWNER_KEY);
    std::fs::write(&path, &id)
        .with_context(|| format!("Failed to write owner id to {}", path.display()))?;
    Ok(id)
}

/// Reads the stored identifier without creating one.
pub fn peek(state_dir: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(state_dir.join(OWNER_KEY)).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Removes the stored identifier.
pub fn clear(state_dir: &Path) -> Result<()> {
    let path = state_dir.join(OWNER_KEY);
    if path.exists() {
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn run_owner_show(config: &Config) -> Result<()> {
    let owner = load_or_create(&config.state.dir)?;
    println!("{}", owner);
    Ok(())
}

pub async fn run_owner_delete(config: &Config) -> Result<()> {
    let owner = match peek(&config.state.dir) {
        Some(owner) => owner,
        None => {
            println!("no owner identifier present.");
            return Ok(());
        }
    };

    let api = ApiClient::new(&config.api)?;
    if api.delete_owner(&owner).await {
        clear(&config.state.dir)?;
        println!("ok");
    } else {
        println!("delete failed; owner retained.");
    }
    Ok(())
}
