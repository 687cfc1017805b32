//! Category list state and the category commands.
//!
//! Categories are user-visible names partitioning an owner's documents.
//! The server is the source of truth for which categories hold documents;
//! the client keeps the displayed list, synthesizes the default when the
//! server returns nothing, and guards the deletion boundary.

use anyhow::Result;

use crate::api::ApiClient;
use crate::config::Config;
use crate::owner;

/// Synthesized when the server returns an empty category list.
pub const DEFAULT_CATEGORY: &str = "General";

/// Outcome of a category removal attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { selection_moved: bool },
    /// Deleting the last remaining category is refused, not an error.
    LastCategory,
    NotFound,
}

/// The displayed category list plus the current selection.
/// Insertion order is display order; names are unique within the list.
#[derive(Debug, Clone)]
pub struct Categories {
    names: Vec<String>,
    selected: String,
}

impl Categories {
    /// Builds the list from a server response, synthesizing the default
    /// category when the response is empty. The first entry is selected.
    pub fn from_server(mut names: Vec<String>) -> Self {
        if names.is_empty() {
            names.push(DEFAULT_CATEGORY.to_string());
        }
        let selected = names[0].clone();
        Self { names, selected }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn select(&mut self, name: &str) -> bool {
        if self.names.iter().any(|n| n == name) {
            self.selected = name.to_string();
            true
        } else {
            false
        }
    }

    /// Appends a new category. Blank and duplicate names are rejected.
    pub fn add(&mut self, name: &str) -> bool {
        let value = name.trim();
        if value.is_empty() {
            return false;
        }
        if self.names.iter().any(|n| n == value) {
            return false;
        }
        self.names.push(value.to_string());
        true
    }

    /// Removes a category. The selection falls back to the first remaining
    /// entry when the selected category is removed.
    pub fn remove(&mut self, name: &str) -> RemoveOutcome {
        if self.names.len() <= 1 {
            return RemoveOutcome::LastCategory;
        }
        let Some(index) = self.names.iter().position(|n| n == name) else {
            return RemoveOutcome::NotFound;
        };
        self.names.remove(index);
        let selection_moved = self.selected == name;
        if selection_moved {
            self.selected = self.names[0].clone();
        }
        RemoveOutcome::Removed { selection_moved }
    }
}

pub async fn run_categories(config: &Config) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let owner = owner::load_or_create(&config.state.dir)?;

    match api.categories(&owner).await {
        Some(names) => {
            let categories = Categories::from_server(names);
            for name in categories.names() {
                println!("{}", name);
            }
        }
        None => {
            println!("categories unavailable.");
        }
    }
    Ok(())
}

pub async fn run_delete_category(config: &Config, name: &str) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let owner = owner::load_or_create(&config.state.dir)?;

    let Some(names) = api.categories(&owner).await else {
        println!("categories unavailable; nothing deleted.");
        return Ok(());
    };

    let mut categories = Categories::from_server(names);
    match categories.remove(name) {
        RemoveOutcome::LastCategory => {
            println!("refusing to delete the last remaining category.");
        }
        RemoveOutcome::NotFound => {
            println!("no such category: {}", name);
        }
        RemoveOutcome::Removed { .. } => {
            if api.delete_category(&owner, name).await {
                println!("ok");
            } else {
                println!("delete failed.");
            }
        }
    }
    Ok(())
}

pub async fn run_delete_document(config: &Config, category: &str, document_id: u64) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let owner = owner::load_or_create(&config.state.dir)?;

    if api.delete_document(&owner, category, document_id).await {
        println!("ok");
    } else {
        println!("delete failed.");
    }
    Ok(())
}
