// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink catalog backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `drinks`: id → serialized Drink (JSON bytes)
//! - `catalog_meta`: key → u64 (`next_id` counter)

use std::path::Path;

use redb::{
    backends::InMemoryBackend, Database, ReadableDatabase, ReadableTable,
    ReadableTableMetadata, TableDefinition,
};

use crate::models::{Drink, Ingredient};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: id → serialized Drink (JSON bytes).
const DRINKS: TableDefinition<u64, &[u8]> = TableDefinition::new("drinks");

/// Counters.
const CATALOG_META: TableDefinition<&str, u64> = TableDefinition::new("catalog_meta");

const NEXT_ID: &str = "next_id";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("drink {0} not found")]
    NotFound(u64),

    #[error("a drink titled {0:?} already exists")]
    DuplicateTitle(String),

    #[error("invalid drink: {0}")]
    Invalid(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// DrinkStore
// =============================================================================

/// Persistent drink catalog.
pub struct DrinkStore {
    db: Database,
}

impl DrinkStore {
    /// Open (or create) the catalog at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self::init(Database::create(path)?)
    }

    /// Catalog that lives only as long as the process.
    pub fn in_memory() -> StoreResult<Self> {
        Self::init(Database::builder().create_with_backend(InMemoryBackend::new())?)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DRINKS)?;
            let _ = write_txn.open_table(CATALOG_META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// All drinks, ordered by id.
    pub fn list(&self) -> StoreResult<Vec<Drink>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;

        let mut drinks = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            drinks.push(serde_json::from_slice(value.value())?);
        }
        Ok(drinks)
    }

    /// Look up a single drink.
    pub fn get(&self, id: u64) -> StoreResult<Drink> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;
        let value = table.get(id)?.ok_or(StoreError::NotFound(id))?;
        let drink = serde_json::from_slice(value.value())?;
        Ok(drink)
    }

    /// Add a drink and assign it the next id.
    pub fn create(&self, title: String, recipe: Vec<Ingredient>) -> StoreResult<Drink> {
        validate(&title, &recipe)?;

        let write_txn = self.db.begin_write()?;
        let drink = {
            let mut drinks = write_txn.open_table(DRINKS)?;
            if title_taken(&drinks, &title, None)? {
                return Err(StoreError::DuplicateTitle(title));
            }

            let mut meta = write_txn.open_table(CATALOG_META)?;
            let id = meta.get(NEXT_ID)?.map(|v| v.value()).unwrap_or(1);
            meta.insert(NEXT_ID, id + 1)?;

            let drink = Drink { id, title, recipe };
            let json = serde_json::to_vec(&drink)?;
            drinks.insert(id, json.as_slice())?;
            drink
        };
        write_txn.commit()?;
        Ok(drink)
    }

    /// Replace the given fields of an existing drink.
    pub fn update(
        &self,
        id: u64,
        title: Option<String>,
        recipe: Option<Vec<Ingredient>>,
    ) -> StoreResult<Drink> {
        let write_txn = self.db.begin_write()?;
        let drink = {
            let mut drinks = write_txn.open_table(DRINKS)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = drinks.get(id)?.ok_or(StoreError::NotFound(id))?;
                existing.value().to_vec()
            };
            let mut drink: Drink = serde_json::from_slice(&existing_bytes)?;

            if let Some(title) = title {
                if title != drink.title && title_taken(&drinks, &title, Some(id))? {
                    return Err(StoreError::DuplicateTitle(title));
                }
                drink.title = title;
            }
            if let Some(recipe) = recipe {
                drink.recipe = recipe;
            }
            validate(&drink.title, &drink.recipe)?;

            let json = serde_json::to_vec(&drink)?;
            drinks.insert(id, json.as_slice())?;
            drink
        };
        write_txn.commit()?;
        Ok(drink)
    }

    /// Remove a drink.
    pub fn delete(&self, id: u64) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut drinks = write_txn.open_table(DRINKS)?;
            if drinks.remove(id)?.is_none() {
                return Err(StoreError::NotFound(id));
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Number of drinks on the menu.
    pub fn count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;
        Ok(table.len()?)
    }

    /// Put the sample drink on an empty menu.
    ///
    /// Returns the drink if one was added.
    pub fn seed_sample(&self) -> StoreResult<Option<Drink>> {
        if self.count()? > 0 {
            return Ok(None);
        }
        let water = self.create(
            "water".to_string(),
            vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        )?;
        tracing::info!(id = water.id, "Seeded empty drink catalog");
        Ok(Some(water))
    }
}

fn validate(title: &str, recipe: &[Ingredient]) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::Invalid("title must not be empty"));
    }
    if recipe.is_empty() {
        return Err(StoreError::Invalid("recipe must have at least one ingredient"));
    }
    Ok(())
}

fn title_taken(
    drinks: &impl ReadableTable<u64, &'static [u8]>,
    title: &str,
    except: Option<u64>,
) -> StoreResult<bool> {
    for entry in drinks.iter()? {
        let (key, value) = entry?;
        if Some(key.value()) == except {
            continue;
        }
        let drink: Drink = serde_json::from_slice(value.value())?;
        if drink.title == title {
            return Ok(true);
        }
    }
    Ok(false)
}
