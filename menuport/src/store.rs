//! Persistence adapter for categories and menu items
//!
//! [`MenuStore`] is the only contract the pipeline has with the backing
//! store. Uniqueness of category names per vendor and any transactional
//! guarantees belong to the implementation.

use crate::error::PersistenceError;
use crate::normalize::{MenuDate, SpiceLevel};
use crate::result::MenuItemRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub type CategoryId = u64;

/// Result of resolving a category name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryResolution {
    pub id: CategoryId,
    /// False when an existing category was reused
    pub created: bool,
}

/// Menu item ready for insertion, with its category resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub category_id: CategoryId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<MenuDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

impl NewMenuItem {
    pub fn from_record(record: &MenuItemRecord, category_id: CategoryId) -> Self {
        Self {
            category_id,
            name: record.item_name.clone(),
            price: record.price,
            half_price: record.half_price,
            description: record.description.clone(),
            meal_type: record.meal_type.clone(),
            date: record.date,
            spice_level: record.spice_level,
            dietary_tags: record.dietary_tags.iter().cloned().collect(),
        }
    }
}

/// Persisted category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub vendor_id: String,
    pub name: String,
    pub display_order: u32,
}

/// Persisted menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u64,
    pub vendor_id: String,
    #[serde(flatten)]
    pub item: NewMenuItem,
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Return the id of the vendor's category called `name`, creating it
    /// with `display_order` if it does not exist
    async fn resolve_or_create_category(
        &self,
        vendor_id: &str,
        name: &str,
        display_order: u32,
    ) -> Result<CategoryResolution, PersistenceError>;

    /// Insert a batch of items
    async fn insert_menu_items(
        &self,
        vendor_id: &str,
        items: Vec<NewMenuItem>,
    ) -> Result<(), PersistenceError>;
}

/// Tables shared by the in-memory and file-backed stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    pub categories: Vec<Category>,
    pub menu_items: Vec<MenuItem>,
    next_category_id: CategoryId,
    next_item_id: u64,
}

impl StoreData {
    fn resolve_or_create_category(
        &mut self,
        vendor_id: &str,
        name: &str,
        display_order: u32,
    ) -> CategoryResolution {
        let name = name.trim();
        if let Some(existing) = self
            .categories
            .iter()
            .find(|c| c.vendor_id == vendor_id && c.name == name)
        {
            return CategoryResolution {
                id: existing.id,
                created: false,
            };
        }

        self.next_category_id += 1;
        let id = self.next_category_id;
        self.categories.push(Category {
            id,
            vendor_id: vendor_id.to_string(),
            name: name.to_string(),
            display_order,
        });
        CategoryResolution { id, created: true }
    }

    /// All-or-nothing: every item must reference one of the vendor's categories
    fn insert_menu_items(
        &mut self,
        vendor_id: &str,
        items: Vec<NewMenuItem>,
    ) -> Result<(), PersistenceError> {
        if let Some(orphan) = items.iter().find(|item| {
            !self
                .categories
                .iter()
                .any(|c| c.id == item.category_id && c.vendor_id == vendor_id)
        }) {
            return Err(PersistenceError::Store(format!(
                "category {} does not exist for vendor {}",
                orphan.category_id, vendor_id
            )));
        }

        for item in items {
            self.next_item_id += 1;
            self.menu_items.push(MenuItem {
                id: self.next_item_id,
                vendor_id: vendor_id.to_string(),
                item,
            });
        }
        Ok(())
    }

    pub fn categories_for(&self, vendor_id: &str) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.vendor_id == vendor_id)
            .cloned()
            .collect()
    }

    pub fn items_for(&self, vendor_id: &str) -> Vec<MenuItem> {
        self.menu_items
            .iter()
            .filter(|i| i.vendor_id == vendor_id)
            .cloned()
            .collect()
    }
}

/// In-process store, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored tables
    pub async fn snapshot(&self) -> StoreData {
        self.data.lock().await.clone()
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn resolve_or_create_category(
        &self,
        vendor_id: &str,
        name: &str,
        display_order: u32,
    ) -> Result<CategoryResolution, PersistenceError> {
        let mut data = self.data.lock().await;
        Ok(data.resolve_or_create_category(vendor_id, name, display_order))
    }

    async fn insert_menu_items(
        &self,
        vendor_id: &str,
        items: Vec<NewMenuItem>,
    ) -> Result<(), PersistenceError> {
        let mut data = self.data.lock().await;
        data.insert_menu_items(vendor_id, items)
    }
}

/// Store kept in a single JSON file. Every operation loads the file,
/// applies the change and writes it back through a temporary file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents; a missing file reads as an empty store
    pub async fn load(&self) -> Result<StoreData, PersistenceError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, data: &StoreData) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl MenuStore for JsonFileStore {
    async fn resolve_or_create_category(
        &self,
        vendor_id: &str,
        name: &str,
        display_order: u32,
    ) -> Result<CategoryResolution, PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;
        let resolution = data.resolve_or_create_category(vendor_id, name, display_order);
        if resolution.created {
            self.save(&data).await?;
        }
        Ok(resolution)
    }

    async fn insert_menu_items(
        &self,
        vendor_id: &str,
        items: Vec<NewMenuItem>,
    ) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;
        data.insert_menu_items(vendor_id, items)?;
        self.save(&data).await
    }
}
