//! Menu Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemView};
use serde::Serialize;
use shared::util::now_millis;
use std::collections::HashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find all menu items with category names resolved
    pub async fn find_all_resolved(&self) -> RepoResult<Vec<MenuItemView>> {
        let items = self.find_all().await?;
        let categories: Vec<Category> = self.base.db().select("category").await?;
        let names: HashMap<String, String> = categories
            .into_iter()
            .filter_map(|c| c.id.as_ref().map(|id| (id.to_string(), c.name.clone())))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| {
                let category_id = item.category.to_string();
                let category_name = names.get(&category_id).cloned().unwrap_or_default();
                MenuItemView {
                    id: item.id_string(),
                    name: item.name,
                    description: item.description,
                    price: item.price,
                    image: item.image,
                    category_id,
                    category_name,
                    is_available: item.is_available,
                }
            })
            .collect())
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let record_id = parse_record_id(TABLE, id)?;
        let item: Option<MenuItem> = self.base.db().select(record_id).await?;
        Ok(item)
    }

    /// Batch lookup by id strings, for cart/order resolution
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<HashMap<String, MenuItem>> {
        let mut found = HashMap::new();
        for id in ids {
            if let Some(item) = self.find_by_id(id).await? {
                found.insert(item.id_string(), item);
            }
        }
        Ok(found)
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let category = parse_record_id("category", &data.category)?;

        let now = now_millis();
        let item = MenuItem {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            image: data.image,
            category,
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        #[derive(Serialize)]
        struct MenuItemPatch {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_available: Option<bool>,
            updated_at: i64,
        }

        let category = match data.category {
            Some(ref c) => Some(parse_record_id("category", c)?.to_string()),
            None => None,
        };

        let record_id = parse_record_id(TABLE, id)?;
        let updated: Option<MenuItem> = self
            .base
            .db()
            .update(record_id)
            .merge(MenuItemPatch {
                name: data.name,
                description: data.description,
                price: data.price,
                image: data.image,
                category,
                is_available: data.is_available,
                updated_at: now_millis(),
            })
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_record_id(TABLE, id)?;
        let deleted: Option<MenuItem> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }
}
