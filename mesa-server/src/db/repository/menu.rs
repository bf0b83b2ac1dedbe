//! Menu Repositories (categories and items)

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MenuCategoryRepository {
    base: BaseRepository,
}

impl MenuCategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Active categories in display order (public menu)
    pub async fn find_active(&self) -> RepoResult<Vec<MenuCategory>> {
        let categories: Vec<MenuCategory> = self
            .base
            .db()
            .query("SELECT * FROM menu_category WHERE is_active = true ORDER BY `order`, name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<MenuCategory>> {
        let categories: Vec<MenuCategory> = self
            .base
            .db()
            .query("SELECT * FROM menu_category ORDER BY `order`, name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuCategory>> {
        let thing = parse_record_id(id, "menu category")?;
        let category: Option<MenuCategory> = self.base.db().select(thing).await?;
        Ok(category)
    }

    pub async fn create(&self, data: MenuCategoryCreate) -> RepoResult<MenuCategory> {
        // Default display position: append after the current maximum
        let order = match data.order {
            Some(order) => order,
            None => {
                #[derive(serde::Deserialize)]
                struct MaxRow {
                    max: Option<i32>,
                }
                let row: Option<MaxRow> = self
                    .base
                    .db()
                    .query("SELECT math::max(`order`) AS max FROM menu_category GROUP ALL")
                    .await?
                    .take(0)?;
                row.and_then(|r| r.max).unwrap_or(0) + 1
            }
        };

        let category = MenuCategory {
            id: None,
            name: data.name,
            order,
            is_active: true,
        };
        let created: Option<MenuCategory> = self
            .base
            .db()
            .create("menu_category")
            .content(category)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu category".to_string()))
    }

    pub async fn update(&self, id: &str, data: MenuCategoryUpdate) -> RepoResult<MenuCategory> {
        let thing = parse_record_id(id, "menu category")?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu category {} not found", id)))?;

        let name = data.name.unwrap_or(existing.name);
        let order = data.order.unwrap_or(existing.order);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query("UPDATE $thing SET name = $name, `order` = $order, is_active = $is_active")
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("order", order))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu category {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, "menu category")?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Available items (public menu), optionally narrowed to a category
    pub async fn find_available(&self, category: Option<&str>) -> RepoResult<Vec<MenuItem>> {
        let mut sql = String::from("SELECT * FROM menu_item WHERE is_available = true");
        if category.is_some() {
            sql.push_str(" AND category = $category");
        }
        sql.push_str(" ORDER BY name");

        let mut query = self.base.db().query(sql);
        if let Some(category) = category {
            let thing = parse_record_id(category, "menu category")?;
            query = query.bind(("category", thing.to_string()));
        }

        let items: Vec<MenuItem> = query.await?.take(0)?;
        Ok(items)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY name")
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = parse_record_id(id, "menu item")?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let item = MenuItem {
            id: None,
            category: data.category,
            name: data.name,
            description: data.description,
            price: data.price,
            is_available: true,
        };
        let created: Option<MenuItem> = self.base.db().create("menu_item").content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let thing = parse_record_id(id, "menu item")?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        let name = data.name.unwrap_or(existing.name);
        let description = data.description.or(existing.description);
        let price = data.price.unwrap_or(existing.price);
        let is_available = data.is_available.unwrap_or(existing.is_available);

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, description = $description, price = $price, \
                 is_available = $is_available",
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("description", description))
            .bind(("price", price))
            .bind(("is_available", is_available))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, "menu item")?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
