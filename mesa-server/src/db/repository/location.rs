//! Location Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Location, LocationCreate, LocationUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "location";

#[derive(Clone)]
pub struct LocationRepository {
    base: BaseRepository,
}

impl LocationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all locations, inactive included (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<Location>> {
        let locations: Vec<Location> = self
            .base
            .db()
            .query("SELECT * FROM location ORDER BY name")
            .await?
            .take(0)?;
        Ok(locations)
    }

    /// Find active locations (public view)
    pub async fn find_active(&self) -> RepoResult<Vec<Location>> {
        let locations: Vec<Location> = self
            .base
            .db()
            .query("SELECT * FROM location WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(locations)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Location>> {
        let thing = parse_record_id(id, "location")?;
        let location: Option<Location> = self.base.db().select(thing).await?;
        Ok(location)
    }

    /// Find an existing, active location or fail
    pub async fn require_active(&self, id: &RecordId) -> RepoResult<Location> {
        let location: Option<Location> = self.base.db().select(id.clone()).await?;
        match location {
            Some(l) if l.is_active => Ok(l),
            _ => Err(RepoError::NotFound(format!("Location {} not found", id))),
        }
    }

    pub async fn create(&self, data: LocationCreate) -> RepoResult<Location> {
        let existing: Vec<Location> = self
            .base
            .db()
            .query("SELECT * FROM location WHERE name = $name LIMIT 1")
            .bind(("name", data.name.clone()))
            .await?
            .take(0)?;
        if !existing.is_empty() {
            return Err(RepoError::Duplicate(format!(
                "Location '{}' already exists",
                data.name
            )));
        }

        let location = Location {
            id: None,
            name: data.name,
            address: data.address,
            phone: data.phone,
            total_tables: data.total_tables.unwrap_or(0),
            max_capacity: data.max_capacity.unwrap_or(0),
            is_active: true,
        };

        let created: Option<Location> = self.base.db().create(TABLE).content(location).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create location".to_string()))
    }

    pub async fn update(&self, id: &str, data: LocationUpdate) -> RepoResult<Location> {
        let thing = parse_record_id(id, "location")?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Location {} not found", id)))?;

        let name = data.name.unwrap_or(existing.name);
        let address = data.address.unwrap_or(existing.address);
        let phone = data.phone.or(existing.phone);
        let total_tables = data.total_tables.unwrap_or(existing.total_tables);
        let max_capacity = data.max_capacity.unwrap_or(existing.max_capacity);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, address = $address, phone = $phone, \
                 total_tables = $total_tables, max_capacity = $max_capacity, is_active = $is_active",
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("address", address))
            .bind(("phone", phone))
            .bind(("total_tables", total_tables))
            .bind(("max_capacity", max_capacity))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Location {} not found", id)))
    }

    /// Soft-deactivate; locations are never hard-deleted by the normal flow
    pub async fn deactivate(&self, id: &str) -> RepoResult<Location> {
        self.update(
            id,
            LocationUpdate {
                name: None,
                address: None,
                phone: None,
                total_tables: None,
                max_capacity: None,
                is_active: Some(false),
            },
        )
        .await
    }
}
