//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active tables of a location
    pub async fn find_by_location(&self, location: &RecordId) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE location = $location AND is_active = true \
                 ORDER BY number",
            )
            .bind(("location", location.to_string()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = parse_record_id(id, "dining table")?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find table by number within a location
    pub async fn find_by_number(
        &self,
        location: &RecordId,
        number: &str,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE location = $location AND number = $number LIMIT 1",
            )
            .bind(("location", location.to_string()))
            .bind(("number", number.to_string()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        // Check duplicate number in the same location
        if self
            .find_by_number(&data.location, &data.number)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists at this location",
                data.number
            )));
        }

        let table = DiningTable {
            id: None,
            location: data.location,
            number: data.number,
            seats: data.seats.unwrap_or(4),
            zone: data.zone,
            is_active: true,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Update a dining table
    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let thing = parse_record_id(id, "dining table")?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;

        // Check duplicate number if changing it
        if let Some(number) = &data.number
            && let Some(found) = self.find_by_number(&existing.location, number).await?
            && found.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists at this location",
                number
            )));
        }

        let number = data.number.unwrap_or(existing.number);
        let seats = data.seats.unwrap_or(existing.seats);
        let zone = data.zone.unwrap_or(existing.zone);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query(
                "UPDATE $thing SET number = $number, seats = $seats, zone = $zone, \
                 is_active = $is_active",
            )
            .bind(("thing", thing))
            .bind(("number", number))
            .bind(("seats", seats))
            .bind(("zone", zone))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Hard delete a dining table
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, "dining table")?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
