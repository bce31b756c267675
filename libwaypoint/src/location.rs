//! Objects to manage named locations on the map
use crate::{
    Database,
    error::{Error, Result},
    geo,
    loadable::Loadable,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use sqlx::sqlite::SqliteQueryResult;

/// A data type that represents a named point on the map. The coordinates are
/// latitude/longitude in degrees.
#[derive(Debug, sqlx::FromRow, Deserialize, Serialize, PartialEq, Clone)]
pub struct Location {
    /// A unique ID that identifies this location in the database
    #[sqlx(rename = "locid")]
    pub id: i64,

    /// The display name of the location
    #[sqlx(rename = "locname")]
    pub name: String,

    /// The latitude of the location in degrees
    pub lat: f64,

    /// The longitude of the location in degrees
    pub lng: f64,

    /// An optional longer description for this location
    #[sqlx(rename = "locdesc", default)]
    pub description: Option<String>,
}

#[async_trait]
impl Loadable for Location {
    type Id = i64;

    fn invalid_id() -> Self::Id {
        -1
    }

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id
    }

    async fn load(id: Self::Id, db: &Database) -> Result<Self> {
        sqlx::query_as(
            r#"SELECT locid, locname, lat, lng, locdesc
            FROM wp_locations WHERE locid=?"#,
        )
        .bind(id)
        .fetch_one(db.pool())
        .await
        .map_err(|e| e.into())
    }

    async fn delete_id(id: &Self::Id, db: &Database) -> Result<SqliteQueryResult> {
        sqlx::query(r#"DELETE FROM wp_locations WHERE locid=?"#)
            .bind(id)
            .execute(db.pool())
            .await
            .map_err(|e| e.into())
    }
}

impl Location {
    /// Creates a new location object with the given data. The name must not
    /// be empty. It will initially have an invalid ID until it is inserted
    /// into the database
    pub fn new(name: String, lat: f64, lng: f64, description: Option<String>) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::InvalidStateMissingAttribute("name".to_string()));
        }
        Ok(Self {
            id: Self::invalid_id(),
            name,
            lat,
            lng,
            description,
        })
    }

    /// Loads all locations from the database
    pub async fn load_all(db: &Database) -> Result<Vec<Location>> {
        sqlx::query_as(
            r#"SELECT locid, locname, lat, lng, locdesc
            FROM wp_locations"#,
        )
        .fetch_all(db.pool())
        .await
        .map_err(|e| e.into())
    }

    /// Add this location to the database. If this call completes successfully,
    /// the id of this object will be updated to the ID of the inserted row in
    /// the database
    pub async fn insert(&mut self, db: &Database) -> Result<SqliteQueryResult> {
        if self.id != Self::invalid_id() {
            return Err(Error::InvalidInsertObjectAlreadyExists(self.id));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidStateMissingAttribute("name".to_string()));
        }

        sqlx::query(
            r#"INSERT INTO wp_locations
          (locname, lat, lng, locdesc)
          VALUES (?, ?, ?, ?)"#,
        )
        .bind(&self.name)
        .bind(self.lat)
        .bind(self.lng)
        .bind(&self.description)
        .execute(db.pool())
        .await
        .inspect(|r| self.id = r.last_insert_rowid())
        .map_err(|e| e.into())
    }

    /// Update the location in the database such that it matches this object
    pub async fn update(&self, db: &Database) -> Result<SqliteQueryResult> {
        if self.id < 0 {
            return Err(Error::InvalidUpdateObjectNotFound);
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidStateMissingAttribute("name".to_string()));
        }

        sqlx::query(r#"UPDATE wp_locations SET locname=?, lat=?, lng=?, locdesc=? WHERE locid=?"#)
            .bind(self.name.clone())
            .bind(self.lat)
            .bind(self.lng)
            .bind(self.description.as_ref().cloned())
            .bind(self.id)
            .execute(db.pool())
            .await
            .map_err(|e| e.into())
    }

    /// The great-circle distance in kilometers between this location and
    /// another one
    pub fn distance_to(&self, other: &Location) -> f64 {
        geo::haversine_km((self.lat, self.lng), (other.lat, other.lng))
    }
}
