//! In-memory view state for the interactive map
//!
//! [MapView] owns the list of markers shown on the map, the current
//! selection (either a staged, not-yet-saved location or an editable copy of
//! a stored record) and the two-endpoint connection used for the distance
//! readout. All state changes go through explicit transition methods, and
//! persistence goes through the [LocationApi] trait so the same logic can be
//! driven against the database directly or any other transport.

use crate::{
    Database,
    error::{Error, Result},
    loadable::Loadable,
    location::Location,
};
use async_trait::async_trait;
use tracing::debug;

/// The persistence operations that the map view needs from its backend
#[async_trait]
pub trait LocationApi: Send + Sync {
    /// Fetch all stored locations
    async fn list_locations(&self) -> Result<Vec<Location>>;

    /// Persist a new location. On success the id of the object is updated to
    /// the id assigned by the store.
    async fn create_location(&self, location: &mut Location) -> Result<()>;

    /// Replace the stored record with the given object
    async fn update_location(&self, location: &Location) -> Result<()>;

    /// Remove the stored record with the given id
    async fn delete_location(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl LocationApi for Database {
    async fn list_locations(&self) -> Result<Vec<Location>> {
        Location::load_all(self).await
    }

    async fn create_location(&self, location: &mut Location) -> Result<()> {
        location.insert(self).await.map(|_| ())
    }

    async fn update_location(&self, location: &Location) -> Result<()> {
        location.update(self).await.map(|_| ())
    }

    async fn delete_location(&self, id: i64) -> Result<()> {
        let res = Location::delete_id(&id, self).await?;
        if res.rows_affected() == 0 {
            return Err(Error::DatabaseRowNotFound(sqlx::Error::RowNotFound));
        }
        Ok(())
    }
}

/// The editable name/description buffer for whichever location is selected,
/// pinned to the coordinates it was opened with
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
}

impl Draft {
    /// A draft for a fresh map click, seeded with a default name derived
    /// from the coordinates
    fn staged(lat: f64, lng: f64) -> Self {
        Self {
            name: format!("Location at {lat:.4}, {lng:.4}"),
            description: String::new(),
            lat,
            lng,
        }
    }

    fn description_opt(&self) -> Option<String> {
        if self.description.is_empty() {
            None
        } else {
            Some(self.description.clone())
        }
    }
}

impl From<&Location> for Draft {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            description: location.description.clone().unwrap_or_default(),
            lat: location.lat,
            lng: location.lng,
        }
    }
}

/// What the user currently has selected on the map
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    /// Nothing is selected
    #[default]
    Idle,
    /// The user clicked an empty map area; the draft holds the unsaved
    /// candidate location
    StagedNew(Draft),
    /// The user clicked a stored marker; the draft holds an editable copy of
    /// that record
    EditingExisting { id: i64, draft: Draft },
}

/// A transient pairing of two stored locations, kept only to display the
/// distance between them. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Connection {
    start: Option<i64>,
    end: Option<i64>,
}

impl Connection {
    /// Advance the endpoint pair with a newly clicked marker: the first
    /// click sets the start point, a second click on a different marker sets
    /// the end point, and any click once both are set starts a fresh pair.
    pub fn select(&mut self, id: i64) {
        match (self.start, self.end) {
            (None, _) => self.start = Some(id),
            (Some(start), None) if start != id => self.end = Some(id),
            // re-clicking the lone start point changes nothing
            (Some(_), None) => (),
            (Some(_), Some(_)) => {
                self.start = Some(id);
                self.end = None;
            }
        }
    }

    /// Clear the pair if either endpoint refers to the given id
    pub fn deselect(&mut self, id: i64) {
        if self.start == Some(id) || self.end == Some(id) {
            self.start = None;
            self.end = None;
        }
    }

    /// Both endpoint ids, when the pair is complete
    pub fn endpoints(&self) -> Option<(i64, i64)> {
        self.start.zip(self.end)
    }

    pub fn start(&self) -> Option<i64> {
        self.start
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }
}

/// The state container behind the interactive map
pub struct MapView<A: LocationApi> {
    api: A,
    locations: Vec<Location>,
    selection: Selection,
    connection: Connection,
}

impl<A: LocationApi> MapView<A> {
    /// Create the view and load the full location list from the backend
    pub async fn open(api: A) -> Result<Self> {
        let locations = api.list_locations().await?;
        debug!("loaded {} locations", locations.len());
        Ok(Self {
            api,
            locations,
            selection: Selection::Idle,
            connection: Connection::default(),
        })
    }

    /// All locations currently shown as markers
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Click on an empty map area: stage a new location there, replacing any
    /// previous selection. Clicking the already-staged coordinates a second
    /// time toggles back to idle.
    pub fn click_map(&mut self, lat: f64, lng: f64) {
        self.selection = match &self.selection {
            Selection::StagedNew(draft) if draft.lat == lat && draft.lng == lng => Selection::Idle,
            _ => Selection::StagedNew(Draft::staged(lat, lng)),
        };
    }

    /// Click on a stored marker: open an editable copy of that record and
    /// advance the connection endpoints. Clicking the already-selected
    /// marker again returns the selection to idle.
    pub fn click_marker(&mut self, id: i64) -> Result<()> {
        let location = self.find(id)?;
        let draft = Draft::from(location);
        self.connection.select(id);
        self.selection = match &self.selection {
            Selection::EditingExisting { id: selected, .. } if *selected == id => Selection::Idle,
            _ => Selection::EditingExisting { id, draft },
        };
        Ok(())
    }

    /// Edit the name of the active draft. Does nothing while idle.
    pub fn set_name(&mut self, name: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.name = name.to_string();
        }
    }

    /// Edit the description of the active draft. Does nothing while idle.
    pub fn set_description(&mut self, description: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.description = description.to_string();
        }
    }

    /// Persist the staged location. The marker list and selection are only
    /// touched once the backend confirms the create, so a failure leaves the
    /// staged point and its edits in place.
    pub async fn save(&mut self) -> Result<()> {
        let Selection::StagedNew(draft) = &self.selection else {
            return Err(Error::InvalidOperation(
                "no staged location to save".to_string(),
            ));
        };
        let mut location = Location::new(
            draft.name.clone(),
            draft.lat,
            draft.lng,
            draft.description_opt(),
        )?;
        self.api.create_location(&mut location).await?;
        debug!("saved new location with id {}", location.id);
        self.locations.push(location);
        self.selection = Selection::Idle;
        Ok(())
    }

    /// Persist the edits to the selected stored location and replace the
    /// corresponding marker in place. The id never changes.
    pub async fn commit_update(&mut self) -> Result<()> {
        let (id, draft) = match &self.selection {
            Selection::EditingExisting { id, draft } => (*id, draft.clone()),
            _ => {
                return Err(Error::InvalidOperation(
                    "no location selected for editing".to_string(),
                ));
            }
        };
        let mut updated = self.find(id)?.clone();
        updated.description = draft.description_opt();
        updated.name = draft.name;
        updated.lat = draft.lat;
        updated.lng = draft.lng;
        self.api.update_location(&updated).await?;
        if let Some(slot) = self.locations.iter_mut().find(|l| l.id == id) {
            *slot = updated;
        }
        self.selection = Selection::Idle;
        Ok(())
    }

    /// Delete a stored location. Invocable from any marker, not just the
    /// selected one. On success the marker is removed, the selection is
    /// cleared if it referenced the deleted record, and the connection pair
    /// is cleared if the record was one of its endpoints.
    pub async fn delete(&mut self, id: i64) -> Result<()> {
        self.api.delete_location(id).await?;
        debug!("deleted location with id {id}");
        self.locations.retain(|l| l.id != id);
        self.connection.deselect(id);
        if matches!(&self.selection, Selection::EditingExisting { id: sel, .. } if *sel == id) {
            self.selection = Selection::Idle;
        }
        Ok(())
    }

    /// Discard any pending edits and return to idle
    pub fn cancel(&mut self) {
        self.selection = Selection::Idle;
    }

    /// The great-circle distance in kilometers between the two connection
    /// endpoints, when both are set
    pub fn connection_distance_km(&self) -> Option<f64> {
        let (start, end) = self.connection.endpoints()?;
        let from = self.locations.iter().find(|l| l.id == start)?;
        let to = self.locations.iter().find(|l| l.id == end)?;
        Some(from.distance_to(to))
    }

    fn find(&self, id: i64) -> Result<&Location> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| Error::InvalidOperation(format!("no marker with id {id}")))
    }

    fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.selection {
            Selection::Idle => None,
            Selection::StagedNew(draft) => Some(draft),
            Selection::EditingExisting { draft, .. } => Some(draft),
        }
    }
}
