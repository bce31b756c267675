use crate::{error::Error, state::AppState};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
};
use libwaypoint::{loadable::Loadable, location::Location};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations).post(add_location))
        .route(
            "/locations/{id}",
            put(modify_location).delete(delete_location),
        )
}

async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>, Error> {
    let locations = Location::load_all(&state.db).await?;
    Ok(Json(locations))
}

#[derive(Debug, Deserialize)]
struct LocationParams {
    name: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    description: Option<String>,
}

async fn add_location(
    State(state): State<AppState>,
    Json(params): Json<LocationParams>,
) -> Result<impl IntoResponse, Error> {
    let name = params
        .name
        .ok_or_else(|| Error::RequiredParameterMissing("name".to_string()))?;
    let lat = params
        .lat
        .ok_or_else(|| Error::RequiredParameterMissing("lat".to_string()))?;
    let lng = params
        .lng
        .ok_or_else(|| Error::RequiredParameterMissing("lng".to_string()))?;

    let mut location = Location::new(name, lat, lng, params.description)?;
    location.insert(&state.db).await?;
    debug!("created location {} at ({lat}, {lng})", location.id);
    Ok((StatusCode::CREATED, Json(location)))
}

async fn modify_location(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(params): Json<LocationParams>,
) -> Result<Json<Location>, Error> {
    let mut location = Location::load(id, &state.db).await?;

    if let Some(name) = params.name {
        location.name = name;
    }
    if let Some(lat) = params.lat {
        location.lat = lat;
    }
    if let Some(lng) = params.lng {
        location.lng = lng;
    }
    if let Some(desc) = params.description {
        location.description = Some(desc);
    }
    location.update(&state.db).await?;
    Ok(Json(location))
}

#[derive(Serialize)]
struct DeleteResponse {
    message: String,
}

async fn delete_location(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let res = Location::delete_id(&id, &state.db).await?;
    if res.rows_affected() == 0 {
        return Err(Error::NotFound(format!("No location with id {id}")));
    }
    Ok(Json(DeleteResponse {
        message: "Location deleted".to_string(),
    }))
}
