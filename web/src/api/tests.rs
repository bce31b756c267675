use crate::test_app;
use axum::{
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use libwaypoint::location::Location;
use serde_json::{Value, json};
use sqlx::{Pool, Sqlite};
use test_log::test;
use tower::Service;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn body_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body was not valid json")
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../db/fixtures", scripts("locations"))
))]
async fn test_list_locations(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool);

    let response = app
        .as_service()
        .call(empty_request("GET", "/api/locations"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let locations: Vec<Location> = serde_json::from_value(body_json(response.into_body()).await)
        .expect("Failed to parse locations");
    assert_eq!(locations.len(), 3);
    assert!(locations.iter().any(|l| l.name == "Statue of Liberty"));
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn test_list_empty(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool);

    let response = app
        .as_service()
        .call(empty_request("GET", "/api/locations"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await, json!([]));
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn test_add_location_validation(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool);

    // missing required fields
    for body in [
        json!({}),
        json!({"name": "Park"}),
        json!({"name": "Park", "lat": 40.0}),
        json!({"lat": 40.0, "lng": -73.0}),
    ] {
        let response = app
            .as_service()
            .call(json_request("POST", "/api/locations", body))
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // an empty name fails the construction-time check
    let response = app
        .as_service()
        .call(json_request(
            "POST",
            "/api/locations",
            json!({"name": "", "lat": 40.0, "lng": -73.0}),
        ))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // nothing was stored
    let response = app
        .as_service()
        .call(empty_request("GET", "/api/locations"))
        .await
        .expect("Failed to execute request");
    assert_eq!(body_json(response.into_body()).await, json!([]));
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn test_location_lifecycle(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool);

    // create a location and make sure the response echoes the fields and
    // carries a fresh id
    let response = app
        .as_service()
        .call(json_request(
            "POST",
            "/api/locations",
            json!({"name": "Park", "lat": 40.7829, "lng": -73.9654}),
        ))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Location = serde_json::from_value(body_json(response.into_body()).await)
        .expect("Failed to parse location");
    assert!(created.id > 0);
    assert_eq!(created.name, "Park");
    assert_eq!(created.lat, 40.7829);
    assert_eq!(created.lng, -73.9654);
    assert_eq!(created.description, None);

    // update only the description; everything else is preserved
    let response = app
        .as_service()
        .call(json_request(
            "PUT",
            &format!("/api/locations/{}", created.id),
            json!({"description": "nice"}),
        ))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Location = serde_json::from_value(body_json(response.into_body()).await)
        .expect("Failed to parse location");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Park");
    assert_eq!(updated.lat, 40.7829);
    assert_eq!(updated.lng, -73.9654);
    assert_eq!(updated.description.as_deref(), Some("nice"));

    // delete it and check the confirmation message
    let response = app
        .as_service()
        .call(empty_request(
            "DELETE",
            &format!("/api/locations/{}", created.id),
        ))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"message": "Location deleted"})
    );

    // a subsequent list no longer contains it
    let response = app
        .as_service()
        .call(empty_request("GET", "/api/locations"))
        .await
        .expect("Failed to execute request");
    let locations: Vec<Location> = serde_json::from_value(body_json(response.into_body()).await)
        .expect("Failed to parse locations");
    assert!(!locations.iter().any(|l| l.id == created.id));
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../db/fixtures", scripts("locations"))
))]
async fn test_modify_location(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool);

    // replace several fields at once
    let response = app
        .as_service()
        .call(json_request(
            "PUT",
            "/api/locations/3",
            json!({"name": "Times Sq", "description": "Busy"}),
        ))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Location = serde_json::from_value(body_json(response.into_body()).await)
        .expect("Failed to parse location");
    assert_eq!(updated.id, 3);
    assert_eq!(updated.name, "Times Sq");
    assert_eq!(updated.lat, 40.7580);
    assert_eq!(updated.description.as_deref(), Some("Busy"));

    // an unknown id is a 404
    let response = app
        .as_service()
        .call(json_request(
            "PUT",
            "/api/locations/9999",
            json!({"description": "nope"}),
        ))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // an empty name is a validation error and leaves the row alone
    let response = app
        .as_service()
        .call(json_request(
            "PUT",
            "/api/locations/1",
            json!({"name": ""}),
        ))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .as_service()
        .call(empty_request("GET", "/api/locations"))
        .await
        .expect("Failed to execute request");
    let locations: Vec<Location> = serde_json::from_value(body_json(response.into_body()).await)
        .expect("Failed to parse locations");
    assert!(locations.iter().any(|l| l.name == "Central Park"));
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../db/fixtures", scripts("locations"))
))]
async fn test_delete_location(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool);

    let response = app
        .as_service()
        .call(empty_request("DELETE", "/api/locations/2"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // deleting it again is a 404
    let response = app
        .as_service()
        .call(empty_request("DELETE", "/api/locations/2"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"message": "No location with id 2"})
    );

    let response = app
        .as_service()
        .call(empty_request("GET", "/api/locations"))
        .await
        .expect("Failed to execute request");
    let locations: Vec<Location> = serde_json::from_value(body_json(response.into_body()).await)
        .expect("Failed to parse locations");
    assert_eq!(locations.len(), 2);
    assert!(!locations.iter().any(|l| l.id == 2));
}
