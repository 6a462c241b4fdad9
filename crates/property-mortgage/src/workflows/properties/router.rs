use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::PropertyQuery;
use super::PropertyCatalog;

/// Router exposing listing search and lookup.
pub fn properties_router(catalog: Arc<PropertyCatalog>) -> Router {
    Router::new()
        .route("/api/properties", get(search_handler))
        .route("/api/properties/:property_id", get(lookup_handler))
        .with_state(catalog)
}

pub(crate) async fn search_handler(
    State(catalog): State<Arc<PropertyCatalog>>,
    Query(query): Query<PropertyQuery>,
) -> Response {
    let properties = catalog.search(query.bounding_box());
    let mut response = (
        StatusCode::OK,
        axum::Json(json!({ "properties": properties })),
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

pub(crate) async fn lookup_handler(
    State(catalog): State<Arc<PropertyCatalog>>,
    Path(property_id): Path<String>,
) -> Response {
    let region_id = match property_id.trim().parse::<i64>() {
        Ok(region_id) => region_id,
        Err(_) => {
            let payload = json!({ "error": "Invalid property ID" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match catalog.get(region_id) {
        Some(listing) => (StatusCode::OK, axum::Json(listing.clone())).into_response(),
        None => {
            let payload = json!({ "error": "Property not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::io::Cursor;
    use tower::ServiceExt;

    fn router() -> Router {
        let csv = "RegionID,zipcode,City,State,price,latitude,longitude\n\
            97564,90001,Los Angeles,CA,612000,34.0586,-118.1873\n\
            97771,94105,San Francisco,CA,1450000,37.7754,-122.4189\n";
        let catalog = PropertyCatalog::from_reader(Cursor::new(csv)).expect("sample parses");
        properties_router(Arc::new(catalog))
    }

    async fn get_json(uri: &str) -> (StatusCode, Option<HeaderValue>, Value) {
        let response = router()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        let cache = response.headers().get(header::CACHE_CONTROL).cloned();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, cache, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn lists_every_property_without_bounds() {
        let (status, cache, payload) = get_json("/api/properties").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cache,
            Some(HeaderValue::from_static("no-cache, no-store, must-revalidate"))
        );
        assert_eq!(payload["properties"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn filters_by_viewport() {
        let (status, _, payload) =
            get_json("/api/properties?ne_lat=35&ne_lng=-117&sw_lat=33&sw_lng=-119").await;

        assert_eq!(status, StatusCode::OK);
        let properties = payload["properties"].as_array().expect("array");
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0]["city"], "Los Angeles");
    }

    #[tokio::test]
    async fn looks_up_by_region_id() {
        let (status, _, payload) = get_json("/api/properties/97771").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["zipcode"], "94105");
    }

    #[tokio::test]
    async fn lookup_distinguishes_missing_and_malformed_ids() {
        let (missing, _, _) = get_json("/api/properties/1").await;
        let (malformed, _, payload) = get_json("/api/properties/abc").await;

        assert_eq!(missing, StatusCode::NOT_FOUND);
        assert_eq!(malformed, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "Invalid property ID");
    }
}
