use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{Hospital, HospitalStore, NewHospital};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use medisync_core::offline;
use medisync_core::validation::{validate_hospital, FieldErrors};
use serde_json::{Map, Value};
use tracing::info;

const REQUIRED_FIELDS: [&str; 4] = ["name", "address", "phone", "capacity"];

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

pub async fn list_hospitals(
    State(state): State<AppState>,
) -> Result<Json<Vec<Hospital>>, ApiError> {
    let hospitals = blocking(state.store, |store| store.list()).await?;
    Ok(Json(hospitals))
}

pub async fn register_hospital(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Hospital>), ApiError> {
    let registration = parse_registration(&body)?;
    let created = blocking(state.store, move |store| store.insert(&registration)).await?;
    info!(id = created.id, name = %created.name, "hospital registered");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn manifest() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(offline::web_manifest()),
    )
}

pub async fn cache_rules() -> Json<Vec<offline::CacheRule>> {
    Json(offline::cache_rules())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_owned())
}

/// Runs a store call off the async workers.
async fn blocking<T, F>(store: HospitalStore, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&HospitalStore) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&store))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// Decodes a registration body. Presence is checked field by field in a
/// fixed order, then types, then the shape rules.
pub fn parse_registration(body: &[u8]) -> Result<NewHospital, ApiError> {
    let Ok(Value::Object(payload)) = serde_json::from_slice::<Value>(body) else {
        return Err(ApiError::MissingBody);
    };
    if let Some(missing) = REQUIRED_FIELDS
        .into_iter()
        .find(|field| !payload.contains_key(*field))
    {
        return Err(ApiError::MissingField(missing));
    }

    let mut errors = FieldErrors::default();
    let name = text_field(&payload, "name", &mut errors);
    let address = text_field(&payload, "address", &mut errors);
    let phone = text_field(&payload, "phone", &mut errors);
    let capacity = match payload.get("capacity").and_then(Value::as_i64) {
        Some(n) => n,
        None => {
            errors.insert("capacity", "Not a valid integer.");
            0
        }
    };
    errors.into_result().map_err(ApiError::Validation)?;

    validate_hospital(&name, &address, &phone, capacity)
        .into_result()
        .map_err(ApiError::Validation)?;

    Ok(NewHospital {
        name,
        address,
        phone,
        capacity,
    })
}

fn text_field(
    payload: &Map<String, Value>,
    field: &'static str,
    errors: &mut FieldErrors,
) -> String {
    match payload.get(field).and_then(Value::as_str) {
        Some(s) => s.to_owned(),
        None => {
            errors.insert(field, "Not a valid string.");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_first_missing_field() {
        let err = parse_registration(br#"{"name":"A","phone":"123456789"}"#).expect_err("missing");
        assert_eq!(err.to_string(), "Missing field: address");
    }

    #[test]
    fn non_object_body_is_missing() {
        for body in [&b""[..], b"[]", b"not json", b"null"] {
            assert!(matches!(parse_registration(body), Err(ApiError::MissingBody)));
        }
    }

    #[test]
    fn type_and_shape_errors() {
        let err = parse_registration(
            br#"{"name":"A","address":"B","phone":"123456789","capacity":"ten"}"#,
        )
        .expect_err("type");
        assert_eq!(err.to_string(), "capacity: Not a valid integer.");

        let err = parse_registration(
            br#"{"name":"","address":"B","phone":"12","capacity":0}"#,
        )
        .expect_err("shape");
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn accepts_valid_body() {
        let parsed = parse_registration(
            br#"{"name":"Central","address":"1 Main St","phone":"+15551234567","capacity":10}"#,
        )
        .expect("valid");
        assert_eq!(parsed.capacity, 10);
    }
}
