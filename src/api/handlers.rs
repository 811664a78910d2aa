//! API request handlers
//!
//! Handlers for the template upload and pharmacy CRUD endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::ApiError;
use super::server::AppState;
use crate::error::{SheetError, SheetResult};
use crate::excel::{extract_labels, fill_template};
use crate::store::{Pharmacy, PharmacyFields};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const FILLED_ATTACHMENT: &str = "attachment; filename=filled-pharmacies.xlsx";

/// Standard API response wrapper for service endpoints
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data,
        }
    }
}

/// GET / - Greeting
pub async fn root() -> &'static str {
    "Hello from Pharmacy API!"
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    }))
}

//==============================================================================
// Excel upload
//==============================================================================

pub const MARKER_FIELDS_PARAM: &str = "markerFieldNames";

/// Every `markerFieldNames` value on the upload URL, in order. The key may
/// repeat and each value may hold a comma-separated list.
pub fn marker_query_values(params: &[(String, String)]) -> Vec<String> {
    params
        .iter()
        .filter(|(key, _)| key.strip_suffix("[]").unwrap_or(key) == MARKER_FIELDS_PARAM)
        .map(|(_, value)| value.clone())
        .collect()
}

/// Parts pulled out of the multipart upload body
#[derive(Debug, Default)]
pub struct Upload {
    pub file: Option<Vec<u8>>,
    pub marker_fields: Vec<String>,
}

/// Split comma-separated names, trim them and drop empties.
pub fn parse_marker_fields<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body reads that failed on the size limit are 413, anything else means
/// the file never arrived intact.
fn upload_error(context: &str, err: MultipartError) -> SheetError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("{}: body over the upload limit", context);
        SheetError::PayloadTooLarge
    } else {
        warn!("{}: {}", context, err);
        SheetError::InputMissing
    }
}

async fn read_upload(multipart: Result<Multipart, MultipartRejection>) -> SheetResult<Upload> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!("Upload rejected: {}", rejection);
        SheetError::InputMissing
    })?;

    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error("Malformed multipart body", e))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| upload_error("Failed to read uploaded file", e))?;
                if !bytes.is_empty() {
                    upload.file = Some(bytes.to_vec());
                }
            }
            Some("markerFieldNames") | Some("markerFieldNames[]") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| upload_error("Failed to read markerFieldNames", e))?;
                upload.marker_fields.push(text);
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// POST /api/excel/upload - Fill an uploaded template with every pharmacy
pub async fn upload_excel(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let upload = read_upload(multipart).await?;
    let file = upload.file.ok_or(SheetError::InputMissing)?;

    let labels = extract_labels(&file).map_err(ApiError::processing)?;
    if labels.is_empty() {
        return Err(SheetError::NoLabelsFound.into());
    }

    // Body parts win over the query string
    let marker_fields = if upload.marker_fields.is_empty() {
        parse_marker_fields(&marker_query_values(&params))
    } else {
        parse_marker_fields(&upload.marker_fields)
    };

    info!(
        "Template upload: {} bytes, {} label(s), markers {:?}",
        file.len(),
        labels.len(),
        marker_fields
    );

    let output = fill_template(state.records.as_ref(), &file, &labels, &marker_fields)
        .await
        .map_err(ApiError::processing)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, FILLED_ATTACHMENT),
        ],
        output,
    )
        .into_response())
}

//==============================================================================
// Pharmacy CRUD
//==============================================================================

fn parse_id(raw: &str) -> SheetResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| SheetError::InvalidId)
}

/// GET /api/pharmacies
pub async fn list_pharmacies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Pharmacy>>, ApiError> {
    Ok(Json(state.pharmacies.list().await?))
}

/// GET /api/pharmacies/:id
pub async fn get_pharmacy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Pharmacy>, ApiError> {
    let id = parse_id(&id)?;
    state
        .pharmacies
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| SheetError::NotFound.into())
}

/// POST /api/pharmacies
pub async fn create_pharmacy(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<PharmacyFields>,
) -> Result<(StatusCode, Json<Pharmacy>), ApiError> {
    let created = state.pharmacies.create(fields).await?;
    info!("Created pharmacy {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/pharmacies/:id
pub async fn update_pharmacy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PharmacyFields>,
) -> Result<Json<Pharmacy>, ApiError> {
    let id = parse_id(&id)?;
    state
        .pharmacies
        .update(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| SheetError::NotFound.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marker_fields_splits_and_trims() {
        let names = parse_marker_fields(&["experience, position ,ageCategory"]);
        assert_eq!(names, vec!["experience", "position", "ageCategory"]);
    }

    #[test]
    fn test_parse_marker_fields_repeated_values() {
        let names = parse_marker_fields(&["experience".to_string(), " position ".to_string()]);
        assert_eq!(names, vec!["experience", "position"]);
    }

    #[test]
    fn test_parse_marker_fields_drops_empties() {
        let names = parse_marker_fields(&["", " , ,experience,"]);
        assert_eq!(names, vec!["experience"]);
        assert!(parse_marker_fields::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_id("688d340c48cd147ca6a4aa8f"),
            Err(SheetError::InvalidId)
        ));
    }

    #[test]
    fn test_api_response_ok() {
        let response = ApiResponse::ok("data");
        assert!(response.success);
        assert_eq!(response.request_id.len(), 36);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"data\":\"data\""));
    }

    #[test]
    fn test_marker_query_values_collects_repeats() {
        let params = vec![
            ("markerFieldNames".to_string(), "experience".to_string()),
            ("other".to_string(), "ignored".to_string()),
            ("markerFieldNames".to_string(), "position,ageCategory".to_string()),
            ("markerFieldNames[]".to_string(), "gender".to_string()),
        ];
        let values = marker_query_values(&params);
        assert_eq!(values, vec!["experience", "position,ageCategory", "gender"]);
        assert_eq!(
            parse_marker_fields(&values),
            vec!["experience", "position", "ageCategory", "gender"]
        );
    }

    #[test]
    fn test_marker_query_values_empty() {
        assert!(marker_query_values(&[]).is_empty());
        let params = vec![("markers".to_string(), "experience".to_string())];
        assert!(marker_query_values(&params).is_empty());
    }
}
