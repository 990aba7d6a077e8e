//! HTTP surface: upload form, upload endpoint, health check

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assignment::assign;
use crate::error::AppError;
use crate::render::{render_assignment, render_index};
use crate::spreadsheet::read_first_column;
use crate::storage::UploadStore;

/// Form field carrying the spreadsheet
const FILE_FIELD: &str = "file";
/// Form field carrying one workday label; may repeat
const WORKDAYS_FIELD: &str = "workdays";

/// Shared, read-only state. Pools and assignments never live here.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<UploadStore>,
}

impl AppState {
    pub fn new(store: Arc<UploadStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(render_index())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Uploaded file as received from the form
struct UploadedFile {
    name: String,
    bytes: Bytes,
}

/// Parsed form submission
#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    workdays: Vec<String>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge
    } else {
        AppError::BadRequest(e.body_text())
    }
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was chosen
                if bytes.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile {
                    name: file_name,
                    bytes,
                });
            }
            Some(WORKDAYS_FIELD) | Some("workdays[]") => {
                let text = field.text().await.map_err(multipart_error)?;
                let label = text.trim();
                if !label.is_empty() {
                    form.workdays.push(label.to_string());
                }
            }
            other => log::debug!("Ignoring form field {:?}", other),
        }
    }

    Ok(form)
}

async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        log::debug!("Upload request is not multipart: {}", e);
        AppError::MissingUpload
    })?;

    let form = read_form(&mut multipart).await?;
    let file = form.file.ok_or(AppError::MissingUpload)?;

    let stored = state.store.save(&file.name, &file.bytes).await?;
    let path = stored.path().to_path_buf();
    let parsed = tokio::task::spawn_blocking(move || read_first_column(path)).await;

    // The pool is in memory from here on; the file is no longer needed
    let key = stored.key().to_string();
    if let Err(e) = stored.discard().await {
        log::warn!("Failed to remove upload {}: {}", key, e);
    }

    let mut pool = parsed.map_err(|e| AppError::Internal(format!("spreadsheet task: {}", e)))??;
    if pool.is_empty() {
        log::warn!("Upload {} has no values in its first column", key);
    }

    let mut rng = StdRng::from_os_rng();
    let assignment = assign(&mut pool, &form.workdays, &mut rng)?;

    if assignment.is_empty() {
        log::info!("No workdays submitted with upload {}", key);
    } else {
        log::info!(
            "Drew {} of {} values for upload {}",
            assignment.len(),
            assignment.len() + pool.len(),
            key
        );
    }

    Ok(Html(render_assignment(&assignment)))
}
