use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::parsing::models::{ParsedRecord, UploadedFile};
use crate::parsing::pipeline::parse_batch;
use crate::state::AppState;

/// Multipart part name carrying resume files.
const FILE_FIELD: &str = "file";
const NO_FILE_PART: &str = "No file part in the request";
const NO_SELECTED_FILES: &str = "No selected files";

/// POST /parse
///
/// Accepts repeated `file` parts and returns one record per file, in upload order.
/// Per-file failures are part of the 200 response; only an unusable request is a 400.
/// A body that is not multipart at all has no file part either.
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<ParsedRecord>>, AppError> {
    let multipart = multipart.map_err(|rejection| {
        debug!("Request is not multipart: {rejection}");
        AppError::Validation(NO_FILE_PART.to_string())
    })?;
    let files = read_uploaded_files(multipart).await?;
    info!("Received {} file(s) for parsing", files.len());

    let records = parse_batch(files, state.model.as_ref()).await;
    Ok(Json(records))
}

/// Collects every `file` part that carries a filename, in upload order.
///
/// Browsers send a single empty-named part when nothing was selected; that alone is
/// rejected. Once any part has a real name, empty-named parts are kept so each one
/// still gets its own record.
async fn read_uploaded_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        files.push(UploadedFile::new(name, bytes));
    }

    if files.is_empty() {
        return Err(AppError::Validation(NO_FILE_PART.to_string()));
    }
    if files.iter().all(|f| f.name.is_empty()) {
        return Err(AppError::Validation(NO_SELECTED_FILES.to_string()));
    }
    Ok(files)
}
