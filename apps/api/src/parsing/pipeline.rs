//! Batch Orchestrator — runs every uploaded file through
//! extract → prompt → model → normalize, one file at a time.
//!
//! Every file produces exactly one `ParsedRecord`, at the same index as its upload.
//! A failure is recorded against its own file and the batch carries on.

use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::llm_client::{LlmError, ModelClient};
use crate::parsing::extractor::{extract_text_blocking, is_pdf_file_name, ExtractError};
use crate::parsing::models::{ParsedRecord, UploadedFile};
use crate::parsing::normalizer::normalize_response;
use crate::parsing::prompts::build_resume_prompt;

const GENERIC_FAILURE: &str = "An error occurred during processing.";

/// Anything that stops a single file before the normalizer gets to run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("File is not a PDF and was skipped.")]
    NotPdf,

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Model(#[from] LlmError),
}

/// Parses every file in upload order. Never fails as a whole.
pub async fn parse_batch(files: Vec<UploadedFile>, model: &dyn ModelClient) -> Vec<ParsedRecord> {
    let batch_id = Uuid::new_v4();
    let span = info_span!("parse_batch", %batch_id, files = files.len());

    async move {
        let mut records = Vec::with_capacity(files.len());

        for (index, file) in files.into_iter().enumerate() {
            let record = parse_file(&file, model).await.unwrap_or_else(|e| {
                warn!("File #{index} ({}) failed: {e}", file.name);
                ParsedRecord::failed(&file.name, describe(&e))
            });
            debug_assert_eq!(record.file_name(), Some(file.name.as_str()));

            match record.error() {
                None => info!("File #{index} ({}) parsed", file.name),
                Some(error) => info!("File #{index} ({}) recorded as error: {error}", file.name),
            }
            records.push(record);
        }

        let failed = records.iter().filter(|r| r.is_error()).count();
        info!(
            "Batch complete: {} parsed, {failed} failed",
            records.len() - failed
        );
        records
    }
    .instrument(span)
    .await
}

async fn parse_file(
    file: &UploadedFile,
    model: &dyn ModelClient,
) -> Result<ParsedRecord, PipelineError> {
    if !is_pdf_file_name(&file.name) {
        return Err(PipelineError::NotPdf);
    }

    let text = extract_text_blocking(file.bytes.clone()).await?;
    let prompt = build_resume_prompt(&text);
    let raw = model.generate(&prompt).await?;

    Ok(normalize_response(&raw, &file.name))
}

fn describe(error: &PipelineError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    }
}
