pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeFile;

use crate::parsing::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let index = ServeFile::new(&state.config.index_file);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route_service("/", index)
        .route("/health", get(health::health_handler))
        .route("/parse", post(handlers::handle_parse))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::parsing::extractor::fixtures::pdf_with_pages;
    use crate::parsing::pipeline::testing::ScriptedModel;

    const BOUNDARY: &str = "resume-parser-test-boundary";

    fn router_with(model: Arc<ScriptedModel>) -> Router {
        router_with_config(model, Config::for_tests())
    }

    fn router_with_config(model: Arc<ScriptedModel>, config: Config) -> Router {
        build_router(AppState { model, config })
    }

    /// Builds a multipart body from `(field name, filename, content)` parts.
    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match file_name {
                Some(file_name) => {
                    format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n")
                }
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn parse_request(body: Vec<u8>) -> Request<Body> {
        Request::post("/parse")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(router_with(Arc::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_request_without_file_part_is_rejected() {
        let body = multipart_body(&[("comment", None, &b"hello"[..])]);
        let (status, body) = send(router_with(Arc::default()), parse_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No file part in the request"}));
    }

    #[tokio::test]
    async fn test_non_multipart_request_has_no_file_part() {
        let request = Request::post("/parse")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(router_with(Arc::default()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No file part in the request"}));
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected() {
        let model = Arc::new(ScriptedModel::default());
        let body = multipart_body(&[("file", Some(""), &b""[..])]);
        let (status, body) = send(router_with(model.clone()), parse_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No selected files"}));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_named_part_among_real_files_keeps_its_record() {
        let model = Arc::new(ScriptedModel::default());
        let body = multipart_body(&[
            ("file", Some("a.txt"), &b"plain text"[..]),
            ("file", Some(""), &b""[..]),
        ]);
        let (status, body) = send(router_with(model.clone()), parse_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"fileName": "a.txt", "error": "File is not a PDF and was skipped."},
                {"fileName": "", "error": "File is not a PDF and was skipped."}
            ])
        );
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_with_clear_message() {
        let config = Config {
            max_upload_bytes: 256,
            ..Config::for_tests()
        };
        let big = vec![b'x'; 4096];
        let body = multipart_body(&[("file", Some("big.pdf"), big.as_slice())]);
        let (status, body) = send(
            router_with_config(Arc::default(), config),
            parse_request(body),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({"error": "Upload exceeds the maximum allowed size"}));
    }

    #[tokio::test]
    async fn test_index_page_is_served() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let response = router_with(Arc::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_per_file_errors_still_return_ok() {
        let model = Arc::new(ScriptedModel::default());
        let body = multipart_body(&[
            ("file", Some("notes.txt"), &b"plain text"[..]),
            ("file", Some("cv.docx"), &b"PK\x03\x04"[..]),
        ]);
        let (status, body) = send(router_with(model.clone()), parse_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"fileName": "notes.txt", "error": "File is not a PDF and was skipped."},
                {"fileName": "cv.docx", "error": "File is not a PDF and was skipped."}
            ])
        );
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_pdf_upload_is_parsed_in_order() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("```json\n{\"name\": \"Ada Lovelace\", \"keySkills\": [\"Analysis\"]}\n```".to_string()),
            Ok("Sorry, I cannot help with that.".to_string()),
        ]));
        let ada = pdf_with_pages(&[Some("Ada Lovelace")]);
        let grace = pdf_with_pages(&[Some("Grace Hopper")]);
        let body = multipart_body(&[
            ("file", Some("ada.pdf"), ada.as_slice()),
            ("file", Some("grace.pdf"), grace.as_slice()),
        ]);

        let (status, body) = send(router_with(model.clone()), parse_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"fileName": "ada.pdf", "name": "Ada Lovelace", "keySkills": ["Analysis"]},
                {
                    "fileName": "grace.pdf",
                    "error": "Failed to parse Gemini's response as JSON",
                    "rawGeminiResponse": "Sorry, I cannot help with that."
                }
            ])
        );
        assert_eq!(model.prompts().len(), 2);
    }
}
