//! `POST /ai/ingest/pptx`: document ingestion stub.

use agent_core::ingest::{IngestResponse, IngestSource, plan_ingest};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{HeaderMap, header};
use axum::{Form, Json};
use metrics::counter;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::metrics::INGEST_REQUESTS_TOTAL;

/// Form field carrying the uploaded document.
pub const FILE_FIELD: &str = "file";
/// Form field carrying a server-side path.
pub const FILE_PATH_FIELD: &str = "file_path";

const URLENCODED: &str = "application/x-www-form-urlencoded";

/// Values read from the ingestion form.
#[derive(Debug, Default)]
struct IngestForm {
    upload: Option<(String, u64)>,
    file_path: Option<String>,
}

/// Urlencoded forms can only carry a path.
#[derive(Debug, Default, Deserialize)]
struct PathForm {
    file_path: Option<String>,
}

/// Accept a document for ingestion.
///
/// Multipart forms may carry an upload and/or a path; urlencoded forms only a
/// path. Any other body is treated as an empty form and gets the
/// "missing source" error body.
pub async fn ingest_handler(request: Request) -> Result<Json<IngestResponse>, ApiError> {
    let form = if is_urlencoded(request.headers()) {
        match Form::<PathForm>::from_request(request, &()).await {
            Ok(Form(path_form)) => IngestForm {
                upload: None,
                file_path: path_form.file_path,
            },
            Err(rejection) => {
                debug!(%rejection, "unreadable urlencoded ingest form");
                IngestForm::default()
            }
        }
    } else {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => read_form(multipart).await?,
            Err(rejection) => {
                debug!(%rejection, "ingest request is not a form");
                IngestForm::default()
            }
        }
    };

    let source = IngestSource::from_parts(form.upload, form.file_path);
    match &source {
        Some(IngestSource::Upload {
            filename,
            size_bytes,
        }) => info!(%filename, size_bytes, "ingest upload received"),
        Some(IngestSource::Path(path)) => info!(%path, "ingest path received"),
        None => debug!("ingest request without file or path"),
    }

    let response = plan_ingest(source);
    counter!(INGEST_REQUESTS_TOTAL, "status" => response.status()).increment(1);
    Ok(Json(response))
}

fn is_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(URLENCODED))
}

/// Read known fields; the uploaded file is drained and only counted.
async fn read_form(mut multipart: Multipart) -> Result<IngestForm, ApiError> {
    let mut form = IngestForm::default();
    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let mut size_bytes = 0u64;
                while let Some(chunk) = field.chunk().await? {
                    size_bytes += chunk.len() as u64;
                }
                form.upload = Some((filename, size_bytes));
            }
            Some(FILE_PATH_FIELD) => form.file_path = Some(field.text().await?),
            other => debug!(field = ?other, "ignoring unknown ingest form field"),
        }
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agent_core::{CannedProducer, ChatProducer};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::Router;
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::server::AgentServer;

    const BOUNDARY: &str = "agent-test-boundary";

    fn app(config: ServerConfig) -> Router {
        let producer: Arc<dyn ChatProducer> = Arc::new(CannedProducer::default());
        AgentServer::new(config, producer, "test").router()
    }

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(filename: &str, content: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/vnd.openxmlformats-officedocument.presentationml.presentation\r\n\r\n\
             {content}\r\n"
        )
    }

    fn multipart_request(parts: &[String]) -> Request<Body> {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        Request::builder()
            .method("POST")
            .uri("/ai/ingest/pptx")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn upload_is_pending_with_filename() {
        let req = multipart_request(&[file_part("deck.pptx", "PK fake pptx bytes")]);
        let resp = app(ServerConfig::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(json["status"], "pending");
        assert_eq!(json["filename"], "deck.pptx");
        assert!(json["todo"].is_array());
    }

    #[tokio::test]
    async fn path_is_pending_with_file_path() {
        let req = multipart_request(&[text_part("file_path", "/srv/decks/q3.pptx")]);
        let resp = app(ServerConfig::default()).oneshot(req).await.unwrap();

        let json = json_body(resp).await;
        assert_eq!(json["status"], "pending");
        assert_eq!(json["file_path"], "/srv/decks/q3.pptx");
        assert!(json.get("filename").is_none());
    }

    #[tokio::test]
    async fn upload_wins_when_both_supplied() {
        let req = multipart_request(&[
            text_part("file_path", "/srv/other.pptx"),
            file_part("deck.pptx", "bytes"),
        ]);
        let json = json_body(app(ServerConfig::default()).oneshot(req).await.unwrap()).await;
        assert_eq!(json["filename"], "deck.pptx");
        assert!(json.get("file_path").is_none());
    }

    #[tokio::test]
    async fn empty_form_is_an_error_body() {
        let req = multipart_request(&[text_part("comment", "nothing here")]);
        let resp = app(ServerConfig::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "请提供文件或文件路径"})
        );
    }

    #[tokio::test]
    async fn non_multipart_request_is_an_error_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/ai/ingest/pptx")
            .body(Body::empty())
            .unwrap();
        let resp = app(ServerConfig::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(json["status"], "error");
        assert!(json.get("todo").is_none());
    }

    #[tokio::test]
    async fn urlencoded_path_is_pending() {
        let req = Request::builder()
            .method("POST")
            .uri("/ai/ingest/pptx")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("file_path=%2Fsrv%2Fa.pptx"))
            .unwrap();
        let resp = app(ServerConfig::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(json["status"], "pending");
        assert_eq!(json["file_path"], "/srv/a.pptx");
    }

    #[tokio::test]
    async fn urlencoded_without_path_is_an_error_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/ai/ingest/pptx")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("comment=hello"))
            .unwrap();
        let json = json_body(app(ServerConfig::default()).oneshot(req).await.unwrap()).await;
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "请提供文件或文件路径"})
        );
    }

    #[tokio::test]
    async fn whitespace_path_counts_as_supplied() {
        let req = multipart_request(&[text_part("file_path", "   ")]);
        let json = json_body(app(ServerConfig::default()).oneshot(req).await.unwrap()).await;
        assert_eq!(json["status"], "pending");
        assert_eq!(json["file_path"], "   ");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let config = ServerConfig {
            max_upload_bytes: 64,
            ..ServerConfig::default()
        };
        let req = multipart_request(&[file_part("big.pptx", &"x".repeat(4096))]);
        let resp = app(config).oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());

        let json = json_body(resp).await;
        assert_eq!(json["status"], "error");
    }
}
