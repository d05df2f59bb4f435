//! Document ingestion stub.
//!
//! Ingestion is not implemented. [`plan_ingest`] reports what would happen
//! to the supplied document; the `todo` list documents intent and its
//! contents and ordering are not a stable contract.

use serde::Serialize;

/// Message returned while ingestion is pending implementation.
pub const PENDING_MESSAGE: &str = "PPT 摄入功能尚未实现";

/// Message returned when neither a file nor a path is supplied.
pub const MISSING_SOURCE_MESSAGE: &str = "请提供文件或文件路径";

const UPLOAD_STEPS: [&str; 4] = [
    "解析 PPT 文件",
    "提取文本内容",
    "生成文本 Embedding",
    "存储到 Weaviate 向量数据库",
];

const PATH_STEPS: [&str; 4] = [
    "读取 PPT 文件",
    "提取文本内容",
    "生成文本 Embedding",
    "存储到 Weaviate 向量数据库",
];

/// Where the document to ingest comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestSource {
    /// An uploaded file.
    Upload {
        /// Client-supplied file name.
        filename: String,
        /// Bytes received.
        size_bytes: u64,
    },
    /// A path readable by the server.
    Path(String),
}

impl IngestSource {
    /// Pick the source from optional form values.
    ///
    /// An upload wins over a path. Empty strings count as absent.
    pub fn from_parts(upload: Option<(String, u64)>, file_path: Option<String>) -> Option<Self> {
        if let Some((filename, size_bytes)) = upload.filter(|(name, _)| !name.is_empty()) {
            return Some(Self::Upload {
                filename,
                size_bytes,
            });
        }
        file_path.filter(|p| !p.is_empty()).map(Self::Path)
    }
}

/// Body of an ingestion response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestResponse {
    /// Accepted, but nothing was done.
    Pending {
        /// Always [`PENDING_MESSAGE`].
        message: String,
        /// Uploaded file name.
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        /// Server-side path.
        #[serde(skip_serializing_if = "Option::is_none")]
        file_path: Option<String>,
        /// Steps a real implementation would perform.
        todo: Vec<String>,
    },
    /// The request could not be interpreted.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl IngestResponse {
    /// Error response with `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The serialized `status` value.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Pending { .. } => "pending",
            Self::Error { .. } => "error",
        }
    }
}

fn steps(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

/// Describe what ingesting `source` would involve.
pub fn plan_ingest(source: Option<IngestSource>) -> IngestResponse {
    match source {
        Some(IngestSource::Upload { filename, .. }) => IngestResponse::Pending {
            message: PENDING_MESSAGE.into(),
            filename: Some(filename),
            file_path: None,
            todo: steps(&UPLOAD_STEPS),
        },
        Some(IngestSource::Path(path)) => IngestResponse::Pending {
            message: PENDING_MESSAGE.into(),
            filename: None,
            file_path: Some(path),
            todo: steps(&PATH_STEPS),
        },
        None => IngestResponse::error(MISSING_SOURCE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_is_an_error_without_todo() {
        let value = serde_json::to_value(plan_ingest(None)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "error", "message": "请提供文件或文件路径"})
        );
        assert!(value.get("todo").is_none());
    }

    #[test]
    fn upload_is_pending_with_filename() {
        let source = IngestSource::Upload {
            filename: "deck.pptx".into(),
            size_bytes: 1024,
        };
        let value = serde_json::to_value(plan_ingest(Some(source))).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["message"], PENDING_MESSAGE);
        assert_eq!(value["filename"], "deck.pptx");
        assert!(value.get("file_path").is_none());
        assert_eq!(value["todo"].as_array().unwrap().len(), 4);
        assert_eq!(value["todo"][0], "解析 PPT 文件");
    }

    #[test]
    fn path_is_pending_with_file_path() {
        let value =
            serde_json::to_value(plan_ingest(Some(IngestSource::Path("/data/a.pptx".into()))))
                .unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["file_path"], "/data/a.pptx");
        assert!(value.get("filename").is_none());
        assert_eq!(value["todo"][0], "读取 PPT 文件");
    }

    #[test]
    fn upload_wins_over_path() {
        let source = IngestSource::from_parts(Some(("a.pptx".into(), 3)), Some("/b.pptx".into()));
        assert_eq!(
            source,
            Some(IngestSource::Upload {
                filename: "a.pptx".into(),
                size_bytes: 3
            })
        );
    }

    #[test]
    fn only_empty_values_count_as_absent() {
        assert_eq!(IngestSource::from_parts(None, Some(String::new())), None);
        assert_eq!(
            IngestSource::from_parts(None, Some("   ".into())),
            Some(IngestSource::Path("   ".into()))
        );
        assert_eq!(
            IngestSource::from_parts(Some((String::new(), 0)), Some("/x.pptx".into())),
            Some(IngestSource::Path("/x.pptx".into()))
        );
        assert_eq!(IngestSource::from_parts(None, None), None);
    }

    #[test]
    fn status_matches_serialized_tag() {
        for resp in [plan_ingest(None), plan_ingest(Some(IngestSource::Path("p".into())))] {
            let value = serde_json::to_value(&resp).unwrap();
            assert_eq!(value["status"], resp.status());
        }
    }
}
