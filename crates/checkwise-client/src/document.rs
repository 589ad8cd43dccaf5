use std::path::Path;

use tracing::info;

use crate::error::ClientError;

/// File families the extraction service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Spreadsheet,
    Text,
}

/// An uploaded report, read fully into memory.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub kind: DocumentKind,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Document {
    /// Build a document from bytes, classifying it by the file name's extension.
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Result<Self, ClientError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let (kind, mime_type) = document_kind_for_extension(ext)
            .ok_or_else(|| ClientError::UnsupportedFileType(file_name.to_string()))?;

        Ok(Self {
            file_name: file_name.to_string(),
            kind,
            mime_type,
            bytes,
        })
    }

    /// Read a document from disk. The extension is checked before the file is
    /// read, so unsupported files never touch the network or the disk twice.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::UnsupportedFileType(path.display().to_string()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if document_kind_for_extension(ext).is_none() {
            return Err(ClientError::UnsupportedFileType(file_name.to_string()));
        }

        let bytes = tokio::fs::read(path).await?;
        info!(file_name, size = bytes.len(), "document loaded");
        Self::from_bytes(file_name, bytes)
    }
}

/// Map a file extension to a document kind and its MIME type.
///
/// Returns `None` for extensions the extraction service cannot process.
pub fn document_kind_for_extension(ext: &str) -> Option<(DocumentKind, &'static str)> {
    match ext.to_lowercase().as_str() {
        "pdf" => Some((DocumentKind::Pdf, "application/pdf")),
        "jpg" | "jpeg" => Some((DocumentKind::Image, "image/jpeg")),
        "png" => Some((DocumentKind::Image, "image/png")),
        "csv" => Some((DocumentKind::Spreadsheet, "text/csv")),
        "xlsx" => Some((
            DocumentKind::Spreadsheet,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )),
        "xls" => Some((DocumentKind::Spreadsheet, "application/vnd.ms-excel")),
        "txt" => Some((DocumentKind::Text, "text/plain")),
        _ => None,
    }
}
