use log::debug;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{ImagePayload, PromptRequest};
use crate::AnalyzerError;

/// An uploaded file: a declared media type plus its content
pub trait ImageUpload {
    fn media_type(&self) -> &str;

    fn content(&self) -> io::Result<Vec<u8>>;
}

/// Image file on disk. Only PNG and JPEG files are accepted.
#[derive(Debug, Clone)]
pub struct FileUpload {
    path: PathBuf,
    media_type: &'static str,
}

impl FileUpload {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, AnalyzerError> {
        let path = path.into();
        let media_type = media_type_for(&path).ok_or_else(|| {
            AnalyzerError::UnsupportedImage(format!(
                "{} (expected a .png, .jpg or .jpeg file)",
                path.display()
            ))
        })?;

        Ok(FileUpload { path, media_type })
    }
}

impl ImageUpload for FileUpload {
    fn media_type(&self) -> &str {
        self.media_type
    }

    fn content(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// Image already held in memory
#[derive(Debug, Clone)]
pub struct MemoryUpload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MemoryUpload {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        MemoryUpload {
            mime_type: mime_type.into(),
            data,
        }
    }
}

impl ImageUpload for MemoryUpload {
    fn media_type(&self) -> &str {
        &self.mime_type
    }

    fn content(&self) -> io::Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

fn media_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Read an upload into an [`ImagePayload`].
///
/// # Errors
/// Returns `AnalyzerError::MissingImage` when no upload was supplied or the
/// upload is empty, and `AnalyzerError::Io` when it cannot be read.
pub fn build_image_payload(
    upload: Option<&dyn ImageUpload>,
) -> Result<ImagePayload, AnalyzerError> {
    let upload = upload.ok_or(AnalyzerError::MissingImage)?;

    let bytes = upload.content()?;
    if bytes.is_empty() {
        return Err(AnalyzerError::MissingImage);
    }

    debug!(
        "Read {} bytes of {} image data",
        bytes.len(),
        upload.media_type()
    );

    Ok(ImagePayload {
        mime_type: upload.media_type().to_string(),
        bytes,
    })
}

/// Build the full request for one submission
pub fn build_request(
    upload: Option<&dyn ImageUpload>,
    user_text: &str,
) -> Result<PromptRequest, AnalyzerError> {
    let image = build_image_payload(upload)?;
    Ok(PromptRequest::new(image, user_text))
}
