/// Photo selection for the record form
///
/// Opens the native file picker, reads the chosen file and works out the
/// MIME type the upload endpoint expects.
use image::ImageFormat;
use rfd::AsyncFileDialog;
use std::path::Path;
use std::sync::Arc;

/// Extensions offered by the picker
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    #[error("could not read {path}: {reason}")]
    Read { path: String, reason: String },
}

/// A photo chosen by the user, held in memory until upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPhoto {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedPhoto {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = detect_mime_type(&file_name, &bytes).to_string();
        Self {
            file_name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Show the picker and load the chosen file.
/// `Ok(None)` means the dialog was dismissed.
pub async fn pick_photo() -> Result<Option<SelectedPhoto>, PhotoError> {
    let Some(handle) = AsyncFileDialog::new()
        .set_title("Select a Photo")
        .add_filter("Images", PHOTO_EXTENSIONS)
        .pick_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    let bytes = tokio::fs::read(&path).await.map_err(|e| PhotoError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let photo = SelectedPhoto::new(handle.file_name(), bytes);
    tracing::debug!(
        file = %photo.file_name,
        mime = %photo.mime_type,
        size = photo.size(),
        "📷 photo selected"
    );
    Ok(Some(photo))
}

/// MIME type from the file extension, falling back to the content
fn detect_mime_type(file_name: &str, bytes: &[u8]) -> &'static str {
    ImageFormat::from_path(Path::new(file_name))
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// True when the bytes start like an image the thumbnail widget can show
pub fn looks_like_image(bytes: &[u8]) -> bool {
    image::guess_format(bytes).is_ok()
}
