use crate::editor::{EditorSession, TextRange};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const IMAGE_ACCEPT: &str = "image/*";
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "svg", "bmp", "tif", "tiff", "ico",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Builds a file whose MIME type is derived from its extension.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        let name = name.into();
        let mime_type = mime_for_path(Path::new(&name))?;
        Some(Self {
            name,
            mime_type: mime_type.to_string(),
            bytes,
        })
    }
}

/// Presents a file chooser limited to images. `None` when the user cancels.
pub trait ImagePicker {
    fn pick_image(&mut self) -> Option<PickedFile>;
}

/// Receives a picked image and the caret position it belongs at. Progress
/// and failure reporting are the uploader's concern.
pub trait ImageUploader {
    fn start_upload(&mut self, file: PickedFile, surface: &mut dyn EditorSession, pos: usize);
}

/// Records the caret position before the picker opens, then hands any picked
/// file to the uploader.
pub fn begin_image_upload(
    picker: &mut dyn ImagePicker,
    uploader: &mut dyn ImageUploader,
    editor: &mut dyn EditorSession,
) {
    let pos = editor.selection_from();
    let Some(file) = picker.pick_image() else {
        tracing::debug!("image picker dismissed");
        return;
    };
    tracing::info!(name = %file.name, size = file.bytes.len(), pos, "starting image upload");
    uploader.start_upload(file, editor, pos);
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "ico" => Some("image/ico"),
        _ => None,
    }
}

fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "image/bmp" => Some("bmp"),
        "image/tiff" => Some("tiff"),
        "image/ico" | "image/x-icon" | "image/vnd.microsoft.icon" => Some("ico"),
        _ => None,
    }
}

#[cfg(feature = "native-dialog")]
#[derive(Debug, Default)]
pub struct NativeImagePicker;

#[cfg(feature = "native-dialog")]
impl ImagePicker for NativeImagePicker {
    fn pick_image(&mut self) -> Option<PickedFile> {
        let path = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()?;
        let name = path.file_name()?.to_str().unwrap_or("image").to_string();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %path.display(), "failed to read picked image: {err}");
                return None;
            }
        };
        PickedFile::from_name(name, bytes)
    }
}

#[derive(Debug)]
pub enum AssetError {
    Io(std::io::Error),
    UnsupportedType(String),
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "asset io error: {err}"),
            Self::UnsupportedType(mime) => write!(f, "unsupported image type: {mime}"),
        }
    }
}

impl std::error::Error for AssetError {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub hash: String,
    pub path: String,
    pub mime_type: String,
    pub size: usize,
    pub original_name: String,
    pub stored_at: i64,
}

impl AssetRecord {
    pub fn source(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

/// Stores picked images under `<root>/assets/<sha256>.<ext>` and inserts a
/// markdown image reference into the editor.
#[derive(Clone, Debug)]
pub struct LocalAssetUploader {
    root: PathBuf,
    uploaded: Vec<AssetRecord>,
}

impl LocalAssetUploader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            uploaded: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uploaded(&self) -> &[AssetRecord] {
        &self.uploaded
    }

    pub fn store(&self, file: &PickedFile) -> Result<AssetRecord, AssetError> {
        let ext = extension_for_mime(&file.mime_type)
            .ok_or_else(|| AssetError::UnsupportedType(file.mime_type.clone()))?;
        let hash = hash_bytes(&file.bytes);
        let relative_path = PathBuf::from("assets").join(format!("{hash}.{ext}"));
        let full_path = self.root.join(&relative_path);

        if !full_path.exists() {
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full_path, &file.bytes)?;
        }

        Ok(AssetRecord {
            hash,
            path: relative_path.to_string_lossy().replace('\\', "/"),
            mime_type: file.mime_type.clone(),
            size: file.bytes.len(),
            original_name: file.name.clone(),
            stored_at: Utc::now().timestamp_millis(),
        })
    }
}

impl ImageUploader for LocalAssetUploader {
    fn start_upload(&mut self, file: PickedFile, surface: &mut dyn EditorSession, pos: usize) {
        match self.store(&file) {
            Ok(record) => {
                let text = markdown_image_text(&record.source(), &file.name);
                surface.insert_content(TextRange::caret(pos), &text);
                tracing::info!(hash = %record.hash, path = %record.path, "image stored");
                self.uploaded.push(record);
            }
            Err(err) => {
                tracing::warn!(name = %file.name, "image upload failed: {err}");
            }
        }
    }
}

pub fn markdown_image_text(source: &str, original_name: &str) -> String {
    let alt: String = original_name
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '[' | ']' | '(' | ')'))
        .map(|ch| if matches!(ch, '\n' | '\r') { ' ' } else { ch })
        .collect();
    format!("![{}]({source})", alt.trim())
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
