use std::path::{Path, PathBuf};

use crate::{decode_image, DecodedImage, ExportedImage, RasterError};

/// Read and decode an image file.
pub async fn load_image_file(path: impl AsRef<Path>) -> Result<DecodedImage, RasterError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.inspect_err(|err| {
        log::warn!("failed to read {}: {}", path.display(), err);
    })?;
    decode_image(&bytes)
}

/// Write an export into `dir` under its generated filename.
pub async fn write_export(
    dir: impl AsRef<Path>,
    exported: &ExportedImage,
) -> Result<PathBuf, RasterError> {
    let path = dir.as_ref().join(exported.filename.as_str());
    tokio::fs::write(&path, &exported.png).await.inspect_err(|err| {
        log::error!("failed to write {}: {}", path.display(), err);
    })?;
    Ok(path)
}
