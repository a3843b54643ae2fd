use std::path::Path;

use anyhow::Context;

/**
 * This module contains all logic for loading meshes and images from external files.
 */
pub mod mesh;

pub async fn load_string(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

pub async fn load_binary(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Reads and decodes an image; the format is guessed from the file contents.
pub async fn load_image(path: impl AsRef<Path>) -> anyhow::Result<image::DynamicImage> {
    let path = path.as_ref();
    let data = load_binary(path).await?;
    let img = image::load_from_memory(&data)
        .with_context(|| format!("failed to decode image {}", path.display()))?;
    log::info!(
        "loaded image {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// [`load_image`] for an optional path.
pub async fn load_optional_image(
    path: Option<&Path>,
) -> anyhow::Result<Option<image::DynamicImage>> {
    match path {
        Some(path) => Ok(Some(load_image(path).await?)),
        None => Ok(None),
    }
}
