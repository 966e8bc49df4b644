//! Plugin icon directory.
//!
//! Icons live next to the catalogue as `<icons>/<identifier>.png`. Missing
//! icons are filled with the repository owner's avatar, re-encoded as RGBA
//! PNG. Resizing and palette optimization happen elsewhere.

use std::path::PathBuf;

use async_trait::async_trait;
use image::ImageFormat;

use super::domain::EnrichmentError;
use super::traits::{AvatarApi, IconStore};

/// Icon store backed by a directory of PNG files.
pub struct DirectoryIconStore<A> {
    dir: PathBuf,
    api: A,
    dry_run: bool,
}

impl<A> DirectoryIconStore<A> {
    pub fn new(dir: impl Into<PathBuf>, api: A) -> Self {
        Self {
            dir: dir.into(),
            api,
            dry_run: false,
        }
    }

    /// Report fetches without downloading or writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Path of the icon for an identifier.
    pub fn icon_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.png"))
    }
}

#[async_trait]
impl<A: AvatarApi> IconStore for DirectoryIconStore<A> {
    fn has_icon(&self, id: &str) -> bool {
        self.icon_path(id).exists()
    }

    async fn fetch_icon(&self, id: &str, owner: &str) -> Result<(), EnrichmentError> {
        if id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(EnrichmentError::Io(format!(
                "identifier {id:?} is not usable as a file name"
            )));
        }

        if self.dry_run {
            tracing::info!("{}: would fetch icon from {}", id, owner);
            return Ok(());
        }

        let bytes = self.api.fetch_avatar(owner).await?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| EnrichmentError::Image(e.to_string()))?
            .into_rgba8();

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| EnrichmentError::Io(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.icon_path(id);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| EnrichmentError::Image(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("{}: saved icon to {:?}", id, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FixedAvatar(Result<Vec<u8>, EnrichmentError>);

    #[async_trait]
    impl AvatarApi for FixedAvatar {
        async fn fetch_avatar(&self, _owner: &str) -> Result<Vec<u8>, EnrichmentError> {
            self.0.clone()
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_fetch_writes_rgba_png() {
        let dir = tempfile::tempdir().unwrap();
        let icons = dir.path().join("icons");
        let store = DirectoryIconStore::new(&icons, FixedAvatar(Ok(png_bytes())));

        assert!(!store.has_icon("com.x.y"));
        store.fetch_icon("com.x.y", "x").await.unwrap();
        assert!(store.has_icon("com.x.y"));

        let saved = image::open(store.icon_path("com.x.y")).unwrap();
        assert_eq!(saved.color(), image::ColorType::Rgba8);
        assert_eq!((saved.width(), saved.height()), (4, 4));
    }

    #[tokio::test]
    async fn test_undecodable_avatar_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryIconStore::new(dir.path(), FixedAvatar(Ok(b"not an image".to_vec())));

        let err = store.fetch_icon("com.x.y", "x").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Image(_)));
        assert!(!store.has_icon("com.x.y"));
    }

    #[tokio::test]
    async fn test_avatar_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryIconStore::new(dir.path(), FixedAvatar(Err(EnrichmentError::NotFound)));

        let err = store.fetch_icon("a", "x").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::NotFound));
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryIconStore::new(dir.path(), FixedAvatar(Ok(png_bytes()))).dry_run(true);

        store.fetch_icon("com.x.y", "x").await.unwrap();
        assert!(!store.has_icon("com.x.y"));
    }

    #[tokio::test]
    async fn test_rejects_path_like_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryIconStore::new(dir.path(), FixedAvatar(Ok(png_bytes())));

        assert!(store.fetch_icon("../escape", "x").await.is_err());
        assert!(store.fetch_icon("a/b", "x").await.is_err());
    }
}
