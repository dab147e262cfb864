//! Texture images referenced by materials.
//!
//! Textures resolve to `<folder>/<name>.png`. A missing file becomes a
//! placeholder so the material still imports; a file that exists but cannot
//! be read fails only the materials that use it.

use std::path::Path;

use hashbrown::HashMap;

use crate::scene::EditorImage;

/// Size given to placeholder images.
pub const PLACEHOLDER_SIZE: u32 = 8;

#[derive(Debug, Default)]
pub struct ImageLibrary {
    images: HashMap<String, Result<EditorImage, String>>,
}

impl ImageLibrary {
    /// Resolve every texture name against `dir`.
    pub fn load<'a>(dir: &Path, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut images = HashMap::new();
        for name in names {
            if images.contains_key(name) {
                continue;
            }
            let path = dir.join(format!("{name}.png"));
            let image = if path.is_file() {
                image::image_dimensions(&path)
                    .map(|(width, height)| EditorImage {
                        name: name.to_string(),
                        source: Some(path.clone()),
                        width,
                        height,
                    })
                    .map_err(|e| format!("Failed to load texture {}: {}", path.display(), e))
            } else {
                tracing::warn!("Texture {:?} not found, using a placeholder", path);
                Ok(Self::placeholder(name))
            };
            images.insert(name.to_string(), image);
        }
        Self { images }
    }

    pub fn placeholder(name: &str) -> EditorImage {
        EditorImage {
            name: name.to_string(),
            source: None,
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
        }
    }

    /// Image for a texture name, or why it could not be loaded.
    pub fn get(&self, name: &str) -> Result<&EditorImage, String> {
        match self.images.get(name) {
            Some(Ok(image)) => Ok(image),
            Some(Err(reason)) => Err(reason.clone()),
            None => Err(format!("texture {name:?} was not loaded")),
        }
    }

    /// Successfully resolved images, sorted by name.
    pub fn into_images(self) -> Vec<EditorImage> {
        let mut images: Vec<EditorImage> = self.images.into_values().filter_map(Result::ok).collect();
        images.sort_by(|a, b| a.name.cmp(&b.name));
        images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_missing_and_broken() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(4, 2)
            .save(dir.path().join("alp_col.png"))
            .unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

        let library = ImageLibrary::load(dir.path(), ["alp_col", "alp_nor", "broken", "alp_col"]);

        let col = library.get("alp_col").unwrap();
        assert_eq!((col.width, col.height), (4, 2));
        assert!(!col.is_placeholder());

        let nor = library.get("alp_nor").unwrap();
        assert!(nor.is_placeholder());
        assert_eq!(nor.width, PLACEHOLDER_SIZE);

        assert!(library.get("broken").is_err());
        assert!(library.get("never_requested").is_err());

        let names: Vec<_> = library.into_images().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["alp_col", "alp_nor"]);
    }
}
