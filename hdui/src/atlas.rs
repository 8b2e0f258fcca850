//! Texture atlases: one packed image plus named sub-regions.
//!
//! Manifests are XML in the TexturePacker "Sparrow" shape:
//!
//! ```xml
//! <TextureAtlas imagePath="atlas_00.png">
//!     <SubTexture name="button.png" x="0" y="0" width="64" height="32"/>
//! </TextureAtlas>
//! ```

use crate::bitmap::{Bitmap, Region};
use crate::error::{HdUiError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A named region of an atlas and the view onto it.
#[derive(Debug, Clone)]
pub struct AtlasEntry {
    pub region: Region,
    pub bitmap: Bitmap,
}

/// One atlas image and its named sub-textures.
#[derive(Debug)]
pub struct TextureAtlas {
    sub_textures: HashMap<String, AtlasEntry>,
    image: Bitmap,
    image_path: PathBuf,
}

impl TextureAtlas {
    /// Load an atlas manifest and the image it references.
    ///
    /// `imagePath` is resolved relative to the manifest's directory.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(manifest_path).map_err(|source| HdUiError::Io {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let doc = roxmltree::Document::parse(&text).map_err(|source| HdUiError::Xml {
            path: manifest_path.to_path_buf(),
            source,
        })?;

        let root = doc.root_element();
        if root.tag_name().name() != "TextureAtlas" {
            return Err(HdUiError::UnexpectedRoot {
                expected: "TextureAtlas",
                found: root.tag_name().name().to_string(),
            });
        }

        let image_name = root
            .attribute("imagePath")
            .ok_or(HdUiError::MissingAttribute {
                element: "TextureAtlas",
                attribute: "imagePath",
            })?;
        let image_path = manifest_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(image_name);
        let image = Bitmap::load(&image_path)?;

        let mut sub_textures = HashMap::new();
        for node in root.children().filter(|n| n.has_tag_name("SubTexture")) {
            let Some(name) = node.attribute("name") else {
                log::debug!("Skipping unnamed SubTexture in {}", manifest_path.display());
                continue;
            };
            let int = |attr: &str| {
                node.attribute(attr)
                    .and_then(|v| v.trim().parse::<u32>().ok())
                    .unwrap_or(0)
            };

            let bitmap = image.sub_bitmap(int("x"), int("y"), int("width"), int("height"));
            sub_textures.insert(
                name.to_string(),
                AtlasEntry {
                    region: bitmap.region(),
                    bitmap,
                },
            );
        }

        log::info!(
            "Loaded atlas {} ({} sub-textures)",
            manifest_path.display(),
            sub_textures.len()
        );

        Ok(Self {
            sub_textures,
            image,
            image_path,
        })
    }

    /// View onto a named sub-texture.
    pub fn get_texture(&self, name: &str) -> Option<&Bitmap> {
        self.sub_textures.get(name).map(|entry| &entry.bitmap)
    }

    pub fn get_entry(&self, name: &str) -> Option<&AtlasEntry> {
        self.sub_textures.get(name)
    }

    pub fn has_texture(&self, name: &str) -> bool {
        self.sub_textures.contains_key(name)
    }

    /// Resolved path of the atlas image.
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn image(&self) -> &Bitmap {
        &self.image
    }

    pub fn len(&self) -> usize {
        self.sub_textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_textures.is_empty()
    }
}

/// Ordered collection of atlases. Lookups return the first atlas, in load
/// order, that has the requested name.
#[derive(Debug, Default)]
pub struct AtlasManager {
    base_path: PathBuf,
    atlases: Vec<TextureAtlas>,
}

impl AtlasManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that manifest names are resolved against. Already loaded
    /// atlases are unaffected.
    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load `<base>/<manifest_name>` and append it to the search order.
    pub fn load_atlas(&mut self, manifest_name: &str) -> Result<()> {
        let atlas = TextureAtlas::load(&self.base_path.join(manifest_name))?;
        self.atlases.push(atlas);
        Ok(())
    }

    pub fn get_texture(&self, name: &str) -> Option<&Bitmap> {
        self.atlases.iter().find_map(|atlas| atlas.get_texture(name))
    }

    pub fn has_texture(&self, name: &str) -> bool {
        self.atlases.iter().any(|atlas| atlas.has_texture(name))
    }

    pub fn atlas_count(&self) -> usize {
        self.atlases.len()
    }

    pub fn clear_all(&mut self) {
        self.atlases.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;

    fn write_atlas(dir: &Path, manifest: &str, image: &str, colour: [u8; 4], body: &str) {
        let mut img = RgbaImage::new(8, 8);
        for p in img.pixels_mut() {
            *p = Rgba(colour);
        }
        img.save(dir.join(image)).unwrap();
        fs::write(
            dir.join(manifest),
            format!(r#"<TextureAtlas imagePath="{}">{}</TextureAtlas>"#, image, body),
        )
        .unwrap();
    }

    #[test]
    fn test_load_atlas_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_atlas(
            dir.path(),
            "a.xml",
            "a.png",
            [255, 0, 0, 255],
            r#"<SubTexture name="btn.png" x="2" y="2" width="4" height="3"/>
               <SubTexture x="0" y="0" width="1" height="1"/>
               <SubTexture name="edge.png" x="6" y="6" width="10" height="10"/>"#,
        );

        let atlas = TextureAtlas::load(&dir.path().join("a.xml")).unwrap();
        assert_eq!(atlas.len(), 2);
        assert!(atlas.has_texture("btn.png"));
        assert_eq!(atlas.image_path(), dir.path().join("a.png"));

        let btn = atlas.get_texture("btn.png").unwrap();
        assert_eq!((btn.width(), btn.height()), (4, 3));
        assert!(btn.shares_pixels_with(atlas.image()));

        // Clamped to the 8x8 image
        let edge = atlas.get_entry("edge.png").unwrap();
        assert_eq!((edge.region.width, edge.region.height), (2, 2));
    }

    #[test]
    fn test_wrong_root_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.xml"), r#"<Atlas imagePath="x.png"/>"#).unwrap();

        let result = TextureAtlas::load(&dir.path().join("bad.xml"));
        assert!(matches!(result, Err(HdUiError::UnexpectedRoot { .. })));
    }

    #[test]
    fn test_missing_image_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.xml"), "<TextureAtlas/>").unwrap();

        let result = TextureAtlas::load(&dir.path().join("bad.xml"));
        assert!(matches!(
            result,
            Err(HdUiError::MissingAttribute {
                attribute: "imagePath",
                ..
            })
        ));
    }

    #[test]
    fn test_manager_first_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_atlas(
            dir.path(),
            "a.xml",
            "a.png",
            [255, 0, 0, 255],
            r#"<SubTexture name="shared.png" x="0" y="0" width="2" height="2"/>"#,
        );
        write_atlas(
            dir.path(),
            "b.xml",
            "b.png",
            [0, 0, 255, 255],
            r#"<SubTexture name="shared.png" x="0" y="0" width="2" height="2"/>
               <SubTexture name="only_b.png" x="0" y="0" width="1" height="1"/>"#,
        );

        let mut manager = AtlasManager::new();
        manager.set_base_path(dir.path());
        manager.load_atlas("a.xml").unwrap();
        manager.load_atlas("b.xml").unwrap();
        assert!(manager.load_atlas("missing.xml").is_err());
        assert_eq!(manager.atlas_count(), 2);

        let shared = manager.get_texture("shared.png").unwrap();
        assert_eq!(shared.pixel(0, 0), Some(Rgba([255, 0, 0, 255])));
        assert!(manager.has_texture("only_b.png"));
        assert!(manager.get_texture("nope.png").is_none());

        manager.clear_all();
        assert!(manager.get_texture("shared.png").is_none());
    }
}
