//! Cache of parsed layouts keyed by name.

use super::parser::LayoutParser;
use super::tree::UiTree;
use crate::atlas::AtlasManager;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Layout tree shared between the cache and the screens using it.
pub type SharedLayout = Rc<RefCell<UiTree>>;

/// Loads layouts from a directory and hands out shared trees.
///
/// Repeated requests for the same name return the same tree until the cache
/// is cleared. Failed loads are not cached, so a later request retries.
#[derive(Debug, Default)]
pub struct LayoutManager {
    layout_dir: PathBuf,
    asset_dir: PathBuf,
    cache: HashMap<String, SharedLayout>,
}

impl LayoutManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_layout_directory(&mut self, dir: impl Into<PathBuf>) {
        self.layout_dir = dir.into();
    }

    pub fn set_asset_directory(&mut self, dir: impl Into<PathBuf>) {
        self.asset_dir = dir.into();
    }

    pub fn layout_directory(&self) -> &Path {
        &self.layout_dir
    }

    pub fn asset_directory(&self) -> &Path {
        &self.asset_dir
    }

    /// File a layout name resolves to. `.xml` is appended unless the name
    /// already contains it.
    pub fn layout_path(&self, name: &str) -> PathBuf {
        if name.contains(".xml") {
            self.layout_dir.join(name)
        } else {
            self.layout_dir.join(format!("{}.xml", name))
        }
    }

    /// Get a cached layout, loading it on first request.
    pub fn get_layout(&mut self, name: &str, atlases: &AtlasManager) -> Option<SharedLayout> {
        if let Some(layout) = self.cache.get(name) {
            return Some(Rc::clone(layout));
        }

        let path = self.layout_path(name);
        let mut parser = LayoutParser::new().with_atlases(atlases);
        if !self.asset_dir.as_os_str().is_empty() {
            parser = parser.with_asset_base(&self.asset_dir);
        }

        match parser.load_layout(&path) {
            Ok(tree) => {
                let layout = Rc::new(RefCell::new(tree));
                self.cache.insert(name.to_string(), Rc::clone(&layout));
                Some(layout)
            }
            Err(e) => {
                log::warn!("Layout '{}' failed to load: {}", name, e);
                None
            }
        }
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached layout. Screens still holding a tree keep it alive.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_layout_path_extension() {
        let mut manager = LayoutManager::new();
        manager.set_layout_directory("layouts");
        assert_eq!(manager.layout_path("HUD/TopBar"), Path::new("layouts/HUD/TopBar.xml"));
        assert_eq!(manager.layout_path("menu.xml"), Path::new("layouts/menu.xml"));
    }

    #[test]
    fn test_cache_identity_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("menu.xml"), r#"<layout name="menu"/>"#).unwrap();

        let atlases = AtlasManager::new();
        let mut manager = LayoutManager::new();
        manager.set_layout_directory(dir.path());

        let first = manager.get_layout("menu", &atlases).unwrap();
        let second = manager.get_layout("menu", &atlases).unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        manager.clear_cache();
        assert!(!manager.is_cached("menu"));
        let third = manager.get_layout("menu", &atlases).unwrap();
        assert!(!Rc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_failed_load_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let atlases = AtlasManager::new();
        let mut manager = LayoutManager::new();
        manager.set_layout_directory(dir.path());

        assert!(manager.get_layout("late", &atlases).is_none());
        assert_eq!(manager.cached_count(), 0);

        fs::write(dir.path().join("late.xml"), "<layout/>").unwrap();
        assert!(manager.get_layout("late", &atlases).is_some());
    }
}
