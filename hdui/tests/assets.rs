//! Atlases, image resolution and the layout cache, using files on disk.

use hdui::backend::{DrawCommand, RecordingRenderer};
use hdui::gui::{ImageBitmap, NodeKind};
use hdui::{AtlasManager, LayoutManager, LayoutParser};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use std::rc::Rc;

fn solid_png(path: &Path, size: u32, colour: [u8; 4]) {
    let mut img = RgbaImage::new(size, size);
    for p in img.pixels_mut() {
        *p = Rgba(colour);
    }
    img.save(path).unwrap();
}

fn write_atlas(dir: &Path, name: &str, colour: [u8; 4], entries: &[&str]) {
    let image = format!("{}.png", name);
    solid_png(&dir.join(&image), 16, colour);
    let body: String = entries
        .iter()
        .map(|e| format!(r#"<SubTexture name="{}" x="0" y="0" width="8" height="8"/>"#, e))
        .collect();
    fs::write(
        dir.join(format!("{}.xml", name)),
        format!(r#"<TextureAtlas imagePath="{}">{}</TextureAtlas>"#, image, body),
    )
    .unwrap();
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

#[test]
fn texture_resolves_regardless_of_registration_order() {
    let dir = tempfile::tempdir().unwrap();
    write_atlas(dir.path(), "a", RED, &["other.png"]);
    write_atlas(dir.path(), "b", BLUE, &["icon1.png"]);

    for order in [["a.xml", "b.xml"], ["b.xml", "a.xml"]] {
        let mut atlases = AtlasManager::new();
        atlases.set_base_path(dir.path());
        for manifest in order {
            atlases.load_atlas(manifest).unwrap();
        }
        let icon = atlases.get_texture("icon1.png").unwrap();
        assert_eq!(icon.pixel(0, 0), Some(Rgba(BLUE)));
    }
}

#[test]
fn first_registered_atlas_wins_on_shared_name() {
    let dir = tempfile::tempdir().unwrap();
    write_atlas(dir.path(), "a", RED, &["shared.png"]);
    write_atlas(dir.path(), "b", BLUE, &["shared.png"]);

    let mut atlases = AtlasManager::new();
    atlases.set_base_path(dir.path());
    atlases.load_atlas("b.xml").unwrap();
    atlases.load_atlas("a.xml").unwrap();
    assert_eq!(
        atlases.get_texture("shared.png").unwrap().pixel(0, 0),
        Some(Rgba(BLUE))
    );
}

#[test]
fn images_prefer_atlas_then_file() {
    let dir = tempfile::tempdir().unwrap();
    write_atlas(dir.path(), "atlas", RED, &["logo.png"]);
    solid_png(&dir.path().join("loose.png"), 4, BLUE);

    let mut atlases = AtlasManager::new();
    atlases.set_base_path(dir.path());
    atlases.load_atlas("atlas.xml").unwrap();

    let tree = LayoutParser::new()
        .with_atlases(&atlases)
        .with_asset_base(dir.path())
        .parse_layout(
            r#"<layout>
                <Image name="logo" file="logo.png" x="10" y="10" w="32" h="32"/>
                <Image name="loose" file="loose.png" x="50" y="50"/>
                <Image name="gone" file="missing.png"/>
            </layout>"#,
        )
        .unwrap();

    let image = |name: &str| match &tree.get(tree.find(name).unwrap()).unwrap().kind {
        NodeKind::Image(data) => data.clone(),
        other => panic!("expected Image, got {:?}", other),
    };
    assert!(matches!(image("logo").bitmap, Some(ImageBitmap::Atlas(_))));
    assert!(image("loose").owns_bitmap());
    assert!(image("gone").bitmap.is_none());

    let mut renderer = RecordingRenderer::new();
    tree.draw(&mut renderer);
    let bitmaps: Vec<_> = renderer
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Bitmap { x, y, w, h, .. } => Some((*x, *y, *w, *h)),
            _ => None,
        })
        .collect();
    assert_eq!(
        bitmaps,
        vec![
            (10.0, 10.0, Some(32.0), Some(32.0)),
            (50.0, 50.0, None, None),
        ]
    );
}

#[test]
fn layout_cache_returns_same_tree() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("HUD")).unwrap();
    fs::write(dir.path().join("HUD/TopBar.xml"), r#"<layout name="TopBar"/>"#).unwrap();

    let atlases = AtlasManager::new();
    let mut layouts = LayoutManager::new();
    layouts.set_layout_directory(dir.path());

    let first = layouts.get_layout("HUD/TopBar", &atlases).unwrap();
    let second = layouts.get_layout("HUD/TopBar", &atlases).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(first.borrow().name(), "TopBar");
    assert!(layouts.get_layout("HUD/Missing", &atlases).is_none());
}
