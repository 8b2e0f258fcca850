use anyhow::{Context, Result, anyhow};
use clap::Parser;
use hdui::backend::SoftwareRenderer;
use hdui::gui::NodeId;
use hdui::{AtlasManager, Color, LayoutParser, Renderer, UiConfig, UiTree};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hdui-preview")]
#[command(about = "Render an Uplink HD layout file to a PNG")]
struct Cli {
    /// Layout XML file to render
    #[arg(value_name = "LAYOUT")]
    layout: PathBuf,

    /// Output image
    #[arg(short, long, default_value = "preview.png")]
    out: PathBuf,

    /// Output width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Directory image files are resolved against (default: from config)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Atlas manifest to search before loose files (repeatable)
    #[arg(long = "atlas", value_name = "MANIFEST")]
    atlases: Vec<PathBuf>,

    /// Font to register, as NAME=PATH (repeatable)
    #[arg(long = "font", value_name = "NAME=PATH", value_parser = parse_font)]
    fonts: Vec<(String, PathBuf)>,

    /// Background colour as hex
    #[arg(long, default_value = "000000")]
    background: String,

    /// JSON config file (default: $HDUI_CONFIG or built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the parsed node hierarchy
    #[arg(long)]
    dump: bool,
}

fn parse_font(s: &str) -> Result<(String, PathBuf)> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=PATH, got '{}'", s))?;
    Ok((name.to_string(), PathBuf::from(path)))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => UiConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => UiConfig::from_env_or_default(),
    };

    let mut atlases = AtlasManager::new();
    for manifest in &cli.atlases {
        let name = manifest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("invalid atlas path: {}", manifest.display()))?;
        atlases.set_base_path(manifest.parent().unwrap_or_else(|| Path::new("")));
        atlases
            .load_atlas(name)
            .with_context(|| format!("Failed to load atlas: {}", manifest.display()))?;
    }

    let asset_dir = cli.assets.clone().unwrap_or(config.asset_dir.clone());
    let parser = LayoutParser::new()
        .with_atlases(&atlases)
        .with_asset_base(asset_dir);
    let tree = parser
        .load_layout(&cli.layout)
        .with_context(|| format!("Failed to load layout: {}", cli.layout.display()))?;

    if cli.dump {
        dump_node(&tree, tree.root(), 0);
    }

    let mut renderer = SoftwareRenderer::new(cli.width, cli.height);
    renderer.init(cli.width, cli.height, false)?;
    let design = tree.design_size();
    renderer.set_base_resolution(design.x as u32, design.y as u32);

    for (name, path) in &cli.fonts {
        renderer
            .load_font(name, path)
            .with_context(|| format!("Failed to load font '{}': {}", name, path.display()))?;
    }

    renderer.begin_frame();
    renderer.clear(Color::from_hex(&cli.background));
    tree.draw(&mut renderer);
    renderer.end_frame();

    renderer
        .save_png(&cli.out)
        .with_context(|| format!("Failed to write {}", cli.out.display()))?;
    renderer.shutdown();

    println!(
        "Rendered '{}' ({} nodes, {}x{} design) to {}",
        tree.name(),
        tree.len(),
        design.x,
        design.y,
        cli.out.display()
    );
    Ok(())
}

fn dump_node(tree: &UiTree, id: NodeId, depth: usize) {
    let Some(node) = tree.get(id) else {
        return;
    };
    println!(
        "{:indent$}{} '{}' ({}, {}) {}x{}{}",
        "",
        node.kind.tag(),
        node.name,
        node.x,
        node.y,
        node.w,
        node.h,
        if node.visible { "" } else { " [hidden]" },
        indent = depth * 2
    );
    for &child in tree.children(id) {
        dump_node(tree, child, depth + 1);
    }
}
