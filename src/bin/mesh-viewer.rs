use std::path::PathBuf;

use clap::Parser;
use mesh_drawer::{
    config::DrawerConfig,
    viewer::{self, ViewerAssets},
};

/// Shows an OBJ mesh with up to two blended textures and an optional light.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Wavefront OBJ file to display.
    obj: PathBuf,

    /// Base texture (slot 0).
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// Second texture (slot 1) blended over the base.
    #[arg(short, long)]
    blend_texture: Option<PathBuf>,

    /// Blend factor between the two textures, 0 to 1.
    #[arg(long, default_value_t = 0.0)]
    blend: f32,

    /// Start with lighting enabled.
    #[arg(short, long)]
    lighting: bool,

    /// Start with textures hidden (flat red).
    #[arg(long)]
    hide_texture: bool,

    /// Ambient light coefficient.
    #[arg(long)]
    ambient: Option<f32>,

    /// Specular intensity.
    #[arg(long)]
    specular: Option<f32>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = DrawerConfig::default();
    if let Some(ambient) = args.ambient {
        config.ambient = ambient;
    }
    if let Some(specular) = args.specular {
        config.specular_intensity = specular;
    }

    let assets = ViewerAssets {
        obj: args.obj,
        textures: [args.texture, args.blend_texture],
        blend_factor: args.blend,
        show_texture: !args.hide_texture,
        lighting: args.lighting,
    };

    viewer::run(config, assets)
}
