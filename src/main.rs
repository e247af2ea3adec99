mod atlas;
mod error;
mod glb;
mod imaging;
mod io;
mod itemdisplay_json;
mod mesh;
mod resolver;
mod settings;
mod texture;

use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error, warn};

use formats::dbc::item_display::project_item_display_info;
use formats::dbc::reader::DbcFile;
use formats::m2::reader::M2Reader;
use formats::m2::resolve::resolve_submesh_texture;
use formats::m2::types::M2TextureType;

use crate::error::ConvertError;
use crate::imaging::{encode_png, resize_longer_side, to_rgba_image};
use crate::io::mpq::loader::MPQLoader;
use crate::itemdisplay_json::{from_json_map, to_json_map, ItemDisplayMap};
use crate::resolver::AssetClass;
use crate::settings::{CliArgs, Command};

const EMBEDDED_TEXTURE_MAX_SIDE: u32 = 512;

fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    let data_dir = args.data_dir.as_deref().unwrap_or_else(|| Path::new("."));
    let loader = MPQLoader::new(&data_dir.to_string_lossy(), &args.archives);

    let result = match args.command {
        Command::Mesh { model, skin, texture, out } => run_mesh(&loader, &model, &skin, texture.as_deref(), &out),
        Command::Atlas { model_dir, model_name, skin, sex, fallback_color, items, item_display_info, out } => {
            run_atlas(&loader, &model_dir, &model_name, skin, sex.into(), &fallback_color, &items, &item_display_info, &out)
        }
        Command::ItemDisplayInfo { input, out } => run_item_display_info(&loader, &input, &out),
    };

    // Per spec §6 process contract, a single invocation converts one asset; a failure here
    // is surfaced and logged rather than panicking, matching how a batch driver built on top
    // of this binary would log-and-continue across many invocations (spec §7 taxonomy).
    if let Err(ref err) = result {
        error!("conversion failed: {err:#}");
    }
    result
}

fn run_mesh(loader: &MPQLoader, model: &str, skin: &str, texture: Option<&str>, out: &Path) -> Result<()> {
    debug!("converting mesh {model} + {skin} -> {}", out.display());

    let model_bytes = loader.read(model).ok_or_else(|| ConvertError::ArchiveUnavailable {
        path: model.to_string(),
        reason: "not present in any configured archive".to_string(),
    })?;
    let asset = M2Reader::parse_asset(&mut Cursor::new(&model_bytes))
        .map_err(|_| ConvertError::UnrecognizedFormat { asset: model.to_string() })?;

    let skin_bytes = loader.read(skin).ok_or_else(|| ConvertError::ArchiveUnavailable {
        path: skin.to_string(),
        reason: "not present in any configured archive".to_string(),
    })?;
    let skin_profile = M2Reader::parse_skin_profile(&mut Cursor::new(&skin_bytes))
        .map_err(|_| ConvertError::UnrecognizedFormat { asset: skin.to_string() })?;

    // Content-level failure (spec §7 taxonomy #3): zero vertices after assembly is fatal,
    // no GLB is emitted for this asset.
    let assembled = mesh::assembler::assemble(&asset, &skin_profile).ok_or_else(|| ConvertError::EmptyOrUnusable {
        asset: format!("{model} + {skin}"),
        reason: "mesh assembled to zero vertices".to_string(),
    })?;

    let texture_source = match texture {
        Some(path) => loader.read(path),
        None => primary_submesh_texture(loader, &asset, &skin_profile).or_else(|| {
            let dir = Path::new(model).parent().map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();
            let stem = Path::new(model).file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
            resolver::resolve(loader, &dir, &stem, 0, AssetClass::Item, Some(&asset))
        }),
    };

    let png_bytes = texture_source.and_then(|bytes| texture::blp::decode_blp(&bytes)).map(|pixels| {
        let image = resize_longer_side(&to_rgba_image(&pixels), EMBEDDED_TEXTURE_MAX_SIDE);
        encode_png(&image)
    });

    if png_bytes.is_none() {
        if let Some(path) = texture {
            warn!("{path}: texture could not be decoded, falling back to a solid material");
        }
    }

    let glb = glb::write_glb(&assembled, png_bytes.as_deref());
    fs::write(out, glb).map_err(ConvertError::Io).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

/// Resolves the texture embedded in the GLB by joining the first submesh to its
/// texture definition through the submesh -> batch -> texture-lookup resolution,
/// done once and flat rather than walked at render time. Only usable when that
/// definition carries its own embedded filename (type 0); a runtime-resolved
/// type (skin/monster/etc.) falls through to the asset resolver.
fn primary_submesh_texture(
    loader: &MPQLoader,
    asset: &formats::m2::types::M2Asset,
    skin: &formats::m2::types::M2SkinProfile,
) -> Option<Vec<u8>> {
    skin.submeshes.first()?;
    let submesh_index: u16 = 0; // array position of the first submesh, not its meshPartId
    let texture_index = resolve_submesh_texture(asset, skin, submesh_index);
    let texture = asset.textures.get(texture_index)?;
    if texture.texture_type != M2TextureType::None || texture.filename.is_empty() {
        return None;
    }
    loader.read(&texture.filename)
}

fn run_atlas(
    loader: &MPQLoader,
    model_dir: &str,
    model_name: &str,
    skin_index: u8,
    sex: atlas::Sex,
    fallback_color: &[u8],
    items: &[u32],
    item_display_info: &Path,
    out: &Path,
) -> Result<()> {
    debug!("compositing atlas for {model_dir}\\{model_name} -> {}", out.display());

    let fallback = match fallback_color {
        [r, g, b] => [*r, *g, *b, 255],
        _ => bail!("--fallback-color expects exactly three components (R,G,B)"),
    };

    let raw = fs::read_to_string(item_display_info).with_context(|| format!("reading {}", item_display_info.display()))?;
    let map: ItemDisplayMap = serde_json::from_str(&raw).with_context(|| format!("parsing {}", item_display_info.display()))?;
    let metadata = from_json_map(&map);

    let canvas = atlas::composite_atlas(loader, model_dir, model_name, skin_index, sex, fallback, items, &metadata);
    let png = encode_png(&canvas);
    fs::write(out, png).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

fn run_item_display_info(loader: &MPQLoader, input: &Path, out: &Path) -> Result<()> {
    debug!("projecting item display info {} -> {}", input.display(), out.display());

    let bytes = match loader.read(&input.to_string_lossy()) {
        Some(bytes) => bytes,
        None => fs::read(input).with_context(|| format!("reading {}", input.display()))?,
    };

    let dbc = DbcFile::parse(&bytes)
        .map_err(ConvertError::Parser)
        .with_context(|| format!("{}: not a valid tabular record file", input.display()))?;
    let records = project_item_display_info(&dbc);
    let map = to_json_map(&records);

    let json = serde_json::to_string_pretty(&map)?;
    fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}
