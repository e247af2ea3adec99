use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::atlas::Sex;

/// Offline WoW asset conversion pipeline: skeletal models to GLB, character
/// atlases to PNG, tabular item-display metadata to JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Directory containing the game's data archives.
    #[arg(long, env = "SARGERUST_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Archive filenames in highest-priority-first order (patches before base).
    #[arg(long, env = "SARGERUST_ARCHIVES", value_delimiter = ',', global = true)]
    pub archives: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a skeletal model and its companion skin into a .glb file.
    Mesh {
        /// Archive-relative path to the .m2 (MD20) model.
        #[arg(long)]
        model: String,
        /// Archive-relative path to the .skin (SKIN) companion.
        #[arg(long)]
        skin: String,
        /// Archive-relative path to an optional texture to embed.
        #[arg(long)]
        texture: Option<String>,
        /// Output .glb path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Composite a character atlas into a .png file.
    Atlas {
        /// Archive directory holding the race/sex model (e.g. `Character\Human\Female`).
        #[arg(long)]
        model_dir: String,
        /// Model name stem (e.g. `HumanFemale`).
        #[arg(long)]
        model_name: String,
        /// Two-digit skin-colour index.
        #[arg(long, default_value_t = 0)]
        skin: u8,
        /// Character sex.
        #[arg(long, value_enum)]
        sex: SexArg,
        /// Fallback opaque colour (R,G,B) used when no base skin resolves.
        #[arg(long, value_delimiter = ',', default_values_t = vec![128u8, 128, 128])]
        fallback_color: Vec<u8>,
        /// Item display ids to overlay, in order.
        #[arg(long, value_delimiter = ',')]
        items: Vec<u32>,
        /// Path to an item-display-info.json produced by the `item-display-info` subcommand.
        #[arg(long)]
        item_display_info: PathBuf,
        /// Output .png path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Project a tabular (DBC) item-display record file into item-display-info.json.
    ItemDisplayInfo {
        /// Archive-relative or filesystem path to the ItemDisplayInfo.dbc-shaped file.
        #[arg(long)]
        input: PathBuf,
        /// Output JSON path.
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(value: SexArg) -> Self {
        match value {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}
