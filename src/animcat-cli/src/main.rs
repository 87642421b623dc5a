mod config;

use animcat::{
    AssetRoot, CatalogStore, PlaybackParams, DEFAULT_LENGTH, DEFAULT_SPEED, LENGTH_RANGE,
    SPEED_RANGE,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::Config;
use std::path::{Path, PathBuf};

/// Default character folder, as a project path.
const DEFAULT_CHARACTER_FOLDER: &str = "Characters";

/// Default catalog file, as a project path.
const DEFAULT_CATALOG_FILE: &str = "AnimationConfig.json";

#[derive(Parser)]
#[command(name = "animcat")]
#[command(about = "Character Animation Catalog Editor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Session location shared by the editing commands.
#[derive(Args)]
struct SessionArgs {
    /// Managed asset root (uses configured default if not provided)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Catalog file as a project path (uses configured default if not provided)
    #[arg(long)]
    catalog: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the character folder and rebuild the catalog (replacing)
    Scan {
        #[command(flatten)]
        session: SessionArgs,

        /// Character folder to scan, as a project path
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// List the characters in the catalog
    List {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show one character's clips with their playback parameters
    Show {
        #[command(flatten)]
        session: SessionArgs,

        /// Character index, as printed by `list`
        character: usize,
    },

    /// Add a clip asset to a character
    Add {
        #[command(flatten)]
        session: SessionArgs,

        /// Character index, as printed by `list`
        character: usize,

        /// Clip asset path (project path, or absolute inside the root)
        clip: PathBuf,

        /// Playback speed for the new record
        #[arg(short, long, default_value_t = DEFAULT_SPEED)]
        speed: f32,

        /// Playback length in seconds for the new record
        #[arg(short, long, default_value_t = DEFAULT_LENGTH)]
        length: f32,
    },

    /// Remove a clip from a character
    Remove {
        #[command(flatten)]
        session: SessionArgs,

        /// Character index, as printed by `list`
        character: usize,

        /// Clip index, as printed by `show`
        clip: usize,
    },

    /// Stamp playback parameters onto every clip of a character and save
    Apply {
        #[command(flatten)]
        session: SessionArgs,

        /// Character index, as printed by `list`
        character: usize,

        /// Playback speed to apply
        #[arg(short, long)]
        speed: f32,

        /// Playback length in seconds to apply
        #[arg(short, long)]
        length: f32,
    },

    /// Configure default settings
    Configure {
        /// Set the default asset root
        #[arg(long)]
        root: Option<PathBuf>,

        /// Set the default catalog file (project path)
        #[arg(long)]
        catalog: Option<String>,

        /// Set the default character folder (project path)
        #[arg(long)]
        folder: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// The resolved editing session: asset root plus catalog location.
struct Workspace {
    assets: AssetRoot,
    catalog_path: PathBuf,
}

fn workspace(session: SessionArgs, config: &Config) -> Result<Workspace> {
    let root = session
        .root
        .or_else(|| config.asset_root.clone())
        .context("No asset root given; pass --root or run `animcat configure --root <dir>`")?;
    let assets = AssetRoot::new(&root)
        .with_context(|| format!("Failed to open asset root {}", root.display()))?;
    let catalog = session
        .catalog
        .or_else(|| config.catalog.clone())
        .unwrap_or_else(|| DEFAULT_CATALOG_FILE.to_string());
    let catalog_path = assets.absolute_path(&catalog);
    Ok(Workspace { assets, catalog_path })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Scan { session, folder } => {
            let ws = workspace(session, &config)?;
            let folder = folder
                .or(config.character_folder)
                .unwrap_or_else(|| DEFAULT_CHARACTER_FOLDER.to_string());
            cmd_scan(&ws.assets, &ws.catalog_path, &folder)
        }
        Commands::List { session } => {
            let ws = workspace(session, &config)?;
            cmd_list(&ws.catalog_path)
        }
        Commands::Show { session, character } => {
            let ws = workspace(session, &config)?;
            cmd_show(&ws.catalog_path, character)
        }
        Commands::Add { session, character, clip, speed, length } => {
            let ws = workspace(session, &config)?;
            cmd_add(&ws.assets, &ws.catalog_path, character, &clip, speed, length)
        }
        Commands::Remove { session, character, clip } => {
            let ws = workspace(session, &config)?;
            cmd_remove(&ws.catalog_path, character, clip)
        }
        Commands::Apply { session, character, speed, length } => {
            let ws = workspace(session, &config)?;
            cmd_apply(&ws.catalog_path, character, speed, length)
        }
        Commands::Configure { root, catalog, folder, show } => {
            cmd_configure(config, root, catalog, folder, show)
        }
    }
}

/// Clamp operator input into the editor slider ranges, then validate.
fn session_params(speed: f32, length: f32) -> Result<PlaybackParams> {
    let speed = speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1);
    let length = length.clamp(LENGTH_RANGE.0, LENGTH_RANGE.1);
    Ok(PlaybackParams::new(speed, length)?)
}

fn open_catalog(catalog_path: &Path) -> Result<CatalogStore> {
    let mut store = CatalogStore::new();
    store
        .load_if_exists(catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;
    Ok(store)
}

fn save_catalog(store: &CatalogStore, catalog_path: &Path) -> Result<()> {
    store
        .save(catalog_path)
        .with_context(|| format!("Failed to write catalog to {}", catalog_path.display()))
}

fn cmd_scan(assets: &AssetRoot, catalog_path: &Path, folder: &str) -> Result<()> {
    let entries = animcat::scan_characters(assets, folder)?;

    let mut store = CatalogStore::new();
    store.replace_all(entries);
    save_catalog(&store, catalog_path)?;

    println!("Loaded {} character resources", store.len());
    Ok(())
}

fn cmd_list(catalog_path: &Path) -> Result<()> {
    let store = open_catalog(catalog_path)?;
    if store.is_empty() {
        println!("Catalog is empty; run `animcat scan` first");
        return Ok(());
    }

    for (index, entry) in store.entries().iter().enumerate() {
        println!(
            "{index}: {} ({} clips) - {}",
            entry.name,
            entry.clips.len(),
            entry.asset_path
        );
    }
    Ok(())
}

fn cmd_show(catalog_path: &Path, character: usize) -> Result<()> {
    let store = open_catalog(catalog_path)?;
    let entry = store.character(character)?;

    println!("{} - {}", entry.name, entry.asset_path);
    if entry.clips.is_empty() {
        println!("  (no clips)");
        return Ok(());
    }
    for (index, clip) in entry.clips.iter().enumerate() {
        println!(
            "  {index}: {} speed={} length={}s - {}",
            clip.name, clip.speed, clip.length, clip.source_path
        );
    }
    Ok(())
}

fn cmd_add(
    assets: &AssetRoot,
    catalog_path: &Path,
    character: usize,
    clip: &Path,
    speed: f32,
    length: f32,
) -> Result<()> {
    let mut store = open_catalog(catalog_path)?;
    let params = session_params(speed, length)?;

    let record = store.add_clip(character, clip, params, assets)?;
    save_catalog(&store, catalog_path)?;

    println!("Added clip: {}", record.name);
    Ok(())
}

fn cmd_remove(catalog_path: &Path, character: usize, clip: usize) -> Result<()> {
    let mut store = open_catalog(catalog_path)?;
    let removed = store.delete_clip(character, clip)?;
    save_catalog(&store, catalog_path)?;

    println!("Removed clip: {}", removed.name);
    Ok(())
}

fn cmd_apply(catalog_path: &Path, character: usize, speed: f32, length: f32) -> Result<()> {
    let mut store = open_catalog(catalog_path)?;
    let params = session_params(speed, length)?;

    store.apply_params_to_all(character, params)?;
    save_catalog(&store, catalog_path)?;

    let entry = store.character(character)?;
    println!(
        "Applied speed={} length={}s to {} clips of {}",
        params.speed(),
        params.length(),
        entry.clips.len(),
        entry.name
    );
    Ok(())
}

fn cmd_configure(
    mut config: Config,
    root: Option<PathBuf>,
    catalog: Option<String>,
    folder: Option<String>,
    show: bool,
) -> Result<()> {
    let mut changed = false;
    if let Some(root) = root {
        config.asset_root = Some(root);
        changed = true;
    }
    if let Some(catalog) = catalog {
        config.catalog = Some(catalog);
        changed = true;
    }
    if let Some(folder) = folder {
        config.character_folder = Some(folder);
        changed = true;
    }
    if changed {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !changed {
        match &config.asset_root {
            Some(root) => println!("asset_root: {}", root.display()),
            None => println!("asset_root: (unset)"),
        }
        println!(
            "catalog: {}",
            config.catalog.as_deref().unwrap_or(DEFAULT_CATALOG_FILE)
        );
        println!(
            "character_folder: {}",
            config
                .character_folder
                .as_deref()
                .unwrap_or(DEFAULT_CHARACTER_FOLDER)
        );
    }
    Ok(())
}
