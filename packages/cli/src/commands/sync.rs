use super::{emit, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use texpad_editor::Workspace;
use tracing::debug;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// File to sync into its pad
    pub file: PathBuf,

    /// Workspace snapshot holding the pads and the attribute pool
    #[arg(short, long, default_value = "texpad.snapshot.json")]
    pub snapshot: PathBuf,

    /// Append the file to the pad instead of replacing its content
    #[arg(short, long)]
    pub append: bool,

    /// Write the pad's export here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Sync a file into its pad and print what the pad now exports
pub fn sync(args: SyncArgs, config: &Config, cwd: &str) -> Result<()> {
    let snapshot_path = resolve(cwd, &args.snapshot);
    let mut workspace = if snapshot_path.exists() {
        Workspace::from_json(&fs::read_to_string(&snapshot_path)?, config.sync_options())?
    } else {
        Workspace::new(config.sync_options())
    };

    let contents = fs::read_to_string(resolve(cwd, &args.file))?;
    let changed = workspace.sync_from_disk(&args.file, &contents, args.append)?;
    let exported = workspace.render_for_disk(&args.file)?;
    fs::write(&snapshot_path, workspace.to_json()?)?;
    debug!(path = %snapshot_path.display(), "Saved workspace snapshot");

    if changed {
        eprintln!("{} Synced {}", "✓".green(), args.file.display());
    } else {
        eprintln!("{} {} is up to date", "✓".green(), args.file.display());
    }
    emit(cwd, args.output.as_deref(), &exported)
}
