use super::{emit, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use texpad_editor::DocumentFormat;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// File to parse; the codec is picked from its extension
    pub file: PathBuf,

    /// Write the JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print the tagged characters of a file as JSON
pub fn parse(args: ParseArgs, config: &Config, cwd: &str) -> Result<()> {
    let contents = std::fs::read_to_string(resolve(cwd, &args.file))?;
    let format = DocumentFormat::for_path(&args.file, &config.markup_extensions);
    let chars = format.parse(&contents);

    emit(cwd, args.output.as_deref(), &serde_json::to_string_pretty(&chars)?)
}
