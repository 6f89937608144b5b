use super::{emit, resolve};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Markup file to normalize
    pub file: PathBuf,

    /// Write the markup here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Parse markup and serialize it again
pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let contents = std::fs::read_to_string(resolve(cwd, &args.file))?;
    let markup = texpad_parser::serialize(&texpad_parser::parse(&contents));
    emit(cwd, args.output.as_deref(), &markup)
}
