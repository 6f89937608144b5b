use super::{emit, resolve};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use texpad_parser::plain::{to_tagged, to_text};

#[derive(Debug, Args)]
pub struct PlainArgs {
    /// Plain-text file
    pub file: PathBuf,

    /// Write the text here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run a file through the plain-text codec
pub fn plain(args: PlainArgs, cwd: &str) -> Result<()> {
    let contents = std::fs::read_to_string(resolve(cwd, &args.file))?;
    emit(cwd, args.output.as_deref(), &to_text(&to_tagged(&contents)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let text = "\\textbf{not markup}\n  indented\n";
        std::fs::write(dir.path().join("a.md"), text).unwrap();

        plain(
            PlainArgs {
                file: PathBuf::from("a.md"),
                output: Some(PathBuf::from("b.md")),
            },
            &cwd,
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("b.md")).unwrap(), text);
    }
}
