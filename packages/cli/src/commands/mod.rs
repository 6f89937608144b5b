pub mod diff;
pub mod init;
pub mod parse;
pub mod plain;
pub mod render;
pub mod sync;

pub use diff::{diff, DiffArgs};
pub use init::{init, InitArgs};
pub use parse::{parse, ParseArgs};
pub use plain::{plain, PlainArgs};
pub use render::{render, RenderArgs};
pub use sync::{sync, SyncArgs};

use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolve a command-line path against the working directory
pub(crate) fn resolve(cwd: &str, path: &Path) -> PathBuf {
    PathBuf::from(cwd).join(path)
}

/// Write to `output` when given, stdout otherwise
pub(crate) fn emit(cwd: &str, output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(output) => {
            std::fs::write(resolve(cwd, output), text)?;
            Ok(())
        }
        None => {
            write_text(&mut std::io::stdout().lock(), text)?;
            Ok(())
        }
    }
}

/// Write `text` exactly as given, without a trailing newline
pub(crate) fn write_text<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_text_is_byte_identical() {
        let text = "no trailing newline";
        let mut out = Vec::new();
        write_text(&mut out, text).unwrap();
        assert_eq!(out, text.as_bytes());
    }
}
