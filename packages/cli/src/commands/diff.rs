use super::resolve;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use texpad_changeset::{encode, MemoryAttributePool};
use texpad_editor::DocumentFormat;
use tracing::debug;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Current version of the document
    pub from: PathBuf,

    /// New version of the document; its extension picks the codec
    pub to: PathBuf,
}

/// Print the changeset turning `from` into `to`
pub fn diff(args: DiffArgs, config: &Config, cwd: &str) -> Result<()> {
    let format = DocumentFormat::for_path(&args.to, &config.markup_extensions);
    let from = format.parse(&fs::read_to_string(resolve(cwd, &args.from))?);
    let to = format.parse(&fs::read_to_string(resolve(cwd, &args.to))?);

    let pool_path = config.get_pool_path(cwd);
    let mut pool = load_pool(&pool_path)?;

    match encode(&from, &to, &mut pool)? {
        Some(changeset) => println!("{}", changeset),
        None => println!("{} No changes", "✓".green()),
    }

    fs::write(&pool_path, pool.to_json()?)?;
    debug!(path = %pool_path.display(), attributes = pool.len(), "Persisted attribute pool");
    Ok(())
}

fn load_pool(path: &Path) -> Result<MemoryAttributePool> {
    if path.exists() {
        Ok(MemoryAttributePool::from_json(&fs::read_to_string(path)?)?)
    } else {
        Ok(MemoryAttributePool::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texpad_changeset::AttributePool;

    #[test]
    fn test_diff_persists_pool() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join("a.tex"), "Hi").unwrap();
        fs::write(dir.path().join("b.tex"), "\\textbf{Hi}").unwrap();

        let args = || DiffArgs {
            from: PathBuf::from("a.tex"),
            to: PathBuf::from("b.tex"),
        };
        let config = Config::default();
        diff(args(), &config, &cwd).unwrap();

        let pool = load_pool(&config.get_pool_path(&cwd)).unwrap();
        assert_eq!(pool.len(), 1);
        let bold = pool.lookup(0).unwrap();
        assert_eq!((bold.key.as_str(), bold.value.as_str()), ("bold", "true"));

        // A second run reuses the stored ids
        diff(args(), &config, &cwd).unwrap();
        assert_eq!(load_pool(&config.get_pool_path(&cwd)).unwrap().len(), 1);
    }
}
