//! Integration tests for editor crate

use std::path::Path;
use texpad_editor::{DocumentFormat, EditorError, SyncOptions, Workspace};

#[test]
fn test_disk_pad_disk_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.tex");
    let source = "\\section*{Intro}\nWe study \\emph{pads}.\n\\begin{enum}[Goals]\n\\item sync\n\\item diff\n\\end{enum}\n";
    std::fs::write(&path, source).unwrap();

    let mut workspace = Workspace::new(SyncOptions::default());
    assert!(workspace.sync_file(&path, false).unwrap());
    assert_eq!(workspace.render_for_disk(&path).unwrap(), source);

    // An edit on disk becomes one more revision
    let edited = source.replace("\\item diff\n", "\\item diff\n\\item merge\n");
    std::fs::write(&path, &edited).unwrap();
    assert!(workspace.sync_file(&path, false).unwrap());
    assert_eq!(workspace.pad(&path).unwrap().revision, 2);
    assert_eq!(workspace.render_for_disk(&path).unwrap(), edited);
}

#[test]
fn test_append_sync() {
    let mut workspace = Workspace::new(SyncOptions::default());
    let path = Path::new("log.tex");
    workspace.sync_from_disk(path, "first\n", false).unwrap();
    workspace
        .sync_from_disk(path, "\\textbf{second}\n", true)
        .unwrap();
    assert_eq!(
        workspace.render_for_disk(path).unwrap(),
        "first\n\\textbf{second}\n"
    );
}

#[test]
fn test_copy_pad() {
    let mut workspace = Workspace::new(SyncOptions::default());
    let from = Path::new("a.tex");
    let to = Path::new("b.tex");
    workspace
        .sync_from_disk(from, "\\underline{shared} text\n", false)
        .unwrap();
    assert!(workspace.copy_pad(from, to).unwrap());
    assert_eq!(
        workspace.render_for_disk(to).unwrap(),
        "\\underline{shared} text\n"
    );
    assert!(matches!(
        workspace.copy_pad(Path::new("missing.tex"), to),
        Err(EditorError::PadNotFound(_))
    ));
}

#[test]
fn test_snapshot_round_trip() -> anyhow::Result<()> {
    let mut workspace = Workspace::new(SyncOptions::default());
    let path = Path::new("notes.tex");
    workspace.sync_from_disk(path, "\\sout{old} new\n", false)?;

    let json = workspace.to_json()?;
    let restored = Workspace::from_json(&json, SyncOptions::default())?;
    assert_eq!(restored.pad(path), workspace.pad(path));
    assert_eq!(restored.render_for_disk(path)?, "\\sout{old} new\n");
    Ok(())
}

#[test]
fn test_custom_markup_extensions() {
    let options = SyncOptions {
        markup_extensions: vec![".latex".to_string()],
    };
    let workspace = Workspace::new(options);
    assert_eq!(
        workspace.format_for(Path::new("a.latex")),
        DocumentFormat::Markup
    );
    assert_eq!(
        workspace.format_for(Path::new("a.tex")),
        DocumentFormat::Plain
    );
}
