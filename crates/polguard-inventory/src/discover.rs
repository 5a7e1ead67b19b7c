use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Inventory files below `root`, sorted.
///
/// A file path is returned as-is. A directory is walked recursively for `*.json` files.
pub fn discover_inventory_files(root: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        anyhow::bail!("inventory path does not exist: {root}");
    }

    let mut out: Vec<Utf8PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter(|p| p.extension() == Some("json"))
        .collect();

    // Stable order.
    out.sort();
    Ok(out)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
