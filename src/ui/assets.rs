//! Filesystem-based asset source for loading piece SVGs.

use gpui::{AssetSource, SharedString};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Looks up assets under a list of root directories, first match wins
pub struct FileAssets {
    roots: Vec<PathBuf>,
}

impl FileAssets {
    /// Search next to the executable, then the working directory, then the
    /// crate root (for `cargo run`)
    pub fn new() -> Self {
        let mut roots = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        {
            roots.push(dir);
        }
        if let Ok(dir) = std::env::current_dir() {
            roots.push(dir);
        }
        roots.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        Self::with_roots(roots)
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl Default for FileAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for FileAssets {
    fn load(&self, path: &str) -> gpui::Result<Option<Cow<'static, [u8]>>> {
        for root in &self.roots {
            if let Ok(data) = fs::read(root.join(path)) {
                return Ok(Some(Cow::Owned(data)));
            }
        }
        debug!(%path, "asset not found");
        Ok(None)
    }

    fn list(&self, path: &str) -> gpui::Result<Vec<SharedString>> {
        let mut results = Vec::new();
        for root in &self.roots {
            if let Ok(entries) = fs::read_dir(root.join(path)) {
                for entry in entries.flatten() {
                    if let Some(name) = entry.file_name().to_str() {
                        let name = SharedString::from(name.to_string());
                        if !results.contains(&name) {
                            results.push(name);
                        }
                    }
                }
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_root_with_the_file_wins() {
        let base = std::env::temp_dir().join(format!("chess-assets-{}", std::process::id()));
        let first = base.join("first");
        let second = base.join("second");
        fs::create_dir_all(first.join("assets")).unwrap();
        fs::create_dir_all(second.join("assets")).unwrap();
        fs::write(second.join("assets/pawn-white.svg"), b"second").unwrap();
        fs::write(second.join("assets/pawn-black.svg"), b"black").unwrap();
        fs::write(first.join("assets/pawn-black.svg"), b"first").unwrap();

        let assets = FileAssets::with_roots(vec![first, second]);
        let white = assets.load("assets/pawn-white.svg").unwrap().unwrap();
        assert_eq!(white.as_ref(), b"second");
        let black = assets.load("assets/pawn-black.svg").unwrap().unwrap();
        assert_eq!(black.as_ref(), b"first");
        assert!(assets.load("assets/missing.svg").unwrap().is_none());

        let mut listed: Vec<String> = assets
            .list("assets")
            .unwrap()
            .iter()
            .map(|name| name.to_string())
            .collect();
        listed.sort();
        assert_eq!(listed, vec!["pawn-black.svg", "pawn-white.svg"]);

        fs::remove_dir_all(base).unwrap();
    }
}
