use anyhow::{Context, Result};
use rand::Rng;
use std::fs;
use std::path::Path;

pub const VIDEO_EXTENSION: &str = "webm";
pub const MODEL_EXTENSION: &str = "obj";
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

const VIDEO_SUBDIR: &str = "video";
const MODEL_SUBDIR: &str = "mod";
const IMAGE_SUBDIR: &str = "img";

/// Media discovered at startup. A one-shot, initialization-time scan; nothing
/// here is consulted again once the layers are mounted.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    pub videos: Vec<String>,
    pub models: Vec<String>,
    pub images: Vec<String>,
}

impl AssetCatalog {
    /// Enumerates `video/`, `mod/` and `img/` under the assets root by file
    /// extension: looping videos keep their file name, meshes are stripped of
    /// their extension, raster images keep their file name. Each list comes
    /// back sorted so catalog indices are stable run to run. A missing
    /// subdirectory yields an empty set; a missing root is an error.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            anyhow::bail!("assets root {} is not a directory", root.display());
        }

        let mut catalog = Self::default();
        for name in scan_extension(&root.join(VIDEO_SUBDIR), &[VIDEO_EXTENSION], false)? {
            catalog.videos.push(name);
        }
        for name in scan_extension(&root.join(MODEL_SUBDIR), &[MODEL_EXTENSION], true)? {
            catalog.models.push(name);
        }
        for name in scan_extension(&root.join(IMAGE_SUBDIR), IMAGE_EXTENSIONS, false)? {
            catalog.images.push(name);
        }

        eprintln!(
            "[assets] {}: {} videos, {} models, {} images",
            root.display(),
            catalog.videos.len(),
            catalog.models.len(),
            catalog.images.len()
        );
        Ok(catalog)
    }
}

fn scan_extension(dir: &Path, extensions: &[&str], strip: bool) -> Result<Vec<String>> {
    if !dir.is_dir() {
        eprintln!("[assets] {} missing, catalog left empty", dir.display());
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list asset dir {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted)) {
            continue;
        }
        let name = if strip { path.file_stem() } else { path.file_name() };
        if let Some(name) = name.and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Uniform random starting index into a catalog; each layer begins on a
/// random entry. Empty catalogs pin to 0.
pub fn random_index(len: usize, rng: &mut impl Rng) -> usize {
    if len == 0 {
        0
    } else {
        rng.gen_range(0..len)
    }
}
