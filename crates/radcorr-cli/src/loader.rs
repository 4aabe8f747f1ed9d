use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ndarray::Array3;
use radcorr_core::stack::{CropRegion, ImageStack};
use rayon::prelude::*;
use tracing::{debug, info};

/// File extensions treated as ensemble members.
pub const IMAGE_EXTENSIONS: &[&str] = &["exr", "hdr", "png", "tif", "tiff", "jpg", "jpeg"];

/// Image files in `dir`, sorted by name. When `filter` is set only names
/// containing it are kept (e.g. `.output.exr`).
pub fn list_images(dir: &Path, filter: Option<&str>) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !has_image_extension(&path) {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if filter.is_some_and(|f| !name.contains(f)) {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode an image into a (height, width, channels) array of linear floats.
/// Color images keep RGB; `mono` collapses them to luminance.
pub fn load_image(path: &Path, mono: bool) -> Result<Array3<f32>> {
    let img = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    let (w, h) = (img.width() as usize, img.height() as usize);

    let data = if mono {
        Array3::from_shape_vec((h, w, 1), img.to_luma32f().into_raw())?
    } else {
        Array3::from_shape_vec((h, w, 3), img.to_rgb32f().into_raw())?
    };
    debug!(path = %path.display(), height = h, width = w, "Image decoded");
    Ok(data)
}

/// Decode an image and keep only `crop` of it, when given.
pub fn load_cropped(path: &Path, mono: bool, crop: Option<&CropRegion>) -> Result<Array3<f32>> {
    let image = load_image(path, mono)?;
    match crop {
        Some(region) => {
            let view = region
                .apply(image.view())
                .with_context(|| format!("Cannot crop {}", path.display()))?;
            Ok(view.to_owned())
        }
        None => Ok(image),
    }
}

/// Load every matching image of `dir` into one stack.
pub fn load_stack(
    dir: &Path,
    filter: Option<&str>,
    mono: bool,
    crop: Option<&CropRegion>,
) -> Result<ImageStack> {
    let paths = list_images(dir, filter)?;
    if paths.is_empty() {
        bail!("No images found in {}", dir.display());
    }

    let images: Vec<Array3<f32>> = paths
        .par_iter()
        .map(|p| load_cropped(p, mono, crop))
        .collect::<Result<_>>()?;
    info!(dir = %dir.display(), images = images.len(), "Ensemble loaded");

    ImageStack::from_images(&images)
        .with_context(|| format!("Inconsistent images in {}", dir.display()))
}

/// Experiment directories directly under `root`, sorted by name, paired with
/// the directory holding their images (`root/<name>/<subpath>`).
pub fn discover_experiments(root: &Path, subpath: Option<&Path>) -> Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("Failed to read directory {}", root.display()))?;

    let mut experiments = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };
        let image_dir = match subpath {
            Some(sub) => path.join(sub),
            None => path,
        };
        experiments.push((name, image_dir));
    }
    experiments.sort();
    Ok(experiments)
}
