//! Discovery of sparse models under a COLMAP `sparse/` directory.
//!
//! The mapper may split a capture into several disconnected models
//! (`sparse/0`, `sparse/1`, ...). Each is recognised by its `images.bin`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::reader::{read_images, ColmapImage};
use crate::error::{IoError, IoResult};

/// Images file that marks a directory as a sparse model.
pub const IMAGES_FILE: &str = "images.bin";
/// Camera intrinsics file of a sparse model.
pub const CAMERAS_FILE: &str = "cameras.bin";
/// Reconstructed points file of a sparse model.
pub const POINTS_FILE: &str = "points3D.bin";

/// A sparse model directory and its registered-image count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseModel {
    /// Model directory.
    pub path: PathBuf,
    /// Number of images registered in the model.
    pub image_count: usize,
}

impl SparseModel {
    /// Directory name, e.g. `"0"`.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
    }

    /// Path of this model's `images.bin`.
    #[must_use]
    pub fn images_path(&self) -> PathBuf {
        self.path.join(IMAGES_FILE)
    }

    /// Path of this model's `points3D.bin`.
    #[must_use]
    pub fn points_path(&self) -> PathBuf {
        self.path.join(POINTS_FILE)
    }
}

/// List every readable model under `sparse_dir`, sorted by directory name.
///
/// Models whose `images.bin` cannot be parsed are skipped with a warning.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `sparse_dir` does not exist and
/// [`IoError::NoModels`] if it holds no readable model.
pub fn find_models<P: AsRef<Path>>(sparse_dir: P) -> IoResult<Vec<SparseModel>> {
    let sparse_dir = sparse_dir.as_ref();
    let entries = fs::read_dir(sparse_dir).map_err(|e| IoError::from_open(e, sparse_dir))?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.join(IMAGES_FILE).is_file())
        .collect();
    dirs.sort();

    let mut models = Vec::with_capacity(dirs.len());
    for path in dirs {
        match read_images(path.join(IMAGES_FILE)) {
            Ok(images) => models.push(SparseModel {
                path,
                image_count: images.len(),
            }),
            Err(e) => warn!(model = %path.display(), error = %e, "Skipping unreadable model"),
        }
    }

    if models.is_empty() {
        return Err(IoError::NoModels {
            path: sparse_dir.to_path_buf(),
        });
    }

    info!(
        models = models.len(),
        images = models.iter().map(|m| m.image_count).sum::<usize>(),
        "Found sparse models"
    );
    Ok(models)
}

/// The model with the most registered images; the first one wins ties.
///
/// # Errors
///
/// Same as [`find_models`].
pub fn largest_model<P: AsRef<Path>>(sparse_dir: P) -> IoResult<SparseModel> {
    let models = find_models(&sparse_dir)?;
    let mut largest: Option<SparseModel> = None;
    for model in models {
        if largest
            .as_ref()
            .is_none_or(|best| model.image_count > best.image_count)
        {
            largest = Some(model);
        }
    }
    largest.ok_or_else(|| IoError::NoModels {
        path: sparse_dir.as_ref().to_path_buf(),
    })
}

/// Images of every model, concatenated with non-colliding ids.
///
/// Ids of each model are shifted by a running offset that grows by the
/// model's largest id plus one.
///
/// # Errors
///
/// Same as [`find_models`], plus any read error of a model's `images.bin`.
pub fn merge_models<P: AsRef<Path>>(sparse_dir: P) -> IoResult<Vec<ColmapImage>> {
    let models = find_models(sparse_dir)?;
    let mut merged = Vec::new();
    let mut offset: u32 = 0;

    for model in &models {
        let images = read_images(model.images_path())?;
        let Some(max_id) = images.iter().map(|im| im.id).max() else {
            continue;
        };
        for mut image in images {
            image.id = offset
                .checked_add(image.id)
                .ok_or_else(|| IoError::invalid_content("merged image id overflows u32"))?;
            merged.push(image);
        }
        offset = offset
            .checked_add(max_id)
            .and_then(|o| o.checked_add(1))
            .ok_or_else(|| IoError::invalid_content("merged image id overflows u32"))?;
    }

    info!(
        images = merged.len(),
        models = models.len(),
        "Merged sparse models"
    );
    Ok(merged)
}
