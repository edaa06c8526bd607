use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::input::{InputError, has_image_extension};
use crate::model::label::Label;
use crate::model::sample::Sample;

/// Loads `<root>/data/test/{benign,malignant}` (or `<root>/{benign,malignant}`).
/// Classes with more than `per_class_limit` images are subsampled uniformly;
/// the same `seed` over the same folder always picks the same files.
pub fn load_archive(
    root: &Path,
    per_class_limit: usize,
    seed: u64,
) -> Result<Vec<Sample>, InputError> {
    if !root.is_dir() {
        return Err(InputError::MissingInput(format!(
            "archive directory not found: {}",
            root.display()
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::new();
    let mut found_any = false;
    for label in Label::ALL {
        let class_name = label.name().to_ascii_lowercase();
        let Some(dir) = class_dir(root, &class_name) else {
            tracing::warn!(class = %class_name, root = %root.display(), "class folder missing");
            continue;
        };
        found_any = true;

        let images = list_images(&dir)?;
        let available = images.len();
        let mut chosen: Vec<&PathBuf> =
            images.choose_multiple(&mut rng, per_class_limit).collect();
        chosen.sort();
        for path in chosen {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            samples.push(Sample::from_file(
                format!("{class_name}/{file_name}"),
                label,
                path.clone(),
            ));
        }
        tracing::debug!(
            class = %class_name,
            dir = %dir.display(),
            available,
            taken = available.min(per_class_limit),
            seed,
            "sampled class folder"
        );
    }

    if !found_any {
        return Err(InputError::MissingInput(format!(
            "no benign/ or malignant/ folder under {}",
            root.display()
        )));
    }
    Ok(samples)
}

fn class_dir(root: &Path, class_name: &str) -> Option<PathBuf> {
    [
        root.join("data").join("test").join(class_name),
        root.join(class_name),
    ]
    .into_iter()
    .find(|candidate| candidate.is_dir())
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let entries = fs::read_dir(dir).map_err(|e| InputError::io(dir, e))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| InputError::io(dir, e))?.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}
