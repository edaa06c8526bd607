use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::input::InputError;
use crate::model::label::Label;
use crate::model::sample::Sample;

/// Reads a tab-separated manifest with `path` and `label` columns and an
/// optional `id` column. Relative paths resolve against the manifest's folder.
pub fn load_manifest(path: &Path) -> Result<Vec<Sample>, InputError> {
    let file = File::open(path).map_err(|e| InputError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut buf = String::new();

    let read = reader
        .read_line(&mut buf)
        .map_err(|e| InputError::io(path, e))?;
    if read == 0 {
        return Err(InputError::Parse("manifest file is empty".to_string()));
    }
    let header: Vec<String> = buf
        .trim_end()
        .split('\t')
        .map(|s| s.trim().to_ascii_lowercase())
        .collect();
    let column = |name: &str| header.iter().position(|c| c == name);
    let path_col = column("path")
        .ok_or_else(|| InputError::Parse("manifest header has no 'path' column".to_string()))?;
    let label_col = column("label")
        .ok_or_else(|| InputError::Parse("manifest header has no 'label' column".to_string()))?;
    let id_col = column("id");

    let mut samples = Vec::new();
    let mut seen = HashSet::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        let read = reader
            .read_line(&mut buf)
            .map_err(|e| InputError::io(path, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        let image_path = fields.get(path_col).copied().unwrap_or("");
        if image_path.is_empty() {
            tracing::warn!(line = line_no, "manifest row has no path; skipping");
            continue;
        }
        let raw_label = fields.get(label_col).copied().unwrap_or("");
        let Some(label) = Label::parse(raw_label) else {
            tracing::warn!(line = line_no, label = raw_label, "manifest row has invalid label; skipping");
            continue;
        };

        let resolved = base_dir.join(image_path);
        let id = id_col
            .and_then(|c| fields.get(c).copied())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| image_path.to_string());
        if !seen.insert(id.clone()) {
            tracing::warn!(line = line_no, id = %id, "duplicate sample id in manifest; keeping first");
            continue;
        }
        samples.push(Sample::from_file(id, label, resolved));
    }

    Ok(samples)
}
