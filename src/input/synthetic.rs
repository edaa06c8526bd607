use std::fs;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::input::InputError;
use crate::model::label::Label;
use crate::model::sample::Sample;

pub const FIXTURE_SIZE: u32 = 224;

const TEXTURE: Rgb<u8> = Rgb([0x33, 0x33, 0x33]);
const TEXTURE_STEP: usize = 8;
const TEXTURE_PROBABILITY: f64 = 0.1;
const TEXTURE_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Disc,
    Irregular,
    Spot,
}

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub name: &'static str,
    pub background: Rgb<u8>,
    pub lesion: Rgb<u8>,
    pub shape: Shape,
    pub label: Label,
}

pub const PATTERNS: [Pattern; 8] = [
    Pattern {
        name: "melanoma_sim",
        background: Rgb([0xff, 0x6b, 0x6b]),
        lesion: Rgb([0x8b, 0x45, 0x13]),
        shape: Shape::Disc,
        label: Label::Malignant,
    },
    Pattern {
        name: "benign_mole",
        background: Rgb([0xff, 0xb6, 0xc1]),
        lesion: Rgb([0x65, 0x43, 0x21]),
        shape: Shape::Disc,
        label: Label::Benign,
    },
    Pattern {
        name: "inflamed_lesion",
        background: Rgb([0xff, 0xff, 0xff]),
        lesion: Rgb([0xff, 0x00, 0x00]),
        shape: Shape::Disc,
        label: Label::Malignant,
    },
    Pattern {
        name: "dark_mole",
        background: Rgb([0x80, 0x80, 0x80]),
        lesion: Rgb([0x00, 0x00, 0x00]),
        shape: Shape::Disc,
        label: Label::Benign,
    },
    Pattern {
        name: "atypical_lesion",
        background: Rgb([0x41, 0x69, 0xe1]),
        lesion: Rgb([0x80, 0x00, 0x80]),
        shape: Shape::Disc,
        label: Label::Malignant,
    },
    Pattern {
        name: "normal_skin",
        background: Rgb([0xf5, 0xf5, 0xdc]),
        lesion: Rgb([0xd2, 0xb4, 0x8c]),
        shape: Shape::Disc,
        label: Label::Benign,
    },
    Pattern {
        name: "irregular_melanoma",
        background: Rgb([0xff, 0x6b, 0x6b]),
        lesion: Rgb([0x8b, 0x45, 0x13]),
        shape: Shape::Irregular,
        label: Label::Malignant,
    },
    Pattern {
        name: "small_mole",
        background: Rgb([0xfa, 0xfa, 0xfa]),
        lesion: Rgb([0x33, 0x33, 0x33]),
        shape: Shape::Spot,
        label: Label::Benign,
    },
];

/// Draws one fixture. Even-indexed fixtures get sparse texture points from a
/// fixed per-index seed, so output is identical across runs.
pub fn render_fixture(pattern: &Pattern, index: usize) -> RgbImage {
    let mut img = RgbImage::from_pixel(FIXTURE_SIZE, FIXTURE_SIZE, pattern.background);
    let center = (FIXTURE_SIZE / 2) as i32;

    match pattern.shape {
        Shape::Disc => draw_filled_circle_mut(&mut img, (center, center), 62, pattern.lesion),
        Shape::Spot => draw_filled_circle_mut(&mut img, (center, center), 12, pattern.lesion),
        Shape::Irregular => {
            let outline = [
                Point::new(112, 50),
                Point::new(150, 80),
                Point::new(160, 120),
                Point::new(140, 160),
                Point::new(80, 150),
                Point::new(60, 100),
            ];
            draw_polygon_mut(&mut img, &outline, pattern.lesion);
        }
    }

    if index % 2 == 0 {
        let mut rng = StdRng::seed_from_u64(TEXTURE_SEED ^ index as u64);
        for x in (0..FIXTURE_SIZE).step_by(TEXTURE_STEP) {
            for y in (0..FIXTURE_SIZE).step_by(TEXTURE_STEP) {
                if rng.gen_bool(TEXTURE_PROBABILITY) {
                    img.put_pixel(x, y, TEXTURE);
                }
            }
        }
    }
    img
}

pub fn encode_jpeg(img: &RgbImage) -> Result<Vec<u8>, InputError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg)?;
    Ok(buf.into_inner())
}

pub fn fixture_file_name(pattern: &Pattern) -> String {
    format!("test_{}.jpg", pattern.name)
}

/// The eight fixtures as in-memory samples.
pub fn synthetic_samples() -> Result<Vec<Sample>, InputError> {
    let mut samples = Vec::with_capacity(PATTERNS.len());
    for (index, pattern) in PATTERNS.iter().enumerate() {
        let bytes = encode_jpeg(&render_fixture(pattern, index))?;
        samples.push(Sample::encoded(
            pattern.name,
            pattern.label,
            fixture_file_name(pattern),
            bytes,
        ));
    }
    Ok(samples)
}

/// Writes the fixtures plus a `manifest.tsv` that `load_manifest` accepts.
pub fn write_synthetic(dir: &Path) -> Result<PathBuf, InputError> {
    fs::create_dir_all(dir).map_err(|e| InputError::io(dir, e))?;

    let manifest_path = dir.join("manifest.tsv");
    let file = fs::File::create(&manifest_path).map_err(|e| InputError::io(&manifest_path, e))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "id\tpath\tlabel").map_err(|e| InputError::io(&manifest_path, e))?;

    for (index, pattern) in PATTERNS.iter().enumerate() {
        let file_name = fixture_file_name(pattern);
        let path = dir.join(&file_name);
        let bytes = encode_jpeg(&render_fixture(pattern, index))?;
        fs::write(&path, bytes).map_err(|e| InputError::io(&path, e))?;
        writeln!(
            w,
            "{}\t{}\t{}",
            pattern.name,
            file_name,
            pattern.label.class()
        )
        .map_err(|e| InputError::io(&manifest_path, e))?;
    }
    w.flush().map_err(|e| InputError::io(&manifest_path, e))?;

    tracing::info!(dir = %dir.display(), fixtures = PATTERNS.len(), "wrote synthetic fixtures");
    Ok(manifest_path)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/synthetic.rs"]
mod tests;
