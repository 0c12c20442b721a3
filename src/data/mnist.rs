// ============================================================
// Layer 4 — MNIST Loader
// ============================================================
// Reads the IDX image/label file pairs of the MNIST digit set
// into memory.
//
// IDX layout (all integers big-endian u32):
//   images: magic 2051 | count | rows | cols | count*rows*cols bytes
//   labels: magic 2049 | count | count bytes
//
// Each file may be stored gzip-compressed ("<name>.gz") or raw
// ("<name>"); the .gz copy wins when both exist.

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use crate::domain::record::ImageRecord;
use crate::domain::traits::ImageSource;

const IMAGE_FILE_MAGIC: u32 = 2051;
const LABEL_FILE_MAGIC: u32 = 2049;

/// Digit labels run 0..NUM_DIGITS.
pub const NUM_DIGITS: usize = 10;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES:  &str = "t10k-images-idx3-ubyte";
const TEST_LABELS:  &str = "t10k-labels-idx1-ubyte";

/// An in-memory labelled image set.
#[derive(Debug, Clone)]
pub struct MnistSet {
    /// All images back to back, `pixels_per_image` bytes each.
    pixels: Vec<u8>,
    labels: Vec<u8>,
    rows:   usize,
    cols:   usize,
}

impl MnistSet {
    /// Load one image/label file pair.
    pub fn load(images: &Path, labels: &Path) -> Result<Self> {
        let (count, rows, cols, pixels) = read_images(images)?;
        let labels_vec = read_labels(labels)?;

        if labels_vec.len() != count {
            bail!(
                "'{}' holds {} images but '{}' holds {} labels",
                images.display(), count, labels.display(), labels_vec.len()
            );
        }
        if let Some(bad) = labels_vec.iter().find(|&&l| usize::from(l) >= NUM_DIGITS) {
            bail!("'{}' contains label {} outside 0..{}", labels.display(), bad, NUM_DIGITS);
        }

        Ok(Self { pixels, labels: labels_vec, rows, cols })
    }

    pub fn pixels_per_image(&self) -> usize {
        self.rows * self.cols
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl ImageSource for MnistSet {
    fn count(&self) -> usize {
        self.labels.len()
    }

    fn get(&self, index: usize) -> Option<ImageRecord<'_>> {
        let label = *self.labels.get(index)?;
        let size = self.pixels_per_image();
        let start = index * size;
        Some(ImageRecord { pixels: &self.pixels[start..start + size], label })
    }
}

/// Load the standard training and test sets from `dir`.
pub fn load_mnist(dir: &Path) -> Result<(MnistSet, MnistSet)> {
    let train = MnistSet::load(&locate(dir, TRAIN_IMAGES)?, &locate(dir, TRAIN_LABELS)?)
        .context("Error loading training set")?;
    let test = MnistSet::load(&locate(dir, TEST_IMAGES)?, &locate(dir, TEST_LABELS)?)
        .context("Error loading test set")?;
    Ok((train, test))
}

/// Find `<name>.gz` or `<name>` under `dir`.
fn locate(dir: &Path, name: &str) -> Result<PathBuf> {
    let gz = dir.join(format!("{name}.gz"));
    if gz.is_file() {
        return Ok(gz);
    }
    let raw = dir.join(name);
    if raw.is_file() {
        return Ok(raw);
    }
    bail!("Neither '{}' nor '{}' exists", gz.display(), raw.display())
}

fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;
    let reader = BufReader::new(file);
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

fn read_u32_be(reader: &mut dyn Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn open_validated(path: &Path, expected_magic: u32) -> Result<Box<dyn Read>> {
    let mut reader = open(path)?;
    let magic = read_u32_be(&mut reader)
        .with_context(|| format!("'{}' is too short for an IDX header", path.display()))?;
    if magic != expected_magic {
        bail!("Invalid magic {} in '{}' (expected {})", magic, path.display(), expected_magic);
    }
    Ok(reader)
}

fn read_images(path: &Path) -> Result<(usize, usize, usize, Vec<u8>)> {
    let mut reader = open_validated(path, IMAGE_FILE_MAGIC)?;
    let count = read_u32_be(&mut reader)? as usize;
    let rows  = read_u32_be(&mut reader)? as usize;
    let cols  = read_u32_be(&mut reader)? as usize;

    let Some(total) = count.checked_mul(rows).and_then(|n| n.checked_mul(cols)) else {
        bail!("'{}' declares an impossible size {}x{}x{}", path.display(), count, rows, cols);
    };

    let pixels = read_body(&mut reader, total)
        .with_context(|| format!("Cannot read pixels from '{}'", path.display()))?;
    if pixels.len() != total {
        bail!(
            "'{}' is truncated: header declares {} images of {}x{}, found {} of {} pixel bytes",
            path.display(), count, rows, cols, pixels.len(), total
        );
    }

    tracing::debug!("Read {} images of {}x{} from '{}'", count, rows, cols, path.display());
    Ok((count, rows, cols, pixels))
}

fn read_labels(path: &Path) -> Result<Vec<u8>> {
    let mut reader = open_validated(path, LABEL_FILE_MAGIC)?;
    let count = read_u32_be(&mut reader)? as usize;

    let labels = read_body(&mut reader, count)
        .with_context(|| format!("Cannot read labels from '{}'", path.display()))?;
    if labels.len() != count {
        bail!(
            "'{}' is truncated: header declares {} labels, found {}",
            path.display(), count, labels.len()
        );
    }
    Ok(labels)
}

/// Read at most `len` bytes. The buffer grows with the data actually
/// present, so a corrupt header cannot force a huge allocation.
fn read_body(reader: &mut dyn Read, len: usize) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    reader.take(len as u64).read_to_end(&mut body)?;
    Ok(body)
}
