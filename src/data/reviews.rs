// ============================================================
// Layer 4 — Review File Reader
// ============================================================
// Review files are newline-delimited, one "<sentence>\t<label>"
// per line. This module only opens files and hands back lines
// in file order; parsing lives in the Preprocessor.
//
// A ReviewLines cursor is not restartable: open the file again
// to start over from the first line.
//
// Lines are read as bytes and decoded lossily. Bytes that are not
// valid UTF-8 become U+FFFD, which the sanitiser drops like any
// other character outside its alphabet.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Line cursor over one review file.
pub struct ReviewLines {
    path:   PathBuf,
    reader: BufReader<File>,
    buf:    Vec<u8>,
}

impl ReviewLines {
    /// Open `path` for line-by-line reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("Cannot open review file '{}'", path.display()))?;
        Ok(Self { path, reader: BufReader::new(file), buf: Vec::new() })
    }
}

impl Iterator for ReviewLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.buf.strip_suffix(b"\n").unwrap_or(self.buf.as_slice());
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                Some(Ok(String::from_utf8_lossy(line).into_owned()))
            }
            Err(e) => Some(Err::<String, _>(e).with_context(|| {
                format!("Cannot read line from '{}'", self.path.display())
            })),
        }
    }
}

/// Resolve each file name against `dir`, keeping the given order.
pub fn review_paths(dir: impl AsRef<Path>, names: &[String]) -> Vec<PathBuf> {
    names.iter().map(|n| dir.as_ref().join(n)).collect()
}
