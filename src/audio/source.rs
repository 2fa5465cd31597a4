// src/audio/source.rs

use std::fmt;
use std::path::PathBuf;

/// Resolved location of one note's sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleLocation {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for SampleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleLocation::Url(url) => f.write_str(url),
            SampleLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Maps note names to `<base>/<note>.<extension>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSource {
    base: String,
    extension: String,
}

impl SampleSource {
    pub fn new(base: &str, extension: &str) -> Self {
        SampleSource {
            base: base.trim_end_matches('/').to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Whether samples come over HTTP rather than from disk
    pub fn is_remote(&self) -> bool {
        self.base.starts_with("http://") || self.base.starts_with("https://")
    }

    pub fn locate(&self, note: &str) -> SampleLocation {
        if self.is_remote() {
            // '#' would otherwise start a URL fragment
            SampleLocation::Url(format!(
                "{}/{}.{}",
                self.base,
                urlencoding::encode(note),
                self.extension
            ))
        } else {
            let mut path = PathBuf::from(&self.base);
            path.push(format!("{}.{}", note, self.extension));
            SampleLocation::File(path)
        }
    }
}
