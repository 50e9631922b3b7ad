//! Output formats and timestamped, collision-free file naming.

use crate::charts::figure::Figure;
use crate::error::{PlotError, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use image::ImageFormat;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Encoder a figure is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Raster(ImageFormat),
}

impl OutputFormat {
    /// Resolve a file extension such as "svg", "png" or "jpg".
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        if ext == "svg" {
            return Ok(OutputFormat::Svg);
        }
        match ImageFormat::from_extension(&ext) {
            Some(format) if format.writing_enabled() => Ok(OutputFormat::Raster(format)),
            _ => Err(PlotError::UnsupportedFormat(ext)),
        }
    }

    /// Canonical extension, used when a figure forces its own format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Raster(format) => format.extensions_str().first().copied().unwrap_or("bin"),
        }
    }
}

/// `{day}_{month}_{year}-{hour}:{minute}:{second}`, unpadded.
pub fn timestamp(now: &NaiveDateTime) -> String {
    format!(
        "{}_{}_{}-{}:{}:{}",
        now.day(),
        now.month(),
        now.year(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Create `{dir}/{stem}.{ext}` without overwriting; on collision append
/// `-1`, `-2`, ... to the stem.
fn create_unique(dir: &Path, stem: &str, ext: &str) -> Result<(File, PathBuf)> {
    let mut attempt = 0usize;
    loop {
        let name = if attempt == 0 {
            format!("{}.{}", stem, ext)
        } else {
            format!("{}-{}.{}", stem, attempt, ext)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::warn!("{} already exists, adding a suffix", path.display());
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Encode `figure` and write it as `{dir}/{tag}-{timestamp}.{ext}`.
pub fn write_figure(
    figure: &Figure,
    dir: &Path,
    tag: &str,
    ext: &str,
    format: OutputFormat,
    now: &NaiveDateTime,
) -> Result<PathBuf> {
    // Encode first so a rendering failure leaves no empty file behind.
    let bytes = figure.encode(format)?;

    let stem = format!("{}-{}", tag, timestamp(now));
    let (mut file, path) = create_unique(dir, &stem, ext)?;
    write_or_remove(&mut file, &bytes, &path)?;
    Ok(path)
}

/// Write `bytes`; on failure delete the partial file at `path`.
fn write_or_remove<W: Write>(writer: &mut W, bytes: &[u8], path: &Path) -> Result<()> {
    if let Err(err) = writer.write_all(bytes).and_then(|()| writer.flush()) {
        if let Err(cleanup) = fs::remove_file(path) {
            log::warn!("Could not remove partial file {}: {}", path.display(), cleanup);
        }
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 3)
            .unwrap()
    }

    #[test]
    fn timestamp_is_unpadded() {
        assert_eq!(timestamp(&noon()), "5_3_2024-9:7:3");
    }

    #[test]
    fn formats_resolve_from_extension() {
        assert_eq!(OutputFormat::from_extension("svg").unwrap(), OutputFormat::Svg);
        assert_eq!(
            OutputFormat::from_extension(".PNG").unwrap(),
            OutputFormat::Raster(ImageFormat::Png)
        );
        assert_eq!(
            OutputFormat::from_extension("jpg").unwrap(),
            OutputFormat::Raster(ImageFormat::Jpeg)
        );
        assert!(matches!(
            OutputFormat::from_extension("pdf"),
            Err(PlotError::UnsupportedFormat(ref e)) if e == "pdf"
        ));
    }

    #[test]
    fn canonical_extensions() {
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert_eq!(OutputFormat::Raster(ImageFormat::Png).extension(), "png");
    }

    #[test]
    fn collisions_get_a_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let (_, first) = create_unique(dir.path(), "boxplot-x", "svg").unwrap();
        let (_, second) = create_unique(dir.path(), "boxplot-x", "svg").unwrap();
        let (_, third) = create_unique(dir.path(), "boxplot-x", "svg").unwrap();
        assert_eq!(first.file_name().unwrap(), "boxplot-x.svg");
        assert_eq!(second.file_name().unwrap(), "boxplot-x-1.svg");
        assert_eq!(third.file_name().unwrap(), "boxplot-x-2.svg");
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let (_, path) = create_unique(dir.path(), "boxplot-x", "svg").unwrap();
        assert!(path.exists());

        let err = write_or_remove(&mut FullDisk, b"<svg/>", &path).unwrap_err();
        assert!(matches!(err, PlotError::Io(_)));
        assert!(!path.exists());

        // The name is free again for the next save
        let (_, again) = create_unique(dir.path(), "boxplot-x", "svg").unwrap();
        assert_eq!(again, path);
    }

    #[test]
    fn successful_write_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let (mut file, path) = create_unique(dir.path(), "boxplot-x", "svg").unwrap();
        write_or_remove(&mut file, b"<svg/>", &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<svg/>");
    }

    #[test]
    fn missing_directory_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_unique(&dir.path().join("absent"), "t", "svg").unwrap_err();
        assert!(matches!(err, PlotError::Io(ref e) if e.kind() == ErrorKind::NotFound));
    }
}
