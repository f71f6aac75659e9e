use crate::error::{ChartError, Result};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;

/// File format of the rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Svg,
}

impl OutputFormat {
    /// `.svg` paths get the vector image as drawn, anything else a PDF
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Pdf,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "PDF",
            OutputFormat::Svg => "SVG",
        }
    }
}

/// Output path named after the invoking program: `<name>.pdf` in the
/// current directory. An extension on the program name is kept, so
/// `fig.py` becomes `fig.py.pdf`.
pub fn default_output_path(program: Option<&OsStr>) -> PathBuf {
    let name = program
        .and_then(|p| Path::new(p).file_name())
        .filter(|n| !n.is_empty());

    match name {
        Some(name) => {
            let mut file_name = name.to_os_string();
            file_name.push(".pdf");
            PathBuf::from(file_name)
        }
        None => PathBuf::from("chart.pdf"),
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The target is only replaced once the full contents are on disk; on
/// failure the temporary file is removed and an existing target is left as
/// it was. A replaced file keeps its permissions, a new one gets the same
/// umask-filtered mode as `std::fs::write`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| ChartError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = std::fs::metadata(path).ok().map(|m| m.permissions());

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut file = builder.tempfile_in(dir).map_err(write_err)?;
    if let Some(permissions) = existing {
        file.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    file.write_all(bytes).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Some(OsStr::new("fig-base-vectorized-results"))),
            PathBuf::from("fig-base-vectorized-results.pdf")
        );
        assert_eq!(
            default_output_path(Some(OsStr::new("./scripts/fig.py"))),
            PathBuf::from("fig.py.pdf")
        );
        assert_eq!(
            default_output_path(Some(OsStr::new("/usr/local/bin/bench-chart"))),
            PathBuf::from("bench-chart.pdf")
        );
        assert_eq!(default_output_path(None), PathBuf::from("chart.pdf"));
        assert_eq!(
            default_output_path(Some(OsStr::new(""))),
            PathBuf::from("chart.pdf")
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.svg")), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.SVG")), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.pdf")), OutputFormat::Pdf);
        assert_eq!(OutputFormat::from_path(Path::new("a")), OutputFormat::Pdf);
        assert_eq!(OutputFormat::from_path(Path::new("a.py.pdf")), OutputFormat::Pdf);
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // Only the target remains, no leftover temporary files
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("reference.pdf");
        std::fs::write(&reference, b"data").unwrap();
        let path = dir.path().join("out.pdf");

        write_atomic(&path, b"data").unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, b"new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.pdf");

        match write_atomic(&path, b"data") {
            Err(ChartError::OutputWrite { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!path.exists());
    }
}
