use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tera::Tera;
use tracing::debug;

use crate::error::{Result, ScaffoldError};
use crate::symbols::Symbols;

/// Default manifest file name inside the template directory.
pub const DEFAULT_MANIFEST: &str = "Templates.inf";

/// One template file listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
}

/// Single-pass reader over the non-empty lines of a manifest.
pub struct ManifestReader<R> {
    path: PathBuf,
    lines: std::io::Lines<R>,
    failed: bool,
}

impl ManifestReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ScaffoldError::ResourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(path, BufReader::new(file)))
    }
}

impl<R: BufRead> ManifestReader<R> {
    /// Wrap an already-open reader. `path` is only used in error reports.
    pub fn new(path: &Path, reader: R) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: reader.lines(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for ManifestReader<R> {
    type Item = Result<ManifestEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    let line = line.strip_suffix('\r').unwrap_or(&line);
                    if line.is_empty() {
                        continue;
                    }
                    return Some(Ok(ManifestEntry {
                        name: line.to_string(),
                    }));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(ScaffoldError::ResourceUnavailable {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    }));
                }
            }
        }
    }
}

/// Render the manifest with the symbol environment into a temporary file.
///
/// The returned file is deleted when dropped.
pub fn render_manifest(path: &Path, symbols: &Symbols) -> Result<NamedTempFile> {
    let content = std::fs::read_to_string(path).map_err(|e| ScaffoldError::ResourceUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    let rendered = tera
        .add_raw_template("__manifest__", &content)
        .and_then(|_| tera.render("__manifest__", &symbols.to_context()))
        .map_err(|e| ScaffoldError::ManifestRender {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut temp = NamedTempFile::new().map_err(|e| ScaffoldError::Io {
        context: "creating temporary manifest".into(),
        source: e,
    })?;
    temp.write_all(rendered.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|e| ScaffoldError::Io {
            context: format!("writing {}", temp.path().display()),
            source: e,
        })?;

    debug!(manifest = %path.display(), temp = %temp.path().display(), "rendered manifest");
    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    fn read_all(text: &str) -> Vec<String> {
        ManifestReader::new(Path::new("test.inf"), Cursor::new(text))
            .map(|entry| entry.unwrap().name)
            .collect()
    }

    fn symbols(overrides: &[(&str, tera::Value)]) -> Symbols {
        let overrides: BTreeMap<_, _> = overrides
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Symbols::new("Foo", Path::new("/out"), Path::new("/tpl"), overrides)
    }

    #[test]
    fn preserves_order_and_skips_blank_lines() {
        let names = read_all("main.cpp\n\nreadme.txt\nlogo.bmp\n");
        assert_eq!(names, ["main.cpp", "readme.txt", "logo.bmp"]);
    }

    #[test]
    fn blank_lines_are_not_terminators() {
        let names = read_all("\n\nstd.h\n\n\nstd.cpp");
        assert_eq!(names, ["std.h", "std.cpp"]);
    }

    #[test]
    fn strips_crlf() {
        let names = read_all("main.rc\r\n\r\nmain.def\r\n");
        assert_eq!(names, ["main.rc", "main.def"]);
    }

    #[test]
    fn empty_manifest_yields_nothing() {
        assert!(read_all("").is_empty());
        assert!(read_all("\n\n").is_empty());
    }

    #[test]
    fn open_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let result = ManifestReader::open(&dir.path().join("Templates.inf"));
        assert!(matches!(
            result,
            Err(ScaffoldError::ResourceUnavailable { .. })
        ));
    }

    #[test]
    fn invalid_utf8_reports_once() {
        let bytes: &[u8] = b"ok.cpp\n\xff\xfe\nlater.cpp\n";
        let mut reader = ManifestReader::new(Path::new("bad.inf"), Cursor::new(bytes));
        assert_eq!(reader.next().unwrap().unwrap().name, "ok.cpp");
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn render_manifest_applies_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST);
        std::fs::write(
            &path,
            "main.cpp\n{% if DLL_LINK %}dllmain.cpp\n{% endif %}std.h\n",
        )
        .unwrap();

        let temp = render_manifest(&path, &symbols(&[])).unwrap();
        let names: Vec<_> = ManifestReader::open(temp.path())
            .unwrap()
            .map(|e| e.unwrap().name)
            .collect();
        assert_eq!(names, ["main.cpp", "std.h"]);

        let temp = render_manifest(&path, &symbols(&[("DLL_LINK", tera::Value::Bool(true))]))
            .unwrap();
        let names: Vec<_> = ManifestReader::open(temp.path())
            .unwrap()
            .map(|e| e.unwrap().name)
            .collect();
        assert_eq!(names, ["main.cpp", "dllmain.cpp", "std.h"]);
    }

    #[test]
    fn rendered_manifest_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST);
        std::fs::write(&path, "std.h\n").unwrap();

        let temp = render_manifest(&path, &symbols(&[])).unwrap();
        let temp_path = temp.path().to_path_buf();
        assert!(temp_path.exists());
        drop(temp);
        assert!(!temp_path.exists());
    }

    #[test]
    fn render_manifest_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST);
        std::fs::write(&path, "{% if %}\n").unwrap();
        let err = render_manifest(&path, &symbols(&[])).unwrap_err();
        assert!(matches!(err, ScaffoldError::ManifestRender { .. }));
    }
}
