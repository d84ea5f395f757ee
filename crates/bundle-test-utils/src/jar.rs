//! [`JarBuilder`] for container archives with a chosen manifest.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Maximum manifest line length in bytes, continuation marker included.
const LINE_WIDTH: usize = 72;

/// Builds a zip container whose manifest declares the given packages.
///
/// Header lines are folded at 72 bytes the way real manifest writers do,
/// so long headers exercise continuation-line parsing.
#[derive(Debug, Clone, Default)]
pub struct JarBuilder {
    exports: Vec<String>,
    imports: Vec<String>,
    raw_manifest: Option<String>,
    include_manifest: bool,
    entries: Vec<(String, Vec<u8>)>,
}

impl JarBuilder {
    pub fn new() -> Self {
        Self {
            include_manifest: true,
            ..Self::default()
        }
    }

    /// Add an `Export-Package` entry such as `util.io;version="1.0.0"`.
    pub fn export(mut self, declaration: &str) -> Self {
        self.exports.push(declaration.to_string());
        self
    }

    /// Add an `Import-Package` entry such as `util.io;version="[1.0,2.0)"`.
    pub fn import(mut self, declaration: &str) -> Self {
        self.imports.push(declaration.to_string());
        self
    }

    /// Use this exact manifest text instead of a generated one.
    pub fn raw_manifest(mut self, text: &str) -> Self {
        self.raw_manifest = Some(text.to_string());
        self
    }

    /// Produce a valid container that has no manifest entry.
    ///
    /// An archive left with no entries at all gets a `placeholder.txt` so
    /// that it still starts with a local file header.
    pub fn without_manifest(mut self) -> Self {
        self.include_manifest = false;
        self
    }

    /// Add an arbitrary entry.
    pub fn entry(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push((name.to_string(), content.to_vec()));
        self
    }

    /// The manifest text this builder writes.
    pub fn manifest(&self) -> String {
        if let Some(raw) = &self.raw_manifest {
            return raw.clone();
        }
        let mut text = String::from("Manifest-Version: 1.0\r\n");
        if !self.exports.is_empty() {
            text.push_str(&fold_header("Export-Package", &self.exports.join(",")));
        }
        if !self.imports.is_empty() {
            text.push_str(&fold_header("Import-Package", &self.imports.join(",")));
        }
        text.push_str("\r\n");
        text
    }

    /// Serialize the archive to bytes.
    ///
    /// # Panics
    /// Panics if the zip writer fails.
    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            || SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        if self.include_manifest {
            writer
                .start_file(MANIFEST_ENTRY, options())
                .unwrap_or_else(|e| panic!("JarBuilder: failed to start manifest: {e}"));
            writer
                .write_all(self.manifest().as_bytes())
                .unwrap_or_else(|e| panic!("JarBuilder: failed to write manifest: {e}"));
        }
        let placeholder = [(String::from("placeholder.txt"), Vec::new())];
        let entries = if !self.include_manifest && self.entries.is_empty() {
            &placeholder[..]
        } else {
            &self.entries[..]
        };
        for (name, content) in entries {
            writer
                .start_file(name.as_str(), options())
                .unwrap_or_else(|e| panic!("JarBuilder: failed to start {name}: {e}"));
            writer
                .write_all(content)
                .unwrap_or_else(|e| panic!("JarBuilder: failed to write {name}: {e}"));
        }

        writer
            .finish()
            .unwrap_or_else(|e| panic!("JarBuilder: failed to finish archive: {e}"))
            .into_inner()
    }

    /// Write the archive to `path`.
    ///
    /// # Panics
    /// Panics if the archive cannot be built or written.
    pub fn write_to(&self, path: &Path) {
        fs::write(path, self.build())
            .unwrap_or_else(|e| panic!("JarBuilder: failed to write {}: {e}", path.display()));
    }
}

/// Render `name: value` folded into lines of at most 72 bytes, each
/// continuation line starting with a single space.
pub fn fold_header(name: &str, value: &str) -> String {
    let line = format!("{name}: {value}");
    let bytes = line.as_bytes();
    let mut out = String::new();

    let first = bytes.len().min(LINE_WIDTH);
    out.push_str(&line[..first]);
    out.push_str("\r\n");

    let mut pos = first;
    while pos < bytes.len() {
        let end = (pos + LINE_WIDTH - 1).min(bytes.len());
        out.push(' ');
        out.push_str(&line[pos..end]);
        out.push_str("\r\n");
        pos = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_header_respects_line_width() {
        let value = (0..20).map(|i| format!("pkg.n{i}")).collect::<Vec<_>>().join(",");
        let folded = fold_header("Export-Package", &value);

        for line in folded.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(line.len() <= LINE_WIDTH, "line too long: {line}");
        }
        let unfolded: String = folded
            .split("\r\n")
            .enumerate()
            .map(|(i, l)| if i == 0 { l } else { l.strip_prefix(' ').unwrap_or(l) })
            .collect();
        assert_eq!(unfolded, format!("Export-Package: {value}"));
    }

    #[test]
    fn build_starts_with_container_signature() {
        let bytes = JarBuilder::new().export("a;version=\"1.0\"").build();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
