//! Bibliography entries harvested from the document's reference list.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::Result;
use crate::util::decode_text;

/// Opening line of a BibTeX entry: `@kind{key,`.
static ENTRY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@\w+\s*\{\s*([^,\s]+)\s*,").unwrap());

/// Known citation keys, backed by an append-only `.bib` file.
#[derive(Debug)]
pub struct ReferenceStore {
    path: PathBuf,
    keys: HashSet<String>,
}

impl ReferenceStore {
    /// An empty store writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            keys: HashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the keys already present in the bibliography file.
    ///
    /// A missing file leaves the store as it is. Non-UTF-8 files are decoded
    /// as Windows-1252.
    pub fn seed(&mut self) -> Result<()> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let content = decode_text(&bytes, None);
        let before = self.keys.len();
        for line in content.lines() {
            if let Some(caps) = ENTRY_KEY_RE.captures(line) {
                self.keys.insert(caps[1].to_string());
            }
        }
        log::debug!(
            "seeded {} reference(s) from {}",
            self.keys.len() - before,
            self.path.display()
        );
        Ok(())
    }

    /// Record `title`, appending an entry to the file on first sight.
    ///
    /// Returns `false` without touching the file when the key is known.
    pub fn add_reference(&mut self, title: &str, body: &str) -> Result<bool> {
        if self.keys.contains(title) {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "@article{{{title}, {body}}}")?;
        drop(file);

        self.keys.insert(title.to_string());
        log::info!("Added reference {title}");
        Ok(true)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_seed_reads_entry_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.bib");
        fs::write(
            &path,
            "@article{foo,\n  title={Foo}\n}\n\n@book{bar,\n  title={Bar}\n}\n  @misc { baz , note={x}}\n",
        )
        .unwrap();

        let mut store = ReferenceStore::new(&path);
        store.seed().unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.contains("foo"));
        assert!(store.contains("bar"));
        assert!(store.contains("baz"));
    }

    #[test]
    fn test_seed_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::new(dir.path().join("absent.bib"));

        store.seed().unwrap();

        assert!(store.is_empty());
        assert!(!dir.path().join("absent.bib").exists());
    }

    #[test]
    fn test_seed_accepts_latin1_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.bib");
        fs::write(&path, b"@article{knuth84, author={Kn\xfcth}}\n").unwrap();

        let mut store = ReferenceStore::new(&path);
        store.seed().unwrap();

        assert!(store.contains("knuth84"));
        assert!(!store.add_reference("knuth84", "again").unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"@article{knuth84, author={Kn\xfcth}}\n");
    }

    #[test]
    fn test_seed_propagates_read_errors() {
        let dir = TempDir::new().unwrap();
        let mut store = ReferenceStore::new(dir.path());

        let err = store.seed().unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_known_key_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.bib");
        fs::write(&path, "@article{foo,\n}\n").unwrap();

        let mut store = ReferenceStore::new(&path);
        store.seed().unwrap();

        assert!(!store.add_reference("foo", "x").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "@article{foo,\n}\n");
    }

    #[test]
    fn test_new_key_is_appended_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.bib");
        fs::write(&path, "@article{foo,\n}\n").unwrap();

        let mut store = ReferenceStore::new(&path);
        store.seed().unwrap();

        assert!(store.add_reference("baz", "y").unwrap());
        assert!(!store.add_reference("baz", "z").unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "@article{foo,\n}\n@article{baz, y}\n");
        assert!(store.contains("baz"));
    }

    #[test]
    fn test_appended_entries_seed_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.bib");

        let mut store = ReferenceStore::new(&path);
        store.add_reference("knuth84", "author={Knuth}").unwrap();

        let mut reloaded = ReferenceStore::new(&path);
        reloaded.seed().unwrap();
        assert!(reloaded.contains("knuth84"));
    }
}
