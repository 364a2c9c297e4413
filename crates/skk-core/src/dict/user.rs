//! Writable user dictionary.
//!
//! Registered candidates are promoted to the front of their entry so the
//! most recently used word comes back first. The dictionary is held behind
//! a lock so sessions can share it with the embedding application.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::candidate::Candidate;

use super::{format_entry_line, parse_entry_line, Dict, DictError};

type EntryMap = BTreeMap<String, Vec<(String, Option<String>)>>;

#[derive(Default)]
struct Inner {
    okuri_ari: EntryMap,
    okuri_nasi: EntryMap,
    dirty: bool,
}

pub struct UserDict {
    path: Option<PathBuf>,
    inner: RwLock<Inner>,
}

impl UserDict {
    /// In-memory user dictionary; `save` is a no-op.
    pub fn new() -> Self {
        Self {
            path: None,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// File-backed user dictionary. A missing file starts empty and is
    /// created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DictError> {
        let path = path.into();
        let mut inner = Inner::default();
        match fs::read_to_string(&path) {
            Ok(text) => {
                load_jisyo(&text, &mut inner);
                debug!(
                    path = %path.display(),
                    okuri_ari = inner.okuri_ari.len(),
                    okuri_nasi = inner.okuri_nasi.len(),
                    "user dictionary loaded"
                );
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "user dictionary not found, starting empty");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(Self {
            path: Some(path),
            inner: RwLock::new(inner),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn render(inner: &Inner) -> String {
        let mut out = String::new();
        out.push_str(";; okuri-ari entries.\n");
        for (midasi, candidates) in inner.okuri_ari.iter().rev() {
            out.push_str(&format_entry_line(midasi, candidates));
            out.push('\n');
        }
        out.push_str(";; okuri-nasi entries.\n");
        for (midasi, candidates) in &inner.okuri_nasi {
            out.push_str(&format_entry_line(midasi, candidates));
            out.push('\n');
        }
        out
    }
}

fn load_jisyo(text: &str, inner: &mut Inner) {
    let mut okuri = false;
    for line in text.lines() {
        if line.starts_with(';') {
            if line.contains("okuri-ari entries") {
                okuri = true;
            } else if line.contains("okuri-nasi entries") {
                okuri = false;
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let Some((midasi, candidates)) = parse_entry_line(line) else {
            warn!(line, "skipping malformed user dictionary line");
            continue;
        };
        let map = if okuri {
            &mut inner.okuri_ari
        } else {
            &mut inner.okuri_nasi
        };
        map.insert(midasi, candidates);
    }
}

impl Dict for UserDict {
    fn lookup(&self, midasi: &str, okuri: bool) -> Vec<Candidate> {
        let inner = match self.inner.read() {
            Ok(inner) => inner,
            Err(_) => return Vec::new(),
        };
        let map = if okuri { &inner.okuri_ari } else { &inner.okuri_nasi };
        match map.get(midasi) {
            Some(entries) => entries
                .iter()
                .map(|(text, annotation)| {
                    Candidate::new(midasi, okuri, text.clone(), annotation.clone())
                })
                .collect(),
            None => Vec::new(),
        }
    }

    fn complete(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let inner = match self.inner.read() {
            Ok(inner) => inner,
            Err(_) => return Vec::new(),
        };
        inner
            .okuri_nasi
            .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn register(&self, candidate: &Candidate) -> bool {
        let Ok(mut inner) = self.inner.write() else {
            return false;
        };
        let map = if candidate.okuri {
            &mut inner.okuri_ari
        } else {
            &mut inner.okuri_nasi
        };
        let entries = map.entry(candidate.midasi.clone()).or_default();
        // Most recently used first.
        if let Some(pos) = entries.iter().position(|(text, _)| *text == candidate.text) {
            if pos == 0 {
                return false;
            }
            let entry = entries.remove(pos);
            entries.insert(0, entry);
        } else {
            entries.insert(0, (candidate.text.clone(), candidate.annotation.clone()));
        }
        inner.dirty = true;
        true
    }

    fn purge(&self, candidate: &Candidate) -> bool {
        let Ok(mut inner) = self.inner.write() else {
            return false;
        };
        let map = if candidate.okuri {
            &mut inner.okuri_ari
        } else {
            &mut inner.okuri_nasi
        };
        let Some(entries) = map.get_mut(&candidate.midasi) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(text, _)| *text != candidate.text);
        let changed = entries.len() != before;
        if entries.is_empty() {
            map.remove(&candidate.midasi);
        }
        if changed {
            inner.dirty = true;
        }
        changed
    }

    fn save(&self) -> Result<(), DictError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let Ok(mut inner) = self.inner.write() else {
            return Ok(());
        };
        if !inner.dirty {
            return Ok(());
        }
        let rendered = Self::render(&inner);
        // Write-then-rename keeps the dictionary intact on interruption.
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&tmp, rendered)?;
        fs::rename(&tmp, path)?;
        inner.dirty = false;
        debug!(path = %path.display(), "user dictionary saved");
        Ok(())
    }

    fn read_only(&self) -> bool {
        false
    }
}

impl Default for UserDict {
    fn default() -> Self {
        Self::new()
    }
}
