//! Read-only dictionary parsed from SKK-JISYO text.

use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::Path;

use tracing::debug;

use crate::candidate::Candidate;

use super::{parse_entry_line, Dict, DictError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    OkuriAri,
    OkuriNasi,
}

/// Immutable dictionary backed by an in-memory map.
pub struct MemoryDict {
    okuri_ari: BTreeMap<String, Vec<(String, Option<String>)>>,
    okuri_nasi: BTreeMap<String, Vec<(String, Option<String>)>>,
}

impl MemoryDict {
    /// Parse SKK-JISYO text. Lines before a section header default to the
    /// okuri-nasi space; malformed lines are skipped.
    pub fn from_jisyo(text: &str) -> Self {
        let mut okuri_ari = BTreeMap::new();
        let mut okuri_nasi = BTreeMap::new();
        let mut section = Section::OkuriNasi;
        for line in text.lines() {
            if line.starts_with(';') {
                if line.contains("okuri-ari entries") {
                    section = Section::OkuriAri;
                } else if line.contains("okuri-nasi entries") {
                    section = Section::OkuriNasi;
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            let Some((midasi, candidates)) = parse_entry_line(line) else {
                debug!(line, "skipping malformed dictionary line");
                continue;
            };
            let map = match section {
                Section::OkuriAri => &mut okuri_ari,
                Section::OkuriNasi => &mut okuri_nasi,
            };
            map.insert(midasi, candidates);
        }
        Self {
            okuri_ari,
            okuri_nasi,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DictError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_jisyo(&text))
    }

    pub fn len(&self) -> usize {
        self.okuri_ari.len() + self.okuri_nasi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.okuri_ari.is_empty() && self.okuri_nasi.is_empty()
    }
}

impl Dict for MemoryDict {
    fn lookup(&self, midasi: &str, okuri: bool) -> Vec<Candidate> {
        let map = if okuri { &self.okuri_ari } else { &self.okuri_nasi };
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
        self.okuri_nasi
            .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JISYO: &str = "\
;; -*- mode: fundamental; coding: utf-8 -*-
;; okuri-ari entries.
かんじ /感じ/
あu /合/会/
;; okuri-nasi entries.
かんじ /漢字/幹事/
かんじん /肝心/
かんとく /監督/
あい /愛;love/哀/
";

    #[test]
    fn lookup_okuri_nasi() {
        let dict = MemoryDict::from_jisyo(JISYO);
        let cands = dict.lookup("かんじ", false);
        assert_eq!(cands.len(), 2);
        assert_eq!(cands[0].output, "漢字");
        assert!(!cands[0].okuri);
        assert_eq!(dict.lookup("ない", false).len(), 0);
    }

    #[test]
    fn lookup_okuri_ari_is_separate() {
        let dict = MemoryDict::from_jisyo(JISYO);
        let cands = dict.lookup("かんじ", true);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].output, "感じ");
        assert!(cands[0].okuri);
        assert_eq!(dict.lookup("あu", true).len(), 2);
    }

    #[test]
    fn annotation_preserved() {
        let dict = MemoryDict::from_jisyo(JISYO);
        let cands = dict.lookup("あい", false);
        assert_eq!(cands[0].annotation.as_deref(), Some("love"));
        assert_eq!(cands[1].annotation, None);
    }

    #[test]
    fn complete_strictly_longer() {
        let dict = MemoryDict::from_jisyo(JISYO);
        let matches = dict.complete("かんじ");
        assert_eq!(matches, ["かんじん"]);
        let matches = dict.complete("かん");
        assert_eq!(matches, ["かんじ", "かんじん", "かんとく"]);
        assert!(dict.complete("").is_empty());
    }

    #[test]
    fn default_mutators_are_noops() {
        let dict = MemoryDict::from_jisyo(JISYO);
        let candidate = Candidate::new("てすと", false, "試験", None);
        assert!(!dict.register(&candidate));
        assert!(!dict.purge(&candidate));
        assert!(dict.read_only());
        assert!(dict.save().is_ok());
    }
}
