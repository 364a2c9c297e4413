//! Dictionary abstraction and the SKK-JISYO text format.
//!
//! Headwords (midasi) are stored in hiragana. Okuri-ari entries key the
//! headword plus the first romaji letter of the okurigana suffix, e.g.
//! `かんじ` with okuri consonant `j` is stored as `かんじj` in the
//! okuri-ari section.

mod composite;
mod memory;
mod user;

pub use composite::CompositeDict;
pub use memory::MemoryDict;
pub use user::UserDict;

use std::io;

use thiserror::Error;

use crate::candidate::Candidate;

#[derive(Debug, Error)]
pub enum DictError {
    #[error("dictionary I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A source of conversion candidates.
///
/// Methods take `&self`; writable implementations use interior mutability so
/// a dictionary can be shared between a session and its owner.
pub trait Dict: Send + Sync {
    /// Candidates for `midasi`, searched in the okuri-ari space when `okuri`
    /// is set.
    fn lookup(&self, midasi: &str, okuri: bool) -> Vec<Candidate>;

    /// Okuri-nasi headwords strictly extending `prefix`, in sorted order.
    fn complete(&self, _prefix: &str) -> Vec<String> {
        Vec::new()
    }

    /// Record a selected or newly defined candidate. Returns whether the
    /// dictionary changed.
    fn register(&self, _candidate: &Candidate) -> bool {
        false
    }

    /// Remove a candidate. Returns whether the dictionary changed.
    fn purge(&self, _candidate: &Candidate) -> bool {
        false
    }

    /// Persist pending changes, if this dictionary is file-backed.
    fn save(&self) -> Result<(), DictError> {
        Ok(())
    }

    fn read_only(&self) -> bool {
        true
    }
}

/// One parsed candidate cell: text with an optional `;annotation`.
pub(crate) fn parse_candidate_cell(cell: &str) -> (String, Option<String>) {
    match cell.split_once(';') {
        Some((text, annotation)) => (text.to_string(), Some(annotation.to_string())),
        None => (cell.to_string(), None),
    }
}

/// Parse one `midasi /cand1/cand2;annotation/` line.
pub(crate) fn parse_entry_line(line: &str) -> Option<(String, Vec<(String, Option<String>)>)> {
    let (midasi, rest) = line.split_once(' ')?;
    let rest = rest.trim();
    if !rest.starts_with('/') {
        return None;
    }
    let candidates: Vec<_> = rest
        .split('/')
        .filter(|cell| !cell.is_empty())
        .map(parse_candidate_cell)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some((midasi.to_string(), candidates))
}

/// Render candidates back into the `/c1/c2;ann/` form.
pub(crate) fn format_entry_line(midasi: &str, candidates: &[(String, Option<String>)]) -> String {
    let mut line = String::from(midasi);
    line.push(' ');
    line.push('/');
    for (text, annotation) in candidates {
        line.push_str(text);
        if let Some(annotation) = annotation {
            line.push(';');
            line.push_str(annotation);
        }
        line.push('/');
    }
    line
}
