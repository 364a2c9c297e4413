//! Editing state stack.
//!
//! A session is a stack of layers. The bottom layer is always `Direct` and
//! owns the committed output handed to the embedder. Starting a composition
//! pushes a layer; converting turns it into `Selecting`; running out of
//! candidates pushes a fresh `Direct` layer whose output is the word being
//! defined, shown between 【 and 】. Layers above the bottom that are
//! `Direct` are therefore always dictionary-edit layers.

use std::sync::Arc;

use skk_core::candidate::CandidateList;
use skk_core::kana::KanaMode;
use skk_core::romkana::RomKanaConverter;
use skk_core::rule::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Direct,
    Composing,
    Selecting,
    CodePoint,
}

pub(crate) struct State {
    pub phase: Phase,
    pub conv: RomKanaConverter,
    /// Text committed at this layer. For the bottom layer this is the
    /// session output; for a dictionary-edit layer it is the definition.
    pub output: String,
    /// Headword being composed, always hiragana (ASCII in abbrev mode,
    /// digits pass through for numeric conversion).
    pub midasi: String,
    /// Okurigana typed so far, hiragana.
    pub okuri: String,
    /// First romaji letter of the okuri, the dictionary key suffix.
    pub okuri_consonant: String,
    pub in_okuri: bool,
    pub candidates: CandidateList,
    /// Kana that triggered automatic conversion; committed after the
    /// candidate instead of joining the headword.
    pub auto_suffix: String,
    /// Literal tail kept when a surrounding-text headword only matched on a
    /// prefix.
    pub tail: String,
    pub abbrev: bool,
    pub from_surrounding: bool,
    pub completion: Option<Completion>,
}

pub(crate) struct Completion {
    pub base: String,
    pub matches: Vec<String>,
    pub index: usize,
}

impl State {
    pub fn new(phase: Phase, rule: Arc<Rule>) -> Self {
        Self {
            phase,
            conv: RomKanaConverter::new(rule),
            output: String::new(),
            midasi: String::new(),
            okuri: String::new(),
            okuri_consonant: String::new(),
            in_okuri: false,
            candidates: CandidateList::new(),
            auto_suffix: String::new(),
            tail: String::new(),
            abbrev: false,
            from_surrounding: false,
            completion: None,
        }
    }

    /// Fold a half-typed okuri back into the headword, for aborts that
    /// return to composing.
    pub fn fold_okuri(&mut self) {
        if self.in_okuri {
            let okuri = std::mem::take(&mut self.okuri);
            self.midasi.push_str(&okuri);
            self.okuri_consonant.clear();
            self.in_okuri = false;
        }
    }

    /// Preedit segment for this layer, without dict-edit brackets.
    pub fn render(&self, shaping: KanaMode) -> String {
        match self.phase {
            Phase::Direct => {
                let mut s = self.output.clone();
                s.push_str(self.conv.pending());
                s
            }
            Phase::Composing => {
                let mut s = String::from("▽");
                if self.abbrev {
                    s.push_str(&self.midasi);
                } else {
                    s.push_str(&shaping.shape(&self.midasi));
                }
                if self.in_okuri {
                    s.push('*');
                    s.push_str(&shaping.shape(&self.okuri));
                }
                s.push_str(self.conv.pending());
                s
            }
            Phase::Selecting => {
                let mut s = String::from("▼");
                match self.candidates.current() {
                    Some(candidate) => {
                        s.push_str(&candidate.output);
                        s.push_str(&shaping.shape(&self.okuri));
                    }
                    None => {
                        s.push_str(&shaping.shape(&self.midasi));
                        if !self.okuri.is_empty() {
                            s.push('*');
                            s.push_str(&shaping.shape(&self.okuri));
                        }
                    }
                }
                s.push_str(&self.tail);
                s.push_str(&shaping.shape(&self.auto_suffix));
                s
            }
            Phase::CodePoint => {
                let mut s = String::from("U+");
                s.push_str(&self.midasi);
                s
            }
        }
    }
}
