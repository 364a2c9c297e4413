//! Stateful SKK conversion session.
//!
//! [`Context`] consumes key events and produces committed text plus a
//! marker-annotated preedit string. Dictionaries and typing rules come from
//! `skk-core`; the embedder feeds keys with [`Context::process_key`] or the
//! textual [`Context::process_key_sequence`] and drains committed text with
//! [`Context::poll_output`].

mod key_handlers;
mod nicola;
mod state;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::debug;

use skk_core::candidate::{Candidate, CandidateList};
use skk_core::dict::{CompositeDict, Dict, DictError};
use skk_core::kana::{InputMode, KanaMode};
use skk_core::key::{parse_sequence, KeyEvent, KeyParseError, SeqItem};
use skk_core::rule::{default_rule, Rule, RuleError, RuleRegistry};

use nicola::ChordRecognizer;
use state::{Phase, State};

/// Surrounding text callback: full text around the insertion point and the
/// cursor position in characters.
pub type RetrieveSurrounding = Box<dyn FnMut() -> Option<(String, usize)> + Send>;
/// Asked to delete this many characters after the cursor; returns whether
/// the embedder did.
pub type DeleteSurrounding = Box<dyn FnMut(usize) -> bool + Send>;

pub struct Context {
    rule: Arc<Rule>,
    registry: RuleRegistry,
    dict: CompositeDict,
    input_mode: InputMode,
    stack: Vec<State>,
    chord: Option<ChordRecognizer>,
    clock_usec: u64,
    page_start: usize,
    page_size: usize,
    retrieve_surrounding: Option<RetrieveSurrounding>,
    delete_surrounding: Option<DeleteSurrounding>,
}

impl Context {
    pub fn new() -> Self {
        let rule = default_rule();
        Self {
            stack: vec![State::new(Phase::Direct, rule.clone())],
            chord: rule.has_chords().then(|| ChordRecognizer::new(rule.clone())),
            rule,
            registry: RuleRegistry::new(),
            dict: CompositeDict::new(),
            input_mode: InputMode::Hiragana,
            clock_usec: 0,
            page_start: CandidateList::DEFAULT_PAGE_START,
            page_size: CandidateList::DEFAULT_PAGE_SIZE,
            retrieve_surrounding: None,
            delete_surrounding: None,
        }
    }

    // Dictionaries

    pub fn add_dictionary(&mut self, dict: Arc<dyn Dict>) {
        self.dict.push(dict);
    }

    pub fn remove_dictionary(&mut self, index: usize) -> Option<Arc<dyn Dict>> {
        self.dict.remove(index)
    }

    pub fn clear_dictionaries(&mut self) {
        self.dict.clear();
    }

    pub fn save_dictionaries(&self) -> Result<(), DictError> {
        self.dict.save()
    }

    // Typing rules

    /// Register a rule source under a name for later [`set_typing_rule`].
    ///
    /// [`set_typing_rule`]: Context::set_typing_rule
    pub fn add_typing_rule(&mut self, name: impl Into<String>, toml_text: impl Into<String>) {
        self.registry.add(name, toml_text);
    }

    /// Switch the typing rule. On failure the previous rule stays active.
    pub fn set_typing_rule(&mut self, name: &str) -> Result<(), RuleError> {
        let rule = self.registry.load(name)?;
        self.rule = rule.clone();
        for st in &mut self.stack {
            st.conv.set_rule(rule.clone());
        }
        self.chord = rule
            .has_chords()
            .then(|| ChordRecognizer::new(rule.clone()));
        debug!(rule = name, "typing rule switched");
        Ok(())
    }

    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    // Modes and candidate paging

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn set_page_start(&mut self, page_start: usize) {
        self.page_start = page_start;
        for st in &mut self.stack {
            st.candidates.set_page_start(page_start);
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        for st in &mut self.stack {
            st.candidates.set_page_size(page_size);
        }
    }

    /// Candidate list of the innermost selection, for lookup table UIs.
    pub fn candidates(&self) -> Option<&CandidateList> {
        self.stack
            .iter()
            .rev()
            .find(|st| st.phase == Phase::Selecting)
            .map(|st| &st.candidates)
    }

    // Surrounding text

    pub fn set_retrieve_surrounding(&mut self, cb: RetrieveSurrounding) {
        self.retrieve_surrounding = Some(cb);
    }

    pub fn set_delete_surrounding(&mut self, cb: DeleteSurrounding) {
        self.delete_surrounding = Some(cb);
    }

    /// Seed a composition from text the embedder has selected, for
    /// reconversion. No-op on empty text or when already composing.
    pub fn set_selection_text(&mut self, text: &str) {
        if text.is_empty() || self.stack.len() > 1 {
            return;
        }
        self.push_layer(Phase::Composing);
        let st = self.top_mut();
        st.midasi.push_str(text);
        st.from_surrounding = true;
    }

    // Key processing

    /// Process one key press. Returns whether the key was consumed; an
    /// unconsumed key should be handled by the embedder.
    pub fn process_key(&mut self, event: KeyEvent) -> bool {
        if self.chord.is_some() {
            let mut resolved = Vec::new();
            if let Some(rec) = &mut self.chord {
                rec.press(event, self.clock_usec, &mut resolved);
            }
            // A held key is consumed even though nothing resolved yet.
            let mut handled = resolved.is_empty();
            for ev in resolved {
                handled |= self.handle_event(&ev);
            }
            handled
        } else {
            self.handle_event(&event)
        }
    }

    /// Process a key release; only meaningful for chord rules.
    pub fn process_key_release(&mut self, event: &KeyEvent) {
        let mut resolved = Vec::new();
        if let Some(rec) = &mut self.chord {
            rec.release(event, self.clock_usec, &mut resolved);
        }
        for ev in resolved {
            self.handle_event(&ev);
        }
    }

    /// Advance the chord clock by `usec` and resolve expired holds.
    pub fn advance_clock(&mut self, usec: u64) {
        self.clock_usec += usec;
        let mut resolved = Vec::new();
        if let Some(rec) = &mut self.chord {
            rec.tick(self.clock_usec, &mut resolved);
        }
        for ev in resolved {
            self.handle_event(&ev);
        }
    }

    /// Process a textual key sequence such as `"K a n j i SPC"`. Returns
    /// whether every press was consumed.
    pub fn process_key_sequence(&mut self, sequence: &str) -> Result<bool, KeyParseError> {
        let mut all_handled = true;
        for item in parse_sequence(sequence)? {
            match item {
                SeqItem::Press(ev) => {
                    all_handled &= self.process_key(ev);
                }
                SeqItem::Release(ev) => self.process_key_release(&ev),
                SeqItem::Sleep(usec) => self.advance_clock(usec),
            }
        }
        Ok(all_handled)
    }

    // Output and preedit

    /// Committed text accumulated since the last poll.
    pub fn poll_output(&mut self) -> String {
        std::mem::take(&mut self.stack[0].output)
    }

    pub fn peek_output(&self) -> &str {
        &self.stack[0].output
    }

    /// Marker-annotated preedit: ▽ while composing, ▼ while selecting,
    /// 【】 around a dictionary registration in progress.
    pub fn preedit(&self) -> String {
        let shaping = self.shaping();
        let mut s = String::new();
        let mut brackets = 0;
        for (i, st) in self.stack.iter().enumerate() {
            if i == 0 {
                s.push_str(st.conv.pending());
                continue;
            }
            if st.phase == Phase::Direct {
                s.push('【');
                brackets += 1;
            }
            s.push_str(&st.render(shaping));
        }
        for _ in 0..brackets {
            s.push('】');
        }
        s
    }

    /// Drop any in-progress composition and pending chord state. Committed
    /// output and the input mode are kept.
    pub fn reset(&mut self) {
        let output = std::mem::take(&mut self.stack[0].output);
        self.stack.clear();
        self.stack.push(State::new(Phase::Direct, self.rule.clone()));
        self.stack[0].output = output;
        self.apply_paging();
        if let Some(rec) = &mut self.chord {
            rec.reset();
        }
    }

    // Internals shared with the key handlers

    pub(crate) fn top(&self) -> &State {
        // The stack always holds the bottom Direct layer.
        match self.stack.last() {
            Some(st) => st,
            None => unreachable!("state stack is never empty"),
        }
    }

    pub(crate) fn top_mut(&mut self) -> &mut State {
        match self.stack.last_mut() {
            Some(st) => st,
            None => unreachable!("state stack is never empty"),
        }
    }

    pub(crate) fn shaping(&self) -> KanaMode {
        self.input_mode.kana_mode().unwrap_or(KanaMode::Hiragana)
    }

    pub(crate) fn push_layer(&mut self, phase: Phase) {
        let mut st = State::new(phase, self.rule.clone());
        st.candidates.set_page_start(self.page_start);
        st.candidates.set_page_size(self.page_size);
        self.stack.push(st);
    }

    fn apply_paging(&mut self) {
        let (start, size) = (self.page_start, self.page_size);
        for st in &mut self.stack {
            st.candidates.set_page_start(start);
            st.candidates.set_page_size(size);
        }
    }

    /// Pop the top layer and commit `text` into the layer below.
    pub(crate) fn pop_and_emit(&mut self, text: &str) {
        self.stack.pop();
        self.top_mut().output.push_str(text);
    }

    pub(crate) fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Discard the top layer; the bottom layer always stays.
    pub(crate) fn pop_layer(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Discard every composition layer and dead pending input.
    pub(crate) fn truncate_to_root(&mut self) {
        self.stack.truncate(1);
        self.stack[0].conv.take_pending();
    }

    pub(crate) fn dict_lookup(&self, midasi: &str, okuri: bool) -> Vec<Candidate> {
        self.dict.lookup(midasi, okuri)
    }

    pub(crate) fn dict_complete(&self, prefix: &str) -> Vec<String> {
        self.dict.complete(prefix)
    }

    pub(crate) fn dict_register(&self, candidate: &Candidate) {
        self.dict.register(candidate);
    }

    pub(crate) fn dict_purge(&self, candidate: &Candidate) {
        self.dict.purge(candidate);
    }

    pub(crate) fn retrieve_after_cursor(&mut self) -> Option<String> {
        let cb = self.retrieve_surrounding.as_mut()?;
        let (text, cursor) = cb()?;
        Some(text.chars().skip(cursor).collect())
    }

    pub(crate) fn consume_surrounding(&mut self, count: usize) {
        if let Some(cb) = self.delete_surrounding.as_mut() {
            cb(count);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
