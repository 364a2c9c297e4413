//! Key event dispatch over the state stack.

use tracing::debug_span;

use skk_core::candidate::Candidate;
use skk_core::kana::{self, InputMode};
use skk_core::key::{KeyEvent, Keyval};
use skk_core::numeric;
use skk_core::rule::{Command, KeymapKind};

use crate::state::{Completion, Phase};
use crate::Context;

/// Kana that start a conversion automatically when they land at the end of
/// a headword.
const AUTO_START_TRIGGERS: &[char] = &['を', '、', '。', '，', '．', '？', '！', '」', '）'];

fn toggled_kana(mode: InputMode) -> InputMode {
    match mode {
        InputMode::Hiragana => InputMode::Katakana,
        InputMode::Katakana | InputMode::HankakuKatakana => InputMode::Hiragana,
        other => other,
    }
}

fn toggled_hankaku(mode: InputMode) -> InputMode {
    match mode {
        InputMode::Hiragana | InputMode::Katakana => InputMode::HankakuKatakana,
        InputMode::HankakuKatakana => InputMode::Hiragana,
        other => other,
    }
}

impl Context {
    pub(crate) fn handle_event(&mut self, ev: &KeyEvent) -> bool {
        let _span = debug_span!("key", key = %ev).entered();
        match self.top().phase {
            Phase::CodePoint => self.handle_codepoint(ev),
            Phase::Composing if self.top().abbrev => self.handle_abbrev(ev),
            Phase::Composing => self.handle_composing(ev),
            Phase::Selecting => self.handle_selecting(ev),
            Phase::Direct => match self.input_mode() {
                InputMode::Latin => self.handle_latin(ev, false),
                InputMode::WideLatin => self.handle_latin(ev, true),
                _ => self.handle_direct(ev),
            },
        }
    }

    // Direct input in a kana mode: the bottom layer, or a dictionary-edit
    // layer.

    fn handle_direct(&mut self, ev: &KeyEvent) -> bool {
        let in_dict_edit = self.stack_depth() > 1;
        if !self.pending_extends(ev) {
            if let Some(cmd) = self.rule().command(KeymapKind::Kana, &ev.notation()) {
                if let Some(handled) = self.direct_command(cmd, in_dict_edit) {
                    return handled;
                }
            }
        }
        self.direct_literal(ev, in_dict_edit)
    }

    /// A printable that continues the pending rom-kana prefix keeps its
    /// literal role over any keymap binding ("z" + l is →, not latin mode).
    fn pending_extends(&self, ev: &KeyEvent) -> bool {
        match ev.printable() {
            Some(c) => {
                let conv = &self.top().conv;
                !conv.is_pending_empty() && conv.would_extend(c)
            }
            None => false,
        }
    }

    fn direct_command(&mut self, cmd: Command, in_dict_edit: bool) -> Option<bool> {
        match cmd {
            Command::Abort => {
                if in_dict_edit {
                    self.abort_dict_edit();
                    return Some(true);
                }
                if !self.top().conv.is_pending_empty() {
                    self.top_mut().conv.take_pending();
                    return Some(true);
                }
                Some(false)
            }
            Command::AbortToLatin => Some(self.abort_to_latin()),
            Command::Commit => {
                if in_dict_edit {
                    self.finish_dict_edit();
                    return Some(true);
                }
                Some(false)
            }
            Command::HiraganaMode => {
                self.flush_nasal_direct();
                self.set_input_mode(InputMode::Hiragana);
                Some(true)
            }
            Command::Delete => {
                if self.pop_pending_char() {
                    return Some(true);
                }
                if in_dict_edit {
                    if self.top_mut().output.pop_char() {
                        return Some(true);
                    }
                    self.abort_dict_edit();
                    return Some(true);
                }
                Some(false)
            }
            Command::Convert => {
                self.flush_nasal_direct();
                self.top_mut().output.push(' ');
                Some(true)
            }
            Command::ToggleKana => {
                self.switch_mode_direct(toggled_kana(self.input_mode()));
                Some(true)
            }
            Command::ToggleHankakuKana => {
                self.switch_mode_direct(toggled_hankaku(self.input_mode()));
                Some(true)
            }
            Command::LatinMode => {
                self.switch_mode_direct(InputMode::Latin);
                Some(true)
            }
            Command::WideLatinMode => {
                self.switch_mode_direct(InputMode::WideLatin);
                Some(true)
            }
            Command::AbbrevMode => {
                self.flush_nasal_direct();
                self.push_layer(Phase::Composing);
                self.top_mut().abbrev = true;
                Some(true)
            }
            Command::CodePointMode => {
                self.push_layer(Phase::CodePoint);
                Some(true)
            }
            Command::StartComposition => {
                self.flush_nasal_direct();
                self.top_mut().conv.take_pending();
                self.push_layer(Phase::Composing);
                Some(true)
            }
            // These only mean something while selecting or composing; the
            // keys fall back to their literal roles here (x is a small-kana
            // prefix, X starts a composition).
            Command::Complete
            | Command::PreviousCandidate
            | Command::PurgeCandidate
            | Command::CandidateUp
            | Command::CandidateDown
            | Command::CandidatePageUp
            | Command::CandidatePageDown
            | Command::SurroundingRight => None,
        }
    }

    fn direct_literal(&mut self, ev: &KeyEvent, in_dict_edit: bool) -> bool {
        if let Keyval::Chord(token) = &ev.keyval {
            if self.top_mut().conv.append_token(token) {
                self.drain_direct();
                return true;
            }
            return false;
        }
        let Some(c) = ev.printable() else {
            return false;
        };
        if c.is_ascii_uppercase() {
            let lc = c.to_ascii_lowercase();
            let pending_empty = self.top().conv.is_pending_empty();
            if !pending_empty && self.top().conv.would_extend(lc) {
                // The new layer takes over the pending prefix, so e.g. a
                // geminate forming across the boundary lands in the headword.
                let pending = self.top_mut().conv.take_pending();
                self.push_layer(Phase::Composing);
                self.top_mut().conv.set_pending(pending);
            } else {
                if !pending_empty {
                    self.top_mut().conv.output_nn();
                    self.drain_direct();
                    self.top_mut().conv.take_pending();
                }
                self.push_layer(Phase::Composing);
            }
            self.composing_append(lc);
            return true;
        }
        if self.top_mut().conv.append(c) {
            self.drain_direct();
            return true;
        }
        if in_dict_edit {
            // The definition accepts anything.
            self.top_mut().output.push(c);
            return true;
        }
        false
    }

    /// Shape and commit whatever the converter has emitted at this layer.
    fn drain_direct(&mut self) {
        let emitted = self.top_mut().conv.take_output();
        if emitted.is_empty() {
            return;
        }
        let shaped = self.shaping().shape(&emitted);
        self.top_mut().output.push_str(&shaped);
    }

    fn flush_nasal_direct(&mut self) {
        self.top_mut().conv.output_nn();
        self.drain_direct();
    }

    /// Mode switches resolve a pending nasal and drop the rest of the
    /// prefix.
    fn switch_mode_direct(&mut self, mode: InputMode) {
        self.flush_nasal_direct();
        self.top_mut().conv.take_pending();
        self.set_input_mode(mode);
    }

    // Latin and wide-latin input.

    fn handle_latin(&mut self, ev: &KeyEvent, wide: bool) -> bool {
        let kind = if wide {
            KeymapKind::WideLatin
        } else {
            KeymapKind::Latin
        };
        if let Some(Command::HiraganaMode) = self.rule().command(kind, &ev.notation()) {
            self.set_input_mode(InputMode::Hiragana);
            return true;
        }
        let Some(c) = ev.printable() else {
            return false;
        };
        if wide {
            let text = kana::to_wide_latin(&c.to_string());
            self.top_mut().output.push_str(&text);
        } else {
            self.top_mut().output.push(c);
        }
        true
    }

    // Composing a headword.

    fn handle_composing(&mut self, ev: &KeyEvent) -> bool {
        if !self.pending_extends(ev) {
            if let Some(cmd) = self.rule().command(KeymapKind::Kana, &ev.notation()) {
                if let Some(handled) = self.composing_command(cmd) {
                    return handled;
                }
            }
        }
        self.top_mut().completion = None;
        if let Keyval::Chord(token) = &ev.keyval {
            if self.top_mut().conv.append_token(token) {
                if !self.drain_composing() {
                    self.check_okuri_complete();
                }
                return true;
            }
            return false;
        }
        let Some(c) = ev.printable() else {
            return false;
        };
        if c.is_ascii_uppercase() {
            self.composing_shift(c.to_ascii_lowercase());
        } else if c == '>' {
            // An affix marker ends the headword and converts right away;
            // entries like ちょう> carry it in the dictionary key.
            self.resolve_composition();
            self.top_mut().fold_okuri();
            self.top_mut().midasi.push('>');
            self.start_conversion();
        } else {
            self.composing_append(c);
        }
        true
    }

    fn composing_command(&mut self, cmd: Command) -> Option<bool> {
        match cmd {
            Command::Abort => {
                self.pop_layer();
                Some(true)
            }
            Command::AbortToLatin => Some(self.abort_to_latin()),
            Command::Commit => {
                let text = self.take_composition();
                self.pop_and_emit(&text);
                Some(true)
            }
            Command::HiraganaMode => {
                let text = self.take_composition();
                self.pop_and_emit(&text);
                self.set_input_mode(InputMode::Hiragana);
                Some(true)
            }
            Command::Delete => {
                self.top_mut().completion = None;
                self.composing_delete();
                Some(true)
            }
            Command::Convert => {
                self.top_mut().completion = None;
                if self.top().midasi.is_empty()
                    && self.top().okuri.is_empty()
                    && self.top().conv.is_pending_empty()
                {
                    return Some(true);
                }
                self.start_conversion();
                Some(true)
            }
            Command::Complete => {
                self.complete_midasi();
                Some(true)
            }
            Command::ToggleKana => {
                // Commit the headword shaped to the opposite script; the
                // input mode itself does not change.
                let mode = self.input_mode();
                self.resolve_composition();
                let st = self.top_mut();
                st.fold_okuri();
                let text = match mode {
                    InputMode::Hiragana => kana::to_katakana(&st.midasi),
                    _ => kana::to_hiragana(&st.midasi),
                };
                self.pop_and_emit(&text);
                Some(true)
            }
            Command::ToggleHankakuKana => {
                self.resolve_composition();
                let st = self.top_mut();
                st.fold_okuri();
                let text = kana::to_hankaku(&st.midasi);
                self.pop_and_emit(&text);
                Some(true)
            }
            Command::LatinMode => {
                let text = self.take_composition();
                self.pop_and_emit(&text);
                self.set_input_mode(InputMode::Latin);
                Some(true)
            }
            Command::WideLatinMode => {
                let text = self.take_composition();
                self.pop_and_emit(&text);
                self.set_input_mode(InputMode::WideLatin);
                Some(true)
            }
            Command::SurroundingRight => {
                if self.pull_surrounding() {
                    Some(true)
                } else {
                    Some(false)
                }
            }
            // Fall back to the literal key: Q and X continue the headword
            // as shifted letters, x as a small-kana prefix.
            Command::StartComposition
            | Command::AbbrevMode
            | Command::CodePointMode
            | Command::PreviousCandidate
            | Command::PurgeCandidate
            | Command::CandidateUp
            | Command::CandidateDown
            | Command::CandidatePageUp
            | Command::CandidatePageDown => None,
        }
    }

    /// Resolve the nasal, drop dead pending input.
    fn resolve_composition(&mut self) {
        self.top_mut().conv.output_nn();
        let _ = self.drain_composing();
        self.top_mut().conv.take_pending();
    }

    /// Composition text shaped for the current mode, for plain commits.
    fn take_composition(&mut self) -> String {
        self.resolve_composition();
        let shaping = self.shaping();
        let st = self.top_mut();
        st.fold_okuri();
        if st.abbrev {
            st.midasi.clone()
        } else {
            shaping.shape(&st.midasi)
        }
    }

    /// An upper-case letter while composing: starts or continues the
    /// okurigana.
    fn composing_shift(&mut self, lc: char) {
        if self.top().in_okuri {
            // A shift inside the okuri only resolves a pending nasal.
            self.top_mut().conv.output_nn();
            let _ = self.drain_composing();
            self.composing_append(lc);
            return;
        }
        if self.top().midasi.is_empty() {
            // Still typing the first letters of the headword.
            self.composing_append(lc);
            return;
        }
        if !self.top().conv.is_pending_empty() && self.top().conv.would_extend(lc) {
            // The boundary letter completes a table entry; its kana still
            // belongs to the headword and the carry opens the okuri.
            self.composing_append(lc);
            let st = self.top_mut();
            st.in_okuri = true;
            st.okuri_consonant = lc.to_string();
            return;
        }
        self.top_mut().conv.output_nn();
        let _ = self.drain_composing();
        self.top_mut().conv.take_pending();
        let st = self.top_mut();
        st.in_okuri = true;
        st.okuri_consonant = lc.to_string();
        self.composing_append(lc);
    }

    /// Feed a character into the composing converter, routing emissions to
    /// the headword or the okurigana.
    fn composing_append(&mut self, c: char) {
        if !self.top_mut().conv.append(c) {
            // Digits and unmatched symbols join the headword literally;
            // digits matter for numeric conversion.
            let st = self.top_mut();
            if st.in_okuri {
                st.okuri.push(c);
            } else {
                st.midasi.push(c);
            }
            return;
        }
        if !self.drain_composing() {
            self.check_okuri_complete();
        }
    }

    /// Route emitted kana. Returns true when an automatic conversion was
    /// triggered.
    fn drain_composing(&mut self) -> bool {
        let emitted = self.top_mut().conv.take_output();
        if emitted.is_empty() {
            return false;
        }
        if self.top().in_okuri {
            self.top_mut().okuri.push_str(&emitted);
            return false;
        }
        if !self.top().abbrev {
            let mut chars: Vec<char> = emitted.chars().collect();
            if let Some(&last) = chars.last() {
                let alone = self.top().midasi.is_empty() && chars.len() == 1;
                if AUTO_START_TRIGGERS.contains(&last) && !alone {
                    chars.pop();
                    let head: String = chars.into_iter().collect();
                    let st = self.top_mut();
                    st.midasi.push_str(&head);
                    st.auto_suffix = last.to_string();
                    self.start_conversion();
                    return true;
                }
            }
        }
        self.top_mut().midasi.push_str(&emitted);
        false
    }

    /// Once the okurigana resolves fully, look the word up right away.
    fn check_okuri_complete(&mut self) {
        let st = self.top();
        if st.in_okuri && st.conv.is_pending_empty() && !st.okuri.is_empty() {
            self.start_conversion();
        }
    }

    fn composing_delete(&mut self) {
        if self.pop_pending_char() {
            let st = self.top_mut();
            if st.conv.is_pending_empty() && st.in_okuri && st.okuri.is_empty() {
                st.in_okuri = false;
                st.okuri_consonant.clear();
            }
            return;
        }
        let st = self.top_mut();
        if st.in_okuri && !st.okuri.is_empty() {
            st.okuri.pop();
            return;
        }
        if st.in_okuri {
            st.in_okuri = false;
            st.okuri_consonant.clear();
            return;
        }
        if !st.midasi.is_empty() {
            st.midasi.pop();
            return;
        }
        self.pop_layer();
    }

    fn complete_midasi(&mut self) {
        if self.top().completion.is_none() {
            let base = self.top().midasi.clone();
            let matches = self.dict_complete(&base);
            if matches.is_empty() {
                return;
            }
            let st = self.top_mut();
            st.midasi = matches[0].clone();
            st.completion = Some(Completion {
                base,
                matches,
                index: 0,
            });
            return;
        }
        let st = self.top_mut();
        if let Some(completion) = &mut st.completion {
            if completion.index + 1 < completion.matches.len() {
                completion.index += 1;
                st.midasi = completion.matches[completion.index].clone();
            }
        }
    }

    fn pull_surrounding(&mut self) -> bool {
        let Some(after) = self.retrieve_after_cursor() else {
            return false;
        };
        if after.is_empty() {
            return false;
        }
        let count = after.chars().count();
        self.consume_surrounding(count);
        let st = self.top_mut();
        st.midasi.push_str(&after);
        st.from_surrounding = true;
        true
    }

    // Conversion

    pub(crate) fn start_conversion(&mut self) {
        self.top_mut().conv.output_nn();
        let _ = self.drain_composing();
        self.top_mut().completion = None;

        let st = self.top();
        let okuri = st.in_okuri;
        let midasi = st.midasi.clone();
        let consonant = st.okuri_consonant.clone();
        let abbrev = st.abbrev;

        let mut candidates: Vec<Candidate> = Vec::new();
        if !abbrev {
            let (template, numbers) = numeric::extract_numerics(&midasi);
            if !numbers.is_empty() {
                let mut key = template;
                key.push_str(&consonant);
                for mut c in self.dict_lookup(&key, okuri) {
                    c.output = numeric::expand(&c.text, &numbers);
                    candidates.push(c);
                }
            }
        }
        let mut key = midasi.clone();
        key.push_str(&consonant);
        for c in self.dict_lookup(&key, okuri) {
            if !candidates.iter().any(|x| x.text == c.text) {
                candidates.push(c);
            }
        }

        if candidates.is_empty() && self.top().from_surrounding {
            // Fall back to the longest headword prefix the dictionaries
            // know, keeping the rest as literal text.
            let chars: Vec<char> = midasi.chars().collect();
            for n in (1..chars.len()).rev() {
                let prefix: String = chars[..n].iter().collect();
                let found = self.dict_lookup(&prefix, false);
                if !found.is_empty() {
                    let tail: String = chars[n..].iter().collect();
                    let st = self.top_mut();
                    st.midasi = prefix;
                    st.tail = tail;
                    candidates = found;
                    break;
                }
            }
        }

        let st = self.top_mut();
        st.phase = Phase::Selecting;
        if candidates.is_empty() {
            st.candidates.clear();
            self.push_layer(Phase::Direct);
        } else {
            st.candidates.set(candidates);
            st.candidates.next();
        }
    }

    // Selecting a candidate.

    fn handle_selecting(&mut self, ev: &KeyEvent) -> bool {
        let cmd = self.rule().command(KeymapKind::Kana, &ev.notation());
        match cmd {
            Some(Command::Convert) => {
                if !self.top_mut().candidates.next() {
                    // Out of candidates: ask the user to define the word.
                    self.top_mut().candidates.set_cursor_pos(-1);
                    self.push_layer(Phase::Direct);
                }
                true
            }
            Some(Command::PreviousCandidate) => {
                if !self.top_mut().candidates.previous() {
                    let st = self.top_mut();
                    st.phase = Phase::Composing;
                    st.candidates.clear();
                    let tail = std::mem::take(&mut st.tail);
                    st.midasi.push_str(&tail);
                    let suffix = std::mem::take(&mut st.auto_suffix);
                    st.midasi.push_str(&suffix);
                }
                true
            }
            Some(Command::PurgeCandidate) => {
                if let Some(candidate) = self.top().candidates.current().cloned() {
                    self.dict_purge(&candidate);
                }
                self.pop_layer();
                true
            }
            Some(Command::CandidateUp) => {
                self.top_mut().candidates.cursor_up();
                true
            }
            Some(Command::CandidateDown) => {
                self.top_mut().candidates.cursor_down();
                true
            }
            Some(Command::CandidatePageUp) => {
                self.top_mut().candidates.page_up();
                true
            }
            Some(Command::CandidatePageDown) => {
                self.top_mut().candidates.page_down();
                true
            }
            Some(Command::Abort) => {
                let st = self.top_mut();
                st.phase = Phase::Composing;
                st.candidates.clear();
                let tail = std::mem::take(&mut st.tail);
                st.midasi.push_str(&tail);
                let suffix = std::mem::take(&mut st.auto_suffix);
                st.midasi.push_str(&suffix);
                true
            }
            Some(Command::AbortToLatin) => self.abort_to_latin(),
            Some(Command::Commit) => {
                self.commit_selection();
                true
            }
            Some(Command::HiraganaMode) => {
                self.commit_selection();
                self.set_input_mode(InputMode::Hiragana);
                true
            }
            Some(Command::ToggleKana) => {
                // The candidate commits as selected; only the mode flips.
                self.commit_selection();
                self.set_input_mode(toggled_kana(self.input_mode()));
                true
            }
            Some(Command::ToggleHankakuKana) => {
                self.commit_selection();
                self.set_input_mode(toggled_hankaku(self.input_mode()));
                true
            }
            Some(Command::Delete) => {
                self.commit_selection();
                self.top_mut().output.pop();
                true
            }
            // Anything else commits the selection and replays the key in
            // the resulting state.
            _ => {
                self.commit_selection();
                if let Some('>') = ev.printable() {
                    // An affix marker after a commit seeds a new headword,
                    // for prefix entries like >し.
                    self.push_layer(Phase::Composing);
                    self.top_mut().midasi.push('>');
                    return true;
                }
                if self.handle_event(ev) {
                    return true;
                }
                // Unbound printables come out literally after the commit.
                if let Some(c) = ev.printable() {
                    self.top_mut().output.push(c);
                    return true;
                }
                false
            }
        }
    }

    fn commit_selection(&mut self) {
        let shaping = self.shaping();
        let selected = self.top().candidates.current().cloned();
        let mut text = match &selected {
            Some(candidate) => candidate.output.clone(),
            None => shaping.shape(&self.top().midasi),
        };
        if let Some(candidate) = &selected {
            self.dict_register(candidate);
        }
        let st = self.top();
        text.push_str(&shaping.shape(&st.okuri));
        text.push_str(&st.tail);
        text.push_str(&shaping.shape(&st.auto_suffix));
        self.pop_and_emit(&text);
    }

    // Dictionary edit.

    fn abort_dict_edit(&mut self) {
        self.pop_layer();
        let st = self.top_mut();
        if st.candidates.is_empty() {
            st.phase = Phase::Composing;
            st.fold_okuri();
        } else {
            // Back to browsing, from the top of the list.
            st.candidates.set_cursor_pos(0);
        }
    }

    fn finish_dict_edit(&mut self) {
        self.flush_nasal_direct();
        self.top_mut().conv.take_pending();
        let word = self.top().output.clone();
        if word.is_empty() {
            self.abort_dict_edit();
            return;
        }
        self.pop_layer();

        let shaping = self.shaping();
        let st = self.top();
        let (template, numbers) = if st.abbrev {
            (st.midasi.clone(), Vec::new())
        } else {
            numeric::extract_numerics(&st.midasi)
        };
        let mut reg_midasi = template;
        reg_midasi.push_str(&st.okuri_consonant);
        let candidate = Candidate::new(reg_midasi, st.in_okuri, word.clone(), None);
        let output = if numbers.is_empty() {
            word
        } else {
            numeric::expand(&word, &numbers)
        };
        self.dict_register(&candidate);

        let st = self.top();
        let mut text = output;
        text.push_str(&shaping.shape(&st.okuri));
        text.push_str(&st.tail);
        text.push_str(&shaping.shape(&st.auto_suffix));
        self.pop_and_emit(&text);
    }

    // Abbrev: literal ASCII headwords.

    fn handle_abbrev(&mut self, ev: &KeyEvent) -> bool {
        if let Some(cmd) = self.rule().command(KeymapKind::Abbrev, &ev.notation()) {
            match cmd {
                Command::Abort => {
                    self.pop_layer();
                    return true;
                }
                Command::AbortToLatin => return self.abort_to_latin(),
                Command::Commit | Command::HiraganaMode => {
                    let text = self.top().midasi.clone();
                    self.pop_and_emit(&text);
                    return true;
                }
                Command::Delete => {
                    if !self.top_mut().midasi.pop_char() {
                        self.pop_layer();
                    }
                    return true;
                }
                Command::Convert => {
                    self.start_conversion();
                    return true;
                }
                Command::Complete => {
                    self.complete_midasi();
                    return true;
                }
                Command::ToggleHankakuKana => {
                    // Commit the abbreviation in wide latin.
                    let text = kana::to_wide_latin(&self.top().midasi);
                    self.pop_and_emit(&text);
                    return true;
                }
                _ => {}
            }
        }
        let Some(c) = ev.printable() else {
            return false;
        };
        self.top_mut().completion = None;
        self.top_mut().midasi.push(c);
        true
    }

    // Unicode code point entry.

    fn handle_codepoint(&mut self, ev: &KeyEvent) -> bool {
        if let Some(cmd) = self.rule().command(KeymapKind::Kana, &ev.notation()) {
            match cmd {
                Command::Abort => {
                    self.pop_layer();
                    return true;
                }
                Command::AbortToLatin => return self.abort_to_latin(),
                Command::Commit => {
                    // The code is entered in two-digit groups; an unfinished
                    // group keeps the prompt open.
                    if self.top().midasi.len() % 2 != 0 {
                        return true;
                    }
                    let text = u32::from_str_radix(&self.top().midasi, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_default();
                    self.pop_and_emit(&text);
                    return true;
                }
                Command::Delete => {
                    if !self.top_mut().midasi.pop_char() {
                        self.pop_layer();
                    }
                    return true;
                }
                _ => {}
            }
        }
        let Some(c) = ev.printable() else {
            return false;
        };
        if c.is_ascii_hexdigit() && self.top().midasi.chars().count() < 6 {
            self.top_mut().midasi.push(c);
            return true;
        }
        false
    }

    // Shared helpers.

    fn pop_pending_char(&mut self) -> bool {
        let st = self.top_mut();
        if st.conv.is_pending_empty() {
            return false;
        }
        let mut pending = st.conv.take_pending();
        pending.pop();
        st.conv.set_pending(pending);
        true
    }

    fn abort_to_latin(&mut self) -> bool {
        let dirty = self.stack_depth() > 1 || !self.top().conv.is_pending_empty();
        if !dirty {
            return false;
        }
        self.truncate_to_root();
        self.set_input_mode(InputMode::Latin);
        true
    }
}

/// Pop the last character of a string in place. Returns false when empty.
trait PopChar {
    fn pop_char(&mut self) -> bool;
}

impl PopChar for String {
    fn pop_char(&mut self) -> bool {
        self.pop().is_some()
    }
}
