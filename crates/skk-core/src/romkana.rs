//! Incremental romaji to kana conversion.
//!
//! The converter feeds characters into a pending buffer and resolves it
//! against the active rule's rom-kana table with longest-match backoff.
//! Output is always hiragana; script shaping happens at commit time.

use std::sync::Arc;

use crate::rule::Rule;

pub struct RomKanaConverter {
    rule: Arc<Rule>,
    pending: String,
    output: String,
}

impl RomKanaConverter {
    pub fn new(rule: Arc<Rule>) -> Self {
        Self {
            rule,
            pending: String::new(),
            output: String::new(),
        }
    }

    pub fn set_rule(&mut self, rule: Arc<Rule>) {
        self.rule = rule;
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn is_pending_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn peek_output(&self) -> &str {
        &self.output
    }

    /// Drain everything emitted since the last call.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Move the pending buffer out without resolving it.
    pub fn take_pending(&mut self) -> String {
        std::mem::take(&mut self.pending)
    }

    pub fn set_pending(&mut self, pending: String) {
        self.pending = pending;
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.output.clear();
    }

    /// Whether appending `c` would extend the current pending prefix into a
    /// table entry rather than forcing a backoff.
    pub fn would_extend(&self, c: char) -> bool {
        let mut extended = self.pending.clone();
        extended.push(c);
        let m = self.rule.romkana_lookup(&extended);
        m.exact.is_some() || m.has_longer
    }

    /// Feed one character. Returns false when the character cannot start or
    /// extend any table entry; the pending buffer is left untouched then.
    pub fn append(&mut self, c: char) -> bool {
        self.pending.push(c);
        loop {
            let m = self.rule.romkana_lookup(&self.pending);
            if m.has_longer {
                // Wait for more input even when an exact entry matches now
                // ("n" may still become "nya").
                return true;
            }
            if let Some(entry) = m.exact {
                self.output.push_str(&entry.output);
                self.pending = entry.carry;
                if self.pending.is_empty() {
                    return true;
                }
                continue;
            }
            // Back off: resolve the longest matching proper prefix, keep the
            // tail pending and retry.
            if let Some((end, entry)) = self.longest_exact_prefix() {
                self.output.push_str(&entry.output);
                let mut rest = entry.carry;
                rest.push_str(&self.pending[end..]);
                self.pending = rest;
                continue;
            }
            // Nothing matches. A dead leading char is dropped so the rest
            // can resolve; a lone unmatched char is rejected to the caller.
            let rest: String = self.pending.chars().skip(1).collect();
            if rest.is_empty() {
                self.pending.clear();
                return false;
            }
            self.pending = rest;
        }
    }

    /// Feed a whole chord token; matched against table entries verbatim.
    pub fn append_token(&mut self, token: &str) -> bool {
        let m = self.rule.romkana_lookup(token);
        match m.exact {
            Some(entry) => {
                self.output.push_str(&entry.output);
                self.pending = entry.carry;
                true
            }
            None => false,
        }
    }

    fn longest_exact_prefix(&self) -> Option<(usize, crate::rule::RomKanaEntry)> {
        let mut boundaries: Vec<usize> = self
            .pending
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .collect();
        boundaries.reverse();
        for end in boundaries {
            let m = self.rule.romkana_lookup(&self.pending[..end]);
            if let Some(entry) = m.exact {
                return Some((end, entry));
            }
        }
        None
    }

    /// Resolve a pending syllabic nasal ("n" alone becomes ん). Any other
    /// pending prefix is left as is. Returns true when something was emitted.
    pub fn output_nn(&mut self) -> bool {
        if self.pending != "n" {
            return false;
        }
        let m = self.rule.romkana_lookup("n");
        match m.exact {
            Some(entry) => {
                self.output.push_str(&entry.output);
                self.pending.clear();
                true
            }
            None => {
                self.pending.clear();
                false
            }
        }
    }

    /// Force the pending buffer out: exact matches resolve, the rest is
    /// emitted literally.
    pub fn flush(&mut self) {
        while !self.pending.is_empty() {
            if let Some(entry) = self.rule.romkana_lookup(&self.pending).exact {
                self.output.push_str(&entry.output);
                self.pending = entry.carry;
                continue;
            }
            if let Some((end, entry)) = self.longest_exact_prefix() {
                self.output.push_str(&entry.output);
                let mut rest = entry.carry;
                rest.push_str(&self.pending[end..]);
                self.pending = rest;
                continue;
            }
            let mut chars = self.pending.chars();
            if let Some(c) = chars.next() {
                self.output.push(c);
            }
            self.pending = chars.collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::default_rule;

    fn converter() -> RomKanaConverter {
        RomKanaConverter::new(default_rule())
    }

    fn feed(conv: &mut RomKanaConverter, input: &str) {
        for c in input.chars() {
            conv.append(c);
        }
    }

    #[test]
    fn simple_syllables() {
        let mut conv = converter();
        feed(&mut conv, "ka");
        assert_eq!(conv.take_output(), "か");
        assert!(conv.is_pending_empty());

        feed(&mut conv, "kanji");
        assert_eq!(conv.take_output(), "かんじ");
    }

    #[test]
    fn pending_waits_for_more() {
        let mut conv = converter();
        conv.append('k');
        assert_eq!(conv.pending(), "k");
        assert_eq!(conv.peek_output(), "");
        conv.append('y');
        assert_eq!(conv.pending(), "ky");
        conv.append('o');
        assert_eq!(conv.take_output(), "きょ");
        assert!(conv.is_pending_empty());
    }

    #[test]
    fn geminate_carry() {
        let mut conv = converter();
        feed(&mut conv, "tta");
        assert_eq!(conv.take_output(), "った");

        feed(&mut conv, "ww");
        assert_eq!(conv.take_output(), "っ");
        assert_eq!(conv.pending(), "w");
    }

    #[test]
    fn nasal_backoff() {
        let mut conv = converter();
        feed(&mut conv, "nda");
        assert_eq!(conv.take_output(), "んだ");

        feed(&mut conv, "n.");
        assert_eq!(conv.take_output(), "ん。");
    }

    #[test]
    fn nasal_waits_for_vowel() {
        let mut conv = converter();
        conv.append('n');
        assert_eq!(conv.peek_output(), "");
        conv.append('a');
        assert_eq!(conv.take_output(), "な");
    }

    #[test]
    fn explicit_nn() {
        let mut conv = converter();
        feed(&mut conv, "nn");
        assert_eq!(conv.take_output(), "ん");
        assert!(conv.is_pending_empty());

        feed(&mut conv, "n'");
        assert_eq!(conv.take_output(), "ん");
    }

    #[test]
    fn output_nn_only_resolves_nasal() {
        let mut conv = converter();
        conv.append('n');
        assert!(conv.output_nn());
        assert_eq!(conv.take_output(), "ん");

        conv.append('k');
        assert!(!conv.output_nn());
        assert_eq!(conv.pending(), "k");
    }

    #[test]
    fn unmatched_char_rejected() {
        let mut conv = converter();
        assert!(!conv.append('1'));
        assert!(conv.is_pending_empty());
        assert_eq!(conv.peek_output(), "");
    }

    #[test]
    fn symbols() {
        let mut conv = converter();
        feed(&mut conv, "-");
        assert_eq!(conv.take_output(), "ー");
        feed(&mut conv, "z.");
        assert_eq!(conv.take_output(), "…");
        feed(&mut conv, "zl");
        assert_eq!(conv.take_output(), "→");
        feed(&mut conv, "vu");
        assert_eq!(conv.take_output(), "う゛");
    }

    #[test]
    fn flush_emits_unresolved_literally() {
        let mut conv = converter();
        conv.append('k');
        conv.flush();
        assert_eq!(conv.take_output(), "k");

        conv.append('n');
        conv.flush();
        assert_eq!(conv.take_output(), "ん");
    }

    #[test]
    fn would_extend() {
        let mut conv = converter();
        conv.append('k');
        assert!(conv.would_extend('k'));
        assert!(conv.would_extend('y'));
        assert!(!conv.would_extend('d'));
    }
}
