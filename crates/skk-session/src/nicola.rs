//! Simultaneous-press (chord) recognition for thumb-shift style rules.
//!
//! Decisions are made purely from event timestamps, so tests drive the
//! clock explicitly and real frontends feed their own event times. A key
//! that participates in some chord is held back up to the chord window; it
//! resolves to a chord when its partner arrives in time, and falls back to
//! a plain keypress otherwise.

use std::sync::Arc;

use skk_core::key::{KeyEvent, Keyval};
use skk_core::rule::Rule;
use tracing::trace;

struct Held {
    event: KeyEvent,
    time: u64,
}

pub(crate) struct ChordRecognizer {
    rule: Arc<Rule>,
    held: Vec<Held>,
}

impl ChordRecognizer {
    pub fn new(rule: Arc<Rule>) -> Self {
        Self {
            rule,
            held: Vec::new(),
        }
    }

    pub fn set_rule(&mut self, rule: Arc<Rule>) {
        self.rule = rule;
        // Pending decisions from the old rule no longer apply.
        self.held.clear();
    }

    fn window(&self) -> u64 {
        self.rule.chord_window_usec()
    }

    fn chord_of(&self, a: &KeyEvent, b: &KeyEvent) -> Option<String> {
        self.rule.chord(&a.notation(), &b.notation())
    }

    fn emit_single(out: &mut Vec<KeyEvent>, held: Held) {
        out.push(held.event);
    }

    fn emit_chord(out: &mut Vec<KeyEvent>, token: String) {
        trace!(token, "chord resolved");
        out.push(KeyEvent::plain(Keyval::Chord(token)));
    }

    /// Resolve everything currently held, chord first when one is formed.
    fn flush(&mut self, out: &mut Vec<KeyEvent>) {
        while !self.held.is_empty() {
            if self.held.len() >= 2 {
                if let Some(token) = self.chord_of(&self.held[0].event, &self.held[1].event) {
                    self.held.drain(..2);
                    Self::emit_chord(out, token);
                    continue;
                }
            }
            let first = self.held.remove(0);
            Self::emit_single(out, first);
        }
    }

    /// Resolve held keys whose decision window has passed at `now`.
    pub fn tick(&mut self, now: u64, out: &mut Vec<KeyEvent>) {
        loop {
            match self.held.len() {
                0 => return,
                1 => {
                    if now <= self.held[0].time + self.window() {
                        return;
                    }
                    let first = self.held.remove(0);
                    Self::emit_single(out, first);
                }
                _ => {
                    // A formed pair resolves as a chord once the window from
                    // the first press expires; an unformed pair cannot occur
                    // (press resolves it immediately).
                    if now <= self.held[0].time + self.window() {
                        return;
                    }
                    if let Some(token) = self.chord_of(&self.held[0].event, &self.held[1].event) {
                        self.held.drain(..2);
                        Self::emit_chord(out, token);
                    } else {
                        let first = self.held.remove(0);
                        Self::emit_single(out, first);
                    }
                }
            }
        }
    }

    pub fn press(&mut self, event: KeyEvent, now: u64, out: &mut Vec<KeyEvent>) {
        self.tick(now, out);
        if !self.rule.is_chord_member(&event.notation()) {
            // Non-members cannot wait and force pending keys out first.
            self.flush(out);
            out.push(event);
            return;
        }
        self.held.push(Held { event, time: now });
        match self.held.len() {
            1 => {}
            2 => {
                if self.chord_of(&self.held[0].event, &self.held[1].event).is_none() {
                    // Not partners: the older key resolves alone.
                    let first = self.held.remove(0);
                    Self::emit_single(out, first);
                }
            }
            _ => {
                // Third press decides the pair by comparing gaps; the tighter
                // pair chords, ties favor the earlier pair.
                let gap1 = self.held[1].time - self.held[0].time;
                let gap2 = self.held[2].time - self.held[1].time;
                if gap1 <= gap2 {
                    if let Some(token) = self.chord_of(&self.held[0].event, &self.held[1].event) {
                        self.held.drain(..2);
                        Self::emit_chord(out, token);
                    } else {
                        let first = self.held.remove(0);
                        Self::emit_single(out, first);
                    }
                } else {
                    // The decision is final: the remaining pair chords right
                    // away instead of waiting out the window.
                    let first = self.held.remove(0);
                    Self::emit_single(out, first);
                    if let Some(token) = self.chord_of(&self.held[0].event, &self.held[1].event) {
                        self.held.drain(..2);
                        Self::emit_chord(out, token);
                    } else {
                        let second = self.held.remove(0);
                        Self::emit_single(out, second);
                    }
                }
            }
        }
    }

    /// A release resolves whatever the released key is part of.
    pub fn release(&mut self, event: &KeyEvent, now: u64, out: &mut Vec<KeyEvent>) {
        self.tick(now, out);
        let notation = event.notation();
        if !self
            .held
            .iter()
            .any(|h| h.event.notation() == notation)
        {
            return;
        }
        self.flush(out);
    }

    pub fn reset(&mut self) {
        self.held.clear();
    }
}
