//! Typing rules: keymaps, rom-kana tables and chord definitions.
//!
//! A rule is an immutable TOML document. A rule may name a parent with
//! `inherit`; every lookup falls back to the parent transitively, so a child
//! only carries its overrides. Rules are resolved by name through a
//! [`RuleRegistry`], which ships the built-in `default` rule.

mod default_rule;

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("unknown command {command:?} bound to {key:?}")]
    UnknownCommand { key: String, command: String },
    #[error("empty rom-kana output for key: {0}")]
    EmptyOutput(String),
    #[error("rom-kana entry for {0} must be a string or a [output, carry] pair")]
    MalformedEntry(String),
    #[error("unknown rule: {0}")]
    UnknownRule(String),
    #[error("rule inheritance cycle through: {0}")]
    InheritCycle(String),
}

/// Named editing command a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Abort,
    AbortToLatin,
    Commit,
    HiraganaMode,
    Delete,
    Convert,
    Complete,
    PreviousCandidate,
    PurgeCandidate,
    ToggleKana,
    ToggleHankakuKana,
    LatinMode,
    WideLatinMode,
    AbbrevMode,
    CodePointMode,
    StartComposition,
    CandidateUp,
    CandidateDown,
    CandidatePageUp,
    CandidatePageDown,
    SurroundingRight,
}

impl Command {
    fn parse(name: &str) -> Option<Command> {
        Some(match name {
            "abort" => Command::Abort,
            "abort-to-latin" => Command::AbortToLatin,
            "commit" => Command::Commit,
            "hiragana-mode" => Command::HiraganaMode,
            "delete" => Command::Delete,
            "convert" => Command::Convert,
            "complete" => Command::Complete,
            "previous-candidate" => Command::PreviousCandidate,
            "purge-candidate" => Command::PurgeCandidate,
            "toggle-kana" => Command::ToggleKana,
            "toggle-hankaku-kana" => Command::ToggleHankakuKana,
            "latin-mode" => Command::LatinMode,
            "wide-latin-mode" => Command::WideLatinMode,
            "abbrev-mode" => Command::AbbrevMode,
            "codepoint-mode" => Command::CodePointMode,
            "start-composition" => Command::StartComposition,
            "candidate-up" => Command::CandidateUp,
            "candidate-down" => Command::CandidateDown,
            "candidate-page-up" => Command::CandidatePageUp,
            "candidate-page-down" => Command::CandidatePageDown,
            "surrounding-right" => Command::SurroundingRight,
            _ => return None,
        })
    }
}

/// Keymap kind selecting which table applies to the active editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapKind {
    Kana,
    Latin,
    WideLatin,
    Abbrev,
}

impl KeymapKind {
    fn section(&self) -> &'static str {
        match self {
            KeymapKind::Kana => "kana",
            KeymapKind::Latin => "latin",
            KeymapKind::WideLatin => "wide-latin",
            KeymapKind::Abbrev => "abbrev",
        }
    }
}

/// One rom-kana table entry: emitted kana plus the carry-over prefix left
/// pending (e.g. `tt` emits っ and carries `t`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomKanaEntry {
    pub output: String,
    pub carry: String,
}

/// Result of a rom-kana prefix lookup across the inheritance chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RomKanaMatch {
    pub exact: Option<RomKanaEntry>,
    /// Whether any table key strictly extends the queried prefix.
    pub has_longer: bool,
}

const DEFAULT_CHORD_WINDOW_USEC: u64 = 50_000;

pub struct Rule {
    description: Option<String>,
    keymaps: BTreeMap<String, BTreeMap<String, Command>>,
    romkana: BTreeMap<String, RomKanaEntry>,
    chords: BTreeMap<String, String>,
    chord_window_usec: Option<u64>,
    parent: Option<Arc<Rule>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRomKanaEntry {
    Plain(String),
    WithCarry(Vec<String>),
}

#[derive(Deserialize)]
struct RawRule {
    description: Option<String>,
    inherit: Option<String>,
    #[serde(default)]
    keymap: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(rename = "rom-kana", default)]
    rom_kana: BTreeMap<String, RawRomKanaEntry>,
    #[serde(default)]
    chords: BTreeMap<String, String>,
    #[serde(rename = "chord-window-usec")]
    chord_window_usec: Option<u64>,
}

impl Rule {
    fn from_raw(raw: RawRule, parent: Option<Arc<Rule>>) -> Result<Self, RuleError> {
        let mut keymaps = BTreeMap::new();
        for (kind, table) in raw.keymap {
            let mut keymap = BTreeMap::new();
            for (key, name) in table {
                let command =
                    Command::parse(&name).ok_or_else(|| RuleError::UnknownCommand {
                        key: key.clone(),
                        command: name.clone(),
                    })?;
                keymap.insert(key, command);
            }
            keymaps.insert(kind, keymap);
        }

        let mut romkana = BTreeMap::new();
        for (key, raw_entry) in raw.rom_kana {
            let entry = match raw_entry {
                RawRomKanaEntry::Plain(output) => RomKanaEntry {
                    output,
                    carry: String::new(),
                },
                RawRomKanaEntry::WithCarry(parts) => match <[String; 2]>::try_from(parts) {
                    Ok([output, carry]) => RomKanaEntry { output, carry },
                    Err(_) => return Err(RuleError::MalformedEntry(key)),
                },
            };
            if entry.output.is_empty() {
                return Err(RuleError::EmptyOutput(key));
            }
            romkana.insert(key, entry);
        }

        Ok(Rule {
            description: raw.description,
            keymaps,
            romkana,
            chords: raw.chords,
            chord_window_usec: raw.chord_window_usec,
            parent,
        })
    }

    /// Parse a standalone rule without a parent. `inherit` must be resolved
    /// through a [`RuleRegistry`]; here it is rejected.
    pub fn parse(toml_text: &str) -> Result<Rule, RuleError> {
        let raw: RawRule =
            toml::from_str(toml_text).map_err(|e| RuleError::Parse(e.to_string()))?;
        if let Some(name) = raw.inherit {
            return Err(RuleError::UnknownRule(name));
        }
        Rule::from_raw(raw, None)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Look up a key binding, falling back to the parent chain.
    pub fn command(&self, kind: KeymapKind, notation: &str) -> Option<Command> {
        if let Some(cmd) = self
            .keymaps
            .get(kind.section())
            .and_then(|m| m.get(notation))
        {
            return Some(*cmd);
        }
        self.parent.as_ref()?.command(kind, notation)
    }

    /// Longest-prefix support query for the rom-kana converter.
    pub fn romkana_lookup(&self, prefix: &str) -> RomKanaMatch {
        let mut m = self
            .parent
            .as_ref()
            .map(|p| p.romkana_lookup(prefix))
            .unwrap_or_default();
        if let Some(entry) = self.romkana.get(prefix) {
            m.exact = Some(entry.clone());
        }
        if !m.has_longer {
            let next = self
                .romkana
                .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
                .next();
            if let Some((key, _)) = next {
                m.has_longer = key.starts_with(prefix);
            }
        }
        m
    }

    /// Chord lookup, order-insensitive.
    pub fn chord(&self, a: &str, b: &str) -> Option<String> {
        let forward = format!("{a}+{b}");
        let backward = format!("{b}+{a}");
        if let Some(token) = self.chords.get(&forward).or_else(|| self.chords.get(&backward)) {
            return Some(token.clone());
        }
        self.parent.as_ref()?.chord(a, b)
    }

    /// Whether this rule (or an ancestor) defines any chords at all.
    pub fn has_chords(&self) -> bool {
        !self.chords.is_empty() || self.parent.as_ref().is_some_and(|p| p.has_chords())
    }

    /// Whether `key` participates in any chord.
    pub fn is_chord_member(&self, key: &str) -> bool {
        let hit = self.chords.keys().any(|pair| {
            pair.split('+').any(|part| part == key)
        });
        hit || self.parent.as_ref().is_some_and(|p| p.is_chord_member(key))
    }

    pub fn chord_window_usec(&self) -> u64 {
        self.chord_window_usec
            .or_else(|| self.parent.as_ref().map(|p| p.chord_window_usec()))
            .unwrap_or(DEFAULT_CHORD_WINDOW_USEC)
    }
}

/// The built-in default rule.
pub fn default_rule() -> Arc<Rule> {
    static INSTANCE: OnceLock<Arc<Rule>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| {
            let rule = Rule::parse(default_rule::DEFAULT_TOML).expect("default rule must be valid");
            Arc::new(rule)
        })
        .clone()
}

/// Named rule store resolving `inherit` chains.
pub struct RuleRegistry {
    sources: BTreeMap<String, String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert("default".to_string(), default_rule::DEFAULT_TOML.to_string());
        Self { sources }
    }

    pub fn add(&mut self, name: impl Into<String>, toml_text: impl Into<String>) {
        self.sources.insert(name.into(), toml_text.into());
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|s| s.as_str())
    }

    /// Load a rule by name, resolving its inheritance chain.
    pub fn load(&self, name: &str) -> Result<Arc<Rule>, RuleError> {
        let mut visited = Vec::new();
        let rule = self.load_inner(name, &mut visited)?;
        debug!(rule = name, "typing rule loaded");
        Ok(rule)
    }

    fn load_inner(&self, name: &str, visited: &mut Vec<String>) -> Result<Arc<Rule>, RuleError> {
        if visited.iter().any(|n| n == name) {
            return Err(RuleError::InheritCycle(name.to_string()));
        }
        visited.push(name.to_string());
        let source = self
            .sources
            .get(name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;
        let raw: RawRule = toml::from_str(source).map_err(|e| RuleError::Parse(e.to_string()))?;
        let parent = match &raw.inherit {
            Some(parent_name) => Some(self.load_inner(parent_name, visited)?),
            None => None,
        };
        Ok(Arc::new(Rule::from_raw(raw, parent)?))
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_parses() {
        let rule = default_rule();
        assert_eq!(rule.command(KeymapKind::Kana, "C-g"), Some(Command::Abort));
        assert_eq!(
            rule.command(KeymapKind::Kana, "SPC"),
            Some(Command::Convert)
        );
        assert_eq!(
            rule.command(KeymapKind::Latin, "C-j"),
            Some(Command::HiraganaMode)
        );
        // Abbrev mode must not inherit the kana mode-switch keys.
        assert_eq!(rule.command(KeymapKind::Abbrev, "q"), None);
        assert_eq!(rule.command(KeymapKind::Abbrev, "l"), None);
    }

    #[test]
    fn romkana_lookup_basics() {
        let rule = default_rule();
        let m = rule.romkana_lookup("ka");
        assert_eq!(m.exact.as_ref().map(|e| e.output.as_str()), Some("か"));
        let m = rule.romkana_lookup("k");
        assert!(m.exact.is_none());
        assert!(m.has_longer);
        // "n" is both an entry and a prefix of "na", "nya", ...
        let m = rule.romkana_lookup("n");
        assert_eq!(m.exact.as_ref().map(|e| e.output.as_str()), Some("ん"));
        assert!(m.has_longer);
    }

    #[test]
    fn romkana_geminate_carry() {
        let rule = default_rule();
        let m = rule.romkana_lookup("tt");
        let entry = m.exact.unwrap();
        assert_eq!(entry.output, "っ");
        assert_eq!(entry.carry, "t");
    }

    #[test]
    fn child_rule_overrides_and_falls_back() {
        let mut registry = RuleRegistry::new();
        registry.add(
            "custom",
            r#"
inherit = "default"

[rom-kana]
ka = "カスタム"
"#,
        );
        let rule = registry.load("custom").unwrap();
        let m = rule.romkana_lookup("ka");
        assert_eq!(m.exact.unwrap().output, "カスタム");
        // Fallback to the parent for everything else.
        let m = rule.romkana_lookup("sa");
        assert_eq!(m.exact.unwrap().output, "さ");
        assert_eq!(rule.command(KeymapKind::Kana, "C-g"), Some(Command::Abort));
    }

    #[test]
    fn transitive_fallback() {
        let mut registry = RuleRegistry::new();
        registry.add("mid", "inherit = \"default\"\n[rom-kana]\nka = \"中\"\n");
        registry.add("leaf", "inherit = \"mid\"\n[rom-kana]\nsa = \"葉\"\n");
        let rule = registry.load("leaf").unwrap();
        assert_eq!(rule.romkana_lookup("sa").exact.unwrap().output, "葉");
        assert_eq!(rule.romkana_lookup("ka").exact.unwrap().output, "中");
        assert_eq!(rule.romkana_lookup("ta").exact.unwrap().output, "た");
    }

    #[test]
    fn unknown_rule_and_cycle() {
        let mut registry = RuleRegistry::new();
        assert!(matches!(
            registry.load("nonexistent"),
            Err(RuleError::UnknownRule(_))
        ));
        registry.add("a", "inherit = \"b\"\n");
        registry.add("b", "inherit = \"a\"\n");
        assert!(matches!(registry.load("a"), Err(RuleError::InheritCycle(_))));
    }

    #[test]
    fn unknown_command_rejected() {
        assert!(matches!(
            Rule::parse("[keymap.kana]\n\"C-g\" = \"frobnicate\"\n"),
            Err(RuleError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn chord_lookup_is_order_insensitive() {
        let mut registry = RuleRegistry::new();
        registry.add(
            "chorded",
            r#"
inherit = "default"
chord-window-usec = 50000

[chords]
"f+j" = "f+j"
"#,
        );
        let rule = registry.load("chorded").unwrap();
        assert_eq!(rule.chord("f", "j").as_deref(), Some("f+j"));
        assert_eq!(rule.chord("j", "f").as_deref(), Some("f+j"));
        assert!(rule.chord("f", "k").is_none());
        assert!(rule.has_chords());
        assert!(rule.is_chord_member("j"));
        assert!(!rule.is_chord_member("k"));
        assert_eq!(rule.chord_window_usec(), 50000);
    }
}
