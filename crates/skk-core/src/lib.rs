pub mod candidate;
pub mod dict;
pub mod kana;
pub mod key;
pub mod numeric;
pub mod romkana;
pub mod rule;

pub use candidate::{Candidate, CandidateList};
pub use dict::{CompositeDict, Dict, DictError, MemoryDict, UserDict};
pub use kana::{InputMode, KanaMode};
pub use key::{KeyEvent, KeyParseError, Keyval};
pub use romkana::RomKanaConverter;
pub use rule::{Rule, RuleError, RuleRegistry};
