//! Session-level behavior tests, driven by textual key sequences.

mod basic;
mod input_modes;
mod proptest_fsm;

use std::sync::Arc;

use skk_core::dict::{MemoryDict, UserDict};
use skk_core::kana::InputMode;

use crate::Context;

pub(crate) const FIXTURE_JISYO: &str = "\
;; okuri-ari entries.
あu /合/会/
かんがe /考/
かんj /感/
しろk /白/
つかt /使/
てつだi /手伝/
はz /恥/
ふn /踏/
;; okuri-nasi entries.
あ /阿/
あい /愛;love/哀/相/
あいさつ /挨拶/
あお /青/
あか /垢/赤/
あずま /東/
い /以/
いぜん /以前/
かんじ /漢字/幹事/
し /氏/
しろ /城/
ちょう /超/町/
ちょう> /超/
>し /氏/
request /リクエスト/
#/# /#0月#0日/
#ひき /#1匹/#3匹/#0匹/
";

/// Context with the read-only fixture dictionary.
pub(crate) fn context() -> Context {
    let mut ctx = Context::new();
    ctx.add_dictionary(Arc::new(MemoryDict::from_jisyo(FIXTURE_JISYO)));
    ctx
}

/// Context with an in-memory user dictionary in front of the fixture, so
/// commits feed back into lookups.
pub(crate) fn context_with_user() -> (Context, Arc<UserDict>) {
    let user = Arc::new(UserDict::new());
    let mut ctx = Context::new();
    ctx.add_dictionary(user.clone());
    ctx.add_dictionary(Arc::new(MemoryDict::from_jisyo(FIXTURE_JISYO)));
    (ctx, user)
}

/// Run each sequence on a fresh context and check preedit and output.
pub(crate) fn check_transitions(mode: InputMode, cases: &[(&str, &str, &str)]) {
    for &(keys, preedit, output) in cases {
        let mut ctx = context();
        ctx.set_input_mode(mode);
        ctx.process_key_sequence(keys)
            .unwrap_or_else(|e| panic!("bad key sequence {keys:?}: {e}"));
        assert_eq!(ctx.preedit(), preedit, "preedit after {keys:?}");
        assert_eq!(ctx.poll_output(), output, "output after {keys:?}");
    }
}
