use proptest::prelude::*;

use skk_core::key::KeyEvent;

use super::context;

const TOKENS: &[&str] = &[
    "a", "i", "u", "e", "o", "k", "s", "t", "n", "y", "z", "x", "g", "1", "5",
    "K", "A", "S", "X", "Q", "L", "q", "l", "/", ",", ".", "-",
    "SPC", "RET", "TAB", "DEL", "C-g", "C-j", "C-q", "ESC", "Up", "Down",
    "PageUp", "PageDown", "\\\\", "3",
];

fn sequences() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(TOKENS), 0..40)
        .prop_map(|tokens| tokens.join(" "))
}

proptest! {
    /// Arbitrary key sequences never panic and never leak preedit markers
    /// into committed output.
    #[test]
    fn no_panic_and_clean_output(seq in sequences()) {
        let mut ctx = context();
        ctx.process_key_sequence(&seq).unwrap();
        let output = ctx.poll_output();
        for marker in ['▽', '▼', '【', '】'] {
            prop_assert!(!output.contains(marker), "marker {marker} in {output:?}");
        }
    }

    /// Dict-edit brackets in the preedit are always balanced and properly
    /// nested.
    #[test]
    fn preedit_brackets_balanced(seq in sequences()) {
        let mut ctx = context();
        ctx.process_key_sequence(&seq).unwrap();
        let mut depth = 0i32;
        for c in ctx.preedit().chars() {
            match c {
                '【' => depth += 1,
                '】' => {
                    depth -= 1;
                    prop_assert!(depth >= 0);
                }
                _ => {}
            }
        }
        prop_assert_eq!(depth, 0);
    }

    /// The state machine is deterministic.
    #[test]
    fn deterministic(seq in sequences()) {
        let mut a = context();
        let mut b = context();
        a.process_key_sequence(&seq).unwrap();
        b.process_key_sequence(&seq).unwrap();
        prop_assert_eq!(a.preedit(), b.preedit());
        prop_assert_eq!(a.poll_output(), b.poll_output());
    }

    /// Enough aborts always get back to an empty preedit, whatever state
    /// the sequence left behind. The C-j restores kana mode first, since
    /// C-g is a plain unhandled key while in latin modes.
    #[test]
    fn abort_always_recovers(seq in sequences()) {
        let mut ctx = context();
        ctx.process_key_sequence(&seq).unwrap();
        for _ in 0..64 {
            ctx.process_key(KeyEvent::parse("C-j").unwrap());
            ctx.process_key(KeyEvent::parse("C-g").unwrap());
        }
        prop_assert_eq!(ctx.preedit(), "");
    }

    /// Reset drops composition state but never committed output.
    #[test]
    fn reset_clears_preedit(seq in sequences()) {
        let mut ctx = context();
        ctx.process_key_sequence(&seq).unwrap();
        let before = ctx.peek_output().to_string();
        ctx.reset();
        prop_assert_eq!(ctx.preedit(), "");
        prop_assert_eq!(ctx.peek_output(), before);
    }
}
