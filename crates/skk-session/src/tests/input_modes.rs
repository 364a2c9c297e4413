use skk_core::kana::InputMode;

use super::{check_transitions, context};

fn mode_after(keys: &str) -> InputMode {
    let mut ctx = context();
    ctx.process_key_sequence(keys).unwrap();
    ctx.input_mode()
}

#[test]
fn mode_switch_keys() {
    assert_eq!(mode_after("q"), InputMode::Katakana);
    assert_eq!(mode_after("q q"), InputMode::Hiragana);
    assert_eq!(mode_after("C-q"), InputMode::HankakuKatakana);
    assert_eq!(mode_after("C-q q"), InputMode::Hiragana);
    assert_eq!(mode_after("C-q C-q"), InputMode::Hiragana);
    assert_eq!(mode_after("l"), InputMode::Latin);
    assert_eq!(mode_after("L"), InputMode::WideLatin);
    assert_eq!(mode_after("l C-j"), InputMode::Hiragana);
    assert_eq!(mode_after("L C-j"), InputMode::Hiragana);
    assert_eq!(mode_after("q l"), InputMode::Latin);
}

#[test]
fn mode_switch_flushes_nasal() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("n q", "", "ん"),
            ("w w q", "", "っ"),
            ("n l a", "", "んa"),
        ],
    );
}

#[test]
fn typing_per_mode() {
    check_transitions(InputMode::Katakana, &[("k a t a k a n a", "", "カタカナ")]);
    check_transitions(InputMode::HankakuKatakana, &[("k a", "", "ｶ"), ("z e", "", "ｾﾞ")]);
    check_transitions(
        InputMode::Latin,
        &[("a b c", "", "abc"), ("A", "", "A"), ("1 \\", "", "1\\")],
    );
    check_transitions(
        InputMode::WideLatin,
        &[("a b c", "", "ａｂｃ"), ("SPC", "", "　"), ("1", "", "１")],
    );
}

#[test]
fn latin_modes_ignore_kana_bindings() {
    check_transitions(
        InputMode::Latin,
        &[("q", "", "q"), ("l", "", "l"), ("/", "", "/"), ("x", "", "x")],
    );
    check_transitions(InputMode::WideLatin, &[("q", "", "ｑ")]);
}

#[test]
fn composition_follows_mode_shaping() {
    let mut ctx = context();
    ctx.process_key_sequence("q K a n j i").unwrap();
    assert_eq!(ctx.preedit(), "▽カンジ");
    // The dictionary key stays hiragana.
    ctx.process_key_sequence("SPC").unwrap();
    assert_eq!(ctx.preedit(), "▼漢字");
}

#[test]
fn hiragana_mode_key_commits_composition() {
    let mut ctx = context();
    ctx.set_input_mode(InputMode::Katakana);
    ctx.process_key_sequence("K a C-j").unwrap();
    assert_eq!(ctx.poll_output(), "カ");
    assert_eq!(ctx.input_mode(), InputMode::Hiragana);
}
