use skk_core::kana::InputMode;

use super::{check_transitions, context};

#[test]
fn direct_typing() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("k a", "", "か"),
            ("k", "k", ""),
            ("a i r", "r", "あい"),
            ("k a n j i", "", "かんじ"),
            ("t t a", "", "った"),
            ("n d a", "", "んだ"),
            // The l and / bindings yield to a pending z prefix.
            ("z l", "", "→"),
            ("z /", "", "・"),
            ("m y o u", "", "みょう"),
            ("-", "", "ー"),
            (".", "", "。"),
        ],
    );
}

#[test]
fn direct_typing_katakana() {
    check_transitions(
        InputMode::Katakana,
        &[("k a", "", "カ"), ("v u", "", "ヴ"), ("m y o", "", "ミョ")],
    );
}

#[test]
fn composition_preedit() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("K a", "▽か", ""),
            ("K a n j i", "▽かんじ", ""),
            ("K a n", "▽かn", ""),
            ("Q", "▽", ""),
            ("Q k a n j i", "▽かんじ", ""),
            ("K a z l", "▽か→", ""),
        ],
    );
}

#[test]
fn okuri_nasi_conversion() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("K a n j i SPC", "▼漢字", ""),
            ("K a n j i SPC SPC", "▼幹事", ""),
            ("K a n j i SPC RET", "", "漢字"),
            ("K a n j i SPC C-j", "", "漢字"),
            ("K a n j i RET", "", "かんじ"),
            ("A i SPC", "▼愛", ""),
            ("A i s a t s u SPC RET", "", "挨拶"),
        ],
    );
}

#[test]
fn okuri_ari_conversion() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("K a n J i", "▼感じ", ""),
            ("K a n J i RET", "", "感じ"),
            ("A U", "▼合う", ""),
            ("A U SPC", "▼会う", ""),
            ("H a Z u", "▼恥ず", ""),
            ("F u N d a", "▼踏んだ", ""),
            ("T u k a T t e", "▼使って", ""),
            ("S i r o K u", "▼白く", ""),
            ("T e t u d a I", "▼手伝い", ""),
        ],
    );
}

#[test]
fn okuri_boundary_placement() {
    check_transitions(
        InputMode::Hiragana,
        &[
            // A geminate forming at the boundary belongs to the headword.
            ("S a s S", "▽さっ*s", ""),
            ("S a S s", "▽さ*っs", ""),
            // A nasal resolving at the boundary belongs to the headword too.
            ("K a n J", "▽かん*j", ""),
        ],
    );
}

#[test]
fn boundary_from_direct() {
    check_transitions(
        InputMode::Hiragana,
        &[
            // Geminate spanning the direct/composing boundary.
            ("t a k K u n", "▽っくn", "た"),
            // A nasal resolving at the boundary stays in the direct output.
            ("q s a n S y a", "▽シャ", "サン"),
        ],
    );
}

#[test]
fn commit_shaping_keys() {
    check_transitions(
        InputMode::Hiragana,
        &[
            // q commits the headword in the opposite script.
            ("A i q", "", "アイ"),
            ("A i C-q", "", "ｱｲ"),
            ("Z e n k a k u C-q", "", "ｾﾞﾝｶｸ"),
            ("A i C-j", "", "あい"),
        ],
    );
}

#[test]
fn commit_shaping_from_katakana() {
    let mut ctx = context();
    ctx.set_input_mode(InputMode::Katakana);
    ctx.process_key_sequence("A i q").unwrap();
    assert_eq!(ctx.poll_output(), "あい");
    assert_eq!(ctx.input_mode(), InputMode::Katakana);
}

#[test]
fn selecting_toggle_commits_and_switches() {
    let mut ctx = context();
    ctx.process_key_sequence("K a n j i SPC q").unwrap();
    assert_eq!(ctx.poll_output(), "漢字");
    assert_eq!(ctx.input_mode(), InputMode::Katakana);
}

#[test]
fn delete_transitions() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("A DEL", "▽", ""),
            ("A DEL DEL", "", ""),
            ("K a n DEL", "▽か", ""),
            ("E B DEL", "▽え", ""),
            ("E B DEL DEL", "▽", ""),
            ("A i s a t s u SPC DEL", "", "挨"),
        ],
    );
}

#[test]
fn abort_transitions() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("m y C-g", "", ""),
            ("K a n j i C-g", "", ""),
            ("K a n j i SPC C-g", "▽かんじ", ""),
            ("A k a SPC SPC SPC C-g", "▼垢", ""),
            ("A o i O C-g", "▽あおいお", ""),
            ("A k a SPC SPC SPC C-g C-g", "▽あか", ""),
        ],
    );
}

#[test]
fn abort_to_latin() {
    let mut ctx = context();
    ctx.process_key_sequence("K a n j i ESC").unwrap();
    assert_eq!(ctx.preedit(), "");
    assert_eq!(ctx.poll_output(), "");
    assert_eq!(ctx.input_mode(), InputMode::Latin);

    // Nothing to discard: the key is not consumed and the mode stays.
    let mut ctx = context();
    assert!(!ctx.process_key_sequence("ESC").unwrap());
    assert_eq!(ctx.input_mode(), InputMode::Hiragana);
}

#[test]
fn previous_candidate_returns_to_composing() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("K a n j i SPC SPC x", "▼漢字", ""),
            ("K a n j i SPC x", "▽かんじ", ""),
        ],
    );
}

#[test]
fn auto_start_henkan() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("A i ,", "▼愛、", ""),
            ("A i w o", "▼愛を", ""),
            ("A i w o RET", "", "愛を"),
            // The trigger alone does not convert.
            ("W o", "▽を", ""),
        ],
    );
}

#[test]
fn completion() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("I TAB", "▽いぜん", ""),
            // Clamped at the last match.
            ("I TAB TAB", "▽いぜん", ""),
            ("A TAB", "▽あい", ""),
            ("A TAB TAB", "▽あいさつ", ""),
            ("A TAB TAB TAB", "▽あお", ""),
            // Further input continues from the completed headword.
            ("A TAB SPC", "▼愛", ""),
        ],
    );
}

#[test]
fn unhandled_keys_in_direct() {
    let mut ctx = context();
    assert!(!ctx.process_key_sequence("RET").unwrap());
    assert!(!ctx.process_key_sequence("Left").unwrap());
    // DEL with nothing pending belongs to the application.
    assert!(!ctx.process_key_sequence("DEL").unwrap());
}

#[test]
fn space_in_direct() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("SPC", "", " "),
            // A pending nasal resolves before the space.
            ("n SPC", "", "ん "),
        ],
    );
}

#[test]
fn selecting_passes_unbound_printables_through() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("A i SPC \\(", "", "愛("),
            ("A i SPC 1", "", "愛1"),
        ],
    );
}

#[test]
fn affix_markers() {
    check_transitions(
        InputMode::Hiragana,
        &[
            // A trailing > joins the headword and converts at once.
            ("T y o u >", "▼超", ""),
            ("T y o u > RET", "", "超"),
            // After a commit, > seeds a new headword for prefix entries.
            ("A z u m a SPC >", "▽>", "東"),
            ("A z u m a SPC > s i SPC", "▼氏", "東"),
            ("A z u m a SPC > s i SPC RET", "", "東氏"),
        ],
    );
}

#[test]
fn code_point_entry() {
    check_transitions(
        InputMode::Hiragana,
        &[
            ("\\", "U+", ""),
            ("\\ 3 0", "U+30", ""),
            ("\\ 3 0 0 1 RET", "", "、"),
            ("\\ 3 0 0 1 DEL DEL RET", "", "0"),
            // An unfinished two-digit group keeps the prompt open.
            ("\\ 3 RET", "U+3", ""),
            ("\\ RET", "", ""),
            ("\\ 3 0 C-g", "", ""),
        ],
    );
}

#[test]
fn reset_keeps_output_and_mode() {
    let mut ctx = context();
    ctx.process_key_sequence("q k a K a n j i SPC").unwrap();
    assert_eq!(ctx.preedit(), "▼漢字");
    ctx.reset();
    assert_eq!(ctx.preedit(), "");
    assert_eq!(ctx.poll_output(), "カ");
    assert_eq!(ctx.input_mode(), InputMode::Katakana);
}
