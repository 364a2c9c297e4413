//! Script shaping between hiragana, katakana, half-width katakana and
//! wide latin.
//!
//! Composition buffers always hold hiragana; these conversions are applied
//! at display and commit time depending on the ambient input mode.

/// Ambient input mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Hiragana,
    Katakana,
    HankakuKatakana,
    Latin,
    WideLatin,
}

impl InputMode {
    /// The kana shaping this mode applies, if it is a kana mode.
    pub fn kana_mode(&self) -> Option<KanaMode> {
        match self {
            InputMode::Hiragana => Some(KanaMode::Hiragana),
            InputMode::Katakana => Some(KanaMode::Katakana),
            InputMode::HankakuKatakana => Some(KanaMode::HankakuKatakana),
            InputMode::Latin | InputMode::WideLatin => None,
        }
    }
}

/// Output shaping of the rom-kana converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KanaMode {
    Hiragana,
    Katakana,
    HankakuKatakana,
}

impl KanaMode {
    pub fn shape(&self, text: &str) -> String {
        match self {
            KanaMode::Hiragana => text.to_string(),
            KanaMode::Katakana => to_katakana(text),
            KanaMode::HankakuKatakana => to_hankaku(text),
        }
    }
}

/// Hiragana → katakana. The voiced u digraph collapses to ヴ.
pub fn to_katakana(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == 'う' && chars.peek() == Some(&'゛') {
            chars.next();
            out.push('ヴ');
            continue;
        }
        out.push(match c {
            'ぁ'..='ゖ' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        });
    }
    out
}

/// Katakana → hiragana. ヴ expands to う゛ (no precomposed hiragana form).
pub fn to_hiragana(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ヴ' => out.push_str("う゛"),
            'ァ'..='ヶ' => out.push(char::from_u32(c as u32 - 0x60).unwrap_or(c)),
            _ => out.push(c),
        }
    }
    out
}

/// Hiragana → half-width katakana, decomposing voiced kana into base + mark.
pub fn to_hankaku(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == 'う' && chars.peek() == Some(&'゛') {
            chars.next();
            out.push_str("ｳﾞ");
            continue;
        }
        match hankaku_char(c) {
            Some(h) => out.push_str(h),
            None => out.push(c),
        }
    }
    out
}

fn hankaku_char(c: char) -> Option<&'static str> {
    let h = match c {
        'あ' => "ｱ", 'い' => "ｲ", 'う' => "ｳ", 'え' => "ｴ", 'お' => "ｵ",
        'か' => "ｶ", 'き' => "ｷ", 'く' => "ｸ", 'け' => "ｹ", 'こ' => "ｺ",
        'さ' => "ｻ", 'し' => "ｼ", 'す' => "ｽ", 'せ' => "ｾ", 'そ' => "ｿ",
        'た' => "ﾀ", 'ち' => "ﾁ", 'つ' => "ﾂ", 'て' => "ﾃ", 'と' => "ﾄ",
        'な' => "ﾅ", 'に' => "ﾆ", 'ぬ' => "ﾇ", 'ね' => "ﾈ", 'の' => "ﾉ",
        'は' => "ﾊ", 'ひ' => "ﾋ", 'ふ' => "ﾌ", 'へ' => "ﾍ", 'ほ' => "ﾎ",
        'ま' => "ﾏ", 'み' => "ﾐ", 'む' => "ﾑ", 'め' => "ﾒ", 'も' => "ﾓ",
        'や' => "ﾔ", 'ゆ' => "ﾕ", 'よ' => "ﾖ",
        'ら' => "ﾗ", 'り' => "ﾘ", 'る' => "ﾙ", 'れ' => "ﾚ", 'ろ' => "ﾛ",
        'わ' => "ﾜ", 'を' => "ｦ", 'ん' => "ﾝ",
        'ぁ' => "ｧ", 'ぃ' => "ｨ", 'ぅ' => "ｩ", 'ぇ' => "ｪ", 'ぉ' => "ｫ",
        'ゃ' => "ｬ", 'ゅ' => "ｭ", 'ょ' => "ｮ", 'っ' => "ｯ",
        'が' => "ｶﾞ", 'ぎ' => "ｷﾞ", 'ぐ' => "ｸﾞ", 'げ' => "ｹﾞ", 'ご' => "ｺﾞ",
        'ざ' => "ｻﾞ", 'じ' => "ｼﾞ", 'ず' => "ｽﾞ", 'ぜ' => "ｾﾞ", 'ぞ' => "ｿﾞ",
        'だ' => "ﾀﾞ", 'ぢ' => "ﾁﾞ", 'づ' => "ﾂﾞ", 'で' => "ﾃﾞ", 'ど' => "ﾄﾞ",
        'ば' => "ﾊﾞ", 'び' => "ﾋﾞ", 'ぶ' => "ﾌﾞ", 'べ' => "ﾍﾞ", 'ぼ' => "ﾎﾞ",
        'ぱ' => "ﾊﾟ", 'ぴ' => "ﾋﾟ", 'ぷ' => "ﾌﾟ", 'ぺ' => "ﾍﾟ", 'ぽ' => "ﾎﾟ",
        'ー' => "ｰ", '。' => "｡", '、' => "､", '・' => "･",
        '「' => "｢", '」' => "｣", '゛' => "ﾞ", '゜' => "ﾟ",
        _ => return None,
    };
    Some(h)
}

/// ASCII → full-width forms; space maps to the ideographic space.
pub fn to_wide_latin(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' ' => '　',
            '!'..='~' => char::from_u32(c as u32 - 0x21 + 0xFF01).unwrap_or(c),
            _ => c,
        })
        .collect()
}
