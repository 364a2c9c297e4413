//! Numeric conversion.
//!
//! Digit runs in a headword are replaced by `#` for the dictionary lookup;
//! `#N` markers in the matched candidate are expanded back from the captured
//! numbers. Expansion styles: `#0` as typed, `#1` full-width, `#2` kanji
//! digit by digit, `#3` positional kanji with 万-based grouping.

/// Replace digit runs with `#`, returning the template headword and the
/// captured runs. A headword without digits comes back unchanged.
pub fn extract_numerics(midasi: &str) -> (String, Vec<String>) {
    let mut template = String::with_capacity(midasi.len());
    let mut numbers = Vec::new();
    let mut current = String::new();
    for c in midasi.chars() {
        if c.is_ascii_digit() {
            current.push(c);
            continue;
        }
        if !current.is_empty() {
            numbers.push(std::mem::take(&mut current));
            template.push('#');
        }
        template.push(c);
    }
    if !current.is_empty() {
        numbers.push(current);
        template.push('#');
    }
    (template, numbers)
}

/// Expand `#N` markers in a candidate against the captured digit runs, in
/// order. Unknown styles and surplus markers are kept verbatim.
pub fn expand(text: &str, numbers: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut next_number = 0;
    while let Some(c) = chars.next() {
        if c != '#' {
            out.push(c);
            continue;
        }
        let style = chars.peek().copied();
        let expanded = match (style, numbers.get(next_number)) {
            (Some('0'), Some(n)) => Some(n.clone()),
            (Some('1'), Some(n)) => Some(to_fullwidth(n)),
            (Some('2'), Some(n)) => Some(to_kanji_digits(n)),
            (Some('3'), Some(n)) => Some(to_kanji_positional(n)),
            _ => None,
        };
        match expanded {
            Some(s) => {
                chars.next();
                next_number += 1;
                out.push_str(&s);
            }
            None => out.push('#'),
        }
    }
    out
}

fn to_fullwidth(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32(c as u32 - '0' as u32 + '０' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

const KANJI_DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

fn to_kanji_digits(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => KANJI_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// Positional kanji numeral with 万-based grouping. The 一 before 千, 百
/// and 十 is elided; the one before a group name (万, 億, ...) is kept.
fn to_kanji_positional(digits: &str) -> String {
    let value: u64 = match digits.parse() {
        Ok(v) => v,
        Err(_) => return to_kanji_digits(digits),
    };
    if value == 0 {
        return "〇".to_string();
    }
    const GROUPS: [&str; 5] = ["", "万", "億", "兆", "京"];
    let mut parts: Vec<String> = Vec::new();
    let mut rest = value;
    let mut group = 0;
    while rest > 0 && group < GROUPS.len() {
        let chunk = (rest % 10_000) as u32;
        rest /= 10_000;
        if chunk > 0 {
            let mut part = kanji_chunk(chunk);
            part.push_str(GROUPS[group]);
            parts.push(part);
        }
        group += 1;
    }
    parts.reverse();
    parts.concat()
}

fn kanji_chunk(chunk: u32) -> String {
    const PLACES: [(u32, &str); 3] = [(1000, "千"), (100, "百"), (10, "十")];
    let mut out = String::new();
    let mut rest = chunk;
    for (unit, name) in PLACES {
        let d = rest / unit;
        rest %= unit;
        if d == 0 {
            continue;
        }
        if d > 1 {
            out.push(KANJI_DIGITS[d as usize]);
        }
        out.push_str(name);
    }
    if rest > 0 || out.is_empty() {
        out.push(KANJI_DIGITS[rest as usize]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_replaces_digit_runs() {
        let (template, numbers) = extract_numerics("5かい");
        assert_eq!(template, "#かい");
        assert_eq!(numbers, ["5"]);

        let (template, numbers) = extract_numerics("5/1");
        assert_eq!(template, "#/#");
        assert_eq!(numbers, ["5", "1"]);

        let (template, numbers) = extract_numerics("かい");
        assert_eq!(template, "かい");
        assert!(numbers.is_empty());
    }

    #[test]
    fn expand_styles() {
        let numbers = vec!["25".to_string()];
        assert_eq!(expand("#0かい", &numbers), "25かい");
        assert_eq!(expand("#1かい", &numbers), "２５かい");
        assert_eq!(expand("#2かい", &numbers), "二五かい");
        assert_eq!(expand("#3かい", &numbers), "二十五かい");
    }

    #[test]
    fn expand_multiple_markers_in_order() {
        let numbers = vec!["5".to_string(), "1".to_string()];
        assert_eq!(expand("#0月#0日", &numbers), "5月1日");
    }

    #[test]
    fn expand_keeps_unknown_markers() {
        let numbers = vec!["5".to_string()];
        assert_eq!(expand("#9かい", &numbers), "#9かい");
        assert_eq!(expand("#0と#0", &numbers), "5と#0");
    }

    #[test]
    fn positional_kanji() {
        assert_eq!(to_kanji_positional("0"), "〇");
        assert_eq!(to_kanji_positional("7"), "七");
        assert_eq!(to_kanji_positional("10"), "十");
        assert_eq!(to_kanji_positional("14"), "十四");
        assert_eq!(to_kanji_positional("100"), "百");
        assert_eq!(to_kanji_positional("111"), "百十一");
        assert_eq!(to_kanji_positional("1000"), "千");
        assert_eq!(to_kanji_positional("10000"), "一万");
        assert_eq!(to_kanji_positional("11111"), "一万千百十一");
        assert_eq!(to_kanji_positional("20304"), "二万三百四");
        assert_eq!(to_kanji_positional("100000000"), "一億");
        assert_eq!(to_kanji_positional("123456789"), "一億二千三百四十五万六千七百八十九");
    }

    #[test]
    fn digitwise_kanji() {
        assert_eq!(to_kanji_digits("2024"), "二〇二四");
    }
}
