//! Turkish collation for topic lists.
//!
//! Strings are compared level by level: base letters (case-insensitive, with
//! the Turkish dotted and dotless `i` kept apart), then accents, then case
//! (lowercase first). Strings equal on every level fall back to code-point
//! order, so distinct strings never compare equal.
//!
//! Symbols and whitespace sort before digits, digits before letters. Latin
//! letters with diacritics that are not Turkish letters sort with their base
//! letter. Letters of other scripts come last, in code-point order.

use std::cmp::Ordering;

/// Turkish alphabet order, extended with `q`, `w` and `x`.
const ALPHABET: [char; 32] = [
    'a', 'b', 'c', 'ç', 'd', 'e', 'f', 'g', 'ğ', 'h', 'ı', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'ö', 'p', 'q', 'r', 's', 'ş', 't', 'u', 'ü', 'v', 'w', 'x', 'y', 'z',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Symbol,
    Digit,
    Letter,
    OtherScript,
}

#[derive(Debug, Clone, Copy)]
struct CollationElement {
    primary: (Group, u32),
    /// 0 for a plain letter, 1 for a circumflex or other folded accent.
    secondary: u8,
    /// 0 for lowercase, 1 for uppercase.
    tertiary: u8,
}

fn turkish_lowercase(c: char) -> char {
    match c {
        'I' => 'ı',
        'İ' => 'i',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Lowercase Latin letters that sort as their base letter at the primary
/// level. Turkish letters (`ç ğ ı ö ş ü`) are not folded.
fn fold_accent(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'æ' => 'a',
        'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ō' | 'ŏ' | 'ő' | 'ø' | 'œ' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'š' | 'ș' | 'ß' => 's',
        'ţ' | 'ť' | 'ŧ' | 'ț' => 't',
        'ù' | 'ú' | 'û' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

fn element(c: char) -> CollationElement {
    let lower = turkish_lowercase(c);
    let tertiary = u8::from(lower != c);
    let (base, secondary) = match fold_accent(lower) {
        Some(base) => (base, 1),
        None => (lower, 0),
    };

    let primary = if let Some(index) = ALPHABET.iter().position(|&l| l == base) {
        (Group::Letter, index as u32)
    } else if let Some(digit) = base.to_digit(10) {
        (Group::Digit, digit)
    } else if !base.is_alphanumeric() {
        (Group::Symbol, base as u32)
    } else {
        (Group::OtherScript, base as u32)
    };

    CollationElement {
        primary,
        secondary,
        tertiary,
    }
}

fn elements(s: &str) -> Vec<CollationElement> {
    s.chars().map(element).collect()
}

/// Compares two strings under Turkish collation rules.
pub fn compare(a: &str, b: &str) -> Ordering {
    let left = elements(a);
    let right = elements(b);

    left.iter()
        .map(|e| e.primary)
        .cmp(right.iter().map(|e| e.primary))
        .then_with(|| {
            left.iter()
                .map(|e| e.secondary)
                .cmp(right.iter().map(|e| e.secondary))
        })
        .then_with(|| {
            left.iter()
                .map(|e| e.tertiary)
                .cmp(right.iter().map(|e| e.tertiary))
        })
        .then_with(|| a.cmp(b))
}

/// Sorts in place under Turkish collation. The sort is stable.
pub fn sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| compare(a.as_ref(), b.as_ref()));
}
