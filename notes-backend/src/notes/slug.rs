//! Slug derivation and validation
//!
//! `slugify` turns an arbitrary title (including Cyrillic text) into a
//! lowercase, hyphen-joined ASCII token sequence. It is pure so that the
//! note store can swap it out and tests can exercise it without storage.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a stored slug
pub const SLUG_MAX_LENGTH: usize = 100;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug regex is valid"));

/// Latin spelling of a lowercase Cyrillic letter. `None` means the character is dropped.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "yi",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

/// Slugify a title (e.g. "Новый заголовок" -> "novyij-zagolovok")
pub fn slugify(title: &str) -> String {
    let lowered = title
        .to_lowercase()
        .replace("&amp;", " and ")
        .replace('&', " and ");

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    let mut buf = [0u8; 4];

    for c in lowered.chars() {
        if c == '-' || c.is_whitespace() {
            pending_hyphen = true;
            continue;
        }

        let piece: &str = if c.is_ascii_alphanumeric() || c == '_' {
            c.encode_utf8(&mut buf)
        } else {
            match transliterate(c) {
                Some(latin) => latin,
                None => continue,
            }
        };
        if piece.is_empty() {
            continue;
        }

        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        slug.push_str(piece);
    }

    // Output is pure ASCII here, so byte truncation is char-safe
    slug.truncate(SLUG_MAX_LENGTH);
    slug.trim_end_matches('-').to_string()
}

/// Letters, numbers, underscores and hyphens only
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}
