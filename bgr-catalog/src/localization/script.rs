//! Script classification for names
//!
//! Kana covers Hiragana (U+3040–309F) and Katakana (U+30A0–30FF); kanji
//! covers CJK Unified Ideographs U+4E00–9FAF. The Chinese check is a glyph
//! heuristic kept as observed: it flags a few simplified/traditional forms
//! that Japanese rarely uses, and is only consulted for kana-free text.

/// Glyphs treated as Chinese-only (simplified 们个动, traditional 們個動)
const CHINESE_ONLY_GLYPHS: [char; 6] = ['们', '个', '动', '們', '個', '動'];

fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c) || ('\u{30A0}'..='\u{30FF}').contains(&c)
}

fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FAF}').contains(&c)
}

pub fn has_kana(text: &str) -> bool {
    text.chars().any(is_kana)
}

pub fn has_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Any kana or kanji code point
pub fn has_native_script(text: &str) -> bool {
    text.chars().any(|c| is_kana(c) || is_kanji(c))
}

/// Contains kanji and no kana
pub fn has_kanji_only(text: &str) -> bool {
    has_kanji(text) && !has_kana(text)
}

/// Kana-free text containing a Chinese-only glyph
pub fn has_chinese_only(text: &str) -> bool {
    !has_kana(text) && text.chars().any(|c| CHINESE_ONLY_GLYPHS.contains(&c))
}

/// Latin-only text that merely says "Japanese" / "Japan edition" / "Japan version"
pub fn is_romanized_japan_reference(text: &str) -> bool {
    if has_native_script(text) {
        return false;
    }
    let lower = text.to_lowercase();
    lower.contains("japanese") || lower.contains("japan edition") || lower.contains("japan version")
}

/// Edition names that announce a localized release
pub fn mentions_japan_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("japan") || text.contains("日本語")
}

/// Whether a name can be shown as the localized display name
pub fn is_valid_localized_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return false;
    }

    (has_kana(name) || has_kanji_only(name))
        && !has_chinese_only(name)
        && !is_romanized_japan_reference(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kana_detection() {
        assert!(has_kana("ラブレター"));
        assert!(has_kana("ことば"));
        assert!(has_kana("Love レター"));
        assert!(!has_kana("恋文"));
        assert!(!has_kana("Love Letter"));
    }

    #[test]
    fn test_kanji_only() {
        assert!(has_kanji_only("将棋"));
        assert!(!has_kanji_only("将棋ゲーム"));
        assert!(!has_kanji_only("Shogi"));
    }

    #[test]
    fn test_chinese_glyphs() {
        assert!(has_chinese_only("我们的游戏"));
        assert!(has_chinese_only("動物"));
        assert!(!has_chinese_only("将棋"));
        // Kana text is never treated as Chinese
        assert!(!has_chinese_only("動物たち"));
    }

    #[test]
    fn test_latin_names_are_never_valid() {
        for name in ["Love Letter", "Catan", "Japanese edition", "JAPAN VERSION", "Ticket to Ride"] {
            assert!(!is_valid_localized_name(name), "{} accepted", name);
        }
    }

    #[test]
    fn test_any_kana_is_valid() {
        for name in ["ラブレター", "カタン", "ドミニオン：陰謀", "個人戦カード", "動物しょうぎ", "我们のゲーム"] {
            assert!(is_valid_localized_name(name), "{} rejected", name);
        }
    }

    #[test]
    fn test_kanji_only_names() {
        assert!(is_valid_localized_name("将棋"));
        assert!(is_valid_localized_name("花札"));
        assert!(!is_valid_localized_name("我们"));
        assert!(!is_valid_localized_name("動物"));
    }

    #[test]
    fn test_blank_is_invalid() {
        assert!(!is_valid_localized_name(""));
        assert!(!is_valid_localized_name("   "));
    }

    #[test]
    fn test_romanized_reference() {
        assert!(is_romanized_japan_reference("Japanese edition"));
        assert!(is_romanized_japan_reference("Love Letter (Japan Version)"));
        assert!(!is_romanized_japan_reference("ラブレター Japanese edition"));
        assert!(!is_romanized_japan_reference("Asmodee Japan"));
    }

    #[test]
    fn test_japan_keyword() {
        assert!(mentions_japan_keyword("Japanese first edition"));
        assert!(mentions_japan_keyword("Japan edition"));
        assert!(mentions_japan_keyword("日本語版"));
        assert!(!mentions_japan_keyword("English edition"));
    }
}
