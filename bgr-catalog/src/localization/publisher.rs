//! Localized publisher classification

use super::script::has_native_script;

/// Known local publishers, romanized and native forms
const KNOWN_LOCAL_PUBLISHERS: &[&str] = &[
    // Hobby publishers and doujin circles
    "Hobby Japan", "ホビージャパン",
    "Arclight", "アークライト",
    "Ten Days Games", "テンデイズゲームズ",
    "Japon Brand",
    "Grounding", "グラウンディング",
    "Oink Games", "オインクゲームズ",
    "Sugorokuya", "すごろくや",
    "COLON ARC", "コロンアーク",
    "Analog Lunchbox", "アナログランチボックス",
    "Domina Games", "ドミナゲームズ",
    "OKAZU Brand", "おかず",
    "Suki Games", "数寄ゲームズ",
    "Suki Games Mk2", "スキゲームズMk2",
    "Yanagisawa", "柳澤",
    "Ayatsurare Ningyoukan", "あやつられ人形館",
    "BakaFire", "バカファイア",
    "Manifest Destiny", "マニフェストデスティニー",
    "Saien", "彩園",
    "Team Saien", "チーム彩園",
    "Sato Familie", "佐藤ファミリー",
    "Shinojo", "紫猫",
    "Takoashi Games", "タコアシゲームズ",
    "Takuya Ono", "小野卓也",
    "Toshiki Sato", "佐藤敏樹",
    "Yocto Games", "ヨクト",
    "Yuhodo", "遊歩堂",
    "Itten", "いつつ",
    "Jelly Jelly Games", "ジェリージェリーゲームズ",
    "Kocchiya", "こっちや",
    "Kuuri", "くうり",
    "New Games Order", "ニューゲームズオーダー",
    "Qvinta", "クインタ",
    "Route11", "ルート11",
    "Taikikennai Games", "耐気圏内ゲームズ",
    "Tokyo Game Market", "東京ゲームマーケット",
    "Yuuai Kikaku", "遊愛企画",
    // Major manufacturers and publishing houses
    "Capcom", "カプコン",
    "Bandai", "バンダイ",
    "Konami", "コナミ",
    "Nintendo", "任天堂",
    "Sega", "セガ",
    "Square Enix", "スクウェア・エニックス",
    "Taito", "タイトー",
    "Takara Tomy", "タカラトミー",
    "Kadokawa", "角川",
    "Shogakukan", "小学館",
    "Shueisha", "集英社",
    "Kodansha", "講談社",
    "Gentosha", "幻冬舎",
    "Hayakawa", "早川",
    "Kawada", "カワダ",
    "Ensky", "エンスカイ",
    "Megahouse", "メガハウス",
    "Hanayama", "ハナヤマ",
    "Beverly", "ビバリー",
    "Tenyo", "テンヨー",
    "Epoch", "エポック",
    // Local branches of foreign publishers
    "Hasbro Japan", "ハズブロジャパン",
    "Asmodee Japan", "アズモデージャパン",
    // Others
    "G Games", "Gゲームズ",
    "Engames", "エンゲームズ",
    "Mobius Games", "メビウスゲームズ",
    "Moaideas", "モアイデアズ",
    "Analog Game", "アナログゲーム",
    "Kenbill",
    "Yellow Submarine",
    "Namco",
];

/// Whether `phrase` occurs in `text` with no letter or digit on either side
///
/// Keeps short names such as "Itten" or "G Games" from matching inside
/// "Written" or "Big Games". Both arguments are expected lowercased.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Whether a publisher name indicates a localized edition
///
/// True for a known local publisher (case-insensitive, whole words), any name
/// written in native script, or any name carrying a "Japan" qualifier.
pub fn is_localized_publisher(publisher: &str) -> bool {
    if has_native_script(publisher) {
        return true;
    }

    let lower = publisher.to_lowercase();
    if lower.contains("japan") {
        return true;
    }

    KNOWN_LOCAL_PUBLISHERS
        .iter()
        .any(|known| contains_phrase(&lower, &known.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_publishers_case_insensitive() {
        assert!(is_localized_publisher("Arclight"));
        assert!(is_localized_publisher("ARCLIGHT"));
        assert!(is_localized_publisher("Oink Games Inc."));
        assert!(is_localized_publisher("Japon Brand"));
    }

    #[test]
    fn test_native_script_publisher() {
        assert!(is_localized_publisher("株式会社ケンビル"));
        assert!(is_localized_publisher("ホビージャパン"));
    }

    #[test]
    fn test_japan_qualifier() {
        assert!(is_localized_publisher("Asmodee Japan"));
        assert!(is_localized_publisher("Board Game Japan"));
    }

    #[test]
    fn test_publishing_houses_and_circles() {
        for publisher in [
            "Kodansha",
            "Shogakukan",
            "Shueisha",
            "Gentosha",
            "Hayakawa Publishing",
            "Itten",
            "Kocchiya",
            "Qvinta",
            "Yuhodo",
            "Sato Familie",
            "Takuya Ono",
            "Toshiki Sato",
            "Yuuai Kikaku",
            "Yanagisawa",
            "Team Saien",
            "Shinojo",
            "Manifest Destiny",
            "Kuuri",
            "Taikikennai Games",
            "Ayatsurare Ningyoukan",
            "G Games",
            "Analog Game",
        ] {
            assert!(is_localized_publisher(publisher), "{} not recognized", publisher);
        }
    }

    #[test]
    fn test_known_names_match_whole_words_only() {
        assert!(!is_localized_publisher("Written Word Games"));
        assert!(!is_localized_publisher("Big Games"));
        assert!(!is_localized_publisher("Segal Editions"));
        assert!(is_localized_publisher("Itten (doujin circle)"));
        assert!(is_localized_publisher("Route11"));
    }

    #[test]
    fn test_foreign_publishers() {
        assert!(!is_localized_publisher("Alderac Entertainment Group"));
        assert!(!is_localized_publisher("Z-Man Games"));
        assert!(!is_localized_publisher(""));
    }
}
