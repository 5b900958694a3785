//! ローカル禁止語フィルタ
//!
//! 小文字化したテキストに対する単純な部分一致。単語境界は見ないため
//! "cul" は "calculer" にも一致する（既存挙動として維持）。

/// 禁止語リスト
pub const FORBIDDEN_WORDS: &[&str] = &[
    "merde", "putain", "salope", "connard", "enculé", "bite", "cul", "sexe",
    "nique", "baise", "chier", "foutre", "branler", "salaud", "enculer",
    "putes", "pd", "ntm", "bct", "tg",
];

/// 禁止語を含むか
pub fn contains_forbidden_words(text: &str) -> bool {
    let lower = text.to_lowercase();
    FORBIDDEN_WORDS.iter().any(|word| lower.contains(word))
}

/// 一致した禁止語をリスト順で返す
pub fn find_forbidden_words(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    FORBIDDEN_WORDS
        .iter()
        .copied()
        .filter(|word| lower.contains(word))
        .collect()
}
