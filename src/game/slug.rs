//! slug 推导
//!
//! 与记录首次保存时使用的规则一致：先做 NFKD 分解并去掉无法表示为 ASCII 的部分
//! （`é` 变成 `e`，汉字等整体丢弃），再转小写，只保留 ASCII 字母数字、`_`、`-` 与空白，
//! 空白和连字符连续出现时折叠为单个 `-`，最后去掉首尾的 `-` 和 `_`。

use unicode_normalization::UnicodeNormalization;

/// 由显示名称推导 slug
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.nfkd().filter(char::is_ascii) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("The Beginning"), "the-beginning");
        assert_eq!(slugify("  Dark   Forest  "), "dark-forest");
        assert_eq!(slugify("a - b -- c"), "a-b-c");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("Amy's Store!"), "amys-store");
        assert_eq!(slugify("Billboard #3"), "billboard-3");
    }

    #[test]
    fn folds_accents_to_ascii() {
        assert_eq!(slugify("Café"), "cafe");
        assert_eq!(slugify("Naïve Zoë"), "naive-zoe");
        assert_eq!(slugify("Amy's Café!"), "amys-cafe");
        // 兼容分解：全角字符与连字
        assert_eq!(slugify("ＡＢＣ ﬁsh"), "abc-fish");
        // 没有 ASCII 分解的字符整体丢弃
        assert_eq!(slugify("广告"), "");
        assert_eq!(slugify("广告 Board"), "board");
    }

    #[test]
    fn strips_edge_underscores_and_dashes() {
        assert_eq!(slugify("_hidden_"), "hidden");
        assert_eq!(slugify("-- end --"), "end");
        assert_eq!(slugify("snake_case name"), "snake_case-name");
    }

    #[test]
    fn is_deterministic_and_idempotent() {
        let once = slugify("Corner Store Ad");
        assert_eq!(once, slugify("Corner Store Ad"));
        assert_eq!(slugify(&once), once);
    }
}
