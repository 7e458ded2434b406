//! # Column Naming Service
//!
//! ヘッダー文字列をウェアハウスの列名に正規化する

use std::collections::HashMap;

/// 列名正規化サービス
pub struct ColumnNamingService;

impl ColumnNamingService {
    /// ヘッダーを1つ正規化する
    ///
    /// 前後の空白を除いて大文字化し、英数字・`_`・空白以外を削除して、
    /// 空白の連続を `_` 1つに置き換える。
    ///
    /// # Arguments
    ///
    /// * `raw` - 元のヘッダー文字列
    /// * `index` - 列番号（0始まり）。空になった場合の名前に使う
    pub fn normalize(raw: &str, index: usize) -> String {
        Self::identifier(raw).unwrap_or_else(|| format!("COLUMN_{}", index + 1))
    }

    /// 正規化した列名。使える文字が1つもなければ `None`
    pub fn identifier(raw: &str) -> Option<String> {
        let upper = raw.trim().to_uppercase();

        let mut name = String::with_capacity(upper.len());
        let mut pending_space = false;
        for ch in upper.chars() {
            if ch.is_whitespace() {
                pending_space = true;
            } else if ch.is_alphanumeric() || ch == '_' {
                if pending_space && !name.is_empty() {
                    name.push('_');
                }
                pending_space = false;
                name.push(ch);
            }
        }

        if name.is_empty() {
            return None;
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        Some(name)
    }

    /// ヘッダー行全体を正規化する
    ///
    /// 重複した名前には `_2`, `_3`, ... を付ける
    pub fn normalize_all(raw: &[String]) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut names = Vec::with_capacity(raw.len());

        for (i, header) in raw.iter().enumerate() {
            let base = Self::normalize(header, i);
            let mut candidate = base.clone();
            while seen.contains_key(&candidate) {
                let count = seen.entry(base.clone()).or_insert(1);
                *count += 1;
                candidate = format!("{}_{}", base, count);
            }
            seen.insert(candidate.clone(), 1);
            names.push(candidate);
        }

        names
    }
}
