//! 证券名称归一化
//!
//! 交易所页面里的证券简称夹杂全角字母、空格和 `&nbsp;` 实体，
//! 入库前统一折叠成半角无空格形式。

/// 归一化证券简称
///
/// 按固定顺序依次做字符替换（不是一次性正则）：
/// 去空格（半角、全角）、全角 `Ａ`/`Ｂ` 折半角、去 `&nbsp;` 实体。
///
/// `"浦发银行Ｂ"` -> `"浦发银行B"`，`"Ａ Ｂ"` -> `"AB"`
pub fn normalize_security_name(name: &str) -> String {
    const CHAR_MAPPER_LIST: [(&str, &str); 5] = [
        // 去空格
        (" ", ""),
        ("\u{3000}", ""),
        // 全角转半角
        ("Ａ", "A"),
        ("Ｂ", "B"),
        // web 空格
        ("&nbsp;", ""),
    ];

    let mut result = name.to_string();
    for (from, to) in CHAR_MAPPER_LIST {
        result = result.replace(from, to);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 全角字母加空格
    #[test]
    fn test_fullwidth_letters_and_space() {
        assert_eq!(normalize_security_name("Ａ Ｂ"), "AB");
    }

    /// 全角空格和尾部空格
    #[test]
    fn test_ideographic_space() {
        assert_eq!(normalize_security_name("\u{3000}Ａ股  "), "A股");
    }

    /// web 页面里的 &nbsp; 实体
    #[test]
    fn test_nbsp_entity() {
        assert_eq!(normalize_security_name("万&nbsp;科Ａ"), "万科A");
    }

    /// 已经规整的名称原样返回
    #[test]
    fn test_clean_name_unchanged() {
        assert_eq!(normalize_security_name("浦发银行"), "浦发银行");
    }
}
