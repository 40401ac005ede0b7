//! 合约代码辅助函数

/// 取合约代码的字母前缀作为品种代码
///
/// `"cu2109"` -> `"cu"`，`"sc_tas"` 这类带下划线的特殊代码只取字母段
pub fn extract_product_code(instrument_id: &str) -> String {
    instrument_id
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect()
}

/// 取合约代码末尾的交割月份数字
///
/// 合约代码以 4 位年月结尾，如 `"cu2109"` -> `"2109"`
pub fn extract_delivery_month(instrument_id: &str) -> String {
    let digits: String = instrument_id
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.len() >= 4 {
        digits[digits.len() - 4..].to_string()
    } else {
        digits
    }
}
