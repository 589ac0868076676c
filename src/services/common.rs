//! 公共常量和辅助函数

/// 默认上游行情接口（雅虎财经 chart v8）
pub const YAHOO_CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
/// 默认 CORS 中转服务，目标地址以 `url` 参数传入
pub const ALLORIGINS_RAW_API: &str = "https://api.allorigins.win/raw";

/// 按千分位分组并保留两位小数，如 `2583.271` -> `2,583.27`
pub fn format_grouped(value: f64) -> String {
    format_grouped_with(value, 2)
}

/// 按千分位分组并保留指定位数小数；非有限值输出 `N/A`
pub fn format_grouped_with(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// HTML 文本转义
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grouped() {
        let cases = vec![
            (102.0, "102.00"),
            (2583.271, "2,583.27"),
            (18_342.5, "18,342.50"),
            (1_234_567.891, "1,234,567.89"),
            (999.999, "1,000.00"),
            (0.0, "0.00"),
            (-1234.5, "-1,234.50"),
            (-0.001, "0.00"),
        ];
        for (input, expected) in cases {
            assert_eq!(format_grouped(input), expected, "输入 {}", input);
        }
        assert_eq!(format_grouped(f64::NAN), "N/A");
        assert_eq!(format_grouped_with(2550.0, 0), "2,550");
        assert_eq!(format_grouped_with(-12.345, 1), "-12.3");
        assert_eq!(format_grouped(f64::INFINITY), "N/A");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("S&P 500"), "S&amp;P 500");
        assert_eq!(escape_html("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        assert_eq!(escape_html("코스피"), "코스피");
    }
}
