use std::sync::LazyLock;

use regex::Regex;

/// Wei per ether
pub const WEI_PER_ETHER: f64 = 1e18;

/// Token names longer than this are treated as spam
pub const MAX_TOKEN_NAME_LEN: usize = 50;

static SPAM_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhttps?://\S+|\bwww\.[\w-]+\.\w+\b|\b[\w-]+\.\w+\b|visit\b|claim\b|reward\b")
        .expect("valid spam regex")
});

/// Convert a wei amount to ether
pub fn wei_to_ether(wei: f64) -> f64 {
    wei / WEI_PER_ETHER
}

/// Scale a raw base-unit amount by `10^decimals`
pub fn scale_amount(raw: f64, decimals: u32) -> f64 {
    raw / 10f64.powi(decimals as i32)
}

/// Why a token name is rejected, if it is
pub fn spam_reason(token_name: &str) -> Option<&'static str> {
    if SPAM_NAME_RE.is_match(token_name) {
        Some("unwanted content")
    } else if token_name.chars().count() > MAX_TOKEN_NAME_LEN {
        Some("excessive length")
    } else {
        None
    }
}

/// Truncate a string to a maximum length
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wei_to_ether() {
        assert_eq!(wei_to_ether(1_500_000_000_000_000_000.0), 1.5);
        assert_eq!(wei_to_ether(0.0), 0.0);
    }

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount(100_000_000.0, 6), 100.0);
        assert_eq!(scale_amount(42.0, 0), 42.0);
    }

    #[test]
    fn test_spam_names() {
        assert_eq!(spam_reason("USD Coin"), None);
        assert_eq!(spam_reason("Wrapped Ether"), None);
        assert_eq!(spam_reason("Visit https://scam.io to claim"), Some("unwanted content"));
        assert_eq!(spam_reason("www.free-tokens.com"), Some("unwanted content"));
        assert_eq!(spam_reason("airdrop.gift"), Some("unwanted content"));
        assert_eq!(spam_reason("CLAIM your tokens"), Some("unwanted content"));
        assert_eq!(spam_reason(&"A".repeat(51)), Some("excessive length"));
        assert_eq!(spam_reason(&"A".repeat(50)), None);
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("abcdefghijkl", 8), "abcde...");
    }
}
