//! Session lifetime policy.
//!
//! Lifetime grows cubically with the read count so that frequently revisited
//! sessions stick around while one-hit and crawler traffic expires quickly.
//! Pure and deterministic: no clock, no I/O.

/// Maximum session lifetime: 30 days in seconds.
pub const MAX_LIFETIME: i64 = 2_592_000;

/// Fixed lifetime for bot traffic, in seconds.
pub const BOT_LIFETIME: i64 = 30;

/// User-agent fragments identifying crawler traffic.
const BOT_SIGNATURES: [&str; 5] = ["bot", "crawl", "slurp", "spider", "mediapartners"];

/// Compute the TTL in seconds for a session.
///
/// Bots get [`BOT_LIFETIME`]; everyone else gets `reads^3 * 30` seconds
/// capped at [`MAX_LIFETIME`]. Read counts above 100 short-circuit straight
/// to the cap.
pub fn compute_lifetime(reads: u32, user_agent: &str) -> i64 {
    if is_bot(user_agent) {
        return BOT_LIFETIME;
    }

    if reads > 100 {
        return MAX_LIFETIME;
    }

    (i64::from(reads).pow(3) * 30).min(MAX_LIFETIME)
}

/// Case-insensitive check against the bot signature set.
pub fn is_bot(user_agent: &str) -> bool {
    let user_agent = user_agent.to_ascii_lowercase();
    BOT_SIGNATURES
        .iter()
        .any(|signature| user_agent.contains(signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_cubically_for_browsers() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0";
        assert_eq!(compute_lifetime(0, ua), 0);
        assert_eq!(compute_lifetime(1, ua), 30);
        assert_eq!(compute_lifetime(2, ua), 240);
        assert_eq!(compute_lifetime(10, ua), 30_000);
    }

    #[test]
    fn caps_at_max_lifetime() {
        let ua = "Mozilla/5.0";
        // 45^3 * 30 = 2_733_750, just over the cap.
        assert_eq!(compute_lifetime(45, ua), MAX_LIFETIME);
        assert_eq!(compute_lifetime(100, ua), MAX_LIFETIME);
    }

    #[test]
    fn short_circuits_above_hundred_reads() {
        assert_eq!(compute_lifetime(101, "Mozilla/5.0"), MAX_LIFETIME);
        assert_eq!(compute_lifetime(u32::MAX, "Mozilla/5.0"), MAX_LIFETIME);
    }

    #[test]
    fn bots_get_fixed_lifetime() {
        assert_eq!(compute_lifetime(50, "Googlebot/2.1"), BOT_LIFETIME);
        assert_eq!(compute_lifetime(1, "ExaBOT crawler"), BOT_LIFETIME);
        assert_eq!(
            compute_lifetime(200, "Mediapartners-Google"),
            BOT_LIFETIME
        );
    }

    #[test]
    fn bot_match_is_case_insensitive() {
        assert!(is_bot("SLURP agent"));
        assert!(is_bot("my-Spider/1.0"));
        assert!(is_bot("webcrawler"));
        assert!(!is_bot("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"));
        assert!(!is_bot(""));
    }
}
