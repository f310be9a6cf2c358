//! # bb-auth-weak
//!
//! The deliberately weak `SecurityGate` implementation: an unsalted SHA-256
//! password digest, a nine-fragment SQL blocklist for the login form, and a
//! sanitizer that only strips the literal `<script` opener. Each piece is
//! meant to be bypassable; scanners are expected to walk around all three.

use bb_core::traits::SecurityGate;
use sha2::{Digest, Sha256};

/// The fixed blocklist checked against upper-cased login input. Any payload
/// avoiding these exact substrings (different whitespace, comment styles,
/// encodings) passes through to query construction.
const INJECTION_FRAGMENTS: [&str; 9] = [
    "' OR",
    "\" OR",
    " OR 1=1",
    "--",
    "/*",
    "*/",
    " UNION ",
    " SELECT ",
    " DROP ",
];

const SCRIPT_OPENER: &[u8] = b"<script";
const SCRIPT_PLACEHOLDER: &str = "[blocked-script]";

pub struct WeakSecurityGate;

impl WeakSecurityGate {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeakSecurityGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityGate for WeakSecurityGate {
    /// Hex SHA-256 of the plaintext. No salt, no per-user entropy; the same
    /// password always produces the same stored digest.
    fn hash_password(&self, plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn looks_like_injection(&self, input: &str) -> bool {
        let upper = input.to_uppercase();
        INJECTION_FRAGMENTS.iter().any(|p| upper.contains(p))
    }

    /// Replaces each case-insensitive occurrence of `<script` with a fixed
    /// placeholder. The closing tag, attributes, and event handlers are left
    /// alone. Matching is byte-wise: `<` is ASCII, so match offsets always
    /// fall on character boundaries.
    fn sanitize_comment(&self, content: &str) -> String {
        let bytes = content.as_bytes();
        let mut out = String::with_capacity(content.len());
        let mut run_start = 0;
        let mut i = 0;
        while i + SCRIPT_OPENER.len() <= bytes.len() {
            if bytes[i..i + SCRIPT_OPENER.len()].eq_ignore_ascii_case(SCRIPT_OPENER) {
                out.push_str(&content[run_start..i]);
                out.push_str(SCRIPT_PLACEHOLDER);
                i += SCRIPT_OPENER.len();
                run_start = i;
            } else {
                i += 1;
            }
        }
        out.push_str(&content[run_start..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> WeakSecurityGate {
        WeakSecurityGate::new()
    }

    #[test]
    fn test_hash_is_unsalted_sha256_hex() {
        // Digest of the seeded admin password; must match what seeding stores.
        assert_eq!(
            gate().hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
        // Deterministic: two users with the same password share a digest.
        assert_eq!(gate().hash_password("password"), gate().hash_password("password"));
    }

    #[test]
    fn test_filter_catches_the_listed_fragments() {
        let gate = gate();
        assert!(gate.looks_like_injection("admin' OR 1=1 --"));
        assert!(gate.looks_like_injection("x\" or \"1\"=\"1"));
        assert!(gate.looks_like_injection("a union SELECT * from users"));
        assert!(gate.looks_like_injection("1; drop table users"));
        assert!(gate.looks_like_injection("/* comment */"));
    }

    #[test]
    fn test_filter_misses_unlisted_spellings() {
        let gate = gate();
        assert!(!gate.looks_like_injection("alice"));
        // No space between the quote and OR, no listed fragment anywhere.
        assert!(!gate.looks_like_injection("x'or(1=1)or'"));
        // Parenthesized keywords dodge the space-delimited patterns.
        assert!(!gate.looks_like_injection("1 and(select(1))"));
    }

    #[test]
    fn test_sanitizer_only_blocks_the_opener() {
        let gate = gate();
        assert_eq!(
            gate.sanitize_comment("<script>alert(1)</script>"),
            "[blocked-script]>alert(1)</script>"
        );
        assert_eq!(
            gate.sanitize_comment("<SCRIPT>x</SCRIPT><ScRiPt>"),
            "[blocked-script]>x</SCRIPT>[blocked-script]>"
        );
        // Event-handler XSS passes completely untouched.
        let img = "<img src=x onerror=alert(1)>";
        assert_eq!(gate.sanitize_comment(img), img);
    }

    #[test]
    fn test_sanitizer_keeps_multibyte_text_intact() {
        let gate = gate();
        assert_eq!(
            gate.sanitize_comment("héllo <script> wörld"),
            "héllo [blocked-script]> wörld"
        );
    }
}
