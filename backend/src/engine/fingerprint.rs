use crate::engine::scanner::normalize_line_endings;
use md5::Context;

/// Hex MD5 of the normalized text; identifies a submission's content.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Context::new();
    hasher.consume(normalize_line_endings(text).as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_endings_do_not_change_the_fingerprint() {
        assert_eq!(fingerprint("a = 1\r\n# note\r\n"), fingerprint("a = 1\n# note\n"));
    }

    #[test]
    fn different_content_differs() {
        assert_ne!(fingerprint("a = 1"), fingerprint("a = 2"));
    }

    #[test]
    fn is_lowercase_hex_of_fixed_length() {
        let hash = fingerprint("print('hi')");
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
