//! Deterministic identifiers for questions, answers, templates and ratings.
//!
//! Identifiers are URNs built from a readable slug of the source text plus
//! a short SHA-256 digest of the full text:
//!
//! ```text
//! urn:uuid:<namespace>-<slug>-<hex(SHA-256(text)[0:6])>
//! ```
//!
//! The slug is lowercase ASCII alphanumerics with whitespace runs collapsed
//! to `-`, truncated to [`SLUG_MAX_LEN`] bytes. Every character is safe in a
//! URI fragment.

use sha2::{Digest, Sha256};

use crate::vocab::ID_PREFIX;

/// Maximum slug length in bytes.
pub const SLUG_MAX_LEN: usize = 50;

/// Number of digest bytes rendered into an identifier.
const DIGEST_BYTES: usize = 6;

/// Builds the readable part of an identifier.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len().min(SLUG_MAX_LEN));
    let mut pending_separator = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                if slug.len() + 1 >= SLUG_MAX_LEN {
                    break;
                }
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
            if slug.len() >= SLUG_MAX_LEN {
                break;
            }
        } else if c.is_whitespace() {
            pending_separator = true;
        }
    }
    slug
}

/// Short hex digest of the full text.
pub fn text_digest(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    let mut s = String::with_capacity(DIGEST_BYTES * 2);
    for byte in &hash[..DIGEST_BYTES] {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}

/// Derives a stable identifier for `text` within `namespace`.
///
/// Same input always yields the same identifier; distinct texts differ in
/// the digest part even when their slugs collide.
pub fn derive_id(namespace: &str, text: &str) -> String {
    let slug = slugify(text);
    let digest = text_digest(text);
    if slug.is_empty() {
        format!("{ID_PREFIX}{namespace}-{digest}")
    } else {
        format!("{ID_PREFIX}{namespace}-{slug}-{digest}")
    }
}

/// Derives the identifier of the rating encoding the trait `name`.
///
/// ```text
/// urn:uuid:rating-<lowercase(name) with spaces replaced by '-'>
/// ```
pub fn rating_id(name: &str) -> String {
    format!("{ID_PREFIX}rating-{}", name.to_lowercase().replace(' ', "-"))
}

/// Wraps a question id as a feed item identifier.
pub fn feed_item_id(question_id: &str) -> String {
    format!("{ID_PREFIX}{question_id}")
}

/// Strips the namespace prefix from an identifier, if present.
pub fn strip_id_prefix(id: &str) -> &str {
    id.strip_prefix(ID_PREFIX).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_id_deterministic() {
        let id1 = derive_id("question", "What is the capital of France?");
        let id2 = derive_id("question", "What is the capital of France?");
        assert_eq!(id1, id2);
        assert!(id1.starts_with("urn:uuid:question-what-is-the-capital-of-france-"));

        let id3 = derive_id("question", "What is the capital of Spain?");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_colliding_slugs_differ_in_digest() {
        // Punctuation is stripped from the slug but still hashed.
        let a = derive_id("question", "Is it safe?");
        let b = derive_id("question", "Is it safe!");
        assert_eq!(slugify("Is it safe?"), slugify("Is it safe!"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_slug_is_bounded_and_uri_safe() {
        let long = "Explain   the role of BRCA1 in DNA-repair, with ÜNICODE and émojis 🚀 ".repeat(5);
        let slug = slugify(&long);
        assert!(slug.len() <= SLUG_MAX_LEN);
        assert!(!slug.ends_with('-'));
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));

        let id = derive_id("answer", &long);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':'));
    }

    #[test]
    fn test_empty_slug() {
        let id = derive_id("template", "???");
        assert_eq!(id, format!("urn:uuid:template-{}", text_digest("???")));
    }

    #[test]
    fn test_rating_id() {
        assert_eq!(rating_id("Factual Accuracy"), "urn:uuid:rating-factual-accuracy");
        assert_eq!(rating_id("Factual Accuracy"), rating_id("Factual Accuracy"));
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_id_prefix(&feed_item_id("abc123")), "abc123");
        assert_eq!(strip_id_prefix("plain"), "plain");
    }
}
