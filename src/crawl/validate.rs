//! Candidate-name filtering.
//!
//! The extractor is unreliable and may return concepts, institutions or
//! malformed fragments. This is a cheap first-line filter, not a
//! guarantee; deeper cleanup belongs to post-processing tooling.

/// Whether an extracted string is a plausible person name: at least
/// 3 characters and containing whitespace (given name + family name).
pub fn is_valid_candidate(name: &str) -> bool {
    if name.chars().count() < 3 {
        return false;
    }
    name.contains(char::is_whitespace)
}
