use rand::distributions::Alphanumeric;
use rand::Rng;

const ID_LEN: usize = 12;

/// Random lowercase alphanumeric id. Uniqueness is the caller's job.
pub(crate) fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Slugs, table ids and menu item ids end up in URLs, so only `[A-Za-z0-9_-]` is allowed.
pub(crate) fn is_url_safe(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_lowercase_alphanumeric() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn url_safety() {
        assert!(is_url_safe("demo"));
        assert!(is_url_safe("grand-hotel_2"));
        assert!(!is_url_safe(""));
        assert!(!is_url_safe("with space"));
        assert!(!is_url_safe("a/b"));
        assert!(!is_url_safe("café"));
    }
}
