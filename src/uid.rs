//! Human-readable entity identifiers of the form `PREFIX_XXXXXX`.
//!
//! Collisions are not checked against the store; the primary-key constraint
//! catches them at insert time and the store surfaces a conflict error.

use rand::Rng;

const UID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const UID_SUFFIX_LEN: usize = 6;

/// Generates an identifier like `TASK_7XK2QD` for the given prefix.
#[must_use]
pub fn generate_uid(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..UID_SUFFIX_LEN)
        .map(|_| UID_CHARSET[rng.gen_range(0..UID_CHARSET.len())] as char)
        .collect();
    format!("{prefix}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_format() {
        let uid = generate_uid("SHOT");
        assert!(uid.starts_with("SHOT_"));
        assert_eq!(uid.len(), "SHOT_".len() + 6);
    }

    #[test]
    fn test_uid_charset() {
        let uid = generate_uid("VER");
        let suffix = uid.strip_prefix("VER_").unwrap();
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_uid_varies() {
        let a = generate_uid("PROJ");
        let b = generate_uid("PROJ");
        // 36^6 values; two draws colliding would point at a broken RNG.
        assert_ne!(a, b);
    }
}
