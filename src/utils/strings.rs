//! Random string helpers for generated credentials and restaurant codes.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Random alphanumeric string, used for the initial restaurant password.
pub fn generate_random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A code candidate: fixed prefix followed by `digits` random decimal
/// digits. Uniqueness is the caller's concern (checked against the store).
pub fn generate_code(prefix: &str, digits: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(prefix.len() + digits);
    code.push_str(prefix);
    for _ in 0..digits {
        code.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_length_and_charset() {
        let s = generate_random_string(8);
        assert_eq!(s.len(), 8);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_strings_differ() {
        // 62^16 candidates; a collision here means the generator is broken.
        assert_ne!(generate_random_string(16), generate_random_string(16));
    }

    #[test]
    fn test_code_prefix_and_length() {
        let code = generate_code("RES", 8);
        assert!(code.starts_with("RES"));
        assert_eq!(code.len(), "RES".len() + 8);
        assert!(code["RES".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_code_empty_digits() {
        assert_eq!(generate_code("RES", 0), "RES");
    }
}
