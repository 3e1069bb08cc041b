use brigade_kernel::{SAFE_ALPHABET, safe_nanoid};

#[test]
fn default_length_is_twelve() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);
}

#[test]
fn custom_length() {
    let id = safe_nanoid!(21);
    assert_eq!(id.len(), 21);
}

#[test]
fn only_unambiguous_characters() {
    for _ in 0..32 {
        let id = safe_nanoid!();
        for c in id.chars() {
            assert!(SAFE_ALPHABET.contains(&c), "unexpected character '{c}' in id '{id}'");
        }
    }
}

#[test]
fn ids_are_unique() {
    let mut seen = std::collections::HashSet::new();
    for _ in 0..1000 {
        assert!(seen.insert(safe_nanoid!()));
    }
}
