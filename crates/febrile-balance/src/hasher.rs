//! Deterministic hashing used wherever the pipeline needs "random" choices.

use febrile_model::Record;

/// Source of reproducible pseudo-random integers.
///
/// Implementations must be pure: the same `(record, seed)` always yields the
/// same value.
pub trait EntropySource {
    fn draw(&self, record: &Record, seed: i64) -> u32;

    /// Draw keyed on the record alone. Defaults to seed 0.
    fn draw_unseeded(&self, record: &Record) -> u32 {
        self.draw(record, 0)
    }
}

impl<S: EntropySource + ?Sized> EntropySource for &S {
    fn draw(&self, record: &Record, seed: i64) -> u32 {
        (**self).draw(record, seed)
    }

    fn draw_unseeded(&self, record: &Record) -> u32 {
        (**self).draw_unseeded(record)
    }
}

/// Hashes the record's canonical JSON followed by the decimal seed with
/// [`string_hash`]. The unseeded draw hashes the JSON alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringHash;

impl EntropySource for StringHash {
    fn draw(&self, record: &Record, seed: i64) -> u32 {
        // String keys and scalar values: serialization cannot fail.
        let mut text = record.canonical_json().unwrap_or_default();
        text.push_str(&seed.to_string());
        string_hash(&text)
    }

    fn draw_unseeded(&self, record: &Record) -> u32 {
        string_hash(&record.canonical_json().unwrap_or_default())
    }
}

/// Folds UTF-16 code units with `h = h * 31 + c` in wrapping 32-bit signed
/// arithmetic and returns the magnitude.
pub fn string_hash(text: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

/// First UTF-16 code unit of `text`, or 0 for an empty string.
pub fn char_seed(text: &str) -> i64 {
    text.encode_utf16().next().map(i64::from).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        // Java's String.hashCode uses the same fold.
        assert_eq!(string_hash("hello"), 99_162_322);
    }

    #[test]
    fn wraps_and_takes_magnitude() {
        // "polygenelubricants" hashes to i32::MIN under this fold.
        assert_eq!(string_hash("polygenelubricants"), 2_147_483_648);
    }

    #[test]
    fn char_seed_uses_first_code_unit() {
        assert_eq!(char_seed("Dengue"), 68);
        assert_eq!(char_seed("Malaria"), 77);
        assert_eq!(char_seed(""), 0);
    }

    #[test]
    fn unseeded_draw_hashes_json_only() {
        let record = Record::from_pairs([("Edad", "31")]);
        assert_eq!(StringHash.draw_unseeded(&record), 1_514_670_202);
        assert_eq!(StringHash.draw_unseeded(&record), string_hash(r#"{"Edad":"31"}"#));
        assert_eq!(StringHash.draw(&record, 0), string_hash(r#"{"Edad":"31"}0"#));
    }

    #[test]
    fn seed_changes_draw() {
        let record = Record::from_pairs([("Plaquetas", 80.0)]);
        let first = StringHash.draw(&record, 1);
        let second = StringHash.draw(&record, 2);
        assert_ne!(first, second);
        assert_eq!(first, string_hash(r#"{"Plaquetas":80}1"#));
    }

    proptest! {
        #[test]
        fn draw_is_pure(key in "[a-zA-Z_]{1,12}", value in "[ -~]{0,16}", seed in any::<i64>()) {
            let record = Record::from_pairs([(key.as_str(), value.as_str())]);
            prop_assert_eq!(StringHash.draw(&record, seed), StringHash.draw(&record.clone(), seed));
        }

        #[test]
        fn hash_fits_in_non_negative_i32_range(text in ".{0,64}") {
            prop_assert!(u64::from(string_hash(&text)) <= 1u64 << 31);
        }
    }
}
