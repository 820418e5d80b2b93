//! Deterministic variant bucketing.
//!
//! The participant id is concatenated with the experiment name (no separator),
//! hashed with SHA-256, and the first eight digest bytes are folded big-endian
//! into a `u64` that is reduced modulo the variant count. Changing any of these
//! steps changes every assignment ever handed out, so they are fixed.
//!
//! Modulo reduction slightly favours lower buckets when the variant count does
//! not divide 2^64. The bias is negligible for realistic counts and is kept.

use crate::domain::model::Experiment;
use crate::utils::error::Result;
use sha2::{Digest, Sha256};

/// Number of digest bytes folded into the bucket value.
pub const PREFIX_LEN: usize = 8;

/// Assign a variant without constructing an [`Experiment`] first.
///
/// Fails with `InvalidVariantCount` when `variant_count` is zero.
pub fn variant(experiment_name: &str, variant_count: u64, participant_id: &str) -> Result<u64> {
    let experiment = Experiment::new(experiment_name, variant_count)?;
    Ok(experiment.variant(participant_id))
}

/// SHA-256 prefix of `participant_id ++ experiment_name`.
pub fn digest_prefix(participant_id: &[u8], experiment_name: &str) -> [u8; PREFIX_LEN] {
    let input = hash_input(participant_id, experiment_name);

    let mut hasher = Sha256::new();
    hasher.update(&input);
    let digest = hasher.finalize();

    let mut prefix = [0u8; PREFIX_LEN];
    prefix.copy_from_slice(&digest[..PREFIX_LEN]);
    prefix
}

/// Fold bytes most-significant first. Never reinterpret memory here: the
/// result has to match on little-endian hosts too.
pub fn fold_be(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

fn hash_input(participant_id: &[u8], experiment_name: &str) -> Vec<u8> {
    match std::str::from_utf8(participant_id) {
        Ok(participant) => {
            let mut input = Vec::with_capacity(participant.len() + experiment_name.len());
            input.extend_from_slice(participant.as_bytes());
            input.extend_from_slice(experiment_name.as_bytes());
            input
        }
        Err(e) => {
            // 非 UTF-8 輸入：以空位元組序列雜湊，不中斷分桶
            tracing::warn!(
                "Participant id is not valid UTF-8 ({}), hashing empty input for experiment '{}'",
                e,
                experiment_name
            );
            Vec::new()
        }
    }
}

impl Experiment {
    /// Deterministically and uniformly pick a variant for `participant_id`.
    pub fn variant(&self, participant_id: &str) -> u64 {
        self.variant_for_bytes(participant_id.as_bytes())
    }

    /// Same as [`Experiment::variant`] for identifiers of unknown encoding.
    ///
    /// Invalid UTF-8 falls back to hashing the empty byte sequence.
    pub fn variant_for_bytes(&self, participant_id: &[u8]) -> u64 {
        self.bucket(&digest_prefix(participant_id, self.name()))
    }

    pub(crate) fn bucket(&self, prefix: &[u8; PREFIX_LEN]) -> u64 {
        fold_be(prefix) % self.variants()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AssignerError;

    #[test]
    fn test_golden_vector() {
        let prefix = digest_prefix(b"user123", "exp-a");
        assert_eq!(hex::encode(prefix), "44df45bd75a16105");
        assert_eq!(fold_be(&prefix), 0x44df_45bd_75a1_6105);
        assert_eq!(variant("exp-a", 4, "user123").unwrap(), 1);
    }

    #[test]
    fn test_fold_is_big_endian() {
        assert_eq!(fold_be(&[0x01, 0x02]), 0x0102);
        assert_eq!(fold_be(&[0xff; 8]), u64::MAX);
        assert_eq!(fold_be(&[]), 0);
    }

    #[test]
    fn test_zero_variants_is_an_error() {
        let err = variant("exp-a", 0, "user123").unwrap_err();
        assert!(matches!(err, AssignerError::InvalidVariantCount { variants: 0, .. }));
    }

    #[test]
    fn test_single_variant_always_zero() {
        let experiment = Experiment::new("exp-a", 1).unwrap();
        for participant in ["", "user123", "@bob:example.org"] {
            assert_eq!(experiment.variant(participant), 0);
        }
    }

    #[test]
    fn test_invalid_utf8_hashes_empty_input() {
        let experiment = Experiment::new("exp-a", 4).unwrap();
        let prefix = digest_prefix(&[0xff, 0xfe, 0x00], "exp-a");

        // SHA-256("") starts with e3b0c442...
        assert_eq!(hex::encode(prefix), "e3b0c44298fc1c14");
        assert_eq!(experiment.variant_for_bytes(&[0xff, 0xfe, 0x00]), 0);
    }

    #[test]
    fn test_bytes_and_str_agree_for_utf8() {
        let experiment = Experiment::new("exp-a", 7).unwrap();
        let participant = "ünïcødé";
        assert_eq!(
            experiment.variant(participant),
            experiment.variant_for_bytes(participant.as_bytes())
        );
        assert_eq!(experiment.variant(participant), 5);
    }
}
