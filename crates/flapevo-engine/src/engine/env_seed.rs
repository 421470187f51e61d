use std::fmt::Write as _;

use rand::distr::{Distribution, StandardUniform};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic environment randomization.
///
/// A 64-bit seed used to initialize the environment's random number generator on every
/// reset. The same seed always yields the same start state, which enables:
///
/// - Reproducible fitness values for a fixed policy and scenario set
/// - Fair comparison between candidates evaluated in the same generation
/// - Deterministic testing
///
/// Serialized as a 16-character lowercase hex string.
///
/// # Example
///
/// ```
/// use flapevo_engine::{EnvSeed, FlappyEnv};
/// use rand::Rng as _;
///
/// let seed: EnvSeed = rand::rng().random();
///
/// // Both environments start every episode from the same state
/// let env1 = FlappyEnv::with_seed(seed);
/// let env2 = FlappyEnv::with_seed(seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::From)]
pub struct EnvSeed(u64);

impl EnvSeed {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Serialize for EnvSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(16);
        write!(&mut hex_str, "{:016x}", self.0).unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for EnvSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 16 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 16 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u64::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num))
    }
}

/// Allows generating random `EnvSeed` values with `rng.random()`.
impl Distribution<EnvSeed> for StandardUniform {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> EnvSeed {
        EnvSeed(rng.random())
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;

    use super::*;

    #[test]
    fn test_roundtrip_random_seed() {
        let seed: EnvSeed = rand::rng().random();
        let serialized = serde_json::to_string(&seed).unwrap();
        let deserialized: EnvSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(seed, deserialized);
    }

    #[test]
    fn test_known_value() {
        let seed = EnvSeed::from(0x0123_4567_89ab_cdef);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdef\"");
    }

    #[test]
    fn test_rejects_wrong_length() {
        let result = serde_json::from_str::<EnvSeed>("\"abc\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_hex() {
        let result = serde_json::from_str::<EnvSeed>("\"zzzzzzzzzzzzzzzz\"");
        assert!(result.is_err());
    }
}
