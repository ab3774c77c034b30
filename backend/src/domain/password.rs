//! Argon2id password hashes in PHC string form.
//!
//! Stored values look like `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`.
//! Verification reads the cost parameters back from the stored string, so
//! raising [`HashCost`] later does not invalidate existing accounts.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Failures while deriving or parsing a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("unsupported password hash format")]
    Malformed,
    #[error("invalid argon2 cost parameters: {message}")]
    InvalidCost { message: String },
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// Argon2id cost used when deriving new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl HashCost {
    /// Cheapest parameters argon2 accepts; for tests only.
    pub const MINIMAL: Self = Self {
        memory_kib: Params::MIN_M_COST,
        iterations: Params::MIN_T_COST,
        parallelism: Params::MIN_P_COST,
    };

    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    fn hasher(self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|err| PasswordHashError::InvalidCost {
                message: err.to_string(),
            })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::new(
            Params::DEFAULT_M_COST,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
        )
    }
}

/// Stored password hash.
///
/// Derivation and verification are CPU bound; async callers should run
/// them on a blocking thread.
///
/// # Examples
/// ```
/// use polls::domain::{HashCost, PasswordHash};
///
/// let hash = PasswordHash::derive("hunter22", HashCost::MINIMAL).unwrap();
/// assert!(hash.verify("hunter22"));
/// assert!(!hash.verify("hunter23"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    pub fn derive(password: &str, cost: HashCost) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = cost
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(phc.to_string()))
    }

    /// Parse the stored PHC string, accepting only argon2id.
    pub fn from_stored(stored: &str) -> Result<Self, PasswordHashError> {
        let phc = PhcHash::new(stored).map_err(|_| PasswordHashError::Malformed)?;
        if phc.algorithm != Algorithm::Argon2id.ident() || phc.hash.is_none() {
            return Err(PasswordHashError::Malformed);
        }
        Ok(Self(stored.to_owned()))
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(phc) = PhcHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &phc)
            .is_ok()
    }

    /// String form persisted by adapters.
    pub fn to_stored(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordHash").field(&"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn derive(password: &str) -> PasswordHash {
        PasswordHash::derive(password, HashCost::MINIMAL).expect("minimal cost is valid")
    }

    #[rstest]
    fn verifies_only_the_original_password() {
        let hash = derive("correct horse");
        assert!(hash.verify("correct horse"));
        assert!(!hash.verify("correct horsf"));
        assert!(!hash.verify(""));
    }

    #[rstest]
    fn equal_passwords_get_distinct_salts() {
        assert_ne!(derive("same").to_stored(), derive("same").to_stored());
    }

    #[rstest]
    fn stored_form_is_an_argon2id_phc_string() {
        let stored = derive("pa55word").to_stored();
        assert!(stored.starts_with("$argon2id$v=19$"));
        let parsed = PasswordHash::from_stored(&stored).expect("parses");
        assert!(parsed.verify("pa55word"));
    }

    #[rstest]
    fn verification_uses_the_stored_cost() {
        let cheap = derive("pa55word");
        let parsed = PasswordHash::from_stored(&cheap.to_stored()).expect("parses");
        assert!(parsed.verify("pa55word"));
        assert!(parsed.to_stored().contains("m=8,t=1,p=1"));
    }

    #[rstest]
    #[case("")]
    #[case("plain-text")]
    #[case("sha256$100000$00ff$abcd")]
    #[case("$argon2id$v=19$m=8,t=1,p=1")]
    #[case("$pbkdf2-sha256$i=1000$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA")]
    fn malformed_stored_values_are_rejected(#[case] stored: &str) {
        assert_eq!(
            PasswordHash::from_stored(stored),
            Err(PasswordHashError::Malformed)
        );
    }

    #[rstest]
    fn zero_memory_cost_is_rejected() {
        let err = PasswordHash::derive("pw", HashCost::new(0, 1, 1)).expect_err("invalid cost");
        assert!(matches!(err, PasswordHashError::InvalidCost { .. }));
    }

    #[rstest]
    fn debug_output_hides_the_hash() {
        let hash = derive("secret");
        let rendered = format!("{hash:?}");
        assert!(!rendered.contains("argon2id"));
    }
}
