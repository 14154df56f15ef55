//! Credential hashing and verification (Argon2id).
//!
//! [`CredentialVerifier::hash_for_storage`] salts every record with a fresh
//! random salt, so hashing the same password twice yields two different
//! records that both verify. Records are PHC strings and carry their own
//! parameters, so raising the configured cost never invalidates older
//! records.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::CredentialError;
use crate::types::{CanonicalPassword, CredentialRecord};

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hashes canonical passwords for storage and checks them at login
#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
    /// Record of a random secret, verified against when the user is unknown
    decoy: CredentialRecord,
}

impl CredentialVerifier {
    pub fn new(params: HashParams) -> Result<Self, CredentialError> {
        let argon_params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| CredentialError::Params(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);
        let decoy_secret = SaltString::generate(&mut OsRng);
        let decoy = hash_with(&argon2, decoy_secret.as_str())?;

        Ok(Self { argon2, decoy })
    }

    /// Produce a freshly salted record for `password`.
    pub fn hash_for_storage(
        &self,
        password: &CanonicalPassword,
    ) -> Result<CredentialRecord, CredentialError> {
        hash_with(&self.argon2, password.as_str())
    }

    /// Check `password` against `record`.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable record is an error.
    pub fn verify(
        &self,
        password: &CanonicalPassword,
        record: &CredentialRecord,
    ) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(record.as_str())
            .map_err(|e| CredentialError::MalformedRecord(e.to_string()))?;

        match self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::MalformedRecord(e.to_string())),
        }
    }

    /// Spend one verification's worth of work without a real record.
    /// Always returns false.
    pub fn verify_against_decoy(&self, password: &CanonicalPassword) -> bool {
        let _ = self.verify(password, &self.decoy);
        false
    }
}

fn hash_with(argon2: &Argon2<'_>, secret: &str) -> Result<CredentialRecord, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hash(e.to_string()))?;
    Ok(CredentialRecord::from_phc(hash.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> CredentialVerifier {
        CredentialVerifier::new(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let verifier = verifier();
        let password = CanonicalPassword::new("abcd");
        let record = verifier.hash_for_storage(&password).unwrap();

        assert!(record.as_str().starts_with("$argon2id$"));
        assert!(verifier.verify(&password, &record).unwrap());
    }

    #[test]
    fn test_salts_are_unique() {
        let verifier = verifier();
        let password = CanonicalPassword::new("ab");
        let first = verifier.hash_for_storage(&password).unwrap();
        let second = verifier.hash_for_storage(&password).unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(verifier.verify(&password, &first).unwrap());
        assert!(verifier.verify(&password, &second).unwrap());
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let verifier = verifier();
        let record = verifier
            .hash_for_storage(&CanonicalPassword::new("ab"))
            .unwrap();

        assert!(!verifier.verify(&CanonicalPassword::new("ba"), &record).unwrap());
        assert!(!verifier.verify(&CanonicalPassword::new("abab"), &record).unwrap());
    }

    #[test]
    fn test_malformed_record() {
        let verifier = verifier();
        let result = verifier.verify(
            &CanonicalPassword::new("ab"),
            &CredentialRecord::from_phc("plaintext"),
        );
        assert!(matches!(result, Err(CredentialError::MalformedRecord(_))));
    }

    #[test]
    fn test_records_verify_across_cost_changes() {
        let cheap = verifier();
        let password = CanonicalPassword::new("Zz09");
        let record = cheap.hash_for_storage(&password).unwrap();

        let costlier = CredentialVerifier::new(HashParams {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(costlier.verify(&password, &record).unwrap());
    }

    #[test]
    fn test_decoy_never_matches() {
        let verifier = verifier();
        assert!(!verifier.verify_against_decoy(&CanonicalPassword::new("ab")));
    }

    #[test]
    fn test_invalid_params() {
        let result = CredentialVerifier::new(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(CredentialError::Params(_))));
    }
}
