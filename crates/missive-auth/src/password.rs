use anyhow::{Result, anyhow};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
    Version, password_hash::SaltString,
};
use rand_core::OsRng;

/// Memory cost (KiB) for Argon2id, per the OWASP recommended configuration.
const M_COST_KIB: u32 = 19 * 1024;

/// One-way salted password hasher. The time cost is fixed at construction;
/// verification reads the parameters embedded in the stored PHC string, so
/// hashes created under an older cost keep verifying after a bump.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(work_factor: u32) -> Result<Self> {
        let params = Params::new(M_COST_KIB, work_factor.max(1), 1, None)
            .map_err(|e| anyhow!("invalid argon2 params: {e}"))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash with a fresh random salt. Two calls on the same input yield
    /// different strings, both of which verify.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {e}"))?;
        Ok(hash.to_string())
    }

    /// Constant-time verification of `plaintext` against a stored PHC
    /// string. A malformed stored hash is a plain `false`, never an error.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        // Minimum time cost keeps the test suite fast.
        PasswordHasher::new(1).unwrap()
    }

    #[test]
    fn hash_then_verify_roundtrip() {
        let h = hasher();
        let stored = h.hash("secret1").unwrap();
        assert!(h.verify("secret1", &stored));
        assert!(!h.verify("secret2", &stored));
    }

    #[test]
    fn salt_is_fresh_per_call() {
        let h = hasher();
        let a = h.hash("secret1").unwrap();
        let b = h.hash("secret1").unwrap();
        assert_ne!(a, b);
        assert!(h.verify("secret1", &a));
        assert!(h.verify("secret1", &b));
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let h = hasher();
        let stored = h.hash("hunter2pass").unwrap();
        assert!(!stored.contains("hunter2pass"));
    }

    #[test]
    fn malformed_stored_hash_is_false() {
        let h = hasher();
        assert!(!h.verify("secret1", "not-a-phc-string"));
        assert!(!h.verify("secret1", ""));
        assert!(!h.verify("secret1", "$argon2id$garbage"));
    }
}
