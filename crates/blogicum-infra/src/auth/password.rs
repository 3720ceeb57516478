//! Argon2id password hashes in PHC string format.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use blogicum_core::ports::{AuthError, PasswordService};

pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Argon2id with the crate's recommended cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

        // Stored hashes carry their own parameters, so verification works
        // across cost changes.
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordService {
        Argon2PasswordService::with_params(Params::new(1024, 1, 1, None).unwrap())
    }

    #[test]
    fn test_hash_and_verify() {
        let service = cheap();
        let hash = service.hash("war-and-peace-1869").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("war-and-peace-1869", &hash).unwrap());
        assert!(!service.verify("anna-karenina", &hash).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let service = cheap();
        let first = service.hash("borodino").unwrap();
        let second = service.hash("borodino").unwrap();

        assert_ne!(first, second);
        assert!(service.verify("borodino", &first).unwrap());
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let hash = cheap().hash("borodino").unwrap();
        assert!(Argon2PasswordService::new().verify("borodino", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            cheap().verify("borodino", "not-a-phc-string"),
            Err(AuthError::Hashing(_))
        ));
    }
}
