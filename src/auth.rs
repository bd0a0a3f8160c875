use crate::config::Config;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Both comparisons always run so a wrong username costs the same as a wrong password.
pub fn verify_credentials(config: &Config, username: &str, password: &str) -> bool {
    let (Some(expected_user), Some(expected_digest)) = (
        config.admin_username.as_deref(),
        config.admin_password_sha256.as_deref(),
    ) else {
        return false;
    };
    let user_ok = constant_eq(username.trim().as_bytes(), expected_user.as_bytes());
    let pass_ok = constant_eq(
        sha256_hex(password.as_bytes()).as_bytes(),
        expected_digest.as_bytes(),
    );
    user_ok & pass_ok
}

fn constant_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Live admin tokens for this daemon process.
#[derive(Debug, Default)]
pub struct AdminSessions {
    tokens: HashSet<String>,
}

impl AdminSessions {
    pub fn issue(&mut self) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.tokens.insert(token.clone());
        token
    }

    pub fn check(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn revoke(&mut self, token: &str) -> bool {
        self.tokens.remove(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            workspace: None,
            college: "Aditya University".into(),
            admin_username: Some("admin".into()),
            admin_password_sha256: Some(sha256_hex(b"s3cret")),
        }
    }

    #[test]
    fn digest_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn credentials() {
        let cfg = config();
        assert!(verify_credentials(&cfg, "admin", "s3cret"));
        assert!(verify_credentials(&cfg, " admin ", "s3cret"));
        assert!(!verify_credentials(&cfg, "admin", "wrong"));
        assert!(!verify_credentials(&cfg, "root", "s3cret"));

        let open = Config {
            admin_username: None,
            ..config()
        };
        assert!(!verify_credentials(&open, "admin", "s3cret"));
    }

    #[test]
    fn sessions_issue_check_revoke() {
        let mut sessions = AdminSessions::default();
        let a = sessions.issue();
        let b = sessions.issue();
        assert_ne!(a, b);
        assert!(sessions.check(&a));
        assert!(sessions.revoke(&a));
        assert!(!sessions.check(&a));
        assert!(!sessions.revoke(&a));
        assert!(sessions.check(&b));
    }
}
