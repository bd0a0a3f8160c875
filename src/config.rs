use std::path::PathBuf;

pub const DEFAULT_COLLEGE: &str = "Aditya University";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub workspace: Option<PathBuf>,
    pub college: String,
    pub admin_username: Option<String>,
    /// Lowercase hex SHA-256 of the admin password.
    pub admin_password_sha256: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Config {
            workspace: non_empty("SABLD_WORKSPACE").map(PathBuf::from),
            college: non_empty("SABLD_COLLEGE").unwrap_or_else(|| DEFAULT_COLLEGE.to_string()),
            admin_username: non_empty("SABLD_ADMIN_USERNAME"),
            admin_password_sha256: non_empty("SABLD_ADMIN_PASSWORD_SHA256")
                .map(|v| v.to_ascii_lowercase()),
        }
    }

    pub fn admin_enabled(&self) -> bool {
        self.admin_username.is_some() && self.admin_password_sha256.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.workspace, None);
        assert_eq!(cfg.college, DEFAULT_COLLEGE);
        assert!(!cfg.admin_enabled());
    }

    #[test]
    fn admin_requires_both_username_and_digest() {
        let cfg = config_from(&[("SABLD_ADMIN_USERNAME", "admin")]);
        assert!(!cfg.admin_enabled());

        let cfg = config_from(&[
            ("SABLD_ADMIN_USERNAME", "admin"),
            ("SABLD_ADMIN_PASSWORD_SHA256", "ABCDEF"),
            ("SABLD_COLLEGE", "  "),
        ]);
        assert!(cfg.admin_enabled());
        assert_eq!(cfg.admin_password_sha256.as_deref(), Some("abcdef"));
        assert_eq!(cfg.college, DEFAULT_COLLEGE);
    }
}
