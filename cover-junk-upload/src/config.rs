use crate::error::UploadError;

pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const ENV_ACCESS_KEY: &str = "CLOUDFLARE_R2_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "CLOUDFLARE_R2_SECRET_KEY";
pub const ENV_BUCKET: &str = "CLOUDFLARE_R2_BUCKET_NAME";
pub const ENV_PREFIX: &str = "CLOUDFLARE_R2_PREFIX";

pub const DEFAULT_BUCKET: &str = "picocover";
pub const DEFAULT_PREFIX: &str = "gba";

/// Region name R2 expects in request signing.
pub const R2_REGION: &str = "auto";

/// Connection settings for the R2 bucket.
#[derive(Clone)]
pub struct UploadConfig {
    pub account_id: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Key prefix, acts as a virtual directory inside the bucket
    pub prefix: String,
}

impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("account_id", &self.account_id)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl UploadConfig {
    /// Load settings from the process environment, after merging a `.env`
    /// file from the working directory if there is one.
    ///
    /// Variables already set in the environment take precedence over `.env`.
    pub fn from_env() -> Result<Self, UploadError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Blank values count as unset. Every missing required variable is named
    /// in the returned error, not just the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UploadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let account_id = get(ENV_ACCOUNT_ID);
        let access_key = get(ENV_ACCESS_KEY);
        let secret_key = get(ENV_SECRET_KEY);

        match (account_id, access_key, secret_key) {
            (Some(account_id), Some(access_key), Some(secret_key)) => Ok(Self {
                account_id,
                access_key,
                secret_key,
                bucket: get(ENV_BUCKET).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                // An explicitly empty prefix is allowed and means the bucket root
                prefix: lookup(ENV_PREFIX)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            }),
            (account_id, access_key, secret_key) => {
                let missing: Vec<&str> = [
                    (ENV_ACCOUNT_ID, account_id.is_none()),
                    (ENV_ACCESS_KEY, access_key.is_none()),
                    (ENV_SECRET_KEY, secret_key.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                Err(UploadError::missing_vars(&missing))
            }
        }
    }

    /// Replace bucket and prefix with explicit values (e.g., from CLI args).
    pub fn with_overrides(mut self, bucket: Option<String>, prefix: Option<String>) -> Self {
        if let Some(bucket) = bucket {
            self.bucket = bucket;
        }
        if let Some(prefix) = prefix {
            self.prefix = prefix;
        }
        self
    }

    /// S3 API endpoint for the configured account.
    pub fn endpoint(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
