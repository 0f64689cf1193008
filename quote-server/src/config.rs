use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    /// Base URL of the remote document store. Unset means local-only.
    pub remote_url: Option<String>,
    pub remote_collection: String,
    pub remote_poll_seconds: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            remote_url: env::var("REMOTE_URL").ok().filter(|url| !url.is_empty()),
            remote_collection: env::var("REMOTE_COLLECTION").unwrap_or_else(|_| "quotes".to_string()),
            remote_poll_seconds: env::var("REMOTE_POLL_SECONDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("Invalid REMOTE_POLL_SECONDS"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
