use std::path::PathBuf;

use clap::Parser;

/// Default request body limit, 10 MiB.
pub const DEFAULT_PAYLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Command line and environment configuration for the server process.
#[derive(Debug, Clone, Parser)]
#[command(name = "tabular-serve", version, about = "Serve pre-trained tabular classifiers over HTTP")]
pub struct ServeConfig {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "MODEL_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP listener to.
    #[arg(long, env = "MODEL_SERVER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory holding the `{Name}_model.json` artifacts.
    #[arg(long, env = "MODEL_SERVER_MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,

    /// Number of HTTP workers. Defaults to the number of physical CPUs.
    #[arg(long, env = "MODEL_SERVER_WORKERS")]
    pub workers: Option<usize>,

    /// Maximum accepted request body size in bytes.
    #[arg(long, env = "MODEL_SERVER_PAYLOAD_LIMIT", default_value_t = DEFAULT_PAYLOAD_LIMIT)]
    pub payload_limit: usize,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "MODEL_SERVER_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServeConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
