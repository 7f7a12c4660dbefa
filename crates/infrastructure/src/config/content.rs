//! Generated content storage configuration.

use serde::{Deserialize, Serialize};

/// Where generated documents are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding `<cache_key>.html` files
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_directory() -> String {
    "html_cache".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}
