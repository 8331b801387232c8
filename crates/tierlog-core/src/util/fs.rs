//! Filesystem utilities.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/var/log/app.log"), PathBuf::from("/var/log/app.log"));
        assert_eq!(expand_path("logs/app.log"), PathBuf::from("logs/app.log"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/app.log"), home.join("app.log"));
        }
    }
}
