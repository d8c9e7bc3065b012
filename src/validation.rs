use anyhow::{anyhow, Result};
use std::path::Path;

/// Validation utilities for configuration and CLI input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the owner display name
    ///
    /// Direction is decided by exact match, so the name is not trimmed or
    /// otherwise altered here.
    pub fn validate_owner_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow!("Owner name cannot be empty"));
        }

        if name.len() > 200 {
            return Err(anyhow!("Owner name too long (max 200 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(anyhow!("Owner name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate an archive identifier, which becomes a single path segment
    pub fn validate_archive_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(anyhow!("Archive id cannot be empty"));
        }

        if id.len() > 100 {
            return Err(anyhow!("Archive id too long (max 100 characters)"));
        }

        if id == "." || id == ".." {
            return Err(anyhow!("Archive id cannot be a relative directory"));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(anyhow!("Archive id contains invalid characters: {id}"));
        }

        Ok(())
    }

    /// Validate the fragment file extension (without the dot)
    pub fn validate_fragment_extension(extension: &str) -> Result<()> {
        if extension.is_empty() {
            return Err(anyhow!("Fragment extension cannot be empty"));
        }

        if extension.starts_with('.') {
            return Err(anyhow!("Fragment extension must not start with a dot"));
        }

        if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("Fragment extension contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a file path
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(anyhow!("File path cannot be empty"));
        }

        // Check path length
        if path_str.len() > 4096 {
            return Err(anyhow!("File path too long (max 4096 characters)"));
        }

        if path_str.contains('\0') {
            return Err(anyhow!("File path contains a null byte"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_id() {
        assert!(InputValidator::validate_archive_id("facebook-example").is_ok());
        assert!(InputValidator::validate_archive_id("fb_2020.06").is_ok());
        assert!(InputValidator::validate_archive_id("../etc").is_err());
        assert!(InputValidator::validate_archive_id("a/b").is_err());
        assert!(InputValidator::validate_archive_id("..").is_err());
    }

    #[test]
    fn test_owner_name_unicode() {
        assert!(InputValidator::validate_owner_name("José García").is_ok());
        assert!(InputValidator::validate_owner_name("  ").is_err());
    }
}
