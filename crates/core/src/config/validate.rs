use super::{Config, ConfigError};

/// Validate semantic constraints that serde defaults cannot express.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.api_key must not be empty".to_string(),
        ));
    }

    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url must not be empty".to_string(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs must be greater than zero".to_string(),
        ));
    }

    if config.search.debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "search.debounce_ms must be greater than zero".to_string(),
        ));
    }

    if config.artwork.max_images == 0 {
        return Err(ConfigError::ValidationError(
            "artwork.max_images must be greater than zero".to_string(),
        ));
    }

    if config.artwork.max_image_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "artwork.max_image_bytes must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[api]
api_key = "k"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_api_key_fails() {
        let mut config = valid_config();
        config.api.api_key = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zero_debounce_fails() {
        let mut config = valid_config();
        config.search.debounce_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_artwork_limits_fail() {
        let mut config = valid_config();
        config.artwork.max_images = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.artwork.max_image_bytes = 0;
        assert!(validate_config(&config).is_err());
    }
}
