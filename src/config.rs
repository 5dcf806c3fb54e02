use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};
use toml::Value;
use log::{debug, info};
use crate::display::{ColourConfig, ColourTheme};
use crate::notifications::{NotificationConfig, NotificationKind};

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Configuration manager
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
            selected_section: None,
        }
    }
    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");
        
        // Try discovery hierarchy
        let config_paths = discover_config_files()?;
        
        for path in config_paths {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            }
        }
        
        info!("No configuration file found, using empty configuration");
        Ok(Self {
            config: Configuration::new(),
            config_file_path: None,
            selected_section: None,
        })
    }
    
    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());
        
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        
        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        
        info!("Successfully loaded configuration from: {}", path.display());
        Ok(Self {
            config,
            config_file_path: Some(path),
            selected_section: None,
        })
    }
    
    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> base
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }
        
        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }
        
        self.config.get("base").and_then(|s| s.get(key))
    }
    
    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }
    
    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }
    
    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }
    
    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }
    
    /// Path of the file this configuration came from, if any
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Get a millisecond duration value with type conversion
    pub fn get_duration_ms(&self, section: &str, key: &str) -> Result<Option<Duration>> {
        match self.get_value(section, key) {
            Some(value) => {
                let millis = value.trim().parse::<u64>()
                    .with_context(|| format!("Invalid duration for {}.{}: {} (expected milliseconds)", section, key, value))?;
                Ok(Some(Duration::from_millis(millis)))
            }
            None => Ok(None),
        }
    }

    /// Get notification center configuration from config file
    pub fn get_notification_config(&self) -> Result<NotificationConfig> {
        let mut config = NotificationConfig::default();

        if let Some(duration) = self.get_duration_ms("notifications", "default-duration-ms")? {
            config.default_duration = duration;
        }

        for kind in NotificationKind::ALL {
            let key = format!("{}-duration-ms", kind);
            if let Some(duration) = self.get_duration_ms("notifications", &key)? {
                config.set_duration_for(kind, duration);
            }
        }

        if let Some(timeout) = self.get_duration_ms("notifications", "delivery-timeout-ms")? {
            config.delivery_timeout = timeout;
        }

        config.validate()
            .with_context(|| "Notification configuration validation failed")?;

        Ok(config)
    }

    /// Get colour configuration from config file
    pub fn get_colour_config(&self) -> Result<ColourConfig> {
        let mut config = ColourConfig::default();

        if let Some(enabled) = self.get_bool("display", "color")? {
            config.set_enabled(enabled);
        }

        if let Some(theme) = self.get_value("display", "theme") {
            let theme = theme.parse::<ColourTheme>()
                .map_err(|e| anyhow::anyhow!("Invalid display.theme: {}", e))?;
            config.set_theme(theme);
        }

        Ok(config)
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    
    // 1. Environment variable $DEVBIZOPS_CONFIG
    if let Ok(env_path) = env::var("DEVBIZOPS_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }
    
    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("devbizops").join("config.toml"));
    }
    
    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".devbizops.toml"));
    }
    
    // 4. Project local
    paths.push(PathBuf::from("./.devbizops.toml"));
    
    debug!("Config discovery paths: {:?}", paths);
    Ok(paths)
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse()
        .context("Failed to parse TOML content")?;
    
    let mut config = Configuration::new();
    
    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }
    
    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        
        match value {
            Value::Table(subtable) => {
                // This is a nested table - check if it contains only key-value pairs
                if subtable.values().all(|v| !matches!(v, Value::Table(_))) {
                    // This is a leaf table (configuration section)
                    let mut section_map = HashMap::new();
                    for (subkey, subvalue) in subtable {
                        section_map.insert(subkey.clone(), toml_value_to_string(subvalue));
                    }
                    config.insert(section_name, section_map);
                } else {
                    // This table contains other tables - continue flattening
                    flatten_toml_table(subtable, section_name, config);
                }
            }
            _ => {
                // This is a direct key-value pair (e.g., in [base] section)
                let mut section_map = HashMap::new();
                section_map.insert("value".to_string(), toml_value_to_string(value));
                config.insert(section_name, section_map);
            }
        }
    }
}

/// Convert TOML Value to string representation
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(_) | Value::Table(_) => {
            // For complex types, use TOML representation
            value.to_string()
        }
        _ => String::new(),
    }
}

impl ConfigManager {
    /// Render the effective configuration as a TOML document
    pub fn export_complete_config(&self) -> Result<String> {
        let notifications = self.get_notification_config()?;
        let colours = self.get_colour_config()?;

        let mut table = toml::Table::new();

        let mut base = toml::Table::new();
        for key in ["console-level", "file-log-level", "log-file", "log-format"] {
            if let Some(value) = self.get_value("base", key) {
                base.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        table.insert("base".to_string(), Value::Table(base));

        let mut section = toml::Table::new();
        section.insert(
            "default-duration-ms".to_string(),
            Value::Integer(notifications.default_duration.as_millis() as i64),
        );
        for kind in NotificationKind::ALL {
            section.insert(
                format!("{}-duration-ms", kind),
                Value::Integer(notifications.duration_for(kind).as_millis() as i64),
            );
        }
        section.insert(
            "delivery-timeout-ms".to_string(),
            Value::Integer(notifications.delivery_timeout.as_millis() as i64),
        );
        table.insert("notifications".to_string(), Value::Table(section));

        let mut display = toml::Table::new();
        display.insert("color".to_string(), Value::Boolean(colours.enabled));
        let theme = match colours.theme {
            ColourTheme::Light => "light",
            ColourTheme::Dark => "dark",
            ColourTheme::Auto | ColourTheme::Custom(_) => "auto",
        };
        display.insert("theme".to_string(), Value::String(theme.to_string()));
        table.insert("display".to_string(), Value::Table(display));

        toml::to_string_pretty(&table).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_toml_value_to_string_conversion() {
        assert_eq!(toml_value_to_string(&Value::String("test".to_string())), "test");
        assert_eq!(toml_value_to_string(&Value::Integer(42)), "42");
        assert_eq!(toml_value_to_string(&Value::Boolean(true)), "true");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
[base]
console-level = "warn"
log-format = "json"

[notifications]
error-duration-ms = 10000
warning-duration-ms = 9000
"#;

        let config = parse_toml_config(toml_content).unwrap();

        assert_eq!(config.get("base").unwrap().get("console-level").unwrap(), "warn");
        assert_eq!(config.get("base").unwrap().get("log-format").unwrap(), "json");
        assert_eq!(config.get("notifications").unwrap().get("error-duration-ms").unwrap(), "10000");
    }

    #[test]
    fn test_config_manager_section_selection() {
        let mut config = Configuration::new();

        let mut notifications = HashMap::new();
        notifications.insert("error-duration-ms".to_string(), "8000".to_string());
        config.insert("notifications".to_string(), notifications);

        let mut kiosk = HashMap::new();
        kiosk.insert("error-duration-ms".to_string(), "0".to_string());
        config.insert("kiosk".to_string(), kiosk);

        let mut manager = ConfigManager::from_config(config);
        assert_eq!(manager.get_value("notifications", "error-duration-ms").unwrap(), "8000");

        manager.select_section("kiosk".to_string());
        assert_eq!(manager.get_value("notifications", "error-duration-ms").unwrap(), "0");
        assert_eq!(
            manager.get_notification_config().unwrap().error_duration,
            Duration::ZERO
        );
    }

    #[test]
    fn test_config_manager_type_conversion() {
        let mut config = Configuration::new();

        let mut base_section = HashMap::new();
        base_section.insert("color".to_string(), "false".to_string());
        base_section.insert("invalid-bool".to_string(), "maybe".to_string());
        base_section.insert("console-level".to_string(), "debug".to_string());
        base_section.insert("log-file".to_string(), "/tmp/devbizops.log".to_string());
        config.insert("base".to_string(), base_section);

        let manager = ConfigManager::from_config(config);

        assert_eq!(manager.get_bool("base", "color").unwrap(), Some(false));
        assert!(manager.get_bool("base", "invalid-bool").is_err());
        assert!(manager.get_bool("base", "missing").unwrap().is_none());
        assert_eq!(manager.get_log_level("base", "console-level").unwrap(), Some(log::LevelFilter::Debug));
        assert_eq!(manager.get_path("base", "log-file").unwrap(), PathBuf::from("/tmp/devbizops.log"));
    }

    #[test]
    fn test_notification_config_default() {
        let manager = ConfigManager::from_config(Configuration::new());
        assert_eq!(manager.get_notification_config().unwrap(), NotificationConfig::default());
    }

    #[test]
    fn test_notification_config_from_toml() {
        let toml_content = r#"
[notifications]
default-duration-ms = 4000
success-duration-ms = 3000
error-duration-ms = 10000
delivery-timeout-ms = 250
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, toml_content).unwrap();

        let manager = ConfigManager::load_from_file(temp_file.path().to_path_buf()).unwrap();
        assert_eq!(manager.config_file_path(), Some(temp_file.path()));

        let config = manager.get_notification_config().unwrap();
        assert_eq!(config.default_duration, Duration::from_millis(4000));
        assert_eq!(config.success_duration, Duration::from_millis(3000));
        assert_eq!(config.error_duration, Duration::from_millis(10000));
        assert_eq!(config.warning_duration, Duration::from_millis(8000));
        assert_eq!(config.delivery_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_notification_config_invalid_values() {
        let toml_content = r#"
[notifications]
info-duration-ms = "-5"
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, toml_content).unwrap();

        let manager = ConfigManager::load_from_file(temp_file.path().to_path_buf()).unwrap();
        let error = manager.get_notification_config().unwrap_err();
        assert!(error.to_string().contains("notifications.info-duration-ms"));
    }

    #[test]
    fn test_zero_delivery_timeout_is_rejected() {
        let toml_content = r#"
[notifications]
delivery-timeout-ms = 0
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, toml_content).unwrap();

        let manager = ConfigManager::load_from_file(temp_file.path().to_path_buf()).unwrap();
        assert!(manager.get_notification_config().is_err());
    }

    #[test]
    fn test_colour_config_from_toml() {
        let mut config = Configuration::new();
        let mut display = HashMap::new();
        display.insert("color".to_string(), "false".to_string());
        display.insert("theme".to_string(), "light".to_string());
        config.insert("display".to_string(), display);

        let manager = ConfigManager::from_config(config);
        let colours = manager.get_colour_config().unwrap();
        assert!(!colours.enabled);
        assert_eq!(colours.theme, ColourTheme::Light);
    }

    #[test]
    fn test_export_complete_config_round_trips() {
        let manager = ConfigManager::from_config(Configuration::new());
        let exported = manager.export_complete_config().unwrap();
        assert!(exported.contains("[notifications]"));

        let reparsed = ConfigManager::from_config(parse_toml_config(&exported).unwrap());
        assert_eq!(reparsed.get_notification_config().unwrap(), NotificationConfig::default());
    }
}
