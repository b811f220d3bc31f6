use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; MSIE 5.0; Windows NT 5.2; Trident/5.1)";

/// Tunables for the upstream service. Every key has a default, so an empty
/// file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
    pub filters: FilterConfig,
    pub paging: PagingConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub region_lookup: String,
    pub search: String,
    pub detail: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            region_lookup: "https://www.zillow.com/webservice/GetRegionChildren.htm".to_string(),
            search: "https://www.zillow.com/search/GetSearchPageState.htm".to_string(),
            detail: "https://www.zillow.com/graphql/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// API key for the region lookup endpoint.
    pub zws_id: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            zws_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub price_min: u64,
    pub price_max: u64,
    pub beds_min: u32,
    pub baths_min: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            price_min: 500_000,
            price_max: 2_000_000,
            beds_min: 2,
            baths_min: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self { page_size: 40 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Pause after every successful detail lookup.
    pub delay_ms: u64,
    pub query_id: String,
    pub operation_name: String,
    pub client_version: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            query_id: "4f7d72d05b119ce8d8cc87dc6f5c6cc2".to_string(),
            operation_name: "ForSaleDoubleScrollFullRenderQuery".to_string(),
            client_version: "home-details/5.49.24.2.master.ee287a1".to_string(),
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoints.region_lookup", &self.endpoints.region_lookup)?;
        validation::validate_url("endpoints.search", &self.endpoints.search)?;
        validation::validate_url("endpoints.detail", &self.endpoints.detail)?;
        validation::validate_non_empty_string("http.user_agent", &self.http.user_agent)?;
        validation::validate_range(
            "filters.price_min",
            self.filters.price_min,
            0,
            self.filters.price_max,
        )?;
        validation::validate_positive_number("paging.page_size", self.paging.page_size, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.filters.price_min, 500_000);
        assert_eq!(settings.filters.price_max, 2_000_000);
        assert_eq!(settings.paging.page_size, 40);
        assert_eq!(settings.enrichment.delay_ms, 1000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_config_overrides() {
        let toml_content = r#"
[filters]
price_min = 100000
beds_min = 3

[paging]
page_size = 25
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();

        assert_eq!(settings.filters.price_min, 100_000);
        assert_eq!(settings.filters.price_max, 2_000_000);
        assert_eq!(settings.filters.beds_min, 3);
        assert_eq!(settings.filters.baths_min, 2);
        assert_eq!(settings.paging.page_size, 25);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_ZILLOW_ZWS_ID", "X1-test-key");

        let toml_content = r#"
[http]
zws_id = "${TEST_ZILLOW_ZWS_ID}"
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.http.zws_id, "X1-test-key");

        std::env::remove_var("TEST_ZILLOW_ZWS_ID");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = r#"
[endpoints]
search = "invalid-url"
"#;
        let settings = Settings::from_toml_str(invalid_url).unwrap();
        assert!(settings.validate().is_err());

        let inverted_price = r#"
[filters]
price_min = 3000000
price_max = 1000000
"#;
        let settings = Settings::from_toml_str(inverted_price).unwrap();
        assert!(settings.validate().is_err());

        let zero_page = r#"
[paging]
page_size = 0
"#;
        let settings = Settings::from_toml_str(zero_page).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Settings::from_toml_str("[filters\nprice_min = ").unwrap_err();
        assert!(matches!(err, EtlError::ConfigError { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let err = Settings::from_file("/nonexistent/zillow-settings.toml").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[enrichment]
delay_ms = 250
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.enrichment.delay_ms, 250);
        assert_eq!(
            settings.enrichment.operation_name,
            "ForSaleDoubleScrollFullRenderQuery"
        );
    }
}
