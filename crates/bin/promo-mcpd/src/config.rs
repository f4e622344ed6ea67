use clap::{Parser, builder::BoolishValueParser};
use promo_api::ApiClientConfig;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4700";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_API_UPLOAD_TIMEOUT_SECS: u64 = 300;

#[derive(Parser, Debug)]
#[command(name = "promo-mcpd", version, about = "Promo Studio MCP daemon.")]
struct CliArgs {
    #[arg(
        long = "stdio",
        env = "PROMO_MCP_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    serve_stdio: bool,

    #[arg(
        long = "http",
        env = "PROMO_MCP_HTTP",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    serve_http: bool,

    #[arg(long, env = "PROMO_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    http_addr: SocketAddr,

    #[arg(long, env = "PROMO_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "PROMO_API_TOKEN")]
    api_token: Option<String>,

    #[arg(
        long,
        env = "PROMO_API_TIMEOUT_SECS",
        default_value_t = DEFAULT_API_TIMEOUT_SECS
    )]
    api_timeout_secs: u64,

    #[arg(
        long,
        env = "PROMO_API_UPLOAD_TIMEOUT_SECS",
        default_value_t = DEFAULT_API_UPLOAD_TIMEOUT_SECS
    )]
    api_upload_timeout_secs: u64,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone, Debug)]
pub struct PromoConfig {
    pub serve_stdio: bool,
    pub serve_http: bool,
    pub http_addr: SocketAddr,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub api_timeout: Duration,
    pub api_upload_timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl PromoConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        self.api_url
            .as_deref()
            .map_or_else(ApiClientConfig::default, ApiClientConfig::new)
            .with_token(self.api_token.clone())
            .with_timeout(self.api_timeout)
            .with_upload_timeout(self.api_upload_timeout)
    }
}

impl TryFrom<CliArgs> for PromoConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if !args.serve_stdio && !args.serve_http {
            return Err(ConfigError::MissingSetting(
                "PROMO_MCP_STDIO or PROMO_MCP_HTTP",
            ));
        }

        if args.api_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "PROMO_API_TIMEOUT_SECS",
                value: args.api_timeout_secs.to_string(),
            });
        }
        if args.api_upload_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "PROMO_API_UPLOAD_TIMEOUT_SECS",
                value: args.api_upload_timeout_secs.to_string(),
            });
        }

        let api_url = args.api_url.filter(|value| !value.trim().is_empty());
        let api_token = args.api_token.filter(|value| !value.trim().is_empty());

        Ok(Self {
            serve_stdio: args.serve_stdio,
            serve_http: args.serve_http,
            http_addr: args.http_addr,
            api_url,
            api_token,
            api_timeout: Duration::from_secs(args.api_timeout_secs),
            api_upload_timeout: Duration::from_secs(args.api_upload_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            serve_stdio: true,
            serve_http: false,
            http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            api_url: None,
            api_token: None,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            api_upload_timeout_secs: DEFAULT_API_UPLOAD_TIMEOUT_SECS,
        }
    }

    #[test]
    fn requires_at_least_one_transport() {
        let mut args = base_args();
        args.serve_stdio = false;
        args.serve_http = false;

        let err = PromoConfig::try_from(args).expect_err("transportless config should fail");

        assert!(matches!(err, ConfigError::MissingSetting(_)));
    }

    #[test]
    fn blank_api_settings_collapse_to_none() {
        let mut args = base_args();
        args.api_url = Some("   ".to_string());
        args.api_token = Some(String::new());

        let config = PromoConfig::try_from(args).expect("config should parse");

        assert!(config.api_url.is_none());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn rejects_a_zero_request_timeout() {
        let mut args = base_args();
        args.api_timeout_secs = 0;

        let err = PromoConfig::try_from(args).expect_err("zero timeout should fail");

        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                name: "PROMO_API_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn api_settings_flow_into_the_client_config() {
        let mut args = base_args();
        args.api_url = Some("https://staging.promo.studio/api".to_string());
        args.api_token = Some("promo-token".to_string());

        let config = PromoConfig::try_from(args).expect("config should parse");
        let client = config.api_client_config();

        assert_eq!(client.base_url, "https://staging.promo.studio/api");
        assert_eq!(client.token.as_deref(), Some("promo-token"));
        assert_eq!(
            client.timeout,
            Duration::from_secs(DEFAULT_API_TIMEOUT_SECS)
        );
        assert_eq!(
            client.upload_timeout,
            Duration::from_secs(DEFAULT_API_UPLOAD_TIMEOUT_SECS)
        );
    }
}
