use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default Keycloak base URL used when `KEYCLOAK_BASE` is not set.
pub const DEFAULT_KEYCLOAK_BASE: &str = "http://localhost:8080";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The base URL of the Keycloak server.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_KEYCLOAK_BASE)]
    keycloak_base: String,

    /// The Keycloak realm that issues tokens for this client.
    #[arg(long, env, default_value = "master")]
    keycloak_realm: String,

    /// The confidential client ID registered in the realm.
    #[arg(long, env)]
    keycloak_client_id: Option<String>,

    /// The client secret for the confidential client.
    #[arg(long, env, hide_env_values = true)]
    keycloak_client_secret: Option<String>,

    /// The realm's public signing key, as a PEM block or the bare base64 body
    /// shown in the Keycloak admin console.
    #[arg(long, env, hide_env_values = true, allow_hyphen_values = true)]
    keycloak_realm_public_key: Option<String>,

    /// The public base URL of this application (e.g. http://localhost:4000).
    /// Used to build the OAuth redirect URIs. Defaults to http://localhost:<port>.
    #[arg(long, env)]
    redirect_base: Option<String>,

    /// Timeout in seconds for every call to the identity provider
    #[arg(long, env, default_value_t = 10)]
    pub gateway_timeout_secs: u64,

    /// Seconds a login redirect may take before its state token expires
    #[arg(long, env, default_value_t = 600)]
    pub login_state_ttl_secs: u64,

    /// Clock skew tolerance in seconds when checking access token exp/nbf claims
    #[arg(long, env, default_value_t = 0)]
    pub token_leeway_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn keycloak_base(&self) -> &str {
        &self.keycloak_base
    }

    pub fn keycloak_realm(&self) -> &str {
        &self.keycloak_realm
    }

    pub fn keycloak_client_id(&self) -> Option<String> {
        self.keycloak_client_id.clone()
    }

    pub fn keycloak_client_secret(&self) -> Option<String> {
        self.keycloak_client_secret.clone()
    }

    pub fn keycloak_realm_public_key(&self) -> Option<String> {
        self.keycloak_realm_public_key.clone()
    }

    /// Returns the public base URL of this application.
    pub fn redirect_base(&self) -> String {
        self.redirect_base
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}
