use std::env;

use clap::Parser;
use letters_core::{ListOrder, StoreConfig, StoreType};
use serde::{Deserialize, Serialize};

/// Whether the page shows the message list before a search is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Only show results while a search is active
    SearchOnly,
    /// Always show the full or filtered list
    Always,
}

impl DisplayMode {
    pub fn shows_all(&self) -> bool {
        matches!(self, DisplayMode::Always)
    }
}

impl std::str::FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "search-only" | "search" => Ok(DisplayMode::SearchOnly),
            "always" | "all" => Ok(DisplayMode::Always),
            _ => Err(format!("Invalid display mode: {}", s)),
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[clap(name = "letters-server")]
#[clap(about = "Unsent Letters HTTP server")]
pub struct Args {
    /// Storage backend
    #[clap(long, help = "Store backend to use (memory or postgrest)")]
    pub backend: Option<StoreType>,

    #[clap(long, help = "Address to bind")]
    pub host: Option<String>,

    #[clap(long, help = "Port to listen on")]
    pub port: Option<u16>,

    /// Listing order override
    #[clap(long, help = "Message order (newest-first or insertion)")]
    pub order: Option<ListOrder>,

    #[clap(long, help = "Page display mode (search-only or always)")]
    pub display_mode: Option<DisplayMode>,
}

/// Application configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    pub store_backend: StoreType,

    /// PostgREST / Supabase project URL
    pub supabase_url: Option<String>,

    /// Supabase anon key
    pub supabase_anon_key: Option<String>,

    #[serde(default = "default_table")]
    pub messages_table: String,

    #[serde(default = "default_timeout")]
    pub store_timeout_seconds: u64,

    pub list_order: Option<ListOrder>,

    #[serde(default = "default_display_mode")]
    pub display_mode: DisplayMode,

    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_table() -> String {
    letters_core::store::config::DEFAULT_TABLE.to_string()
}

fn default_timeout() -> u64 {
    letters_core::store::config::DEFAULT_TIMEOUT_SECONDS
}

fn default_display_mode() -> DisplayMode {
    DisplayMode::SearchOnly
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

// The anon key stays out of logs
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("store_backend", &self.store_backend)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &self.supabase_anon_key.as_ref().map(|_| "<redacted>"))
            .field("messages_table", &self.messages_table)
            .field("store_timeout_seconds", &self.store_timeout_seconds)
            .field("list_order", &self.list_order)
            .field("display_mode", &self.display_mode)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.parse::<T>().map_err(|e| anyhow::anyhow!("{}: {}", key, e)))
        .transpose()
}

impl Settings {
    /// Load settings from environment variables, then apply CLI overrides
    pub fn load(args: &Args) -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let mut settings = Self::from_lookup(|key| env::var(key).ok())?;
        settings.apply_args(args);
        settings.validate()?;
        Ok(settings)
    }

    /// Build settings from a variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let settings = Settings {
            store_backend: parse_var(&lookup, "STORE_BACKEND")?.unwrap_or(StoreType::Memory),
            supabase_url: lookup("SUPABASE_URL"),
            supabase_anon_key: lookup("SUPABASE_ANON_KEY"),
            messages_table: lookup("MESSAGES_TABLE").unwrap_or_else(default_table),
            store_timeout_seconds: parse_var(&lookup, "STORE_TIMEOUT_SECONDS")?
                .unwrap_or_else(default_timeout),
            list_order: parse_var(&lookup, "LIST_ORDER")?,
            display_mode: parse_var(&lookup, "DISPLAY_MODE")?.unwrap_or_else(default_display_mode),
            host: lookup("HOST").unwrap_or_else(default_host),
            port: parse_var(&lookup, "PORT")?.unwrap_or_else(default_port),
        };

        if settings.store_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("STORE_TIMEOUT_SECONDS must be greater than zero"));
        }

        Ok(settings)
    }

    /// CLI overrides environment
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(backend) = args.backend {
            self.store_backend = backend;
        }
        if let Some(host) = &args.host {
            if !host.trim().is_empty() {
                self.host = host.clone();
            }
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(order) = args.order {
            self.list_order = Some(order);
        }
        if let Some(mode) = args.display_mode {
            self.display_mode = mode;
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_backend == StoreType::Postgrest {
            if self.supabase_url.as_deref().map_or(true, str::is_empty) {
                return Err(anyhow::anyhow!(
                    "SUPABASE_URL environment variable is required for the postgrest backend"
                ));
            }
            if self.supabase_anon_key.as_deref().map_or(true, str::is_empty) {
                return Err(anyhow::anyhow!(
                    "SUPABASE_ANON_KEY environment variable is required for the postgrest backend"
                ));
            }
        }
        Ok(())
    }

    /// Store configuration derived from these settings
    pub fn store_config(&self) -> StoreConfig {
        let config = match self.store_backend {
            StoreType::Memory => StoreConfig::memory(),
            StoreType::Postgrest => StoreConfig::postgrest(
                self.supabase_url.clone().unwrap_or_default(),
                self.supabase_anon_key.clone().unwrap_or_default(),
            ),
        }
        .with_table(self.messages_table.clone())
        .with_timeout(self.store_timeout_seconds);

        match self.list_order {
            Some(order) => config.with_order(order),
            None => config,
        }
    }

    /// Get the server address as a string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
