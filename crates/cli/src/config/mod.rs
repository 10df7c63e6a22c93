use clap::{Args as ClapArgs, Parser, Subcommand};
use feed::{FilterForm, LoaderConfig};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/ledgerline.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    /// Only ever read from the config file or `LEDGERLINE_PASSWORD`.
    pub password: String,
    pub level: String,
    pub timeout_secs: u64,
    pub loader: LoaderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
            password: String::new(),
            level: "info".to_string(),
            timeout_secs: 10,
            loader: LoaderConfig::default(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ledgerline", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load transactions and print them.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Further pages to pull after the first load, by scrolling to the end.
        #[arg(long, default_value_t = 0)]
        pages: u32,
    },
    /// Print search suggestions from the loaded transactions.
    Suggest {
        #[command(flatten)]
        filters: FilterArgs,
        /// Only suggestions starting with this prefix (case-insensitive).
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Delete a transaction and show the updated totals.
    Delete {
        id: Uuid,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Debug, Clone, Default, ClapArgs)]
pub struct FilterArgs {
    /// From date (YYYY-MM-DD or RFC3339).
    #[arg(long)]
    from: Option<String>,
    /// To date (YYYY-MM-DD or RFC3339).
    #[arg(long)]
    to: Option<String>,
    /// Comma-separated categories.
    #[arg(long)]
    category: Option<String>,
    /// Comma-separated types (income, expense).
    #[arg(long = "type")]
    kind: Option<String>,
    /// Comma-separated payment methods.
    #[arg(long)]
    payment_method: Option<String>,
    /// Comma-separated statuses.
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    min_amount: Option<String>,
    #[arg(long)]
    max_amount: Option<String>,
    /// Free-text search.
    #[arg(long)]
    search: Option<String>,
    /// Sort key (date, amount, description).
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort direction (asc, desc).
    #[arg(long)]
    sort_dir: Option<String>,
}

impl FilterArgs {
    pub fn to_form(&self) -> FilterForm {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        FilterForm {
            from: field(&self.from),
            to: field(&self.to),
            categories: field(&self.category),
            types: field(&self.kind),
            payment_methods: field(&self.payment_method),
            statuses: field(&self.status),
            min_amount: field(&self.min_amount),
            max_amount: field(&self.max_amount),
            search: field(&self.search),
            sort_by: field(&self.sort_by),
            sort_dir: field(&self.sort_dir),
        }
    }
}

pub fn load() -> Result<(AppConfig, Command)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("LEDGERLINE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok((settings, args.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_args_map_to_form() {
        let args = FilterArgs {
            kind: Some("expense".to_string()),
            min_amount: Some("10".to_string()),
            ..FilterArgs::default()
        };
        let form = args.to_form();
        assert_eq!(form.types, "expense");
        assert_eq!(form.min_amount, "10");
        assert!(form.search.is_empty());
    }

    #[test]
    fn cli_parses_list_with_filters() {
        let args = Args::parse_from([
            "ledgerline",
            "--base-url",
            "http://example.test",
            "list",
            "--type",
            "income",
            "--pages",
            "3",
        ]);
        assert_eq!(args.base_url.as_deref(), Some("http://example.test"));
        match args.command {
            Command::List { filters, pages } => {
                assert_eq!(pages, 3);
                assert_eq!(filters.kind.as_deref(), Some("income"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn loader_table_overrides_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "level = \"debug\"\n[loader]\nincremental_page_size = 50\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.loader.incremental_page_size, 50);
        assert_eq!(settings.loader.server_max_page_size, 500);
        assert_eq!(settings.base_url, "http://127.0.0.1:3000");
    }
}
