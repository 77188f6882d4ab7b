use clap::{Args, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::Path;

use mdsync::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# mdsync configuration

# Markdown file kept in sync (default: ~/.local/share/mdsync/note.md)
# markdown_file: note.md

# Server address
host: 127.0.0.1
port: 8000

# How often the markdown file is checked for outside edits
poll_interval_ms: 1000

# Remote page (or set MDSYNC_NOTION_TOKEN / MDSYNC_NOTION_PAGE_ID)
# remote:
#   token: "secret_..."
#   page_id: "..."
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        config_path: Option<&Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = config_path
                    .map(Path::to_path_buf)
                    .unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'mdsync config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("markdown_file: {}", config.markdown_file.value.display());
    println!("  source: {}", config.markdown_file.source);
    println!();

    println!("host: {}", config.host.value);
    println!("  source: {}", config.host.source);
    println!("port: {}", config.port.value);
    println!("  source: {}", config.port.source);
    println!();

    println!("poll_interval_ms: {}", config.poll_interval_ms.value);
    println!("  source: {}", config.poll_interval_ms.source);
    println!();

    let remote = &config.remote;
    println!(
        "remote: {}",
        if remote.is_configured() {
            "configured"
        } else {
            "not configured"
        }
    );
    println!(
        "  token: {}",
        if remote.token.is_some() { "set" } else { "not set" }
    );
    println!(
        "  page_id: {}",
        remote.page_id.as_deref().unwrap_or("not set")
    );
    println!("  api_url: {}", remote.api_url());
}
