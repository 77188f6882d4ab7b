use clap::Args;

use super::OutputFormat;
use mdsync::config::Config;
use mdsync::remote::{list_pages, NotionTransport, PageSummary};
use mdsync::sync::SyncError;

#[derive(Args)]
pub struct PagesCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl PagesCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let token = config.remote.token.clone().ok_or(SyncError::NotConfigured)?;
        let transport = NotionTransport::new(token, config.remote.api_url())?;
        let pages = list_pages(&transport).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&pages)?),
            OutputFormat::Text => {
                if pages.is_empty() {
                    println!("No pages shared with the integration.");
                }
                for page in &pages {
                    println!("{}", format_page(page, config.remote.page_id.as_deref()));
                }
            }
        }
        Ok(())
    }
}

fn format_page(page: &PageSummary, selected: Option<&str>) -> String {
    let marker = if selected == Some(page.id.as_str()) {
        "*"
    } else {
        " "
    };
    format!(
        "{} {}{}  ({})",
        marker,
        "  ".repeat(page.depth),
        page.title,
        page.id
    )
}
