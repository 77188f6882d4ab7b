mod config_cmd;
mod pages;
mod sync_cmd;

pub use config_cmd::{ConfigCommand, OutputFormat};
pub use pages::PagesCommand;
pub use sync_cmd::{pull, push};
