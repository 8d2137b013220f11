use clap::Parser;
use newsify::core::config;
use newsify::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "newsify", about = "Terminal client for the Newsify news assistant")]
struct Args {
    /// Backend base URL (overrides config file and NEWSIFY_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Session id to open on startup (overrides the cached one)
    #[arg(long)]
    session: Option<String>,

    /// Headline category shown first on the landing view
    #[arg(long)]
    category: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to newsify.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("newsify.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("newsify: {e}");
            std::process::exit(1);
        }
    };

    let resolved = config::resolve(
        &file_config,
        args.backend_url.as_deref(),
        args.session.as_deref(),
        args.category.as_deref(),
    );

    log::info!("Newsify starting up against {}", resolved.backend_url);

    tui::run(resolved)
}
