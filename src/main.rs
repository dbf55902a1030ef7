use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use colored::*;
use tokio::sync::mpsc;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use fivestar_core::content::{PageDocument, URL_ELEMENT_ID};
use fivestar_core::relay::request_url;
use fivestar_core::{
    BackendClient, BackgroundRelay, Config, ContentScript, HttpServices, PopupController, PopupUpdate,
    ProductId, QuoteClient, Tab,
};

#[derive(Parser)]
#[command(name = "fivestar")]
#[command(about = "Product research companion: summaries, reviews and pros/cons for the page you are on")]
#[command(version)]
struct Cli {
    /// FiveStar backend base URL (overrides config and FIVESTAR_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,
    /// Random quote service URL
    #[arg(long, global = true)]
    quote_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the popup for a tab (interactive, default)
    Popup {
        /// Tab URL; falls back to the configured default
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Print every popup region for a tab without the TUI
    Info {
        #[arg(short, long)]
        url: String,
    },
    /// Run the content script against a page and print its url element
    Content {
        #[arg(short, long)]
        url: String,
    },
    /// Show the product id and canonical product URL for a URL
    ProductId {
        url: String,
    },
    /// Remember a tab URL to open when none is given
    SetDefaultUrl {
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()
        .unwrap_or_else(|e| {
            eprintln!("{}: {:#}", "Ignoring unreadable config".yellow(), e);
            Config::new()
        })
        .with_overrides(cli.backend_url, cli.quote_url);

    match cli.command.unwrap_or(Commands::Popup { url: None }) {
        Commands::Popup { url } => run_popup(&config, url).await?,
        Commands::Info { url } => {
            logging::init_stderr_logging()?;
            print_info(&config, &url).await?
        }
        Commands::Content { url } => {
            logging::init_stderr_logging()?;
            run_content_script(&url).await?
        }
        Commands::ProductId { url } => print_product_id(&url),
        Commands::SetDefaultUrl { url } => {
            Config::save_default_url(&url)?;
            println!("{} {}", "Default URL set to".green(), url.bold());
        }
    }

    Ok(())
}

fn services(config: &Config) -> HttpServices {
    HttpServices::new(
        BackendClient::new(config.backend_url()),
        QuoteClient::new(config.quote_url()),
    )
}

/// The browser stand-in: a single active tab served by the background relay
fn active_tab(url: &str) -> Tab {
    Tab {
        id: 1,
        url: url.to_string(),
    }
}

async fn run_popup(config: &Config, url: Option<String>) -> Result<()> {
    let url = url
        .or_else(|| config.default_url.clone())
        .ok_or_else(|| anyhow!("No tab URL given. Pass --url or run: fivestar set-default-url <URL>"))?;

    logging::init_file_logging()?;

    // The popup learns the tab URL from the background relay
    let relay = BackgroundRelay::new().spawn();
    let tab_url = request_url(&relay.port(Some(active_tab(&url))))
        .await?
        .ok_or_else(|| anyhow!("background relay did not answer getURL"))?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(&tab_url, config.backend_url());

    let controller = PopupController::new(services(config), events.popup_view());
    tokio::spawn(async move {
        controller.open(&tab_url).await;
        tracing::info!("all popup requests settled");
    });

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_app(terminal: &mut tui::Tui, app: &mut App, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

async fn print_info(config: &Config, url: &str) -> Result<()> {
    match ProductId::from_url(url) {
        Some(id) => println!("🛒 Product {} ({})", id.to_string().bold().yellow(), id.product_url().dimmed()),
        None => println!("{}", "⚠️  Not a product page, asking the backend anyway".yellow()),
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = PopupController::new(services(config), tx);
    let tab_url = url.to_string();
    let task = tokio::spawn(async move { controller.open(&tab_url).await });

    // The channel closes when the controller is dropped at the end of the task
    while let Some(update) = rx.recv().await {
        print_update(update);
    }
    task.await?;

    Ok(())
}

fn print_update(update: PopupUpdate) {
    match update {
        PopupUpdate::Url(url) => println!("\n{} {}", "URL:".bold().blue(), url),
        PopupUpdate::Quote(quote) => println!("\n{}\n{}", "Quote:".bold().blue(), quote.italic()),
        PopupUpdate::Title(title) => println!("\n{}\n{}", "Title:".bold().blue(), title.bold()),
        PopupUpdate::Summary(summary) => {
            println!("\n{}", "Summary:".bold().blue());
            println!("{}", summary.text());
        }
        PopupUpdate::Reviews(reviews) => println!("\n{}\n{}", "Reviews:".bold().blue(), reviews),
        // Already logged; the region stays blank
        PopupUpdate::ReviewsUnavailable => {}
        PopupUpdate::Pros(pros) => println!("\n{}", pros.text().green()),
        PopupUpdate::Cons(cons) => println!("\n{}", cons.text().red()),
    }
}

async fn run_content_script(url: &str) -> Result<()> {
    let relay = BackgroundRelay::new().spawn();
    let script = ContentScript::new(relay.port(Some(active_tab(url))));
    let mut page = PageDocument::new().with_element(URL_ELEMENT_ID);

    script.on_load(&mut page).await?;

    match page.text(URL_ELEMENT_ID) {
        Some(text) if !text.is_empty() => println!("#{}: {}", URL_ELEMENT_ID, text.bold()),
        _ => println!("{}", "The relay did not provide a URL".red()),
    }
    Ok(())
}

fn print_product_id(url: &str) {
    match ProductId::from_url(url) {
        Some(id) => {
            println!("{}", id.to_string().bold().green());
            println!("{}", id.product_url().dimmed());
        }
        None => println!("{}", "No product id found. Product URLs contain /dp/<10 letters or digits>/".red()),
    }
}
