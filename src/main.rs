mod db;
mod error;
mod extract;
mod fetch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const DEFAULT_URL: &str = "https://csie.ncut.edu.tw/content.php?key=86OP82WJQO";

#[derive(Parser)]
#[command(name = "contact_scraper", about = "Faculty contact page scraper")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "contacts.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page, extract contacts, and store the new ones
    Fetch {
        /// Page to scrape
        #[arg(default_value = DEFAULT_URL)]
        url: String,
    },
    /// Show stored contacts
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { url } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;

            // Any fetch failure surfaces here, before the store is touched.
            let body = fetch::fetch_page(&url).await?;
            let contacts = extract::extract_contacts(&body);
            if contacts.is_empty() {
                println!("No contacts found on page.");
                return Ok(());
            }

            let inserted = db::insert_contacts(&conn, &contacts)?;
            for c in &contacts {
                println!("{} | {} | {}", c.name, c.title, c.email);
            }
            println!("\nFetched {} contacts ({} new).", contacts.len(), inserted);
            Ok(())
        }
        Commands::List { limit, json } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_contacts(&conn, Some(limit))?;
            if rows.is_empty() {
                println!("No contacts stored. Run 'fetch' first.");
                return Ok(());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!(
                "{:>4} | {:<24} | {:<24} | {:<32}",
                "#", "Name", "Title", "Email"
            );
            println!("{}", "-".repeat(92));
            for r in &rows {
                println!(
                    "{:>4} | {:<24} | {:<24} | {:<32}",
                    r.iid,
                    truncate(&r.name, 24),
                    truncate(&r.title, 24),
                    truncate(&r.email, 32)
                );
            }
            println!("\n{} contacts", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Contacts: {}", s.total);
            for (title, count) in &s.by_title {
                println!("  {:<24} {}", title, count);
            }
            Ok(())
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
