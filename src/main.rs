use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use streamhub::cli::{CacheCommands, Cli, Commands, SubsCommands};
use streamhub::filter::{ContentFilter, FilterOptions};
use streamhub::model::{ContentItem, PlatformItem};
use streamhub::StreamHub;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = streamhub::config::AppConfig::load()?;
    let hub = StreamHub::connect(&config).await?;

    match cli.command {
        Commands::Browse {
            query,
            platform,
            genre,
            content_type,
            pages,
            refresh,
        } => {
            if refresh {
                hub.clear_cache_prefix(Some("content|")).await?;
            }

            let mut feed = hub.new_feed();
            for _ in 0..pages.max(1) {
                if !feed.has_more() {
                    break;
                }
                feed.load_more(&hub).await?;
            }

            let mut filter = ContentFilter::default();
            if let Some(q) = query {
                filter.query = q;
            }
            if let Some(p) = platform {
                filter.platform = p;
            }
            if let Some(g) = genre {
                filter.genre = g;
            }
            if let Some(t) = content_type {
                filter.content_type = t;
            }

            let matches = filter.apply(feed.items());
            print_filter_options(&FilterOptions::from_items(feed.items()));
            println!(
                "Showing {} of {} loaded results{}",
                matches.len(),
                feed.items().len(),
                if feed.has_more() { " (more pages available)" } else { "" }
            );
            if matches.is_empty() {
                println!("No results found. Try adjusting your filters or search query.");
            }
            for item in &matches {
                print_content_line(item);
            }
        }
        Commands::Show { id } => match hub.content_by_id(&id).await? {
            Some(item) => print_content_detail(&item),
            None => println!("Content not found: {id}"),
        },
        Commands::Platforms { refresh } => {
            let platforms = hub.platforms(refresh).await?;
            if platforms.is_empty() {
                println!("No platforms available.");
            }
            for p in &platforms {
                print_platform_line(p, None);
            }
        }
        Commands::Subs { command } => match command {
            SubsCommands::List => {
                let (subscribed, available) = hub.subscription_overview(false).await?;
                println!("My subscriptions ({} active):", subscribed.len());
                for p in &subscribed {
                    print_platform_line(p, Some("subscribed"));
                }
                println!("Available platforms ({}):", available.len());
                for p in &available {
                    print_platform_line(p, None);
                }
            }
            SubsCommands::Toggle { id } => {
                if hub.toggle_subscription(&id).await? {
                    println!("Subscribed to {id}");
                } else {
                    println!("Unsubscribed from {id}");
                }
            }
        },
        Commands::Cache { command } => match command {
            CacheCommands::Clear { prefix } => {
                let removed = hub.clear_cache_prefix(prefix.as_deref()).await?;
                hub.vacuum_db().await?;
                println!("Removed {removed} cached entries");
            }
        },
    }

    Ok(())
}

fn print_filter_options(options: &FilterOptions) {
    if !options.platforms.is_empty() {
        println!("Platforms: {}", options.platforms.join(", "));
    }
    if !options.genres.is_empty() {
        println!("Genres: {}", options.genres.join(", "));
    }
    if !options.content_types.is_empty() {
        println!("Types: {}", options.content_types.join(", "));
    }
}

fn print_content_line(item: &ContentItem) {
    println!(
        "{}  {}  [{} | {}]",
        item.id,
        item.title.as_deref().unwrap_or("-"),
        item.content_type.as_deref().unwrap_or("-"),
        item.streaming_platform.as_deref().unwrap_or("-"),
    );
}

fn print_content_detail(item: &ContentItem) {
    println!("{}", item.title.as_deref().unwrap_or("(untitled)"));
    println!("  id:        {}", item.id);
    if let Some(genre) = &item.genre {
        println!("  genre:     {genre}");
    }
    if let Some(kind) = &item.content_type {
        println!("  type:      {kind}");
    }
    if let Some(platform) = &item.streaming_platform {
        println!("  platform:  {platform}");
    }
    if let Some(rating) = item.imdb_rating {
        println!("  imdb:      {rating}/10");
    }
    if let Some(rating) = item.rotten_tomatoes_rating {
        println!("  tomatoes:  {rating}%");
    }
    if item.is_top_grossing.unwrap_or(false) {
        println!("  top grossing");
    }
    if let Some(description) = &item.description {
        println!("\n{description}");
    }
}

fn print_platform_line(platform: &PlatformItem, tag: Option<&str>) {
    println!(
        "{}  {}{}{}",
        platform.id,
        platform.platform_name.as_deref().unwrap_or("-"),
        platform
            .subscription_details
            .as_deref()
            .map(|d| format!("  ({d})"))
            .unwrap_or_default(),
        tag.map(|t| format!("  [{t}]")).unwrap_or_default(),
    );
}
