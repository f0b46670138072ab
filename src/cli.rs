use clap::{Parser, Subcommand};

/// Browse aggregated streaming catalogs and track platform subscriptions
#[derive(Parser)]
#[command(name = "streamhub")]
#[command(about = "A streaming-catalog aggregation client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load catalog pages and print the filtered view
    Browse {
        /// Case-insensitive text search over title and description
        #[arg(short, long)]
        query: Option<String>,
        /// Exact streaming platform to keep
        #[arg(short, long)]
        platform: Option<String>,
        /// Exact genre to keep
        #[arg(short, long)]
        genre: Option<String>,
        /// Exact content type to keep (e.g. Movie, Series)
        #[arg(short = 't', long)]
        content_type: Option<String>,
        /// How many pages to accumulate before filtering
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Bypass the list cache
        #[arg(long)]
        refresh: bool,
    },
    /// Show one catalog entry by id
    Show {
        /// Server-assigned content id
        id: String,
    },
    /// List the streaming platform directory
    Platforms {
        /// Bypass the list cache
        #[arg(long)]
        refresh: bool,
    },
    /// Manage tracked subscriptions
    Subs {
        #[command(subcommand)]
        command: SubsCommands,
    },
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
pub enum SubsCommands {
    /// Show subscribed and available platforms
    List,
    /// Flip a platform in or out of the subscription set
    Toggle {
        /// Platform id to toggle
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Delete cached list pages
    Clear {
        /// Only delete keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
}
