// src/main.rs
//
// Command-line host: wires every dependency once, runs one command and
// prints its result as pretty JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use gamehub::application::commands::*;
use gamehub::application::dto::BrowseFiltersDto;
use gamehub::application::state::{open_storage, AppState};
use gamehub::config::AppConfig;
use gamehub::domain::CatalogId;
use gamehub::integrations::{CatalogApi, RawgClient};

#[derive(Debug, Parser)]
#[command(name = "gamehub", about = "Browse the RAWG game catalog and keep favorites and a wishlist")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the collections database
    #[arg(long, value_name = "PATH", global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the catalog API
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Keep collections in memory for this run only
    #[arg(long, global = true)]
    memory: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Trending, top rated, this week and upcoming games.")]
    Home,
    #[command(about = "Highest metacritic scores.")]
    Top {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "Best rated by the community.")]
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "Search games by name.")]
    Search {
        text: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "List games with any combination of filters.")]
    Browse {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        genre: Option<CatalogId>,
        #[arg(long)]
        platform: Option<CatalogId>,
        /// Ordering such as -rating, -released or name
        #[arg(long, allow_hyphen_values = true)]
        ordering: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        page: Option<u32>,
    },
    #[command(about = "Games of one genre.")]
    Genre {
        id: CatalogId,
        #[arg(long, allow_hyphen_values = true)]
        ordering: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "Games on one platform.")]
    Platform {
        id: CatalogId,
        #[arg(long, allow_hyphen_values = true)]
        ordering: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "Games released in a year.")]
    Year {
        year: i32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "Details of one game.")]
    Game { id: CatalogId },
    #[command(about = "Screenshots, trailers and similar games.")]
    Media { id: CatalogId },
    #[command(about = "All genres.")]
    Genres,
    #[command(about = "All platforms.")]
    Platforms,
    #[command(about = "All stores.")]
    Stores,
    #[command(about = "Release calendar, e.g. last-30-days, this-week, next-month.")]
    Releases {
        window: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "Curated lists: best, popular or all-time.")]
    TopCategory {
        category: String,
        #[arg(long)]
        year: Option<i32>,
    },
    #[command(about = "Latest releases for the reviews page.")]
    Reviews,
    #[command(about = "Manage favorites.")]
    Favorites {
        #[command(subcommand)]
        action: CollectionCommand,
    },
    #[command(about = "Manage the wishlist.")]
    Wishlist {
        #[command(subcommand)]
        action: CollectionCommand,
    },
    #[command(about = "Counts and ids of both collections.")]
    Summary,
    #[command(about = "Empty favorites and wishlist.")]
    Clear,
}

#[derive(Debug, Subcommand)]
enum CollectionCommand {
    List,
    Add { id: CatalogId },
    Remove { id: CatalogId },
    Toggle { id: CatalogId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let state = build_state(config, cli.memory)?;

    run(&state, cli.command).await
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::from_env().context("reading configuration")?;

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    config.validate()?;
    Ok(config)
}

fn build_state(config: AppConfig, in_memory: bool) -> anyhow::Result<AppState> {
    // 1. STORAGE (falls back to memory when the database is unusable)
    let storage = open_storage(&config, in_memory);

    // 2. CATALOG CLIENT
    let api: Arc<dyn CatalogApi> = Arc::new(RawgClient::new(&config)?);
    if config.api_key.is_none() {
        log::warn!("RAWG_API_KEY is not set; the catalog may reject requests");
    }

    // 3. SERVICES + APPLICATION STATE
    Ok(AppState::assemble(config, storage, api))
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Home => emit(get_home_feed(state).await),
        Command::Top { page } => emit(get_top_games(state, page).await),
        Command::Popular { page } => emit(get_popular_games(state, page).await),
        Command::Search { text, page } => emit(search_games(state, text, page).await),
        Command::Browse {
            search,
            genre,
            platform,
            ordering,
            year,
            page,
        } => {
            let filters = BrowseFiltersDto {
                search,
                genre,
                platform,
                ordering,
                year,
                page,
            };
            emit(browse_games(state, filters).await)
        }
        Command::Genre { id, ordering, page } => {
            emit(get_games_by_genre(state, id, ordering, page).await)
        }
        Command::Platform { id, ordering, page } => {
            emit(get_games_by_platform(state, id, ordering, page).await)
        }
        Command::Year { year, page } => emit(get_games_by_year(state, year, page).await),
        Command::Game { id } => emit(get_game_details(state, id).await),
        Command::Media { id } => emit(get_game_media(state, id).await),
        Command::Genres => emit(list_genres(state).await),
        Command::Platforms => emit(list_platforms(state).await),
        Command::Stores => emit(list_stores(state).await),
        Command::Releases { window, page } => emit(get_release_calendar(state, window, page).await),
        Command::TopCategory { category, year } => {
            emit(get_top_category(state, category, year).await)
        }
        Command::Reviews => emit(get_reviews_feed(state).await),
        Command::Favorites { action } => match action {
            CollectionCommand::List => emit(list_favorites(state).await),
            CollectionCommand::Add { id } => emit(add_favorite(state, id).await),
            CollectionCommand::Remove { id } => emit(remove_favorite(state, id).await),
            CollectionCommand::Toggle { id } => emit(toggle_favorite(state, id).await),
        },
        Command::Wishlist { action } => match action {
            CollectionCommand::List => emit(list_wishlist(state).await),
            CollectionCommand::Add { id } => emit(add_to_wishlist(state, id).await),
            CollectionCommand::Remove { id } => emit(remove_from_wishlist(state, id).await),
            CollectionCommand::Toggle { id } => emit(toggle_wishlist(state, id).await),
        },
        Command::Summary => emit(get_collection_summary(state).await),
        Command::Clear => emit(clear_collections(state).await),
    }
}

fn emit<T: Serialize>(result: Result<T, String>) -> anyhow::Result<()> {
    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(response) => {
            eprintln!("{}", response);
            anyhow::bail!("command failed")
        }
    }
}
