use clap::{ArgAction, Parser, Subcommand};
use reelview_config::{Config, PathManager};
use reelview_models::validation::REVIEWS_PER_PAGE;

mod commands;
mod logging;
mod output;

use commands::{config as config_cmd, movies, profile, reviews};
use output::Output;

#[derive(Parser)]
#[command(name = "reelview")]
#[command(about = "ReelView - browse the movie catalog and manage your reviews")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the movie catalog
    Movies {
        #[command(subcommand)]
        cmd: MoviesCommands,
    },
    /// Read and write movie reviews
    Reviews {
        #[command(subcommand)]
        cmd: ReviewsCommands,
    },
    /// View and manage user profiles
    Profile {
        #[command(subcommand)]
        cmd: ProfileCommands,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum MoviesCommands {
    /// List popular movies
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List trending movies
    Trending {
        /// Trending window: day or week
        #[arg(long, default_value = "day")]
        window: String,
    },
    /// Search the catalog by title
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show full details for one movie
    Details {
        movie_id: u32,
        /// Also list trailers and clips
        #[arg(long, action = ArgAction::SetTrue)]
        videos: bool,
    },
}

#[derive(Subcommand)]
enum ReviewsCommands {
    /// List reviews with optional search, rating filter, and sort order
    List {
        /// Only reviews for this movie
        #[arg(long)]
        movie: Option<u32>,

        /// Only reviews by this user
        #[arg(long)]
        user: Option<String>,

        /// How many records to fetch
        #[arg(long, default_value_t = REVIEWS_PER_PAGE)]
        limit: usize,

        /// Case-insensitive match against movie title, author, and comment
        #[arg(long, default_value = "")]
        search: String,

        /// Keep only reviews with exactly this star rating
        #[arg(long)]
        rating: Option<u8>,

        /// Sort order: newest, oldest, highest, lowest, or helpful
        #[arg(long, default_value = "newest")]
        sort: String,
    },
    /// Submit a new review
    Add {
        /// Authoring user id
        #[arg(long)]
        user: String,

        /// Display name stored with the review
        #[arg(long)]
        name: String,

        /// Catalog id of the movie being reviewed
        #[arg(long)]
        movie: u32,

        /// Star rating, 1-5
        #[arg(long)]
        rating: u8,

        /// Review text, 10-1000 characters
        #[arg(long)]
        comment: String,
    },
    /// Delete one of your reviews
    Delete {
        review_id: String,

        /// Requesting user id; must match the review's author
        #[arg(long)]
        user: String,

        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Mark a review as helpful
    Helpful { review_id: String },
    /// Show collection-wide review statistics
    Stats,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show a user's profile with synchronized stats
    Show {
        #[arg(long)]
        user: String,
    },
    /// Create a profile record (registration)
    Register {
        #[arg(long)]
        user: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Password (prompted when omitted); only its length is checked here
        #[arg(long)]
        password: Option<String>,
    },
    /// Update profile display fields
    Update {
        #[arg(long)]
        user: String,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },
    /// Recompute and persist the user's review stats
    Sync {
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| color_eyre::eyre::eyre!("failed to initialize logging: {}", e))?;

    let out = Output::new(cli.output, cli.quiet);
    let paths = PathManager::new()
        .map_err(|e| color_eyre::eyre::eyre!("failed to resolve config paths: {}", e))?;
    let config = Config::load(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("failed to load configuration: {}", e))?;

    match cli.command {
        Commands::Movies { cmd } => match cmd {
            MoviesCommands::Popular { page } => movies::popular(&out, &config, page).await?,
            MoviesCommands::Trending { window } => {
                movies::trending(&out, &config, &window).await?
            }
            MoviesCommands::Search { query, page } => {
                movies::search(&out, &config, &query, page).await?
            }
            MoviesCommands::Details { movie_id, videos } => {
                movies::details(&out, &config, movie_id, videos).await?
            }
        },
        Commands::Reviews { cmd } => match cmd {
            ReviewsCommands::List {
                movie,
                user,
                limit,
                search,
                rating,
                sort,
            } => {
                reviews::list(
                    &out,
                    &config,
                    reviews::ListArgs {
                        movie,
                        user,
                        limit,
                        search,
                        rating,
                        sort,
                    },
                )
                .await?
            }
            ReviewsCommands::Add {
                user,
                name,
                movie,
                rating,
                comment,
            } => {
                reviews::add(
                    &out,
                    &config,
                    reviews::AddArgs {
                        user,
                        name,
                        movie,
                        rating,
                        comment,
                    },
                )
                .await?
            }
            ReviewsCommands::Delete {
                review_id,
                user,
                yes,
            } => reviews::delete(&out, &config, &review_id, &user, yes).await?,
            ReviewsCommands::Helpful { review_id } => {
                reviews::helpful(&out, &config, &review_id).await?
            }
            ReviewsCommands::Stats => reviews::stats(&out, &config).await?,
        },
        Commands::Profile { cmd } => match cmd {
            ProfileCommands::Show { user } => profile::show(&out, &config, &user).await?,
            ProfileCommands::Register {
                user,
                username,
                email,
                password,
            } => profile::register(&out, &config, &user, &username, &email, password).await?,
            ProfileCommands::Update {
                user,
                username,
                bio,
            } => profile::update(&out, &config, &user, username, bio).await?,
            ProfileCommands::Sync { user } => profile::sync(&out, &config, &user).await?,
        },
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show) {
            ConfigCommands::Show => config_cmd::show(&out, &config, &paths)?,
            ConfigCommands::Init { force } => config_cmd::init(&out, &paths, force)?,
        },
    }

    Ok(())
}
