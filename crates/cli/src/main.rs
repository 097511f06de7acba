use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{parser, DetailsIndex};
use pipeline::features::build_catalog;
use pipeline::{CatalogArtifact, DEFAULT_MAX_FEATURES};
use server::{OmdbPosterProvider, RecommenderService, DEFAULT_OMDB_API_KEY, MAX_SEARCH_LIMIT};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// CineMatch - content-based movie recommendations
#[derive(Parser)]
#[command(name = "cine-match")]
#[command(about = "Content-based movie recommendation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog artifact from the raw TMDB CSV exports
    Build {
        /// Path to the movies CSV (tmdb_5000_movies.csv)
        #[arg(long, default_value = "data/tmdb_5000_movies.csv")]
        movies: PathBuf,

        /// Path to the credits CSV (tmdb_5000_credits.csv)
        #[arg(long, default_value = "data/tmdb_5000_credits.csv")]
        credits: PathBuf,

        /// Where to write the catalog artifact
        #[arg(long, default_value = "data/catalog.json")]
        out: PathBuf,

        /// Vocabulary size cap for the vectorizer
        #[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
        max_features: usize,
    },

    /// Recommend movies similar to a title (or keyword-search when the
    /// title is unknown)
    Recommend {
        /// Movie title or free-text query
        #[arg(long)]
        query: String,

        /// Path to the catalog artifact
        #[arg(long, default_value = "data/catalog.json")]
        artifact: PathBuf,

        /// Path to the movies CSV, for detail enrichment
        #[arg(long, default_value = "data/tmdb_5000_movies.csv")]
        movies: PathBuf,

        /// OMDb API key for poster lookups
        #[arg(long, default_value = DEFAULT_OMDB_API_KEY)]
        api_key: String,
    },

    /// Search catalog titles by case-insensitive substring
    Search {
        /// Title fragment to search for
        #[arg(long)]
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = MAX_SEARCH_LIMIT)]
        limit: usize,

        /// Path to the catalog artifact
        #[arg(long, default_value = "data/catalog.json")]
        artifact: PathBuf,

        /// Path to the movies CSV, for detail enrichment
        #[arg(long, default_value = "data/tmdb_5000_movies.csv")]
        movies: PathBuf,

        /// OMDb API key for poster lookups
        #[arg(long, default_value = DEFAULT_OMDB_API_KEY)]
        api_key: String,
    },

    /// List every catalog title in row order
    Titles {
        /// Path to the catalog artifact
        #[arg(long, default_value = "data/catalog.json")]
        artifact: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            movies,
            credits,
            out,
            max_features,
        } => handle_build(&movies, &credits, &out, max_features)?,
        Commands::Recommend {
            query,
            artifact,
            movies,
            api_key,
        } => handle_recommend(&artifact, &movies, api_key, &query).await?,
        Commands::Search {
            query,
            limit,
            artifact,
            movies,
            api_key,
        } => handle_search(&artifact, &movies, api_key, &query, limit).await?,
        Commands::Titles { artifact } => handle_titles(&artifact)?,
    }

    Ok(())
}

/// Handle the 'build' command
fn handle_build(movies: &Path, credits: &Path, out: &Path, max_features: usize) -> Result<()> {
    let start = Instant::now();

    println!("Reading {}...", movies.display());
    let movie_rows = parser::parse_movies(movies).context("Failed to read movies CSV")?;
    println!("Reading {}...", credits.display());
    let credit_rows = parser::parse_credits(credits).context("Failed to read credits CSV")?;

    let merged = parser::merge_records(&movie_rows, &credit_rows);
    println!(
        "{} Merged {} movies with {} credit rows into {} records",
        "✓".green(),
        movie_rows.len(),
        credit_rows.len(),
        merged.len()
    );

    let catalog = build_catalog(&merged);
    let artifact = CatalogArtifact::new(catalog).with_max_features(max_features);
    artifact
        .save(out)
        .with_context(|| format!("Failed to write artifact to {}", out.display()))?;

    let model = artifact.into_model();
    let rows = model.catalog().len();
    println!(
        "{} Built model: {} movies, {} vocabulary terms, {}x{} similarity matrix",
        "✓".green(),
        rows,
        model.vocabulary().len(),
        rows,
        rows
    );
    println!(
        "{} Wrote artifact to {} in {:?}",
        "✓".green(),
        out.display(),
        start.elapsed()
    );

    // Smoke check: nearest neighbors of the first catalog entry
    if let Some(first) = model.catalog().first() {
        println!("\nSample recommendations for {}:", first.title.bold());
        for row in model.similarity().neighbors(0, 5) {
            println!(
                "  - {} (similarity {:.3})",
                model.catalog()[row].title,
                model.similarity().similarity(0, row)
            );
        }
    }

    Ok(())
}

/// Load the artifact, the detail rows, and the poster provider into a
/// serving-ready service.
fn load_service(artifact: &Path, movies: &Path, api_key: String) -> Result<RecommenderService> {
    let start = Instant::now();
    let model = CatalogArtifact::load(artifact)
        .with_context(|| format!("Failed to load artifact from {}", artifact.display()))?
        .into_model();
    let details = DetailsIndex::load(movies).context("Failed to load movie details CSV")?;
    let poster = Arc::new(OmdbPosterProvider::new(api_key)?);
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        model.catalog().len(),
        start.elapsed()
    );
    Ok(RecommenderService::new(model, details, poster))
}

/// Handle the 'recommend' command
async fn handle_recommend(
    artifact: &Path,
    movies: &Path,
    api_key: String,
    query: &str,
) -> Result<()> {
    let service = load_service(artifact, movies, api_key)?;
    let response = service.recommend(query).await?;

    if response.recommendations.is_empty() {
        println!("No matches for '{query}'");
        return Ok(());
    }

    let header = match response.search_type {
        Some(_) => format!("Keyword matches for '{query}':"),
        None => format!("Movies similar to '{query}':"),
    };
    println!("{}", header.bold().blue());
    for (rank, rec) in response.recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - rated {:.1}",
            (rank + 1).to_string().green(),
            rec.title,
            rec.release_date,
            rec.genres,
            rec.vote_average
        );
    }
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    artifact: &Path,
    movies: &Path,
    api_key: String,
    query: &str,
    limit: usize,
) -> Result<()> {
    let service = load_service(artifact, movies, api_key)?;
    let results = service.search(query, limit).await?;

    println!("{}", format!("Search results for '{query}':").bold().blue());
    if results.is_empty() {
        println!("  (none)");
    }
    for rec in &results {
        println!("  - {} ({}) [{}]", rec.title, rec.release_date, rec.genres);
    }
    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(artifact: &Path) -> Result<()> {
    let model = CatalogArtifact::load(artifact)
        .with_context(|| format!("Failed to load artifact from {}", artifact.display()))?
        .into_model();
    for movie in model.catalog() {
        println!("{}", movie.title);
    }
    Ok(())
}
