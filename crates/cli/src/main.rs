use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{GenreId, Movie, DEFAULT_IMAGE_BASE_URL};
use engine::{
    EngineConfig, ExploreSession, MovieRecommendation, RecommendationEngine, SessionAction,
    DEFAULT_TOP_K,
};
use pipeline::StopWords;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Movie Recs - content-based movie recommendations from genre similarity
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommend movies with similar genres", long_about = None)]
struct Cli {
    /// Path to the movie catalog CSV
    #[arg(short, long, default_value = "movies.csv")]
    data_file: PathBuf,

    /// Number of recommendations returned by default
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Keep every genre token instead of applying the English stop word list
    #[arg(long)]
    no_stop_words: bool,

    /// Prefix joined with poster paths for display
    #[arg(long, default_value = DEFAULT_IMAGE_BASE_URL)]
    image_base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Movies most similar to a title
    Recommend {
        /// Title to find similar movies for (any case)
        #[arg(long)]
        title: String,

        /// Number of recommendations (defaults to --top-k)
        #[arg(long)]
        limit: Option<usize>,

        /// Show which genres each recommendation shares with the title
        #[arg(long)]
        explain: bool,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details for one movie
    Show {
        #[arg(long)]
        title: String,
    },

    /// Search for movies by title
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: String,
    },

    /// List genre ids with the number of movies tagged with each
    Genres,

    /// Browse movies by genre
    Browse {
        /// Genre ids; a movie matches if it has any of them
        #[arg(long = "genre")]
        genres: Vec<GenreId>,

        /// Minimum vote count
        #[arg(long)]
        min_votes: Option<u32>,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Pick a random movie and show what is similar to it
    Surprise,

    /// Interactive explore session
    Explore,

    /// Run benchmark to test recommendation latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
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

    let stop_words = if cli.no_stop_words {
        StopWords::None
    } else {
        StopWords::English
    };
    let config = EngineConfig::new()
        .with_top_k(cli.top_k)
        .with_stop_words(stop_words);

    // Load the catalog and build the similarity matrix (this may take a moment)
    println!("Loading movie catalog from {}...", cli.data_file.display());
    let start = Instant::now();
    let engine = RecommendationEngine::load(&cli.data_file, config)
        .context("Failed to prepare recommendation engine")?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        engine.table().len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            limit,
            explain,
            json,
        } => handle_recommend(&engine, &title, limit, explain, json)?,
        Commands::Show { title } => handle_show(&engine, &title, &cli.image_base_url)?,
        Commands::Search { title } => handle_search(&engine, &title),
        Commands::Genres => handle_genres(&engine),
        Commands::Browse {
            genres,
            min_votes,
            limit,
        } => handle_browse(&engine, &genres, min_votes, limit),
        Commands::Surprise => handle_surprise(&engine),
        Commands::Explore => handle_explore(&engine)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &RecommendationEngine,
    title: &str,
    limit: Option<usize>,
    explain: bool,
    json: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(engine.config().top_k);
    let recommendations = engine.recommend_with_limit(title, limit);
    info!("Recommend '{}': {} results", title.trim(), recommendations.len());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&recommendations)
                .context("Failed to serialize recommendations")?
        );
        return Ok(());
    }

    if engine.table().find_by_title(title).is_none() {
        println!("{} No movie titled '{}'", "✗".red(), title.trim());
        return Ok(());
    }

    print_recommendations(&recommendations, explain);
    Ok(())
}

/// Handle the 'show' command
fn handle_show(engine: &RecommendationEngine, title: &str, image_base_url: &str) -> Result<()> {
    let movie = engine
        .table()
        .find_by_title(title)
        .and_then(|row| engine.table().get(row))
        .ok_or_else(|| anyhow!("Movie '{}' not found", title.trim()))?;

    println!("{}", movie.title.bold().blue());
    println!("{}Original title: {} ({})", "• ".green(), movie.original_title, movie.original_language);
    println!("{}Released: {}", "• ".green(), movie.release_date);
    println!("{}Genres: [{}]", "• ".green(), genre_list(&movie.genre_ids));
    println!(
        "{}Rating: {:.1} ({} votes), popularity {:.1}",
        "• ".cyan(),
        movie.vote_average,
        movie.vote_count,
        movie.popularity
    );
    println!("{}Poster: {}", "• ".cyan(), movie.poster_url(image_base_url));
    println!("\n{}", movie.overview);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(engine: &RecommendationEngine, title: &str) {
    let rows = engine.table().search(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    for movie in rows.iter().take(20).filter_map(|&row| engine.table().get(row)) {
        print_movie_line(movie);
    }
    if rows.len() > 20 {
        println!("... and {} more", rows.len() - 20);
    }
}

/// Handle the 'genres' command
fn handle_genres(engine: &RecommendationEngine) {
    println!("{}", "Genres:".bold().blue());
    for (genre, count) in engine.table().genre_counts() {
        println!("  {:>6}: {} movies", genre.to_string().green(), count);
    }
}

/// Handle the 'browse' command
fn handle_browse(engine: &RecommendationEngine, genres: &[GenreId], min_votes: Option<u32>, limit: usize) {
    let rows = engine.browse(genres, min_votes);
    info!("Browse {:?} (min votes {:?}): {} rows", genres, min_votes, rows.len());

    println!(
        "{}",
        format!("{} movies match [{}]:", rows.len(), genre_list(genres)).bold().blue()
    );
    for movie in rows.iter().take(limit).filter_map(|&row| engine.table().get(row)) {
        print_movie_line(movie);
    }
}

/// Handle the 'surprise' command
fn handle_surprise(engine: &RecommendationEngine) {
    let mut rng = rand::rng();
    let Some(row) = engine.surprise(&mut rng) else {
        println!("{} The catalog is empty", "✗".red());
        return;
    };
    let Some(movie) = engine.table().get(row) else {
        return;
    };

    println!("{} {}", "Surprise pick:".bold().blue(), movie.title.bold());
    print_recommendations(&engine.recommend_row(row, engine.config().top_k), false);
}

/// Handle the 'explore' command: a line-oriented session
fn handle_explore(engine: &RecommendationEngine) -> Result<()> {
    let mut rng = rand::rng();
    let mut session = ExploreSession::start(engine, &mut rng);
    info!("Explore session started with {} rows", session.explore().len());

    println!("{}", "Commands: title <name> | genres <id>... | pick <n> | surprise | shuffle | quit".dimmed());
    print_session(engine, &session);

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".green());
        io::stdout().flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }

        let (command, rest) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));
        let action = match command {
            "" => continue,
            "quit" | "exit" => break,
            "title" => SessionAction::Submit {
                title: Some(rest.trim())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            },
            "genres" => match rest.split_whitespace().map(str::parse::<GenreId>).collect::<Result<Vec<_>, _>>() {
                Ok(genres) => SessionAction::ApplyGenreFilter { genres },
                Err(e) => {
                    println!("{} invalid genre id: {}", "✗".red(), e);
                    continue;
                }
            },
            "pick" => {
                let shown = shown_rows(engine, &session);
                match parse_pick(rest, shown) {
                    Some(row) => SessionAction::Pick { row },
                    None => {
                        println!("{} pick a number between 1 and {}", "✗".red(), shown.len());
                        continue;
                    }
                }
            }
            "surprise" => SessionAction::Surprise,
            "shuffle" => SessionAction::Shuffle,
            other => {
                println!("{} unknown command '{}'", "✗".red(), other);
                continue;
            }
        };

        debug!("Explore action {:?}", action);
        session = session.apply(action, engine, &mut rng);
        print_session(engine, &session);
    }
    info!("Explore session ended");
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(engine: RecommendationEngine, requests: usize, concurrent: usize) -> Result<()> {
    if engine.table().is_empty() || requests == 0 {
        return Err(anyhow!("Benchmark needs a non-empty catalog and at least one request"));
    }

    // Random titles from the catalog
    let titles: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| engine.surprise(&mut rng))
            .filter_map(|row| engine.table().get(row).map(|m| m.title.clone()))
            .collect()
    };

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    info!("Benchmarking {} requests, {} concurrent", titles.len(), concurrent);
    let wall_clock = Instant::now();
    let mut handles = vec![];
    for title in titles {
        let engine = engine.clone();
        let semaphore = semaphore.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || engine.recommend(&title)).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation], explain: bool) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  (none)");
    }
    for (i, rec) in recommendations.iter().enumerate() {
        let year = rec.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string());
        println!(
            "{}. {} ({}) [{}] - Score: {:.2}",
            (i + 1).to_string().green(),
            rec.title,
            year,
            genre_list(&rec.genre_ids),
            rec.score
        );
        if explain {
            println!("   Explanation: {}", rec.explanation);
        }
    }
}

fn print_session(engine: &RecommendationEngine, session: &ExploreSession) {
    let selected = session
        .selected()
        .and_then(|row| engine.table().get(row))
        .map(|m| m.title.as_str())
        .unwrap_or("(none)");
    println!("{} {}", "Selected:".bold().blue(), selected);
    if !session.genres().is_empty() {
        println!("{} [{}]", "Genres:".bold().blue(), genre_list(session.genres()));
    }
    for (i, movie) in shown_rows(engine, session)
        .iter()
        .filter_map(|&row| engine.table().get(row))
        .enumerate()
    {
        print!("{:>3}. ", i + 1);
        print_movie_line(movie);
    }
}

fn print_movie_line(movie: &Movie) {
    let year = movie.release_year().map(|y| y.to_string()).unwrap_or_else(|| "????".to_string());
    println!(
        "{}: {} ({}) [{}] {:.1}/10 ({} votes)",
        movie.id,
        movie.title,
        year,
        genre_list(&movie.genre_ids),
        movie.vote_average,
        movie.vote_count
    );
}

fn genre_list(genres: &[GenreId]) -> String {
    genres
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Explore rows the session view prints; picks are numbered against these
fn shown_rows<'a>(engine: &RecommendationEngine, session: &'a ExploreSession) -> &'a [usize] {
    let limit = engine.config().explore_sample_size.max(engine.config().top_k);
    let explore = session.explore();
    &explore[..explore.len().min(limit)]
}

/// 1-based pick among the shown rows
fn parse_pick(input: &str, shown: &[usize]) -> Option<usize> {
    let n = input.trim().parse::<usize>().ok()?;
    shown.get(n.checked_sub(1)?).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieTable;

    fn create_test_engine() -> RecommendationEngine {
        let table = MovieTable::from_movies(
            (0..10u32).map(|i| Movie::new(i + 1, format!("Movie {}", i), vec![28, 12 + i])),
        );
        let config = EngineConfig::new().with_top_k(2).with_explore_sample_size(3);
        RecommendationEngine::from_table(table, config).unwrap()
    }

    #[test]
    fn test_pick_is_limited_to_shown_rows() {
        let engine = create_test_engine();
        let session = ExploreSession::default().apply(
            SessionAction::ApplyGenreFilter { genres: vec![28] },
            &engine,
            &mut rand::rng(),
        );
        assert_eq!(session.explore().len(), 10);

        let shown = shown_rows(&engine, &session);
        assert_eq!(shown, &[0, 1, 2]);
        assert_eq!(parse_pick("3", shown), Some(2));
        assert_eq!(parse_pick(" 1 ", shown), Some(0));
        assert_eq!(parse_pick("4", shown), None);
        assert_eq!(parse_pick("0", shown), None);
        assert_eq!(parse_pick("x", shown), None);
    }
}
