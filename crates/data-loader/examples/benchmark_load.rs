use data_loader::MovieTable;
use std::path::Path;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/movies.csv".to_string());

    println!("Loading movie catalog from {}...\n", path);

    let start = Instant::now();
    let table = MovieTable::load_from_csv(Path::new(&path))
        .expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let report = table.report();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Rows read: {}", report.rows_read);
    println!("Movies kept: {}", report.rows_kept);
    println!("Rows dropped: {}", report.rows_dropped);
    println!("Distinct genres: {}", table.genre_counts().len());
    println!("\nPerformance: {:.0} rows/second",
             report.rows_read as f64 / elapsed.as_secs_f64());
}
