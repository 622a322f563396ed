// src/main.rs
//
// Smoke tool for a deployed backend: loads the environment config, then
// prints the trending list and the newest catalog entries.

use kino_client::config::AppConfig;
use kino_client::{gateway, AppState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {e}");
            std::process::exit(1);
        }
    };
    let state = AppState::new(config);

    match gateway::trending_movies(&state).await {
        Ok(trending) => {
            println!("trending ({}):", trending.len());
            for entry in trending {
                println!("  {:>4}  {}", entry.total_count, entry.title);
            }
        }
        Err(e) => eprintln!("trending error: {e}"),
    }

    match gateway::latest_movies(&state).await {
        Ok(movies) => {
            println!("catalog ({} titles):", movies.len());
            for movie in movies.iter().take(10) {
                println!("  {} ({})", movie.title, movie.release_year);
            }
        }
        Err(e) => eprintln!("catalog error: {e}"),
    }
}
