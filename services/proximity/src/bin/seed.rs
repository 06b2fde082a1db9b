//! Populate the configured store with random selections.
//!
//! Usage: `proximity-seed [count]` (default 100). Uses the same configuration
//! as the server and refuses to seed the in-memory backend, which would be
//! discarded on exit.
use anyhow::{Context, bail};
use proximity::config::{ServiceConfig, StorageBackend};
use proximity::model::{PROXIMITY_MAX, PROXIMITY_MIN, Submission};
use proximity::store;
use rand::Rng;
use rand::seq::SliceRandom;

const DEFAULT_COUNT: usize = 100;

const COUNTRIES: &[&str] = &[
    "United States",
    "Canada",
    "United Kingdom",
    "Germany",
    "France",
    "Australia",
    "Japan",
    "Brazil",
    "India",
    "South Africa",
];

fn parse_count(arg: Option<String>) -> anyhow::Result<usize> {
    match arg {
        None => Ok(DEFAULT_COUNT),
        Some(value) => value
            .parse()
            .with_context(|| format!("count must be a non-negative integer, got {value:?}")),
    }
}

fn random_submission<R: Rng + ?Sized>(rng: &mut R) -> Submission {
    let country = COUNTRIES.choose(rng).copied().unwrap_or(COUNTRIES[0]);
    Submission {
        user_id: uuid::Uuid::new_v4().to_string(),
        country: country.to_string(),
        salary: rng.gen_range(PROXIMITY_MIN..=PROXIMITY_MAX),
        people: rng.gen_range(PROXIMITY_MIN..=PROXIMITY_MAX),
        work: rng.gen_range(PROXIMITY_MIN..=PROXIMITY_MAX),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let count = parse_count(std::env::args().nth(1))?;
    let config = ServiceConfig::from_env_or_yaml()?;
    if config.storage == StorageBackend::Memory {
        bail!("refusing to seed the in-memory backend; set PROXIMITY_DATABASE_URL");
    }

    let store = store::open_store(&config).await?;
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        store
            .upsert_selection(random_submission(&mut rng))
            .await
            .context("insert random selection")?;
    }
    tracing::info!(count, total = store.count_selections().await?, "seeded selections");
    Ok(())
}
