//! Paceboard demo seeder
//!
//! Populates a database with sample entries so the dashboard has
//! something to show. Run with: cargo run --bin paceboard-seed

use chrono::{Datelike, Utc};
use clap::Parser;
use paceboard::report::YearMonth;
use paceboard::store::{Category, EntryStore, EntryType, NewEntry, StoreConfig, User};
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "paceboard-seed", about = "Seed a Paceboard database with demo entries")]
struct Args {
    /// Data directory holding the database
    #[arg(long, default_value = "paceboard_data")]
    data_dir: String,

    /// User id to own the seeded entries
    #[arg(long, default_value = "demo-user")]
    user: String,

    /// How many trailing months to fill
    #[arg(long, default_value_t = 15)]
    months: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "paceboard=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let store = EntryStore::open(&StoreConfig::new(&args.data_dir))?;

    store
        .upsert_user(&User {
            id: args.user.clone(),
            handle: args.user.clone(),
            display_name: "Demo User".to_string(),
        })
        .await?;

    let mut rng = rand::thread_rng();
    let mut month = YearMonth::of(Utc::now().date_naive());
    let mut created = 0usize;

    for _ in 0..args.months {
        for (day, entry_type, category, base) in [
            (5, EntryType::Sales, Category::Training, 2500.0_f64),
            (9, EntryType::Sales, Category::Coaching, 1200.0),
            (12, EntryType::Sales, Category::Speaking, 800.0),
            (16, EntryType::Delivery, Category::Training, 2100.0),
            (21, EntryType::Delivery, Category::Coaching, 1500.0),
            (25, EntryType::Delivery, Category::Speaking, 600.0),
        ] {
            // Skip some slots so the charts show uneven months
            if rng.gen_bool(0.25) {
                continue;
            }

            let date = chrono::NaiveDate::from_ymd_opt(month.year, month.month, day)
                .expect("seed days stay below 28");
            let amount = (base * rng.gen_range(0.6..1.4)).round();

            store
                .create(
                    &args.user,
                    NewEntry {
                        date,
                        entry_type,
                        category,
                        amount,
                        title: format!("{} {}", category, month_label(date)),
                        content: String::new(),
                    },
                )
                .await?;
            created += 1;
        }

        month = month.prev();
    }

    tracing::info!(
        user = %args.user,
        entries = created,
        "Seeded demo data into {}",
        args.data_dir
    );
    Ok(())
}

fn month_label(date: chrono::NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}
