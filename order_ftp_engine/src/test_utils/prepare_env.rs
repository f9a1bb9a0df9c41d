//! Throwaway settings databases for integration tests. Each call gets its own SQLite file in the system temp dir.
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::SqliteDatabase;

/// Load `.env.test` if there is one and switch on logging.
pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

pub fn random_db_url() -> String {
    let path = std::env::temp_dir().join(format!("ofr_test_settings_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

/// Create an empty, fully migrated settings database at a random location.
pub async fn fresh_settings_db() -> SqliteDatabase {
    prepare_test_env();
    let url = random_db_url();
    Sqlite::create_database(&url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    info!("🚀️ Created settings database {url}");
    db
}

/// Close the pool and delete the database file.
pub async fn discard_settings_db(mut db: SqliteDatabase) {
    if let Err(e) = db.close().await {
        warn!("🚀️ Failed to close database {}: {e}", db.url());
    }
    if let Err(e) = Sqlite::drop_database(db.url()).await {
        warn!("🚀️ Could not delete database {}: {e}", db.url());
    }
}
