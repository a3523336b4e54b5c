use crate::db::{connect, connect_with_config, DATABASE_URL};
use configs::DatabaseConfig;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use std::time::{Duration, Instant};
use anyhow::Result;

/// Test basic database connection
#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        println!("Skipping database tests (SKIP_DB_TESTS is set)");
        return Ok(());
    }

    let start = Instant::now();
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => { eprintln!("skip: cannot connect to db: {}", e); return Ok(()); }
    };
    let connection_time = start.elapsed();

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1 as test".to_string());
    let row = db.query_one(stmt).await?.expect("one row");
    let test_value: i32 = row.try_get("", "test")?;
    assert_eq!(test_value, 1);

    assert!(connection_time < Duration::from_secs(5),
           "Connection took too long: {:?}", connection_time);
    Ok(())
}

/// Test connection with pool settings taken from configuration
#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let mut config = DatabaseConfig::from_env();
    config.url = DATABASE_URL.clone();
    config.max_connections = 5;
    config.min_connections = 1;
    config.connect_timeout_secs = 10;

    let db = match connect_with_config(&config).await {
        Ok(db) => db,
        Err(e) => { eprintln!("skip: cannot connect to db: {}", e); return Ok(()); }
    };

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT current_database()".to_string());
    let result = db.query_one(stmt).await?;
    assert!(result.is_some());
    Ok(())
}
