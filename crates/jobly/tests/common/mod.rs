#![allow(dead_code)]

use jobly::{JoblyError, JoblyResult};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::{Client, NoTls, Transaction};

pub const SCHEMA: &str = include_str!("../../schema.sql");

/// Connect using `DATABASE_URL`, or `None` (with a note) when it is unset.
pub async fn connect(test: &str) -> JoblyResult<Option<Client>> {
    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(|e| JoblyError::Connection(e.to_string()))?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    Ok(Some(client))
}

/// Open a transaction with the schema created in a private, throwaway
/// namespace. Nothing survives once the transaction is dropped.
pub async fn fresh_schema(client: &mut Client) -> JoblyResult<Transaction<'_>> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let schema = format!("jobly_test_{}_{}", std::process::id(), nanos);

    let tx = client.transaction().await?;
    tx.batch_execute(&format!(
        "CREATE SCHEMA {schema}; SET LOCAL search_path TO {schema};"
    ))
    .await?;
    tx.batch_execute(SCHEMA).await?;
    Ok(tx)
}

/// Three companies with 1, 5 and 60 employees.
pub async fn seed_companies(tx: &Transaction<'_>) -> JoblyResult<()> {
    tx.batch_execute(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES
            ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
            ('c2', 'C2', 5, 'Desc2', 'http://c2.img'),
            ('c3', 'C3', 60, 'Desc3', NULL);",
    )
    .await?;
    Ok(())
}
