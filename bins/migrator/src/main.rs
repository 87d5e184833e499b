//! Schema migration runner for Ledgerly.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured).
//!
//! Usage:
//!   migrator up      - Create the schema
//!   migrator down    - Drop every table
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-create them

use sea_orm_migration::prelude::*;
use ledgerly_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Sets up its own tracing.
    cli::run_cli(Migrator).await;
}
