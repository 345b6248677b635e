use std::{io, process};

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use supabase_setup::{
    config::SupabaseConfig,
    error::SetupError,
    rpc::{RpcResponse, SupabaseClient},
    schema::{TABLE_NAME, apply_schema},
};

const MANUAL_FALLBACK_HINT: &str = "Note: You may need to create the table manually in the Supabase dashboard\n\
     or use the SQL editor with the schema.sql file";

fn main() -> Result<()> {
    init_logging()?;

    let config = match SupabaseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    };

    match run(&config) {
        Ok(response) => {
            println!("✅ Successfully created {TABLE_NAME} table in Supabase");
            println!("Response: {response:?}");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Error creating table: {e}");
            eprintln!();
            eprintln!("{MANUAL_FALLBACK_HINT}");
            process::exit(e.exit_code());
        }
    }
}

fn run(config: &SupabaseConfig) -> Result<RpcResponse, SetupError> {
    let client = SupabaseClient::connect(config)?;
    apply_schema(&client)
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}
