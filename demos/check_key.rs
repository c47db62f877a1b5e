//! Run this example with the following command in a terminal:
//!
//! ```console
//! $ RUST_LOG=keystatus=debug cargo run --example check_key -- key.json
//! ```
//!
//! The file holds a key as produced by a key parser, for example:
//!
//! ```json
//! {
//!   "created_at": "2024-01-01T00:00:00Z",
//!   "identities": [{"user_id": "Jane <jane@example.com>", "self_signature": {"key_lifetime_secs": 31536000}}],
//!   "subkeys": [{"key_id": "0123456789ABCDEF", "created_at": 1704067200, "binding_signature": {"flags": {"encrypt_storage": true}}}]
//! }
//! ```

use keystatus::Key;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Use first argument as path to the key, read stdin otherwise
    let args: Vec<String> = std::env::args().collect();
    let json = match args.get(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };

    let key: Key = serde_json::from_str(&json)?;
    let warnings = keystatus::key_warnings(&key)?;

    if warnings.is_empty() {
        println!("Key looks good");
    }
    for warning in &warnings {
        println!("{warning}");
    }
    println!("{}", serde_json::to_string(&warnings)?);

    Ok(())
}
