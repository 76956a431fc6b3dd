//! walletgate application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Build the challenge and session stores
//! 3. Start the expired-entry sweep
//! 4. Build router with API routes, CORS and security headers
//! 5. Start Axum server
//!
//! Also supports a `sign` subcommand that signs a challenge the way a wallet
//! would, for trying the API by hand.

use k256::ecdsa::SigningKey;
use std::time::Duration;
use walletgate::auth::verify::{address_of, sign_personal_message};
use walletgate::{cleanup, config::Config};

/// Sign `message` with a hex private key. Returns `(address, signature)`.
fn sign(private_key_hex: &str, message: &str) -> Result<(String, String), String> {
    let raw = private_key_hex
        .strip_prefix("0x")
        .unwrap_or(private_key_hex);
    let mut secret = hex::decode(raw).map_err(|e| format!("Invalid private key hex: {}", e))?;

    let key = SigningKey::from_slice(&secret).map_err(|e| format!("Invalid private key: {}", e));
    zeroize::Zeroize::zeroize(&mut secret);
    let key = key?;

    let signature =
        sign_personal_message(&key, message).map_err(|e| format!("Signing failed: {}", e))?;
    Ok((address_of(key.verifying_key()).to_string(), signature))
}

fn print_sign_usage() {
    eprintln!("Usage: walletgate sign <private-key-hex> <message>");
    eprintln!();
    eprintln!("Sign a login challenge with Ethereum personal_sign.");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  MSG=$(curl -s 'localhost:3001/login-challenge?address=0x7e5f...' | jq -r .message)");
    eprintln!("  walletgate sign 0x0000...0001 \"$MSG\"");
}

#[tokio::main]
async fn main() {
    // Check for sign subcommand
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "sign" {
        if args.len() != 4 {
            print_sign_usage();
            std::process::exit(1);
        }

        match sign(&args[2], &args[3]) {
            Ok((address, signature)) => {
                println!("address:   {}", address);
                println!("signature: {}", signature);
            }
            Err(e) => {
                eprintln!("Error signing message: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!(?config, "Starting walletgate on {}", config.bind_addr);

    let bind_addr = config.bind_addr;
    let cleanup_interval = config.cleanup_interval_secs;
    let state = walletgate::build_state(config);

    if cleanup_interval > 0 {
        tokio::spawn(cleanup::run_cleanup_loop(
            state.auth.clone(),
            Duration::from_secs(cleanup_interval),
        ));
    }

    let app = walletgate::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
