mod config;
mod css;
mod error;
mod html;
mod language;
mod logging;
mod server;
mod workspace;

use std::env;
use std::path::PathBuf;
use std::process;

use log::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        // Use eprintln for usage info since logger isn't initialized yet
        eprintln!("Usage: {} <workspace_root>", args[0]);
        eprintln!("  <workspace_root>: directory whose stylesheets and markup are linked");
        eprintln!("The server speaks the Language Server Protocol over stdio.");
        process::exit(1);
    }

    if let Err(e) = logging::init_logger() {
        eprintln!("Failed to initialize logger: {}", e);
        process::exit(1);
    }

    let root = PathBuf::from(&args[1]);
    // resolve symlinks up front so watcher paths compare against the root
    let root = root.canonicalize().unwrap_or(root);
    info!("CSS navigation server starting for {}", root.display());

    if let Err(e) = server::start_server(root).await {
        error!("language server error: {:?}", e);
        process::exit(1);
    }

    info!("CSS navigation server shutting down");
}
