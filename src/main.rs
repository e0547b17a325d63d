#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::Result;
use log::info;
use poem::listener::TcpListener;
use structopt::StructOpt;

// Greeting Utilities
use crate::api::{build_app, pages::PageRenderer};
use crate::utils::config::{get_parms, init_greeting_dirs, init_log, GreetingArgs, GreetingDirs, RuntimeCtx,
                           StoreKind};
use crate::utils::db::SqliteGreetingStore;
use crate::utils::db_init;
use crate::utils::errors::Errors;
use crate::utils::store::{GreetingStore, MemoryGreetingStore};

// Modules
mod api;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "GreetingServer"; // for poem logging

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<()> {
    // --------------- Initialize Server --------------
    // Announce ourselves.
    println!("Starting greeting_server!");

    // Read the command line and lay out the data directories.
    let args = GreetingArgs::from_args();
    let dirs = init_greeting_dirs(&args)?;
    if args.create_dirs_only {
        println!("Data directories created under {}.", dirs.root_dir);
        return Ok(());
    }

    // Initialize the server.
    let ctx = greeting_init(args, dirs)?;

    // Wire the store into the handlers.
    let store = init_store(&ctx).await?;
    let pages = PageRenderer::new()?;

    // --------------- Main Loop Set Up ---------------
    let app = build_app(&ctx.parms.config, store, pages);
    let addr = format!("{}{}", "0.0.0.0:", ctx.parms.config.http_port);
    info!("Serving {:?} greetings on {}.", ctx.parms.config.greeting_variant, addr);

    // ------------------ Main Loop -------------------
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await?;
    Ok(())
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// greeting_init:
// ---------------------------------------------------------------------------
/** Initialize logging and read the configuration file. */
fn greeting_init(args: GreetingArgs, dirs: GreetingDirs) -> Result<RuntimeCtx> {
    // Configure our log.
    init_log(&dirs)?;

    // Read input parameters and log them.
    let parms = get_parms(&dirs)?;
    let ctx = RuntimeCtx {parms, args, dirs};
    info!("{}", Errors::InputParms(format!("{:#?}", ctx)));

    // Log build info.
    print_version_info();
    Ok(ctx)
}

// ---------------------------------------------------------------------------
// init_store:
// ---------------------------------------------------------------------------
async fn init_store(ctx: &RuntimeCtx) -> Result<Arc<dyn GreetingStore>> {
    let store: Arc<dyn GreetingStore> = match ctx.parms.config.store {
        StoreKind::Sqlite => {
            let db = db_init::init_db(&ctx.dirs.database_url()).await?;
            Arc::new(SqliteGreetingStore::new(db))
        },
        StoreKind::Memory => Arc::new(MemoryGreetingStore::new()),
    };
    info!("Greeting store initialized: {:?}.", ctx.parms.config.store);
    Ok(store)
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("\n*** Running GREETING_SERVER={}, RUSTC_TARGET_OS={}",
          option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
          std::env::consts::OS);
}
