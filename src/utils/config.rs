#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use serde::Deserialize;
use std::{env, fs, path::Path};
use fs_mistrust::Mistrust;
use std::os::unix::fs::PermissionsExt;
use structopt::StructOpt;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root, Config as LogConfig};
use log4rs::encode::pattern::PatternEncoder;

// Greeting Utilities
use crate::utils::{greeting_utils::get_absolute_path, errors::Errors};

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_GREETING_ROOT_DIR : &str = "GREETING_ROOT_DIR";
const DEFAULT_ROOT_DIR      : &str = "~/.greeting";
const CONFIG_DIR            : &str = "/config";
const LOGS_DIR              : &str = "/logs";
const DATABASE_DIR          : &str = "/database";
const LOG4RS_CONFIG_FILE    : &str = "/log4rs.yml";    // relative to config dir
const GREETING_CONFIG_FILE  : &str = "/greeting.toml"; // relative to config dir
const DB_FILE               : &str = "/greeting.db";   // relative to database dir

// Networking.
const DEFAULT_TITLE         : &str = "Greeting Server";
const DEFAULT_HTTP_ADDR     : &str = "http://localhost";
const DEFAULT_HTTP_PORT     : u16  = 3000;

// Console logging used when no log4rs file is installed.
const DEFAULT_LOG_PATTERN   : &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} - {m}{n}";

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// GreetingDirs:
// ---------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct GreetingDirs {
    pub root_dir: String,
    pub config_dir: String,
    pub logs_dir: String,
    pub database_dir: String,
}

impl GreetingDirs {
    /// Build the directory layout under a root without touching the file system.
    pub fn from_root(root_dir: &str) -> Self {
        GreetingDirs {
            root_dir:     root_dir.to_string(),
            config_dir:   root_dir.to_string() + CONFIG_DIR,
            logs_dir:     root_dir.to_string() + LOGS_DIR,
            database_dir: root_dir.to_string() + DATABASE_DIR,
        }
    }

    /// The sqlx url of the greeting database file.
    pub fn database_url(&self) -> String {
        "sqlite://".to_string() + self.database_dir.as_str() + DB_FILE
    }
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// GreetingArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "greeting_args", about = "Command line arguments for the Greeting Server.")]
pub struct GreetingArgs {
    /// Specify the server's root data directory.
    ///
    /// This directory contains the configuration, log and database
    /// subdirectories.
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Create the data directories and then exit.
    ///
    /// The data directories will be rooted at a root directory calculated
    /// using the following priority order:
    ///
    ///   1. If set, the value of the GREETING_ROOT_DIR environment,
    ///
    ///   2. Otherwise, if set, the value of the --root_dir command line argument,
    ///
    ///   3. Otherwise, ~/.greeting
    ///
    #[structopt(short, long)]
    pub create_dirs_only: bool,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub args: GreetingArgs,
    pub dirs: GreetingDirs,
}

// ---------------------------------------------------------------------------
// GreetingVariant:
// ---------------------------------------------------------------------------
/// Which greeting handler group is mounted under /api.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreetingVariant {
    #[default]
    Persistent,
    Fixed,
}

// ---------------------------------------------------------------------------
// StoreKind:
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Memory,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
    pub greeting_variant: GreetingVariant,
    pub store: StoreKind,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            greeting_variant: GreetingVariant::default(),
            store: StoreKind::default(),
        }
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_greeting_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories and create any that are missing. */
pub fn init_greeting_dirs(args: &GreetingArgs) -> Result<GreetingDirs> {
    // Initialize the mistrust object.
    let mistrust = get_mistrust()?;

    // Check that each path is absolute and is a directory with the
    // proper permission assign if it exists.  If it doesn't exist,
    // create it.
    let dirs = GreetingDirs::from_root(&get_root_dir(args));
    check_greeting_dir(&dirs.root_dir, "root directory", &mistrust)?;
    check_greeting_dir(&dirs.config_dir, "config directory", &mistrust)?;
    check_greeting_dir(&dirs.logs_dir, "logs directory", &mistrust)?;
    check_greeting_dir(&dirs.database_dir, "database directory", &mistrust)?;

    Ok(dirs)
}

// ---------------------------------------------------------------------------
// check_greeting_dir:
// ---------------------------------------------------------------------------
/** Check that the path is absolute and, if it exists, that is has the proper
 * permissions assigned.  If it doesn't exist, create it.  The mistrust package
 * creates directories with 0o700 permissions.
 */
fn check_greeting_dir(dir: &str, msgname: &str, mistrust: &Mistrust) -> Result<()> {
    // Get the path object.
    let path = Path::new(dir);
    if !path.is_absolute() {
        return Err(anyhow!(Errors::DirectoryError(
            format!("The {} path must be absolute: {}", msgname, dir))));
    }

    if path.exists() {
        // Make sure the path represents a directory.
        if !path.is_dir() {
            return Err(anyhow!(Errors::DirectoryError(
                format!("The {} path must be a directory: {}", msgname, dir))));
        }

        // Make sure the directory has rwx for owner only.
        let perm = path.metadata()?.permissions().mode();
        if perm & 0o777 != 0o700 {
            return Err(anyhow!(Errors::DirectoryError(
                format!("The {} path must have 0o700 permissions: {}", msgname, dir))));
        }
    } else {
        // Create the directory with the correct permissions.
        mistrust.make_directory(path).map_err(|e| {
            anyhow!(Errors::DirectoryError(format!("Make directory error for {}: {}", dir, e)))
        })?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// get_mistrust:
// ---------------------------------------------------------------------------
/** Configure a new mistrust object for initial directory processing. */
fn get_mistrust() -> Result<Mistrust> {
    Mistrust::builder()
        .ignore_prefix(get_absolute_path("~"))
        .trust_group(0)
        .build()
        .map_err(|e| anyhow!(Errors::DirectoryError(format!("Mistrust configuration error: {}", e))))
}

// ---------------------------------------------------------------------------
// get_root_dir:
// ---------------------------------------------------------------------------
fn get_root_dir(args: &GreetingArgs) -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env::var(ENV_GREETING_ROOT_DIR).unwrap_or_else(
        |_| {
            match args.root_dir.clone() {
                Some(r) => r,
                None => DEFAULT_ROOT_DIR.to_string(),
            }
        });

    // Canonicalize the path.
    get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the configuration directory's log4rs.yml if one is
 * installed, otherwise log INFO and above to the console.
 */
pub fn init_log(dirs: &GreetingDirs) -> Result<()> {
    let logconfig = dirs.config_dir.clone() + LOG4RS_CONFIG_FILE;
    if Path::new(&logconfig).exists() {
        log4rs::init_file(&logconfig, Default::default()).map_err(|e| {
            println!("{}", e);
            anyhow!(Errors::Log4rsInitialization(logconfig.clone()))
        })?;
        info!("Log4rs initialized using: {}", logconfig);
        return Ok(());
    }

    // No file, so build a console-only configuration.
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|e| anyhow!(Errors::Log4rsInitialization(e.to_string())))?;
    log4rs::init_config(config)
        .map_err(|e| anyhow!(Errors::Log4rsInitialization(e.to_string())))?;
    info!("Log4rs initialized with default console logging ({} not found).", logconfig);
    Ok(())
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config directory.  If the file cannot be read, default values are used.
 */
pub fn get_parms(dirs: &GreetingDirs) -> Result<Parms> {
    // Get the config file path from its data directory.
    let config_file = dirs.config_dir.clone() + GREETING_CONFIG_FILE;

    // Read the cofiguration file.
    let config_file_abs = get_absolute_path(&config_file);
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let contents = match fs::read_to_string(&config_file_abs) {
        Ok(c) => c,
        Err(_) => {
            info!("Unable to read configuration at {}. Using default values.", config_file);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
    };

    let config = parse_config(&contents, &config_file_abs)?;
    Ok(Parms { config_file: config_file_abs, config })
}

// ---------------------------------------------------------------------------
// parse_config:
// ---------------------------------------------------------------------------
/** Parse the toml configuration.  The path is only used in error messages. */
pub fn parse_config(contents: &str, path: &str) -> Result<Config> {
    match toml::from_str(contents) {
        Ok(c)  => Ok(c),
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(path.to_string()), e);
            error!("{}", msg);
            Err(anyhow!(msg))
        }
    }
}
