use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use pr_pulse::cache::CacheConfig;
use pr_pulse::fetch::FetchOptions;
use pr_pulse::github::{SearchError, StateFilter};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_RATE_LIMIT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show open/closed/merged counts (default if no subcommand)
    Stats,
    /// List pull requests with resolved merge status, newest activity first
    List {
        /// Restrict to open or closed pull requests
        #[arg(short, long)]
        state: Option<StateFilter>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Open a pull request in the browser by its index number
    Open {
        /// Index number of the PR to open (1-based, as shown in list)
        index: usize,
    },
    /// Create a config file interactively
    Init,
    /// Remove all cached responses
    CacheClear,
}

#[derive(Parser, Debug)]
#[command(name = "pr-pulse")]
#[command(about = "GitHub pull request analytics per author", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pr-pulse/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// GitHub personal access token (falls back to PR_PULSE_GH_TOKEN, then a prompt)
    #[arg(short, long, global = true)]
    token: Option<String>,

    /// GitHub username to aggregate (overrides config)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Limit every query to one repository, as owner/repo (overrides config)
    #[arg(short, long, global = true)]
    repo: Option<String>,

    /// Bypass the response cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Emit JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Map the most severe recorded failure to an exit code
fn exit_code_for(failures: &[SearchError]) -> i32 {
    if failures.iter().any(|e| matches!(e, SearchError::Auth(_))) {
        EXIT_AUTH
    } else if failures
        .iter()
        .any(|e| matches!(e, SearchError::RateLimit(_)))
    {
        EXIT_RATE_LIMIT
    } else {
        EXIT_NETWORK
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Stats);
    let start_time = Instant::now();

    // Subcommands that need no token or config defaults
    match &command {
        Commands::Init => {
            let path = cli.config.as_ref().map(PathBuf::from);
            if let Err(e) = pr_pulse::config::run_init_wizard(path) {
                eprintln!("Init failed: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::CacheClear => {
            if let Err(e) = pr_pulse::cache::clear_cache() {
                eprintln!("Failed to clear cache: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Cache cleared.");
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match pr_pulse::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let ttl = match pr_pulse::config::cache_ttl(&config) {
        Ok(ttl) => ttl,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Resolve the subject user: flag wins over config
    let username = match cli.user.or_else(|| config.username.clone()) {
        Some(u) => u,
        None => {
            eprintln!("No GitHub username given.");
            eprintln!("Pass --user <login> or run `pr-pulse init` to create a config.");
            std::process::exit(EXIT_CONFIG);
        }
    };
    let repo = cli.repo.or_else(|| config.repo.clone());

    if cli.verbose {
        eprintln!(
            "Aggregating PRs for {} ({})",
            username,
            repo.as_deref().unwrap_or("all repositories")
        );
    }

    // Resolve credential: flag, env var, then prompt
    let token = match pr_pulse::credentials::resolve_token(cli.token) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Credential error: {}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    // Create GitHub client
    let client = match pr_pulse::github::create_client(&token) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let cache_config = CacheConfig {
        enabled: !cli.no_cache,
        ttl,
    };
    let opts = FetchOptions {
        token: &token,
        username: &username,
        repo: repo.as_deref(),
        verbose: cli.verbose,
    };

    match command {
        Commands::Stats => {
            let snapshot = pr_pulse::fetch::fetch_stats(&client, &opts, &cache_config).await;

            if cli.json {
                match pr_pulse::output::format_json(&snapshot.stats) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize stats: {}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                }
            } else {
                let use_colors = pr_pulse::output::should_use_colors();
                println!(
                    "{}",
                    pr_pulse::output::format_stats(&snapshot.stats, use_colors)
                );
            }

            if cli.verbose {
                eprintln!("Done in {:?}", start_time.elapsed());
            }

            // All three sub-queries failing means the counts are pure
            // fabrication; say so through the exit code
            if snapshot.failures.len() == 3 {
                std::process::exit(exit_code_for(&snapshot.failures));
            }
        }
        Commands::List { state, tsv } => {
            let state = state.or(config.state).unwrap_or_default();
            let snapshot = pr_pulse::fetch::fetch_list(&client, &opts, state, &cache_config).await;

            if let Some(e) = &snapshot.error {
                eprintln!("Listing failed: {}", e);
                std::process::exit(exit_code_for(std::slice::from_ref(e)));
            }

            if cli.json {
                match pr_pulse::output::format_json(&snapshot.items) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize listing: {}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                }
            } else if tsv {
                println!("{}", pr_pulse::output::format_tsv(&snapshot.items));
            } else {
                let use_colors = pr_pulse::output::should_use_colors();
                println!(
                    "{}",
                    pr_pulse::output::format_pr_table(&snapshot.items, use_colors)
                );
            }

            if cli.verbose {
                eprintln!(
                    "Total: {} PRs in {:?}",
                    snapshot.items.len(),
                    start_time.elapsed()
                );
            }
        }
        Commands::Open { index } => {
            let state = config.state.unwrap_or_default();
            let snapshot = pr_pulse::fetch::fetch_list(&client, &opts, state, &cache_config).await;

            if let Some(e) = &snapshot.error {
                eprintln!("Listing failed: {}", e);
                std::process::exit(exit_code_for(std::slice::from_ref(e)));
            }

            if index < 1 || index > snapshot.items.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    snapshot.items.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let pr = &snapshot.items[index - 1];
            if let Err(e) = pr_pulse::browser::open_url(&pr.url) {
                eprintln!("Failed to open browser: {}", e);
                std::process::exit(EXIT_NETWORK);
            }

            println!("Opening PR #{} in browser: {}", pr.number, pr.url);
        }
        Commands::Init | Commands::CacheClear => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}
