use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

/// CLI arguments for kinship-server
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: Option<u64>,
    pub config_file: Option<PathBuf>,
    pub max_request_size: Option<usize>,
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        let matches = Self::command().get_matches();

        if matches.get_flag("help_env") {
            Self::print_env_help();
            std::process::exit(0);
        }

        Self {
            port: matches.get_one::<u16>("port").copied(),
            jwt_secret: matches.get_one::<String>("jwt_secret").cloned(),
            jwt_expiration_hours: matches.get_one::<u64>("jwt_expiration").copied(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            max_request_size: matches.get_one::<usize>("max_request_size").copied(),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }

    fn command() -> Command {
        Command::new("kinship-server")
            .version(kinship::VERSION)
            .about("HTTP API server for the Kinship social backend")
            .long_about(
                r#"Kinship Server exposes users, posts, follow and monitor relationships,
notifications and screen time restrictions over a REST API backed by SurrealDB.

The server can be configured through command line arguments or environment
variables. Command line arguments take precedence over environment variables.

Examples:
  kinship-server --port 8080
  kinship-server --config kinship.toml --log-level debug"#,
            )
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on")
                    .long_help(
                        "Port number for the HTTP server to listen on.
Environment variable: KINSHIP_PORT",
                    )
                    .value_hint(ValueHint::Other)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .long_help(
                        "Path to a TOML, YAML or JSON file with the storage, logging and
relationship collection settings of the Kinship library.
Environment variable: KINSHIP_CONFIG_FILE",
                    )
                    .value_hint(ValueHint::FilePath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("jwt_secret")
                    .long("jwt-secret")
                    .value_name("SECRET")
                    .help("JWT signing secret")
                    .long_help(
                        "Secret key used for signing login tokens. If not provided, one
will be generated on startup and all tokens are invalidated on restart.
Environment variable: KINSHIP_JWT_SECRET",
                    )
                    .value_hint(ValueHint::Other),
            )
            .arg(
                Arg::new("jwt_expiration")
                    .long("jwt-expiration")
                    .value_name("HOURS")
                    .help("Login lifetime in hours")
                    .long_help(
                        "How long tokens and their sessions remain valid.
Default is 24 hours.
Environment variable: KINSHIP_JWT_EXPIRATION_HOURS",
                    )
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("max_request_size")
                    .long("max-request-size")
                    .value_name("BYTES")
                    .help("Maximum request body size in bytes")
                    .long_help(
                        "Maximum size allowed for HTTP request bodies.
Larger requests will be rejected.
Environment variable: KINSHIP_MAX_REQUEST_SIZE",
                    )
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Logging level")
                    .long_help(
                        "Set the logging level. Valid values: error, warn, info, debug, trace
Environment variable: RUST_LOG",
                    )
                    .value_parser(["error", "warn", "info", "debug", "trace"]),
            )
            .arg(
                Arg::new("help_env")
                    .long("help-env")
                    .help("Show all environment variables")
                    .action(ArgAction::SetTrue),
            )
    }

    fn print_env_help() {
        println!("Kinship Server Environment Variables");
        println!("====================================");
        println!();
        println!("Server Configuration:");
        println!("  KINSHIP_PORT                    - Server port (default: 3000)");
        println!("  KINSHIP_MAX_REQUEST_SIZE        - Max request body size in bytes (default: 2MB)");
        println!("  KINSHIP_CONFIG_FILE             - Path to the library config file");
        println!();
        println!("Authentication:");
        println!("  KINSHIP_JWT_SECRET              - JWT signing secret (generated if not set)");
        println!("  KINSHIP_JWT_EXPIRATION_HOURS    - Login lifetime in hours (default: 24)");
        println!("  KINSHIP_PASSWORD_COST           - bcrypt work factor (default: 12)");
        println!();
        println!("Library Configuration (nested keys use a double underscore):");
        println!("  KINSHIP_STORAGE__DATA_DIR       - Data directory for embedded storage");
        println!("  KINSHIP_LOGGING__LEVEL          - Library log level");
        println!("  KINSHIP_RELATIONSHIPS__FOLLOW__RELATIONS - Follow relation collection");
        println!();
        println!("SurrealDB Configuration:");
        println!("  SURREALDB_URL                   - SurrealDB endpoint URL");
        println!("  SURREALDB_NAMESPACE             - SurrealDB namespace (default: kinship)");
        println!("  SURREALDB_DATABASE              - SurrealDB database (default: main)");
        println!("  SURREALDB_USERNAME              - SurrealDB username");
        println!("  SURREALDB_PASSWORD              - SurrealDB password");
        println!();
        println!("Logging:");
        println!("  RUST_LOG                        - Logging level (error, warn, info, debug, trace)");
        println!();
        println!("Note: Command line arguments take precedence over environment variables.");
    }
}
