//! Constants shared by the library and the server binary

/// Default home directory when `VANTAGE_HOME` is not set
pub const DEFAULT_HOME_DIR: &str = "data";
/// Environment variable selecting the home directory
pub const HOME_DIR_ENV: &str = "VANTAGE_HOME";
/// Environment variable overriding the recommended client version
pub const RECOMMENDED_VERSION_ENV: &str = "VANTAGE_RECOMMENDED_VERSION";

/// Optional config file inside the home directory
pub const CONFIG_FILENAME: &str = "config.toml";
/// Registered accounts, inside the home directory
pub const ACCOUNTS_FILENAME: &str = "accounts.json";
/// Lock file serializing writers of `accounts.json` across processes
pub const ACCOUNTS_LOCK_FILENAME: &str = "accounts.lock";

pub const EXPERIMENTS_DIR: &str = "experiments";
pub const RESULTS_DIR: &str = "results";
pub const LOGS_DIR: &str = "logs";
/// Uploads are written here first, then renamed into the client's directory
pub const STAGING_DIR: &str = ".staging";

pub const DEFAULT_RECOMMENDED_VERSION: &str = "1.0.0";
/// 64 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;
pub const DEFAULT_CLIENT_REQUEST_TIMEOUT_SECS: u64 = 5;
/// Grace period for in-flight requests when the server stops
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Realm advertised in `WWW-Authenticate` challenges
pub const AUTH_REALM: &str = "vantage";

/// Multipart field carrying a result file
pub const RESULT_FIELD: &str = "result";
/// Multipart field carrying a log file
pub const LOG_FIELD: &str = "log";

pub const MAX_USERNAME_LEN: usize = 128;
/// Longest file name most filesystems accept
pub const MAX_FILENAME_BYTES: usize = 255;
