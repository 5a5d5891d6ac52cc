use clap::Parser;
use std::path::PathBuf;

/// Application configuration loaded from command line arguments and environment variables
#[derive(Parser, Clone, Debug)]
#[command(name = "job-board", version, about = "HTTP API over a JSON file of job postings")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Path of the JSON file holding all jobs
    /// Default: jobs.json next to the executable
    #[arg(long, env = "JOBS_FILE")]
    pub jobs_file: Option<PathBuf>,

    /// Maximum payload size for all requests (in bytes)
    /// Default: 10MB (10 * 1024 * 1024)
    #[arg(long, env = "MAX_PAYLOAD_SIZE", default_value_t = 10 * 1024 * 1024)]
    pub max_payload_size: usize,

    /// Number of pending writes the store writer will queue before callers wait
    #[arg(long, env = "WRITE_QUEUE_CAPACITY", default_value_t = 64)]
    pub write_queue_capacity: usize,

    /// Origins allowed to call the API from a browser
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:3000", "https://job-platform-blue.vercel.app"]
    )]
    pub cors_origins: Vec<String>,

    /// Directory for rotating log files
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process arguments and environment
    ///
    /// A `.env` file in the working directory is read first, so its values
    /// act as environment defaults.
    pub fn load() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::parse().validated()
    }

    fn validated(self) -> Result<Self, String> {
        if self.write_queue_capacity == 0 {
            return Err("WRITE_QUEUE_CAPACITY must be greater than zero".to_string());
        }
        Ok(self)
    }

    /// Resolve the store file path, falling back to `jobs.json` beside the executable
    pub fn jobs_file_path(&self) -> Result<PathBuf, String> {
        if let Some(path) = &self.jobs_file {
            return Ok(path.clone());
        }

        let exe = std::env::current_exe()
            .map_err(|e| format!("Failed to locate executable: {}", e))?;
        let dir = exe
            .parent()
            .ok_or_else(|| "Executable has no parent directory".to_string())?;
        Ok(dir.join("jobs.json"))
    }
}
