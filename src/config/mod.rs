use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub engine: EngineConfig,
    pub template_dir: PathBuf,
    /// Served under `/static`. The bundled page needs nothing from it; assets are
    /// supplied by the deployment, and a missing directory answers 404.
    pub static_dir: PathBuf,
}

/// How to launch the external chart engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub program: String,
    /// Arguments placed before the per-request arguments, e.g. the script path.
    pub base_args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            base_args: vec!["bazi.py".to_string()],
            working_dir: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let engine_defaults = EngineConfig::default();
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            engine: EngineConfig {
                program: env::var("ENGINE_PROGRAM").unwrap_or(engine_defaults.program),
                base_args: env::var("ENGINE_ARGS")
                    .map(|args| args.split_whitespace().map(str::to_string).collect())
                    .unwrap_or(engine_defaults.base_args),
                working_dir: env::var("ENGINE_WORKDIR").ok().map(PathBuf::from),
                timeout: env::var("ENGINE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|secs| secs.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(engine_defaults.timeout),
            },
            template_dir: env::var("TEMPLATE_DIR")
                .unwrap_or_else(|_| "templates".to_string())
                .into(),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
        }
    }
}
