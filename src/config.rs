use std::path::PathBuf;

use crate::errors::{DeskPilotError, DeskPilotResult};

const DEFAULT_COMPUTER_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_COORDS_FILE: &str = "anchors.toml";

/// Full daemon configuration, sourced from the environment. A `.env` file
/// is honored if the entry point loaded one via `dotenvy` beforehand.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub azure: AzureConfig,
    /// Base URL of the desktop-control backend.
    pub computer_url: String,
    /// Number of cooperative worker loops sharing the task queue.
    pub workers: usize,
    /// Per-task ceiling on perception-loop iterations.
    pub max_iterations: u32,
    /// How many screenshots to retain per run (0 = unlimited).
    pub max_recent_images: usize,
    pub trajectory_dir: PathBuf,
}

/// Credentials and routing for the Azure OpenAI decision service.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
}

impl AzureConfig {
    pub fn from_env() -> DeskPilotResult<Self> {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> DeskPilotResult<Self> {
        Ok(Self {
            endpoint: required(lookup, "AZURE_OPENAI_ENDPOINT")?,
            api_key: required(lookup, "AZURE_OPENAI_KEY")?,
            deployment: required(lookup, "AZURE_OPENAI_DEPLOYMENT")?,
        })
    }
}

impl DaemonConfig {
    pub fn from_env() -> DeskPilotResult<Self> {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> DeskPilotResult<Self> {
        let config = Self {
            azure: AzureConfig::from_lookup(lookup)?,
            computer_url: lookup("DESKPILOT_COMPUTER_URL")
                .unwrap_or_else(|| DEFAULT_COMPUTER_URL.to_string()),
            workers: parsed(lookup, "DESKPILOT_WORKERS", 1)?,
            max_iterations: parsed(lookup, "DESKPILOT_MAX_ITERATIONS", 15)?,
            max_recent_images: parsed(lookup, "DESKPILOT_MAX_RECENT_IMAGES", 3)?,
            trajectory_dir: lookup("DESKPILOT_TRAJECTORY_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("trajectories")),
        };
        if config.workers == 0 {
            return Err(DeskPilotError::Config(
                "DESKPILOT_WORKERS must be at least 1".into(),
            ));
        }
        tracing::info!(
            workers = config.workers,
            max_iterations = config.max_iterations,
            computer_url = %config.computer_url,
            trajectory_dir = %config.trajectory_dir.display(),
            "configuration loaded"
        );
        Ok(config)
    }
}

/// Backend URL for entry points that never touch the decision service.
pub fn computer_url() -> String {
    std::env::var("DESKPILOT_COMPUTER_URL").unwrap_or_else(|_| DEFAULT_COMPUTER_URL.to_string())
}

/// Location of the persisted coordinate map.
pub fn coords_file() -> PathBuf {
    std::env::var("DESKPILOT_COORDS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_COORDS_FILE))
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn required(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> DeskPilotResult<String> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            DeskPilotError::Config(format!("required environment variable {name} is not set"))
        })
}

fn parsed<T>(lookup: &dyn Fn(&str) -> Option<String>, name: &str, default: T) -> DeskPilotResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DeskPilotError::Config(format!("invalid {name}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_KEY", "secret"),
            ("AZURE_OPENAI_DEPLOYMENT", "computer-use-preview"),
        ]
    }

    #[test]
    fn missing_required_var_is_fatal() {
        let lookup = vars(&[("AZURE_OPENAI_ENDPOINT", "https://x")]);
        let err = AzureConfig::from_lookup(&lookup).unwrap_err();
        assert!(matches!(err, DeskPilotError::Config(_)));
        assert!(err.to_string().contains("AZURE_OPENAI_KEY"));
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let lookup = vars(&full_env());
        let config = DaemonConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.workers, 1);
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.max_recent_images, 3);
        assert_eq!(config.computer_url, DEFAULT_COMPUTER_URL);
        assert_eq!(config.trajectory_dir, PathBuf::from("trajectories"));
    }

    #[test]
    fn invalid_numeric_var_is_fatal() {
        let mut pairs = full_env();
        pairs.push(("DESKPILOT_WORKERS", "two"));
        let lookup = vars(&pairs);
        assert!(DaemonConfig::from_lookup(&lookup).is_err());
    }

    #[test]
    fn zero_workers_rejected() {
        let mut pairs = full_env();
        pairs.push(("DESKPILOT_WORKERS", "0"));
        let lookup = vars(&pairs);
        assert!(DaemonConfig::from_lookup(&lookup).is_err());
    }
}
