use crate::cli::Args;
use crate::image_reference::ImageReference;
use crate::secret_string::SecretString;
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, path::Path};
use tracing::info;

pub const USAGE: &str = "usage: latest-tag-poller --registry=name --repository=name --image=name --user=name --pw=password";

const DEFAULT_INDEX_URL: &str = "https://index.docker.io";
const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug)]
pub struct Config {
    /// Registry host queried directly over http, bypassing the index
    pub registry: Option<String>,
    pub image: ImageReference,
    pub container_id: Option<String>,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
    pub docker_socket: PathBuf,
    pub index_url: Url,
    pub tls: Tls,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tls {
    #[serde(default)]
    pub ca_certificate_paths: Vec<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub registry: Option<String>,
    pub repository: Option<String>,
    pub image: Option<String>,
    pub container_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub timeout_seconds: Option<u64>,
    pub docker_socket: Option<PathBuf>,
    pub index_url: Option<String>,
    #[serde(default)]
    pub tls: Tls,
}

impl Config {
    /// Merges command line / environment values over the optional config file.
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_config(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    fn merge(args: Args, file: FileConfig) -> Result<Self> {
        let repository = pick(args.repository, file.repository);
        let image = pick(args.image, file.image);
        let (Some(repository), Some(image)) = (repository, image) else {
            anyhow::bail!(USAGE);
        };
        let image = ImageReference::new(&repository, &image).context("Invalid image reference")?;

        let username = pick(args.user, file.username);
        let password = args
            .pw
            .map(SecretString::new)
            .filter(|pw| !pw.is_empty())
            .or(file.password.filter(|pw| !pw.is_empty()));
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        let index_url = pick(args.index_url, file.index_url)
            .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string());
        let index_url = Url::parse(&index_url)
            .with_context(|| format!("Invalid index URL: {}", index_url))?;

        let timeout_seconds = args
            .timeout
            .or(file.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Ok(Config {
            registry: pick(args.registry, file.registry),
            image,
            container_id: pick(args.container_id, file.container_id),
            credentials,
            timeout: Duration::from_secs(timeout_seconds),
            docker_socket: args
                .docker_socket
                .or(file.docker_socket)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCKER_SOCKET)),
            index_url,
            tls: file.tls,
        })
    }
}

/// An empty value counts as unset, so an empty flag falls through to the file.
fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.is_empty())
        .or(fallback.filter(|v| !v.is_empty()))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    info!("Loading config from file {}", path.as_ref().display());
    let yaml_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

    let expanded = expand_env_vars(&yaml_str)?;

    let config = serde_yaml_ng::from_str(&expanded)
        .context("Failed to parse YAML config after environment variable expansion")?;

    Ok(config)
}

/// Replaces `${VAR}` placeholders with environment variables values.
/// Returns an error if any env var is missing or regex fails.
fn expand_env_vars(input: &str) -> Result<String> {
    let re =
        Regex::new(r"\$\{([^}]+)}").context("Invalid regex pattern for env var substitution")?;

    if let Some(missing) = re
        .captures_iter(input)
        .map(|caps| caps[1].to_string())
        .find(|var_name| env::var(var_name).is_err())
    {
        anyhow::bail!("Missing environment variable: {}", missing);
    }

    let result = re.replace_all(input, |caps: &regex::Captures| {
        env::var(&caps[1]).unwrap_or_default()
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn args(repository: &str, image: &str) -> Args {
        Args {
            repository: Some(repository.to_string()),
            image: Some(image.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_expand_env_vars_success() {
        unsafe {
            env::set_var("POLLER_TEST_VAR", "value123");
        }
        let input = "This is a test: ${POLLER_TEST_VAR}";
        let expanded = expand_env_vars(input).expect("Expansion should succeed");
        assert_eq!(expanded, "This is a test: value123");
        unsafe {
            env::remove_var("POLLER_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_var() {
        let input = "This will fail: ${POLLER_MISSING_VAR}";
        let err = expand_env_vars(input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: POLLER_MISSING_VAR"
        );
    }

    #[test]
    fn test_expand_env_vars_multiple_vars() {
        unsafe {
            env::set_var("POLLER_VAR1", "foo");
            env::set_var("POLLER_VAR2", "bar");
        }
        let input = "${POLLER_VAR1} and ${POLLER_VAR2}";
        let expanded = expand_env_vars(input).expect("Expansion should succeed");
        assert_eq!(expanded, "foo and bar");
        unsafe {
            env::remove_var("POLLER_VAR1");
            env::remove_var("POLLER_VAR2");
        }
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let input = "No variables here";
        let expanded = expand_env_vars(input).expect("Expansion should succeed");
        assert_eq!(expanded, input);
    }

    #[test]
    fn test_load_config_file() {
        unsafe {
            env::set_var("POLLER_TEST_PASSWORD", "s3cret");
        }
        let yaml_content = r#"
        repository: library
        image: nginx
        containerId: abc123
        username: user
        password: ${POLLER_TEST_PASSWORD}
        timeoutSeconds: 5
        tls:
          caCertificatePaths:
            - /etc/ssl/extra.pem
        "#;

        let tmp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let path = tmp_file.path();
        fs::write(path, yaml_content).expect("Failed to write to temp file");

        let file = load_config(path).expect("Should load config");
        unsafe {
            env::remove_var("POLLER_TEST_PASSWORD");
        }

        assert_eq!(file.repository.as_deref(), Some("library"));
        assert_eq!(file.container_id.as_deref(), Some("abc123"));
        assert_eq!(file.password.as_ref().unwrap().expose_secret(), "s3cret");
        assert_eq!(file.timeout_seconds, Some(5));
        assert_eq!(
            file.tls.ca_certificate_paths,
            vec![PathBuf::from("/etc/ssl/extra.pem")]
        );

        let config = Config::merge(Args::default(), file).expect("Should merge config");
        assert_eq!(config.image.to_string(), "library/nginx");
        assert_eq!(config.timeout, Duration::from_secs(5));
        let credentials = config.credentials.expect("Credentials should be set");
        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password.expose_secret(), "s3cret");
    }

    #[test]
    fn test_merge_defaults() {
        let config = Config::merge(args("library", "nginx"), FileConfig::default()).unwrap();

        assert_eq!(config.registry, None);
        assert_eq!(config.container_id, None);
        assert!(config.credentials.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.docker_socket, PathBuf::from("/var/run/docker.sock"));
        assert_eq!(config.index_url.as_str(), "https://index.docker.io/");
    }

    #[test]
    fn test_merge_command_line_wins_over_file() {
        let file = FileConfig {
            registry: Some("file.registry:5000".to_string()),
            repository: Some("fileorg".to_string()),
            image: Some("fileimage".to_string()),
            ..Default::default()
        };
        let args = Args {
            registry: Some("cli.registry:5000".to_string()),
            image: Some("cliimage".to_string()),
            ..Default::default()
        };

        let config = Config::merge(args, file).unwrap();
        assert_eq!(config.registry.as_deref(), Some("cli.registry:5000"));
        assert_eq!(config.image.to_string(), "fileorg/cliimage");
    }

    #[test]
    fn test_merge_empty_registry_means_index() {
        let mut args = args("library", "nginx");
        args.registry = Some(String::new());

        let config = Config::merge(args, FileConfig::default()).unwrap();
        assert_eq!(config.registry, None);
    }

    #[test]
    fn test_merge_requires_repository_and_image() {
        let err = Config::merge(
            Args {
                repository: Some("library".to_string()),
                ..Default::default()
            },
            FileConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), USAGE);

        let err = Config::merge(args("", "nginx"), FileConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), USAGE);
    }

    #[test]
    fn test_merge_credentials_need_both_parts() {
        let mut only_user = args("library", "nginx");
        only_user.user = Some("alice".to_string());
        only_user.pw = Some(String::new());
        let config = Config::merge(only_user, FileConfig::default()).unwrap();
        assert!(config.credentials.is_none());

        let mut both = args("library", "nginx");
        both.user = Some("alice".to_string());
        both.pw = Some("secret".to_string());
        let config = Config::merge(both, FileConfig::default()).unwrap();
        let credentials = config.credentials.unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password.expose_secret(), "secret");
    }

    #[test]
    fn test_merge_rejects_invalid_index_url() {
        let mut args = args("library", "nginx");
        args.index_url = Some("not a url".to_string());
        assert!(Config::merge(args, FileConfig::default()).is_err());
    }
}
