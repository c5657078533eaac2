//! Shared fixtures for the integration tests

use blockmerge::config::{Config, PathsConfig};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A temporary directory holding the files of one merge setup
pub struct Workspace {
    pub dir: TempDir,
    pub config: Config,
}

impl Workspace {
    /// Creates a workspace with a registry and an optional whitelist
    pub fn new(registry: &str, whitelist: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sources.txt"), registry).unwrap();
        if let Some(whitelist) = whitelist {
            std::fs::write(dir.path().join("whitelist.txt"), whitelist).unwrap();
        }

        let mut config = Config::default();
        config.paths = PathsConfig {
            sources: dir.path().join("sources.txt"),
            whitelist: dir.path().join("whitelist.txt"),
            blocklist: dir.path().join("blocklist.txt"),
            status: Some(dir.path().join("version.txt")),
        };
        config.merge.protected_keywords = vec!["trusted".to_string()];
        config.fetch.timeout_secs = 5;

        Self { dir, config }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    /// Lines of the registry file without the header
    pub fn registry_lines(&self) -> Vec<String> {
        self.read("sources.txt")
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    /// Domains of the blocklist file without the headers
    pub fn blocklist_domains(&self) -> Vec<String> {
        self.read("blocklist.txt")
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }
}

/// Serves `body` as a plain-text list at `route`
pub async fn serve_list(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/plain"),
        )
        .mount(server)
        .await;
}

/// Answers `route` with the given status and an empty body
pub async fn serve_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
