//! Tool version tracking and Dockerfile generation
//!
//! Default versions for the supported toolchains live in
//! `~/config/versions/versions.yml`. Latest-version checks go to the public
//! registries; a failed check for one tool never fails the whole pass.

use crate::config::Paths;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-tool version table entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Default version used when the user does not pick one
    #[serde(rename = "default")]
    pub default_version: String,
    /// Versions offered in menus
    #[serde(default)]
    pub available: Vec<String>,
    /// Docker image pattern with a `{version}` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    /// Installer command pattern for framework tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer: Option<String>,
    /// PHP extensions baked into the image
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    /// Node packages installed globally
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_packages: Vec<String>,
    /// Python packages preinstalled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<String>,
    /// PHP runtime paired with framework tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub php_version: Option<String>,
    /// Node runtime paired with framework tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
}

/// Version-check preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Update defaults automatically when newer versions appear
    pub auto_update: bool,
    /// Query upstream registries for the latest versions
    pub check_latest: bool,
    /// Hours to trust a previous check
    pub cache_duration: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto_update: true,
            check_latest: true,
            cache_duration: 24,
        }
    }
}

/// The persisted version table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConfig {
    /// Tool name to table entry
    pub tools: BTreeMap<String, ToolConfig>,
    /// Check preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Version table manager
#[derive(Debug)]
pub struct VersionManager {
    config_path: PathBuf,
    config: VersionConfig,
}

impl VersionManager {
    /// Load the table from disk, writing defaults on first run
    pub fn load(paths: &Paths) -> Result<Self> {
        let config_path = paths.versions_config();

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid versions.yml: {}", e)))?
        } else {
            let config = default_config();
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&config_path, serde_yaml::to_string(&config)?)?;
            config
        };

        Ok(Self { config_path, config })
    }

    /// The full table
    pub fn config(&self) -> &VersionConfig {
        &self.config
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, serde_yaml::to_string(&self.config)?)?;
        Ok(())
    }

    /// Tool names, table order
    pub fn tools(&self) -> Vec<String> {
        self.config.tools.keys().cloned().collect()
    }

    /// Versions offered for a tool
    pub fn available_versions(&self, tool: &str) -> Vec<String> {
        self.config
            .tools
            .get(tool)
            .map(|t| t.available.clone())
            .unwrap_or_default()
    }

    /// Default version for a tool, `latest` when unknown
    pub fn default_version(&self, tool: &str) -> String {
        self.config
            .tools
            .get(tool)
            .map(|t| t.default_version.clone())
            .unwrap_or_else(|| "latest".to_string())
    }

    /// Persistently set the default version for a tool
    pub fn set_default_version(&mut self, tool: &str, version: &str) -> Result<()> {
        let entry = self
            .config
            .tools
            .get_mut(tool)
            .ok_or_else(|| Error::config(format!("Unknown tool: {}", tool)))?;
        entry.default_version = version.to_string();
        self.save()
    }

    /// Query upstream registries for the latest version of each runtime
    ///
    /// A tool whose registry is unreachable is simply absent from the result.
    pub async fn check_latest_versions(&self) -> BTreeMap<String, String> {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("devforge/", env!("CARGO_PKG_VERSION")))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "failed to build HTTP client");
                return BTreeMap::new();
            }
        };

        let mut latest = BTreeMap::new();

        match latest_php(&client).await {
            Ok(Some(version)) => {
                latest.insert("php".to_string(), version);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "php version check failed"),
        }
        match latest_node(&client).await {
            Ok(Some(version)) => {
                latest.insert("node".to_string(), version);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "node version check failed"),
        }
        match latest_python(&client).await {
            Ok(Some(version)) => {
                latest.insert("python".to_string(), version);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "python version check failed"),
        }
        match latest_wordpress(&client).await {
            Ok(Some(version)) => {
                latest.insert("wordpress".to_string(), version);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "wordpress version check failed"),
        }

        latest
    }

    /// Generate the Dockerfile for a tool at a specific version
    pub fn generate_dockerfile(&self, tool: &str, version: &str) -> Result<String> {
        let entry = self
            .config
            .tools
            .get(tool)
            .ok_or_else(|| Error::config(format!("Unknown tool: {}", tool)))?;

        match tool {
            "php" => Ok(php_dockerfile(version, entry)),
            "node" => Ok(node_dockerfile(version, entry)),
            "python" => Ok(python_dockerfile(version, entry)),
            "wordpress" => Ok(wordpress_dockerfile(version, entry)),
            other => Err(Error::config(format!(
                "No Dockerfile generator for tool: {}",
                other
            ))),
        }
    }
}

fn image_for(entry: &ToolConfig, fallback: &str, version: &str) -> String {
    entry
        .docker_image
        .as_deref()
        .unwrap_or(fallback)
        .replace("{version}", version)
}

fn php_dockerfile(version: &str, entry: &ToolConfig) -> String {
    let image = image_for(entry, "php:{version}-fpm", version);
    let extensions = entry.extensions.join(" ");

    format!(
        r#"FROM {image}

# Install system dependencies
RUN apt-get update && apt-get install -y \
    git \
    curl \
    libpng-dev \
    libonig-dev \
    libxml2-dev \
    zip \
    unzip \
    libzip-dev \
    libicu-dev \
    && rm -rf /var/lib/apt/lists/*

# Install PHP extensions
RUN docker-php-ext-configure gd --with-freetype --with-jpeg \
    && docker-php-ext-install -j$(nproc) {extensions}

# Install Composer
COPY --from=composer:latest /usr/bin/composer /usr/bin/composer

# Install code-server
RUN curl -fsSL https://code-server.dev/install.sh | sh

# Install PHP VS Code extensions
RUN code-server --install-extension bmewburn.vscode-intelephense-client \
    --install-extension xdebug.php-debug \
    --install-extension recca0120.vscode-phpunit

# Set working directory
WORKDIR /workspace

# Configure PHP
RUN echo "upload_max_filesize = 100M" >> /usr/local/etc/php/conf.d/uploads.ini \
    && echo "post_max_size = 100M" >> /usr/local/etc/php/conf.d/uploads.ini \
    && echo "memory_limit = 512M" >> /usr/local/etc/php/conf.d/memory.ini

# Expose ports
EXPOSE 9000 8080

# Start services
CMD ["sh", "-c", "php-fpm & code-server --bind-addr 0.0.0.0:8080 --auth none /workspace"]
"#
    )
}

fn node_dockerfile(version: &str, entry: &ToolConfig) -> String {
    let image = image_for(entry, "node:{version}-alpine", version);
    let packages = entry.global_packages.join(" ");

    format!(
        r#"FROM {image}

# Install system dependencies
RUN apk add --no-cache \
    git \
    curl \
    bash \
    python3 \
    make \
    g++

# Install global packages
RUN npm install -g {packages}

# Install code-server
RUN curl -fsSL https://code-server.dev/install.sh | sh

# Install Node.js VS Code extensions
RUN code-server --install-extension bradlc.vscode-tailwindcss \
    --install-extension esbenp.prettier-vscode \
    --install-extension ms-vscode.vscode-typescript-next

# Set working directory
WORKDIR /workspace

# Expose ports
EXPOSE 3000 8080

# Start services
CMD ["sh", "-c", "npm run dev & code-server --bind-addr 0.0.0.0:8080 --auth none /workspace"]
"#
    )
}

fn python_dockerfile(version: &str, entry: &ToolConfig) -> String {
    let image = image_for(entry, "python:{version}-slim", version);
    let packages = entry.packages.join(" ");

    format!(
        r#"FROM {image}

# Install system dependencies
RUN apt-get update && apt-get install -y \
    git \
    curl \
    build-essential \
    && rm -rf /var/lib/apt/lists/*

# Install Python packages
RUN pip install --no-cache-dir {packages}

# Install code-server
RUN curl -fsSL https://code-server.dev/install.sh | sh

# Install Python VS Code extensions
RUN code-server --install-extension ms-python.python \
    --install-extension ms-python.pylint \
    --install-extension ms-python.black-formatter \
    --install-extension ms-toolsai.jupyter

# Set working directory
WORKDIR /workspace

# Expose ports
EXPOSE 8000 8080

# Start services
CMD ["sh", "-c", "python -m uvicorn main:app --host 0.0.0.0 --port 8000 --reload & code-server --bind-addr 0.0.0.0:8080 --auth none /workspace"]
"#
    )
}

fn wordpress_dockerfile(version: &str, _entry: &ToolConfig) -> String {
    format!(
        r#"FROM wordpress:{version}

# Install additional PHP extensions for development
RUN apt-get update && apt-get install -y \
    git \
    curl \
    zip \
    unzip \
    && rm -rf /var/lib/apt/lists/*

# Install WP-CLI
RUN curl -O https://raw.githubusercontent.com/wp-cli/wp-cli/v2.8.1/wp-cli.phar \
    && chmod +x wp-cli.phar \
    && mv wp-cli.phar /usr/local/bin/wp

# Install code-server
RUN curl -fsSL https://code-server.dev/install.sh | sh

# Install WordPress VS Code extensions
RUN code-server --install-extension bmewburn.vscode-intelephense-client \
    --install-extension wordpresstoolbox.wordpress-toolbox

# Set working directory
WORKDIR /var/www/html

# Expose ports
EXPOSE 80 8080

# Start services
CMD ["sh", "-c", "apache2-foreground & code-server --bind-addr 0.0.0.0:8080 --auth none /var/www/html"]
"#
    )
}

#[derive(Debug, Deserialize)]
struct DockerHubTags {
    results: Vec<DockerHubTag>,
}

#[derive(Debug, Deserialize)]
struct DockerHubTag {
    name: String,
}

async fn latest_php(client: &reqwest::Client) -> Result<Option<String>> {
    let tags: DockerHubTags = client
        .get("https://registry.hub.docker.com/v2/repositories/library/php/tags?page_size=100")
        .send()
        .await?
        .json()
        .await?;

    let mut versions: Vec<(u32, u32)> = tags
        .results
        .iter()
        .filter(|tag| tag.name.contains("-fpm"))
        .filter_map(|tag| {
            let version = tag.name.split('-').next()?;
            let (major, minor) = version.split_once('.')?;
            Some((major.parse().ok()?, minor.parse().ok()?))
        })
        .collect();

    versions.sort_unstable();
    versions.dedup();
    Ok(versions.last().map(|(major, minor)| format!("{}.{}", major, minor)))
}

#[derive(Debug, Deserialize)]
struct NodeRelease {
    version: String,
}

async fn latest_node(client: &reqwest::Client) -> Result<Option<String>> {
    let releases: Vec<NodeRelease> = client
        .get("https://nodejs.org/dist/index.json")
        .send()
        .await?
        .json()
        .await?;

    Ok(releases
        .iter()
        .take(20)
        .filter_map(|release| {
            release
                .version
                .trim_start_matches('v')
                .split('.')
                .next()
                .map(str::to_string)
        })
        .next())
}

#[derive(Debug, Deserialize)]
struct GithubTag {
    name: String,
}

async fn latest_python(client: &reqwest::Client) -> Result<Option<String>> {
    let tags: Vec<GithubTag> = client
        .get("https://api.github.com/repos/python/cpython/tags")
        .send()
        .await?
        .json()
        .await?;

    let mut versions: Vec<(u32, u32)> = tags
        .iter()
        .filter_map(|tag| {
            let rest = tag.name.strip_prefix('v')?;
            let mut parts = rest.split('.');
            let major: u32 = parts.next()?.parse().ok()?;
            let minor: u32 = parts.next()?.parse().ok()?;
            // Only stable 3.x lines, not alphas of the next major.
            (major == 3 && parts.next().is_some()).then_some((major, minor))
        })
        .collect();

    versions.sort_unstable();
    versions.dedup();
    Ok(versions.last().map(|(major, minor)| format!("{}.{}", major, minor)))
}

#[derive(Debug, Deserialize)]
struct WordPressOffers {
    offers: Vec<WordPressOffer>,
}

#[derive(Debug, Deserialize)]
struct WordPressOffer {
    version: String,
}

async fn latest_wordpress(client: &reqwest::Client) -> Result<Option<String>> {
    let offers: WordPressOffers = client
        .get("https://api.wordpress.org/core/version-check/1.7/")
        .send()
        .await?
        .json()
        .await?;

    Ok(offers.offers.first().map(|offer| offer.version.clone()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in default version table
pub fn default_config() -> VersionConfig {
    let mut tools = BTreeMap::new();

    tools.insert(
        "php".to_string(),
        ToolConfig {
            default_version: "8.2".to_string(),
            available: strings(&["7.4", "8.0", "8.1", "8.2", "8.3"]),
            docker_image: Some("php:{version}-fpm".to_string()),
            installer: None,
            extensions: strings(&[
                "mysqli", "pdo_mysql", "mbstring", "xml", "curl", "zip", "gd", "bcmath", "intl",
                "opcache",
            ]),
            global_packages: Vec::new(),
            packages: Vec::new(),
            php_version: None,
            node_version: None,
        },
    );

    tools.insert(
        "node".to_string(),
        ToolConfig {
            default_version: "18".to_string(),
            available: strings(&["16", "18", "20", "latest"]),
            docker_image: Some("node:{version}-alpine".to_string()),
            installer: None,
            extensions: Vec::new(),
            global_packages: strings(&["typescript", "nodemon", "pm2", "eslint", "prettier"]),
            packages: Vec::new(),
            php_version: None,
            node_version: None,
        },
    );

    tools.insert(
        "python".to_string(),
        ToolConfig {
            default_version: "3.11".to_string(),
            available: strings(&["3.8", "3.9", "3.10", "3.11", "3.12"]),
            docker_image: Some("python:{version}-slim".to_string()),
            installer: None,
            extensions: Vec::new(),
            global_packages: Vec::new(),
            packages: strings(&["fastapi", "uvicorn", "requests", "pytest", "black", "flake8"]),
            php_version: None,
            node_version: None,
        },
    );

    tools.insert(
        "wordpress".to_string(),
        ToolConfig {
            default_version: "6.4".to_string(),
            available: strings(&["6.2", "6.3", "6.4", "latest"]),
            docker_image: Some("wordpress:{version}".to_string()),
            installer: None,
            extensions: Vec::new(),
            global_packages: Vec::new(),
            packages: Vec::new(),
            php_version: Some("8.2".to_string()),
            node_version: None,
        },
    );

    tools.insert(
        "laravel".to_string(),
        ToolConfig {
            default_version: "10".to_string(),
            available: strings(&["9", "10", "11"]),
            docker_image: None,
            installer: Some("composer create-project laravel/laravel:{version}".to_string()),
            extensions: Vec::new(),
            global_packages: Vec::new(),
            packages: Vec::new(),
            php_version: Some("8.1".to_string()),
            node_version: None,
        },
    );

    tools.insert(
        "vue".to_string(),
        ToolConfig {
            default_version: "3".to_string(),
            available: strings(&["2", "3"]),
            docker_image: None,
            installer: Some("npm create vue@{version}".to_string()),
            extensions: Vec::new(),
            global_packages: Vec::new(),
            packages: Vec::new(),
            php_version: None,
            node_version: Some("18".to_string()),
        },
    );

    tools.insert(
        "nuxt".to_string(),
        ToolConfig {
            default_version: "3".to_string(),
            available: strings(&["2", "3"]),
            docker_image: None,
            installer: Some("npx nuxi@{version} init".to_string()),
            extensions: Vec::new(),
            global_packages: Vec::new(),
            packages: Vec::new(),
            php_version: None,
            node_version: Some("18".to_string()),
        },
    );

    VersionConfig {
        tools,
        preferences: Preferences::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_all_tools() {
        let config = default_config();
        for tool in ["php", "node", "python", "wordpress", "laravel", "vue", "nuxt"] {
            assert!(config.tools.contains_key(tool), "missing {}", tool);
        }
        assert_eq!(config.tools["php"].default_version, "8.2");
        assert_eq!(config.tools["node"].default_version, "18");
        assert!(config.tools["php"].extensions.contains(&"opcache".to_string()));
    }

    #[test]
    fn php_dockerfile_substitutes_version_and_extensions() {
        let config = default_config();
        let dockerfile = php_dockerfile("8.3", &config.tools["php"]);
        assert!(dockerfile.starts_with("FROM php:8.3-fpm"));
        assert!(dockerfile.contains("docker-php-ext-install -j$(nproc) mysqli pdo_mysql"));
        assert!(dockerfile.contains("EXPOSE 9000 8080"));
    }

    #[test]
    fn node_dockerfile_lists_global_packages() {
        let config = default_config();
        let dockerfile = node_dockerfile("20", &config.tools["node"]);
        assert!(dockerfile.starts_with("FROM node:20-alpine"));
        assert!(dockerfile.contains("npm install -g typescript nodemon pm2 eslint prettier"));
    }

    #[test]
    fn wordpress_dockerfile_pins_image() {
        let config = default_config();
        let dockerfile = wordpress_dockerfile("6.4", &config.tools["wordpress"]);
        assert!(dockerfile.starts_with("FROM wordpress:6.4"));
        assert!(dockerfile.contains("wp-cli.phar"));
    }

    #[test]
    fn table_round_trips_through_yaml() {
        let config = default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: VersionConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.tools.len(), config.tools.len());
        assert_eq!(parsed.tools["laravel"].installer, config.tools["laravel"].installer);
    }
}
