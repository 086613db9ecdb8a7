//! Project template discovery and project creation

use crate::config::Paths;
use crate::error::{Error, Result};
use crate::template::{compose, render};
use crate::utils;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

fn default_overlay() -> String {
    "base".to_string()
}

/// A template's `template.yml` manifest
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSpec {
    /// Human description shown in listings
    #[serde(default)]
    pub description: String,
    /// Technologies the template sets up
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Feature bullets shown in listings
    #[serde(default)]
    pub features: Vec<String>,
    /// Overlay directory providing the dev Dockerfile
    #[serde(default = "default_overlay")]
    pub base_overlay: String,
    /// Host:container port mappings for the dev service
    #[serde(default)]
    pub ports: Option<Vec<String>>,
    /// Extra compose services, carried into the project verbatim
    #[serde(default)]
    pub services: Option<serde_yaml::Mapping>,
    /// Extra environment entries appended to the generated .env
    #[serde(default)]
    pub environment: Option<BTreeMap<String, String>>,
}

impl Default for TemplateSpec {
    fn default() -> Self {
        Self {
            description: String::new(),
            tech_stack: Vec::new(),
            features: Vec::new(),
            base_overlay: default_overlay(),
            ports: None,
            services: None,
            environment: None,
        }
    }
}

const GITIGNORE: &str = "# Dependencies
node_modules/
vendor/
__pycache__/
*.pyc

# Environment files
.env
.env.local
.env.*.local

# Build outputs
dist/
build/
*.log

# IDE
.vscode/
.idea/

# OS
.DS_Store
Thumbs.db

# Docker
.docker/
";

/// Template discovery and project scaffolding
#[derive(Debug)]
pub struct TemplateManager {
    templates_dir: PathBuf,
    scripts_dir: PathBuf,
    sites_dir: PathBuf,
    docker_dir: PathBuf,
}

impl TemplateManager {
    /// Create a manager over the standard directory layout
    pub fn new(paths: &Paths) -> Result<Self> {
        let manager = Self {
            templates_dir: paths.templates_dir(),
            scripts_dir: paths.scripts_dir(),
            sites_dir: paths.sites_dir(),
            docker_dir: paths.docker_dir(),
        };
        std::fs::create_dir_all(&manager.templates_dir)?;
        Ok(manager)
    }

    /// Discover available templates: every directory under the templates
    /// root carrying a `template.yml`
    pub fn discover(&self) -> Result<BTreeMap<String, TemplateSpec>> {
        let mut templates = BTreeMap::new();

        if !self.templates_dir.exists() {
            return Ok(templates);
        }

        for entry in std::fs::read_dir(&self.templates_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let manifest = path.join("template.yml");
            if !manifest.exists() {
                debug!(path = %path.display(), "skipping directory without template.yml");
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let content = std::fs::read_to_string(&manifest)?;
            let spec: TemplateSpec = serde_yaml::from_str(&content)
                .map_err(|e| Error::template(&name, format!("invalid template.yml: {}", e)))?;
            templates.insert(name, spec);
        }

        Ok(templates)
    }

    /// Look up a single template by name
    pub fn get(&self, name: &str) -> Result<TemplateSpec> {
        self.discover()?
            .remove(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))
    }

    /// Create a project from a template
    ///
    /// Websites (domain given) land in `~/sites/<domain>`, scripts in
    /// `~/scripts/<name>`. Returns the project path.
    pub fn create_project(
        &self,
        template_name: &str,
        project_name: &str,
        domain: Option<&str>,
        version_specs: &[(String, String)],
    ) -> Result<PathBuf> {
        let spec = self.get(template_name)?;
        let template_dir = self.templates_dir.join(template_name);

        let project_path = match domain {
            Some(domain) => self.sites_dir.join(domain),
            None => self.scripts_dir.join(project_name),
        };
        std::fs::create_dir_all(&project_path)?;

        info!(template = template_name, project = project_name, "creating project");

        let mut vars: render::RenderVars = vec![
            ("PROJECT_NAME".to_string(), project_name.to_string()),
            (
                "DOMAIN".to_string(),
                domain
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}.local", project_name)),
            ),
            (
                "PROJECT_PATH".to_string(),
                project_path.display().to_string(),
            ),
        ];
        for (tool, version) in version_specs {
            vars.push((format!("{}_VERSION", tool.to_uppercase()), version.clone()));
        }

        self.copy_template_files(&template_dir, &project_path, &vars)?;

        let compose_yaml = compose::generate(&spec, project_name, &self.docker_dir)?;
        std::fs::write(project_path.join("docker-compose.yml"), compose_yaml)?;

        let env = env_file(&spec, project_name, domain);
        std::fs::write(project_path.join(".env"), &env)?;
        std::fs::write(project_path.join(".env.example"), &env)?;

        self.setup_git_repo(&project_path)?;

        Ok(project_path)
    }

    fn copy_template_files(
        &self,
        template_dir: &Path,
        project_path: &Path,
        vars: &[(String, String)],
    ) -> Result<()> {
        for entry in WalkDir::new(template_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.file_name().and_then(|n| n.to_str()) == Some("template.yml") {
                continue;
            }

            let rel = path
                .strip_prefix(template_dir)
                .map_err(|e| Error::parse(e.to_string()))?;
            let target = project_path.join(rel);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }

            if render::is_text_template(path) {
                let content = std::fs::read_to_string(path)?;
                std::fs::write(&target, render::render(&content, vars))?;
            } else {
                std::fs::copy(path, &target)?;
            }
        }

        Ok(())
    }

    fn setup_git_repo(&self, project_path: &Path) -> Result<()> {
        utils::run_checked_in(project_path, "git", &["init"])?;
        std::fs::write(project_path.join(".gitignore"), GITIGNORE)?;
        utils::run_checked_in(project_path, "git", &["add", "."])?;
        Ok(())
    }
}

fn env_file(spec: &TemplateSpec, project_name: &str, domain: Option<&str>) -> String {
    let mut env = format!(
        "# Project Configuration
PROJECT_NAME={project}
DOMAIN={domain}
NODE_ENV=development

# Database Configuration
DB_HOST=db
DB_PORT=3306
DB_NAME={project}
DB_USER=user
DB_PASSWORD=password

# Redis Configuration
REDIS_HOST=redis
REDIS_PORT=6379

# Code Server Configuration
CODE_SERVER_PASSWORD=devpassword
",
        project = project_name,
        domain = domain
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.local", project_name)),
    );

    if let Some(extra) = &spec.environment {
        for (key, value) in extra {
            env.push_str(&format!("{}={}\n", key, value));
        }
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_contains_project_and_template_entries() {
        let spec = TemplateSpec {
            environment: Some(BTreeMap::from([(
                "APP_DEBUG".to_string(),
                "true".to_string(),
            )])),
            ..Default::default()
        };

        let env = env_file(&spec, "blog", Some("blog.example.com"));
        assert!(env.contains("PROJECT_NAME=blog"));
        assert!(env.contains("DOMAIN=blog.example.com"));
        assert!(env.contains("DB_NAME=blog"));
        assert!(env.contains("APP_DEBUG=true"));
    }

    #[test]
    fn env_file_falls_back_to_local_domain() {
        let env = env_file(&TemplateSpec::default(), "tool", None);
        assert!(env.contains("DOMAIN=tool.local"));
    }
}
