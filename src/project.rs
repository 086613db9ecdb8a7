//! Project inventory and container control
//!
//! Projects are directories under `~/scripts` and `~/sites` carrying a
//! `docker-compose.yml`. The shared proxy stack lives in `~/infrastructure`
//! and is scaffolded on first use.

use crate::config::Paths;
use crate::error::{Error, Result};
use crate::types::{ProjectInfo, ProjectKind, ProjectStatus};
use crate::{docker, output};
use std::path::{Path, PathBuf};
use tracing::info;

/// Compose file for the shared proxy/portainer stack
pub(crate) const INFRASTRUCTURE_COMPOSE: &str = r#"version: '3.8'

services:
  nginx-proxy-manager:
    image: 'jc21/nginx-proxy-manager:latest'
    restart: unless-stopped
    ports:
      - '81:81'
      - '443:443'
    volumes:
      - ./data:/data
      - ./letsencrypt:/etc/letsencrypt

  portainer:
    image: portainer/portainer-ce:latest
    restart: unless-stopped
    ports:
      - "9000:9000"
    volumes:
      - /var/run/docker.sock:/var/run/docker.sock
      - ./portainer:/data
"#;

/// Project inventory and lifecycle manager
#[derive(Debug)]
pub struct ProjectManager {
    scripts_dir: PathBuf,
    sites_dir: PathBuf,
    infrastructure_dir: PathBuf,
}

impl ProjectManager {
    /// Create a manager over the standard directory layout
    pub fn new(paths: &Paths) -> Self {
        Self {
            scripts_dir: paths.scripts_dir(),
            sites_dir: paths.sites_dir(),
            infrastructure_dir: paths.infrastructure_dir(),
        }
    }

    /// All projects: scripts first, then sites
    pub fn list(&self) -> Result<Vec<ProjectInfo>> {
        let mut projects = Vec::new();
        collect_projects(&self.scripts_dir, ProjectKind::Script, &mut projects)?;
        collect_projects(&self.sites_dir, ProjectKind::Website, &mut projects)?;
        Ok(projects)
    }

    /// Find a project by directory name
    pub fn find(&self, name: &str) -> Result<ProjectInfo> {
        self.list()?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProjectNotFound(name.to_string()))
    }

    /// Aggregate container status of a project
    pub fn status(&self, project: &ProjectInfo) -> ProjectStatus {
        docker::project_status(&project.path)
    }

    /// Start a project and print its access panel
    pub fn start(&self, project: &ProjectInfo) -> Result<()> {
        docker::require_daemon()?;
        docker::compose_up(&project.path)?;
        info!(project = %project.name, "containers started");

        output::panel(
            &format!("{} Ready", project.name),
            &format!(
                "{} is now running!

• Code Server: http://localhost:8080
• Application: http://localhost:3000 (or 8000)
• Project Path: {}

Useful commands:
• View logs: docker compose logs -f
• Stop: docker compose down
• Rebuild: docker compose up --build",
                project.name,
                project.path.display()
            ),
        );
        Ok(())
    }

    /// Stop a project's containers
    pub fn stop(&self, project: &ProjectInfo) -> Result<()> {
        docker::compose_down(&project.path)?;
        info!(project = %project.name, "containers stopped");
        Ok(())
    }

    /// Restart a project's containers
    pub fn restart(&self, project: &ProjectInfo) -> Result<()> {
        docker::compose_restart(&project.path)?;
        Ok(())
    }

    /// Stream a project's logs
    pub fn logs(&self, project: &ProjectInfo, follow: bool) -> Result<()> {
        docker::compose_logs(&project.path, follow)
    }

    /// Open a shell in the project's dev service
    pub fn shell(&self, project: &ProjectInfo) -> Result<()> {
        docker::compose_shell(&project.path, "dev")
    }

    /// Write the infrastructure compose file on first use
    pub fn ensure_infrastructure(&self) -> Result<()> {
        let compose = self.infrastructure_dir.join("docker-compose.yml");
        if !compose.exists() {
            std::fs::create_dir_all(&self.infrastructure_dir)?;
            std::fs::write(&compose, INFRASTRUCTURE_COMPOSE)?;
            info!(path = %compose.display(), "infrastructure compose written");
        }
        Ok(())
    }

    /// Start the shared proxy stack
    pub fn infrastructure_up(&self) -> Result<()> {
        docker::require_daemon()?;
        self.ensure_infrastructure()?;
        docker::compose_up(&self.infrastructure_dir)?;

        output::panel(
            "Infrastructure Ready",
            "Infrastructure is running!

• Nginx Proxy Manager: http://localhost:81
• Portainer: http://localhost:9000
• Code Server: http://localhost:8080",
        );
        Ok(())
    }

    /// Stop the shared proxy stack
    pub fn infrastructure_down(&self) -> Result<()> {
        docker::compose_down(&self.infrastructure_dir)
    }

    /// Status of the shared proxy stack
    pub fn infrastructure_status(&self) -> ProjectStatus {
        if !self.infrastructure_dir.join("docker-compose.yml").exists() {
            return ProjectStatus::NotCreated;
        }
        docker::project_status(&self.infrastructure_dir)
    }
}

fn collect_projects(dir: &Path, kind: ProjectKind, out: &mut Vec<ProjectInfo>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() && path.join("docker-compose.yml").exists() {
            out.push(ProjectInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                kind,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn only_compose_directories_are_projects() {
        let home = TempDir::new().unwrap();
        let paths = Paths::rooted_at(home.path());

        let blog = paths.sites_dir().join("blog.test");
        std::fs::create_dir_all(&blog).unwrap();
        std::fs::write(blog.join("docker-compose.yml"), "services: {}\n").unwrap();

        let stray = paths.sites_dir().join("notes");
        std::fs::create_dir_all(&stray).unwrap();

        let tool = paths.scripts_dir().join("tool");
        std::fs::create_dir_all(&tool).unwrap();
        std::fs::write(tool.join("docker-compose.yml"), "services: {}\n").unwrap();

        let manager = ProjectManager::new(&paths);
        let projects = manager.list().unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "tool");
        assert_eq!(projects[0].kind, ProjectKind::Script);
        assert_eq!(projects[1].name, "blog.test");
        assert_eq!(projects[1].kind, ProjectKind::Website);
    }

    #[test]
    fn infrastructure_compose_is_scaffolded_once() {
        let home = TempDir::new().unwrap();
        let paths = Paths::rooted_at(home.path());
        let manager = ProjectManager::new(&paths);

        manager.ensure_infrastructure().unwrap();
        let compose = paths.infrastructure_dir().join("docker-compose.yml");
        let content = std::fs::read_to_string(&compose).unwrap();
        assert!(content.contains("nginx-proxy-manager"));
        assert!(content.contains("portainer"));

        // A second call leaves an edited file alone.
        std::fs::write(&compose, "services: {}\n").unwrap();
        manager.ensure_infrastructure().unwrap();
        assert_eq!(std::fs::read_to_string(&compose).unwrap(), "services: {}\n");
    }
}
