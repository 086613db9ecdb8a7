//! Template discovery and project scaffolding tests

use devforge::config::Paths;
use devforge::template::TemplateManager;
use devforge::utils;
use tempfile::TempDir;

fn write_template(paths: &Paths, name: &str, manifest: &str) {
    let dir = paths.templates_dir().join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("template.yml"), manifest).unwrap();
}

#[test]
fn discovery_requires_a_manifest() {
    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());

    write_template(
        &paths,
        "laravel",
        "description: Laravel app\ntech_stack: [php, node]\nbase_overlay: php\n",
    );
    // A bare directory is not a template.
    std::fs::create_dir_all(paths.templates_dir().join("scratch")).unwrap();

    let manager = TemplateManager::new(&paths).unwrap();
    let templates = manager.discover().unwrap();

    assert_eq!(templates.len(), 1);
    assert_eq!(templates["laravel"].description, "Laravel app");
    assert_eq!(templates["laravel"].tech_stack, vec!["php", "node"]);
    assert!(manager.get("scratch").is_err());
}

#[test]
fn project_creation_renders_and_generates() {
    if !utils::command_exists("git") {
        // Scaffolding ends with git init; nothing to test without git.
        return;
    }

    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());

    write_template(
        &paths,
        "fastapi",
        "description: FastAPI service
tech_stack: [python]
base_overlay: python
ports:
  - \"8000:8000\"
environment:
  APP_ENV: development
",
    );
    let template_dir = paths.templates_dir().join("fastapi");
    std::fs::write(
        template_dir.join("main.py"),
        "APP = \"{{PROJECT_NAME}}\"  # served at {{DOMAIN}}\n",
    )
    .unwrap();
    std::fs::write(template_dir.join("logo.bin"), [0u8, 159, 146, 150]).unwrap();

    let manager = TemplateManager::new(&paths).unwrap();
    let project = manager
        .create_project("fastapi", "api", Some("api.example.com"), &[])
        .unwrap();

    assert_eq!(project, paths.sites_dir().join("api.example.com"));

    // Text files are rendered, binaries copied untouched.
    let main_py = std::fs::read_to_string(project.join("main.py")).unwrap();
    assert_eq!(main_py, "APP = \"api\"  # served at api.example.com\n");
    assert_eq!(std::fs::read(project.join("logo.bin")).unwrap(), vec![0u8, 159, 146, 150]);
    assert!(!project.join("template.yml").exists());

    // Generated compose references the overlay and the project name.
    let compose = std::fs::read_to_string(project.join("docker-compose.yml")).unwrap();
    assert!(compose.contains("overlays/python/Dockerfile"));
    assert!(compose.contains("container_name: api-dev"));
    assert!(compose.contains("8000:8000"));

    // Environment files carry project and template entries.
    let env = std::fs::read_to_string(project.join(".env")).unwrap();
    assert!(env.contains("PROJECT_NAME=api"));
    assert!(env.contains("DOMAIN=api.example.com"));
    assert!(env.contains("APP_ENV=development"));
    assert_eq!(env, std::fs::read_to_string(project.join(".env.example")).unwrap());

    // Git repository initialised with an ignore file.
    assert!(project.join(".git").exists());
    assert!(std::fs::read_to_string(project.join(".gitignore"))
        .unwrap()
        .contains("node_modules/"));
}

#[test]
fn scripts_land_under_the_scripts_directory() {
    if !utils::command_exists("git") {
        return;
    }

    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());
    write_template(&paths, "plain", "description: plain\n");

    let manager = TemplateManager::new(&paths).unwrap();
    let project = manager.create_project("plain", "helper", None, &[]).unwrap();

    assert_eq!(project, paths.scripts_dir().join("helper"));
    let env = std::fs::read_to_string(project.join(".env")).unwrap();
    assert!(env.contains("DOMAIN=helper.local"));
}

#[test]
fn version_specs_become_render_variables() {
    if !utils::command_exists("git") {
        return;
    }

    let home = TempDir::new().unwrap();
    let paths = Paths::rooted_at(home.path());
    write_template(&paths, "php-app", "description: php\nbase_overlay: php\n");
    std::fs::write(
        paths.templates_dir().join("php-app").join("README.md"),
        "Runs on PHP {{PHP_VERSION}}\n",
    )
    .unwrap();

    let manager = TemplateManager::new(&paths).unwrap();
    let project = manager
        .create_project(
            "php-app",
            "shop",
            None,
            &[("php".to_string(), "8.3".to_string())],
        )
        .unwrap();

    let readme = std::fs::read_to_string(project.join("README.md")).unwrap();
    assert_eq!(readme, "Runs on PHP 8.3\n");
}
