//! Development toolchain installation: Node, PHP, Composer, code-server

use super::TaskOutcome;
use crate::error::Result;
use crate::server::config::SetupConfig;
use crate::utils;

const PHP_PACKAGES: &[&str] = &[
    "php8.2",
    "php8.2-cli",
    "php8.2-fpm",
    "php8.2-mysql",
    "php8.2-zip",
    "php8.2-gd",
    "php8.2-mbstring",
];

/// Install Node.js, PHP, Composer and code-server
pub fn run(_config: &SetupConfig) -> Result<TaskOutcome> {
    // Node.js from nodesource
    let node_setup = utils::capture(
        "curl",
        &["-fsSL", "https://deb.nodesource.com/setup_18.x"],
    )?;
    std::fs::write("/tmp/nodejs.sh", node_setup)?;
    utils::run_checked("bash", &["/tmp/nodejs.sh"])?;
    utils::run_checked("apt", &["install", "-y", "nodejs"])?;

    // PHP
    let mut args = vec!["install", "-y"];
    args.extend_from_slice(PHP_PACKAGES);
    utils::run_checked("apt", &args)?;

    // Composer
    let composer_installer = utils::capture("curl", &["-sS", "https://getcomposer.org/installer"])?;
    std::fs::write("/tmp/composer.php", composer_installer)?;
    utils::run_checked("php", &["/tmp/composer.php", "--install-dir=/usr/local/bin", "--filename=composer"])?;
    utils::run_checked("chmod", &["+x", "/usr/local/bin/composer"])?;

    // code-server
    let code_server = utils::capture("curl", &["-fsSL", "https://code-server.dev/install.sh"])?;
    std::fs::write("/tmp/code-server.sh", code_server)?;
    utils::run_checked("sh", &["/tmp/code-server.sh"])?;

    Ok(TaskOutcome::Done)
}
