//! Command-line interface for DevForge

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "devforge",
    version,
    about = "Interactive manager for Docker-based development environments",
    long_about = "DevForge scaffolds local development projects behind Docker Compose, \
                  manages TLS certificates (Let's Encrypt via Traefik or certbot, plus \
                  self-signed), tracks tool version defaults for generated Dockerfiles, \
                  and provisions remote development servers.",
    after_help = "EXAMPLES:
  # Interactive menu
  devforge

  # Create a project directly
  devforge new -t laravel -n shop -d shop.example.com
  devforge new -t python-fastapi -n mytool -V python:3.12

  # Certificates
  devforge ssl add example.com
  devforge ssl add internal.lan --cert-type self-signed
  devforge ssl list
  devforge ssl renew

  # Versions
  devforge versions list
  devforge versions set php 8.3
  devforge versions dockerfile node --output ./Dockerfile

  # Projects and infrastructure
  devforge list
  devforge project start shop.example.com
  devforge infra up

  # Remote server provisioning (as root)
  devforge server setup"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project
    New(NewArgs),

    /// List all projects
    List,

    /// Control a project's containers
    Project(ProjectCommand),

    /// Manage TLS certificates
    Ssl(SslCommand),

    /// Inspect project templates
    Template(TemplateCommand),

    /// Manage tool version defaults
    Versions(VersionsCommand),

    /// Manage dotfiles
    Dotfiles(DotfilesArgs),

    /// Control the shared proxy/portainer stack
    Infra(InfraCommand),

    /// Run a project's build targets
    Build(BuildArgs),

    /// Provision a remote development server
    Server(ServerCommand),

    /// Open the interactive menu
    Menu,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Project template
    #[arg(short, long)]
    pub template: Option<String>,

    /// Project name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Domain for website projects
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Specify versions (format: php:8.1,node:18,python:3.11)
    #[arg(short = 'V', long)]
    pub versions: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand, Debug)]
pub enum ProjectAction {
    /// Start a project's containers
    Start {
        /// Project name (directory name)
        name: String,
    },
    /// Stop a project's containers
    Stop {
        /// Project name
        name: String,
    },
    /// Restart a project's containers
    Restart {
        /// Project name
        name: String,
    },
    /// Stream a project's logs
    Logs {
        /// Project name
        name: String,
        /// Follow log output
        #[arg(short, long)]
        follow: bool,
    },
    /// Open a shell in the project's dev service
    Shell {
        /// Project name
        name: String,
    },
    /// Show container status for every project
    Status,
}

#[derive(Args, Debug)]
pub struct SslCommand {
    #[command(subcommand)]
    pub action: SslAction,
}

#[derive(Subcommand, Debug)]
pub enum SslAction {
    /// Request a certificate for a domain
    Add {
        /// Domain name
        domain: String,
        /// Certificate type: letsencrypt or self-signed
        #[arg(long, default_value = "letsencrypt")]
        cert_type: String,
        /// Service type: website, api, docker or other
        #[arg(long, default_value = "website")]
        service: String,
        /// Container name, for docker services
        #[arg(long)]
        container: Option<String>,
    },
    /// List tracked certificates
    List,
    /// Renew certificates due within the configured horizon
    Renew,
    /// Delete a certificate and its files
    Delete {
        /// Domain name
        domain: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Probe every domain and update stored statuses
    Check,
    /// Show recent renewal-log entries
    Logs {
        /// Number of entries
        #[arg(short, long, default_value_t = 50)]
        limit: u32,
    },
}

#[derive(Args, Debug)]
pub struct TemplateCommand {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List available templates
    List,
    /// Show a template's details
    Info {
        /// Template name
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct VersionsCommand {
    #[command(subcommand)]
    pub action: VersionsAction,
}

#[derive(Subcommand, Debug)]
pub enum VersionsAction {
    /// Show the version table
    List,
    /// Set the default version for a tool
    Set {
        /// Tool name (php, node, python, ...)
        tool: String,
        /// Version to make the default
        version: String,
    },
    /// Check the latest upstream versions
    Check,
    /// Generate a Dockerfile for a tool
    Dockerfile {
        /// Tool name (php, node, python, wordpress)
        tool: String,
        /// Version (defaults to the tool's default version)
        version: Option<String>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct DotfilesArgs {
    /// Sync dotfiles from the configured repository
    #[arg(long)]
    pub sync: bool,

    /// Install dotfiles (runs install.sh)
    #[arg(long)]
    pub install: bool,

    /// Commit and push local changes
    #[arg(long)]
    pub push: bool,
}

#[derive(Args, Debug)]
pub struct InfraCommand {
    #[command(subcommand)]
    pub action: InfraAction,
}

#[derive(Subcommand, Debug)]
pub enum InfraAction {
    /// Start the infrastructure stack
    Up,
    /// Stop the infrastructure stack
    Down,
    /// Show the infrastructure status
    Status,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Build target from build.yml
    #[arg(short, long, default_value = "dev")]
    pub target: String,

    /// Watch the project and run the reload command on change
    #[arg(short, long)]
    pub watch: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServerCommand {
    #[command(subcommand)]
    pub action: ServerAction,
}

#[derive(Subcommand, Debug)]
pub enum ServerAction {
    /// Run the interactive provisioning sequence (requires root)
    Setup,
}
