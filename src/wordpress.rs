//! WordPress project scaffolding
//!
//! Renders the embedded WordPress stack (wordpress + mysql + phpmyadmin +
//! redis behind Traefik) into `~/sites/<domain>`, brings the containers up,
//! and optionally requests a certificate for the domain.

use crate::config::Paths;
use crate::error::Result;
use crate::ssl::SslManager;
use crate::template::render;
use crate::types::{CertKind, ServiceKind};
use crate::{docker, output, utils};
use indicatif::{ProgressBar, ProgressStyle};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const WP_VERSION: &str = "6.4";
const PHP_VERSION: &str = "8.2";
const MYSQL_VERSION: &str = "8.0";
const REDIS_VERSION: &str = "7";

/// WordPress project scaffolder
#[derive(Debug)]
pub struct WordPressScaffold {
    sites_dir: PathBuf,
}

impl WordPressScaffold {
    /// Create a scaffolder over the standard sites directory
    pub fn new(paths: &Paths) -> Self {
        Self {
            sites_dir: paths.sites_dir(),
        }
    }

    /// Create a WordPress project, returning the project path
    pub async fn create(
        &self,
        project_name: &str,
        domain: &str,
        ssl_enabled: bool,
        ssl: &SslManager,
    ) -> Result<PathBuf> {
        let project_path = self.sites_dir.join(domain);
        std::fs::create_dir_all(&project_path)?;

        let db_password = utils::generate_password(16);
        let db_root_password = utils::generate_password(16);
        let redis_password = utils::generate_password(16);

        let vars: render::RenderVars = vec![
            ("PROJECT_NAME".to_string(), project_name.to_string()),
            ("DOMAIN".to_string(), domain.to_string()),
            ("WP_VERSION".to_string(), WP_VERSION.to_string()),
            ("PHP_VERSION".to_string(), PHP_VERSION.to_string()),
            ("MYSQL_VERSION".to_string(), MYSQL_VERSION.to_string()),
            ("REDIS_VERSION".to_string(), REDIS_VERSION.to_string()),
            ("DB_PASSWORD".to_string(), db_password.clone()),
            ("DB_ROOT_PASSWORD".to_string(), db_root_password),
            ("REDIS_PASSWORD".to_string(), redis_password),
            ("WP_DEBUG".to_string(), "false".to_string()),
        ];

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("static spinner template"),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("Creating WordPress project...");

        self.write_templates(&project_path, &vars)?;
        spinner.set_message("Templates written");

        self.create_structure(&project_path)?;
        spinner.set_message("Project structure created");

        spinner.set_message("Starting Docker containers...");
        match self.start_containers(&project_path) {
            Ok(()) => spinner.set_message("Docker containers started"),
            Err(e) => {
                warn!(error = %e, "docker startup failed");
                spinner.set_message("Docker containers failed to start");
            }
        }

        if ssl_enabled {
            spinner.set_message(format!("Requesting certificate for {}...", domain));
            if let Err(e) = ssl
                .add(domain, CertKind::Letsencrypt, ServiceKind::Website, None)
                .await
            {
                warn!(domain, error = %e, "certificate setup failed");
            }
        }

        spinner.finish_and_clear();
        info!(project = project_name, domain, "wordpress project created");

        self.show_project_info(project_name, domain, &project_path, &db_password);

        Ok(project_path)
    }

    fn write_templates(&self, project_path: &PathBuf, vars: &[(String, String)]) -> Result<()> {
        let files: [(&str, &str); 6] = [
            ("docker-compose.yml", COMPOSE_TEMPLATE),
            (".env", ENV_TEMPLATE),
            ("uploads.ini", UPLOADS_INI_TEMPLATE),
            ("install-plugins.sh", INSTALL_PLUGINS_TEMPLATE),
            ("nginx.conf", NGINX_CONF_TEMPLATE),
            (".gitignore", GITIGNORE_TEMPLATE),
        ];

        for (name, template) in files {
            let path = project_path.join(name);
            std::fs::write(&path, render::render(template, vars))?;

            if name.ends_with(".sh") {
                let mut perms = std::fs::metadata(&path)?.permissions();
                perms.set_mode(0o755);
                std::fs::set_permissions(&path, perms)?;
            }
        }

        Ok(())
    }

    fn create_structure(&self, project_path: &PathBuf) -> Result<()> {
        for dir in ["wordpress", "backups", "mysql-init", "logs"] {
            std::fs::create_dir_all(project_path.join(dir))?;
        }

        std::fs::write(
            project_path.join("mysql-init").join("init.sql"),
            "-- WordPress Database Initialization
CREATE DATABASE IF NOT EXISTS wordpress;
GRANT ALL PRIVILEGES ON wordpress.* TO 'wordpress'@'%';
FLUSH PRIVILEGES;
",
        )?;

        Ok(())
    }

    fn start_containers(&self, project_path: &PathBuf) -> Result<()> {
        docker::compose_pull(project_path)?;
        docker::compose_up(project_path)
    }

    fn show_project_info(
        &self,
        project_name: &str,
        domain: &str,
        project_path: &PathBuf,
        db_password: &str,
    ) {
        let body = format!(
            "Project Details:
• Name: {name}
• Domain: {domain}
• Path: {path}

Access URLs:
• WordPress: https://{domain} (or http://{domain})
• Admin: https://{domain}/wp-admin
• phpMyAdmin: https://pma.{domain}

Database Credentials:
• Database: wordpress
• Username: wordpress
• Password: {password}

Next Steps:
1. Visit https://{domain} to complete WordPress setup
2. Run: cd {path} && ./install-plugins.sh
3. Configure your WordPress admin account",
            name = project_name,
            domain = domain,
            path = project_path.display(),
            password = db_password,
        );
        output::panel("WordPress Ready", &body);
    }
}

const COMPOSE_TEMPLATE: &str = r#"version: '3.8'

services:
  wordpress:
    image: wordpress:{{WP_VERSION}}-php{{PHP_VERSION}}-apache
    container_name: {{PROJECT_NAME}}-wordpress
    restart: unless-stopped
    environment:
      WORDPRESS_DB_HOST: db
      WORDPRESS_DB_USER: wordpress
      WORDPRESS_DB_PASSWORD: {{DB_PASSWORD}}
      WORDPRESS_DB_NAME: wordpress
      WORDPRESS_CONFIG_EXTRA: |
        define('WP_DEBUG', {{WP_DEBUG}});
        define('WP_DEBUG_LOG', {{WP_DEBUG}});
        define('FORCE_SSL_ADMIN', true);
        if ($$_SERVER['HTTP_X_FORWARDED_PROTO'] == 'https') {
          $$_SERVER['HTTPS'] = 'on';
        }
        define('WP_REDIS_HOST', 'redis');
        define('WP_REDIS_PORT', 6379);
        define('WP_REDIS_PASSWORD', '{{REDIS_PASSWORD}}');
    volumes:
      - ./wordpress:/var/www/html
      - ./uploads.ini:/usr/local/etc/php/conf.d/uploads.ini
    networks:
      - wordpress-network
      - proxy
    labels:
      - "traefik.enable=true"
      - "traefik.http.routers.{{PROJECT_NAME}}.rule=Host(`{{DOMAIN}}`)"
      - "traefik.http.routers.{{PROJECT_NAME}}.tls=true"
      - "traefik.http.routers.{{PROJECT_NAME}}.tls.certresolver=letsencrypt"
      - "traefik.http.services.{{PROJECT_NAME}}.loadbalancer.server.port=80"
      - "traefik.docker.network=proxy"
    depends_on:
      - db
      - redis

  db:
    image: mysql:{{MYSQL_VERSION}}
    container_name: {{PROJECT_NAME}}-db
    restart: unless-stopped
    environment:
      MYSQL_DATABASE: wordpress
      MYSQL_USER: wordpress
      MYSQL_PASSWORD: {{DB_PASSWORD}}
      MYSQL_ROOT_PASSWORD: {{DB_ROOT_PASSWORD}}
    volumes:
      - db_data:/var/lib/mysql
      - ./mysql-init:/docker-entrypoint-initdb.d
    networks:
      - wordpress-network
    command: '--default-authentication-plugin=mysql_native_password'

  phpmyadmin:
    image: phpmyadmin/phpmyadmin:latest
    container_name: {{PROJECT_NAME}}-phpmyadmin
    restart: unless-stopped
    environment:
      PMA_HOST: db
      PMA_USER: wordpress
      PMA_PASSWORD: {{DB_PASSWORD}}
      UPLOAD_LIMIT: 100M
    networks:
      - wordpress-network
      - proxy
    labels:
      - "traefik.enable=true"
      - "traefik.http.routers.{{PROJECT_NAME}}-pma.rule=Host(`pma.{{DOMAIN}}`)"
      - "traefik.http.routers.{{PROJECT_NAME}}-pma.tls=true"
      - "traefik.http.routers.{{PROJECT_NAME}}-pma.tls.certresolver=letsencrypt"
      - "traefik.http.services.{{PROJECT_NAME}}-pma.loadbalancer.server.port=80"
    depends_on:
      - db

  redis:
    image: redis:{{REDIS_VERSION}}-alpine
    container_name: {{PROJECT_NAME}}-redis
    restart: unless-stopped
    command: redis-server --appendonly yes --requirepass {{REDIS_PASSWORD}}
    volumes:
      - redis_data:/data
    networks:
      - wordpress-network

networks:
  wordpress-network:
    driver: bridge
  proxy:
    external: true

volumes:
  db_data:
  redis_data:
"#;

const ENV_TEMPLATE: &str = r#"# WordPress Configuration
PROJECT_NAME={{PROJECT_NAME}}
DOMAIN={{DOMAIN}}
WP_VERSION={{WP_VERSION}}
PHP_VERSION={{PHP_VERSION}}
MYSQL_VERSION={{MYSQL_VERSION}}
REDIS_VERSION={{REDIS_VERSION}}

# Security
DB_PASSWORD={{DB_PASSWORD}}
DB_ROOT_PASSWORD={{DB_ROOT_PASSWORD}}
REDIS_PASSWORD={{REDIS_PASSWORD}}

# WordPress Settings
WP_DEBUG={{WP_DEBUG}}

# SSL Settings
SSL_ENABLED=true
FORCE_SSL=true
"#;

const UPLOADS_INI_TEMPLATE: &str = r#"file_uploads = On
memory_limit = 512M
upload_max_filesize = 100M
post_max_size = 100M
max_execution_time = 300
max_input_vars = 3000
max_input_time = 300
"#;

const INSTALL_PLUGINS_TEMPLATE: &str = r#"#!/bin/bash
# WordPress plugin installation script

set -euo pipefail

CONTAINER_NAME="{{PROJECT_NAME}}-wordpress"

# Essential plugins
PLUGINS=(
    "redis-cache"
    "wordfence"
    "updraftplus"
    "wp-super-cache"
    "yoast-seo"
    "elementor"
    "contact-form-7"
    "akismet"
    "wp-optimize"
    "duplicate-post"
)

echo "Installing WordPress plugins..."

# Wait for WordPress to be ready
echo "Waiting for WordPress to be ready..."
sleep 30

for plugin in "${PLUGINS[@]}"; do
    echo "Installing: $plugin"
    docker exec $CONTAINER_NAME wp plugin install $plugin --activate --allow-root || echo "Failed to install $plugin"
done

# Configure Redis
echo "Configuring Redis cache..."
docker exec $CONTAINER_NAME wp config set WP_REDIS_HOST "redis" --allow-root
docker exec $CONTAINER_NAME wp config set WP_REDIS_PORT 6379 --allow-root
docker exec $CONTAINER_NAME wp config set WP_REDIS_PASSWORD "{{REDIS_PASSWORD}}" --allow-root
docker exec $CONTAINER_NAME wp redis enable --allow-root || echo "Redis configuration failed"

# Set basic WordPress settings
echo "Configuring WordPress settings..."
docker exec $CONTAINER_NAME wp option update blogname "{{PROJECT_NAME}}" --allow-root || echo "Failed to set blog name"
docker exec $CONTAINER_NAME wp option update siteurl "https://{{DOMAIN}}" --allow-root || echo "Failed to set site URL"
docker exec $CONTAINER_NAME wp option update home "https://{{DOMAIN}}" --allow-root || echo "Failed to set home URL"

# Configure permalinks
docker exec $CONTAINER_NAME wp rewrite structure '/%postname%/' --allow-root || echo "Failed to set permalinks"

echo "WordPress setup complete!"
echo "Site: https://{{DOMAIN}}"
echo "Database: https://pma.{{DOMAIN}}"
echo ""
echo "Next steps:"
echo "1. Visit https://{{DOMAIN}} to complete WordPress installation"
echo "2. Create your admin user account"
echo "3. Configure your site settings"
"#;

const NGINX_CONF_TEMPLATE: &str = r#"# WordPress optimized Nginx configuration
server {
    listen 80;
    server_name {{DOMAIN}} www.{{DOMAIN}};
    root /var/www/html;
    index index.php index.html;

    # Security headers
    add_header X-Frame-Options "SAMEORIGIN" always;
    add_header X-XSS-Protection "1; mode=block" always;
    add_header X-Content-Type-Options "nosniff" always;
    add_header Referrer-Policy "no-referrer-when-downgrade" always;
    add_header Content-Security-Policy "default-src 'self' http: https: data: blob: 'unsafe-inline'" always;

    # Gzip compression
    gzip on;
    gzip_vary on;
    gzip_min_length 1024;
    gzip_types
        application/atom+xml
        application/javascript
        application/json
        application/rss+xml
        application/vnd.ms-fontobject
        application/x-font-ttf
        application/x-web-app-manifest+json
        application/xhtml+xml
        application/xml
        font/opentype
        image/svg+xml
        image/x-icon
        text/css
        text/plain
        text/x-component;

    # Cache static files
    location ~* \.(jpg|jpeg|png|gif|ico|css|js|pdf|txt)$ {
        expires 1y;
        add_header Cache-Control "public, immutable";
    }

    # WordPress security
    location = /favicon.ico {
        log_not_found off;
        access_log off;
    }

    location = /robots.txt {
        log_not_found off;
        access_log off;
        allow all;
    }

    location ~* /(?:uploads|files)/.*\.php$ {
        deny all;
    }

    location ~ /\. {
        deny all;
    }

    location ~ ~$ {
        deny all;
    }

    # WordPress permalinks
    location / {
        try_files $uri $uri/ /index.php?$args;
    }

    # PHP processing
    location ~ \.php$ {
        try_files $uri =404;
        fastcgi_split_path_info ^(.+\.php)(/.+)$;
        fastcgi_pass wordpress:9000;
        fastcgi_index index.php;
        include fastcgi_params;
        fastcgi_param SCRIPT_FILENAME $document_root$fastcgi_script_name;
        fastcgi_param PATH_INFO $fastcgi_path_info;

        # WordPress specific
        fastcgi_param HTTP_PROXY "";
        fastcgi_buffers 16 16k;
        fastcgi_buffer_size 32k;
        fastcgi_read_timeout 300;
    }
}
"#;

const GITIGNORE_TEMPLATE: &str = r#"# WordPress
/wordpress/wp-config.php
/wordpress/wp-content/uploads/
/wordpress/wp-content/cache/
/wordpress/wp-content/upgrade/
/wordpress/wp-content/backup-db/
/wordpress/wp-content/advanced-cache.php
/wordpress/wp-content/wp-cache-config.php
/wordpress/wp-content/blogs.dir/
/wordpress/wp-content/debug.log

# Environment files
.env
.env.local
.env.*.local

# Docker
docker-compose.override.yml

# Logs
logs/
*.log

# Backups
backups/
*.sql
*.zip

# OS
.DS_Store
.DS_Store?
._*
.Spotlight-V100
.Trashes
ehthumbs.db
Thumbs.db

# IDE
.vscode/
.idea/
*.swp
*.swo

# Database
db_data/
mysql_data/
redis_data/
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_template_renders_domain_and_passwords() {
        let vars = vec![
            ("PROJECT_NAME".to_string(), "blog".to_string()),
            ("DOMAIN".to_string(), "blog.example.com".to_string()),
            ("WP_VERSION".to_string(), "6.4".to_string()),
            ("PHP_VERSION".to_string(), "8.2".to_string()),
            ("MYSQL_VERSION".to_string(), "8.0".to_string()),
            ("REDIS_VERSION".to_string(), "7".to_string()),
            ("DB_PASSWORD".to_string(), "dbpass".to_string()),
            ("DB_ROOT_PASSWORD".to_string(), "rootpass".to_string()),
            ("REDIS_PASSWORD".to_string(), "redispass".to_string()),
            ("WP_DEBUG".to_string(), "false".to_string()),
        ];

        let compose = render::render(COMPOSE_TEMPLATE, &vars);
        assert!(compose.contains("image: wordpress:6.4-php8.2-apache"));
        assert!(compose.contains("container_name: blog-wordpress"));
        assert!(compose.contains("Host(`blog.example.com`)"));
        assert!(compose.contains("Host(`pma.blog.example.com`)"));
        assert!(compose.contains("MYSQL_ROOT_PASSWORD: rootpass"));
        assert!(compose.contains("--requirepass redispass"));
        assert!(!compose.contains("{{DB_PASSWORD}}"));
    }

    #[test]
    fn plugin_script_targets_project_container() {
        let vars = vec![
            ("PROJECT_NAME".to_string(), "blog".to_string()),
            ("DOMAIN".to_string(), "blog.example.com".to_string()),
            ("REDIS_PASSWORD".to_string(), "redispass".to_string()),
        ];

        let script = render::render(INSTALL_PLUGINS_TEMPLATE, &vars);
        assert!(script.contains("CONTAINER_NAME=\"blog-wordpress\""));
        assert!(script.contains("siteurl \"https://blog.example.com\""));
    }
}
