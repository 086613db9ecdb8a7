//! docker-compose.yml generation for template-based projects

use crate::error::Result;
use crate::template::manager::TemplateSpec;
use serde_yaml::{Mapping, Value};
use std::path::Path;

fn value_seq(items: &[String]) -> Value {
    Value::Sequence(items.iter().map(|s| Value::String(s.clone())).collect())
}

fn insert(map: &mut Mapping, key: &str, value: Value) {
    map.insert(Value::String(key.to_string()), value);
}

/// Render the compose document for a project built from a template
///
/// The `dev` service is built from the shared overlay Dockerfile; any extra
/// services declared by the template are carried over verbatim.
pub fn generate(spec: &TemplateSpec, project_name: &str, docker_dir: &Path) -> Result<String> {
    let mut services = Mapping::new();
    insert(&mut services, "dev", dev_service(spec, project_name, docker_dir));

    if let Some(extra) = &spec.services {
        for (name, service) in extra {
            services.insert(name.clone(), service.clone());
        }
    }

    let mut networks = Mapping::new();
    let mut dev_network = Mapping::new();
    insert(&mut dev_network, "driver", Value::String("bridge".to_string()));
    insert(&mut networks, "dev-network", Value::Mapping(dev_network));

    let mut root = Mapping::new();
    insert(&mut root, "version", Value::String("3.8".to_string()));
    insert(&mut root, "services", Value::Mapping(services));
    insert(&mut root, "networks", Value::Mapping(networks));
    insert(&mut root, "volumes", Value::Mapping(Mapping::new()));

    Ok(serde_yaml::to_string(&Value::Mapping(root))?)
}

fn dev_service(spec: &TemplateSpec, project_name: &str, docker_dir: &Path) -> Value {
    let mut build = Mapping::new();
    insert(
        &mut build,
        "context",
        Value::String(docker_dir.display().to_string()),
    );
    insert(
        &mut build,
        "dockerfile",
        Value::String(format!("overlays/{}/Dockerfile", spec.base_overlay)),
    );

    let ports = spec
        .ports
        .clone()
        .unwrap_or_else(|| vec!["8080:8080".to_string()]);

    let mut service = Mapping::new();
    insert(&mut service, "build", Value::Mapping(build));
    insert(
        &mut service,
        "container_name",
        Value::String(format!("{}-dev", project_name)),
    );
    insert(
        &mut service,
        "volumes",
        value_seq(&[
            ".:/workspace".to_string(),
            // Keeps the image's node_modules from being shadowed by the bind mount.
            "/workspace/node_modules".to_string(),
        ]),
    );
    insert(&mut service, "ports", value_seq(&ports));
    insert(
        &mut service,
        "environment",
        value_seq(&[
            format!("PROJECT_NAME={}", project_name),
            "NODE_ENV=development".to_string(),
        ]),
    );
    insert(&mut service, "networks", value_seq(&["dev-network".to_string()]));
    insert(
        &mut service,
        "labels",
        value_seq(&[
            "traefik.enable=true".to_string(),
            format!(
                "traefik.http.routers.{}.rule=Host(`{}.local`)",
                project_name, project_name
            ),
            format!(
                "traefik.http.services.{}.loadbalancer.server.port=8080",
                project_name
            ),
            "traefik.docker.network=dev-network".to_string(),
        ]),
    );

    Value::Mapping(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn compose_carries_project_name_and_overlay() {
        let spec = TemplateSpec {
            description: "test".to_string(),
            base_overlay: "node".to_string(),
            ports: Some(vec!["3000:3000".to_string()]),
            ..Default::default()
        };

        let yaml = generate(&spec, "blog", &PathBuf::from("/home/dev/docker")).unwrap();
        assert!(yaml.contains("container_name: blog-dev"));
        assert!(yaml.contains("overlays/node/Dockerfile"));
        assert!(yaml.contains("3000:3000"));
        assert!(yaml.contains("traefik.http.routers.blog.rule=Host(`blog.local`)"));
        assert!(yaml.contains("driver: bridge"));
    }

    #[test]
    fn template_services_are_carried_over() {
        let extra: Mapping = serde_yaml::from_str("db:\n  image: mysql:8.0\n").unwrap();
        let spec = TemplateSpec {
            services: Some(extra),
            ..Default::default()
        };

        let yaml = generate(&spec, "app", &PathBuf::from("/docker")).unwrap();
        assert!(yaml.contains("db:"));
        assert!(yaml.contains("image: mysql:8.0"));
    }
}
