//! `{{VAR}}` template rendering

use std::path::Path;

/// File extensions that get variable substitution; everything else is
/// byte-copied untouched
const TEXT_EXTENSIONS: &[&str] = &[
    "yml", "yaml", "json", "py", "js", "php", "md", "txt", "env",
];

/// Substitution variables, applied in order
pub type RenderVars = Vec<(String, String)>;

/// Replace every `{{NAME}}` occurrence with its value
///
/// Unknown placeholders are left untouched so rendered files fail loudly in
/// review rather than silently losing content.
pub fn render(content: &str, vars: &[(String, String)]) -> String {
    let mut rendered = content.to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{{{}}}}}", name), value);
    }
    rendered
}

/// Whether a template file should be rendered as text
pub fn is_text_template(path: &Path) -> bool {
    if path.file_name().and_then(|n| n.to_str()) == Some(".env") {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| TEXT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn vars(pairs: &[(&str, &str)]) -> RenderVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_multiple_variables() {
        let out = render(
            "name={{PROJECT_NAME}} domain={{DOMAIN}}",
            &vars(&[("PROJECT_NAME", "blog"), ("DOMAIN", "blog.test")]),
        );
        assert_eq!(out, "name=blog domain=blog.test");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let out = render(
            "{{X}} and {{X}} again",
            &vars(&[("X", "value")]),
        );
        assert_eq!(out, "value and value again");
    }

    #[test]
    fn unknown_placeholders_survive() {
        let out = render("{{KNOWN}} {{UNKNOWN}}", &vars(&[("KNOWN", "yes")]));
        assert_eq!(out, "yes {{UNKNOWN}}");
    }

    #[test]
    fn text_extension_table() {
        assert!(is_text_template(&PathBuf::from("docker-compose.yml")));
        assert!(is_text_template(&PathBuf::from("index.php")));
        assert!(is_text_template(&PathBuf::from(".env")));
        assert!(!is_text_template(&PathBuf::from("logo.png")));
        assert!(!is_text_template(&PathBuf::from("binary")));
    }
}
