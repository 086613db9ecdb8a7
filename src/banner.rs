//! Banner and branding for the DevForge CLI

use console::{style, Term};

/// Display the DevForge banner
pub fn display_banner() {
    let term = Term::stdout();
    let version = env!("CARGO_PKG_VERSION");

    let banner = format!(
        r#"
██████╗ ███████╗██╗   ██╗███████╗ ██████╗ ██████╗  ██████╗ ███████╗
██╔══██╗██╔════╝██║   ██║██╔════╝██╔═══██╗██╔══██╗██╔════╝ ██╔════╝
██║  ██║█████╗  ██║   ██║█████╗  ██║   ██║██████╔╝██║  ███╗█████╗
██║  ██║██╔══╝  ╚██╗ ██╔╝██╔══╝  ██║   ██║██╔══██╗██║   ██║██╔══╝
██████╔╝███████╗ ╚████╔╝ ██║     ╚██████╔╝██║  ██║╚██████╔╝███████╗
╚═════╝ ╚══════╝  ╚═══╝  ╚═╝      ╚═════╝ ╚═╝  ╚═╝ ╚═════╝ ╚══════╝
              Development Environment Manager v{}
"#,
        version
    );

    let _ = term.write_line(&style(banner).cyan().to_string());
    let _ = term.write_line(&style("=".repeat(70)).dim().to_string());
    let _ = term.write_line("");
}

/// Display minimal banner (for quiet mode)
pub fn display_minimal_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "{}",
        style(format!("DevForge v{} - Development Environment Manager", version))
            .cyan()
            .bold()
    );
    println!("{}", style("=".repeat(70)).dim());
}
