//! Startup banner shown once the listener is bound.

use console::style;

use lincode_types::config::ServerConfig;

const LOGO: &[&str] = &[
    r" _     _        ____          _      ",
    r"| |   (_)_ __  / ___|___   __| | ___ ",
    r"| |   | | '_ \| |   / _ \ / _` |/ _ \",
    r"| |___| | | | | |__| (_) | (_| |  __/",
    r"|_____|_|_| |_|\____\___/ \__,_|\___|",
];

/// Browser URL for the web UI.
pub fn server_url(config: &ServerConfig) -> String {
    format!("http://localhost:{}", config.port)
}

/// Print the logo, the UI address, and the active model.
pub fn print_banner(config: &ServerConfig) {
    println!();
    for line in LOGO {
        println!("  {}", style(line).green().bold());
    }
    println!();
    println!(
        "  {}",
        style("Ubuntu command-line assistant").dim()
    );
    println!();
    println!(
        "  {}  {}",
        style("Web UI:").bold(),
        style(server_url(config)).cyan()
    );
    println!(
        "  {}   {}",
        style("Model:").bold(),
        style(&config.model).dim()
    );
    println!();
    println!(
        "  {}",
        style("Press Ctrl+C to stop").dim()
    );
    println!();
}
