pub mod config;
pub mod export;
pub mod session;
pub mod summary;

pub use config::SiftConfig;
pub use session::SessionState;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
    ██╗    ██╗███████╗██████╗ ███████╗██╗███████╗████████╗
    ██║    ██║██╔════╝██╔══██╗██╔════╝██║██╔════╝╚══██╔══╝
    ██║ █╗ ██║█████╗  ██████╔╝███████╗██║█████╗     ██║
    ██║███╗██║██╔══╝  ██╔══██╗╚════██║██║██╔══╝     ██║
    ╚███╔███╔╝███████╗██████╔╝███████║██║██║        ██║
     ╚══╝╚══╝ ╚══════╝╚═════╝ ╚══════╝╚═╝╚═╝        ╚═╝
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "    {}",
        "site section discovery and CSV extraction".dimmed()
    );
    println!();
}
