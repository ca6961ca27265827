use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;

/// Ask whether to open the donate pages. Anything but `y`/`yes` is a no.
pub fn confirm_open() -> Result<bool> {
    print!(
        "{} Want to open these {} in your {}? 🦄 [y/N] ",
        "?".green(),
        "donate pages".cyan(),
        "web browser".magenta()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Open every link in the default browser. A link that fails to open is
/// reported and the rest are still tried.
pub fn open_donate_links(links: &[String]) {
    for link in links {
        if let Err(err) = open::that(link) {
            eprintln!("  {} Failed to open {}: {}", "✗".red(), link, err);
        }
    }
    println!("\n{} 🌟", "You are awesome!".yellow().bold());
}
