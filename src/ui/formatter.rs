//! Pure formatting functions for UI output.
//!
//! Everything here prints one or more styled lines; nothing reads input, so
//! the tool stays usable in non-interactive CI jobs.

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the commits considered for a bump, oldest first.
///
/// Shows up to 10 commits; the rest are summarized with a count.
pub fn display_commit_range(commits: &[String], base_tag: &str) {
    println!(
        "\n{}",
        style(format!("Commits since '{}'", base_tag)).bold()
    );

    if commits.is_empty() {
        println!("  (none)");
        return;
    }

    for (i, sha) in commits.iter().take(10).enumerate() {
        println!("  {}. {}", i + 1, sha);
    }

    if commits.len() > 10 {
        println!("  ... and {} more commits", commits.len() - 10);
    }
}

/// Display the proposed tag change (or initial tag).
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str, target: &str) {
    match old_tag {
        Some(old) => {
            println!("\n{}", style("Proposed Tag Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Tag:").bold());
            println!("  New tag: {}", style(new_tag).green());
        }
    }
    println!("  On:   {}", style(target).cyan());
}

/// Display a list of tags, one per line.
pub fn display_tag_list(title: &str, tags: &[String]) {
    println!("{}", style(title).bold());
    for tag in tags {
        println!("  - {}", tag);
    }
}
