//! The backends command

use colored::Colorize;
use lithops_backends::builtin_registry;
use lithops_config::BackendKind;

use crate::error::{CliError, Result};

/// Run the backends command
pub fn run_backends(kind_filter: Option<&str>) -> Result<()> {
    let registry = builtin_registry();

    let filter = match kind_filter {
        Some("storage") => Some(BackendKind::Storage),
        Some("compute") => Some(BackendKind::Compute),
        Some("standalone") => Some(BackendKind::Standalone),
        Some(other) => {
            return Err(CliError::user(format!(
                "Unknown backend kind '{other}'. Valid: storage, compute, standalone"
            )));
        }
        None => None,
    };

    println!("{}", "Available Backends".bold());
    println!();

    let kinds = [
        (BackendKind::Storage, "Storage"),
        (BackendKind::Compute, "Compute"),
        (BackendKind::Standalone, "Standalone"),
    ];

    for (kind, label) in kinds {
        if filter.is_some_and(|f| f != kind) {
            continue;
        }

        println!("{}:", label.cyan().bold());
        for name in registry.by_kind(kind) {
            let Ok(unit) = registry.lookup(name) else {
                continue;
            };
            let provider = match unit.provider() {
                Some(link) if link.mandatory => format!("provider: {}", link.section),
                Some(link) => format!("provider: {} (optional)", link.section),
                None => "no provider".to_string(),
            };
            let section = if unit.section_mandatory() {
                "section required"
            } else {
                "section optional"
            };
            println!(
                "  {:<16} {}",
                name.green(),
                format!("{provider}, {section}").dimmed()
            );
        }
        println!();
    }

    println!(
        "{} {} backends available.",
        "Total:".dimmed(),
        registry.len()
    );

    Ok(())
}
