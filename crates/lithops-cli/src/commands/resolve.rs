//! The resolve command and configuration file lookup

use lithops_backends::builtin_registry;
use lithops_config::{ConfigDocument, GENERIC_SECTION, Resolver};
use std::path::{Path, PathBuf};

use crate::cli::{ConfigArgs, OutputFormat};
use crate::error::Result;

/// Generic-section values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub storage: Option<String>,
    pub backend: Option<String>,
    pub mode: Option<String>,
}

impl Overrides {
    fn apply(self, document: &mut ConfigDocument) {
        let pairs = [
            ("storage", self.storage),
            ("backend", self.backend),
            ("mode", self.mode),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                document.set(GENERIC_SECTION, key, value);
            }
        }
    }
}

/// Run the resolve command
pub fn run_resolve(args: &ConfigArgs, overrides: Overrides, format: OutputFormat) -> Result<()> {
    let mut document = load_document(args)?;
    overrides.apply(&mut document);

    let resolved = Resolver::new(builtin_registry()).resolve_configured(document)?;
    print!("{}", resolved.render(format.into())?);
    Ok(())
}

/// Load the configuration file, or an empty document when there is none.
pub(crate) fn load_document(args: &ConfigArgs) -> Result<ConfigDocument> {
    match locate_config(args.config.as_deref(), dirs::home_dir().as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Ok(ConfigDocument::load(&path)?)
        }
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(ConfigDocument::new())
        }
    }
}

/// An explicit path always wins, even when it does not exist, so that a
/// typo surfaces as an error. Otherwise `~/.lithops/config` when present.
fn locate_config(explicit: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = home?.join(".lithops").join("config");
    candidate.is_file().then_some(candidate)
}
