//! [`TestWorkspace`]: a temporary directory for config and context files.

use lithops_config::{ConfigDocument, Format};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory with helpers to lay out configuration files and
/// control-plane context files.
///
/// # Example
///
/// ```rust
/// use lithops_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let ctx = ws.write_context("http://127.0.0.1:9", "i-1", "tok");
/// assert!(ctx.context_file.exists());
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

/// Paths written by [`TestWorkspace::write_context`].
#[derive(Debug, Clone)]
pub struct ContextFiles {
    pub context_file: PathBuf,
    pub token_file: PathBuf,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` (relative to the root) and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Render `document` in `format` into `name`.
    pub fn write_config(&self, name: &str, document: &ConfigDocument, format: Format) -> PathBuf {
        let content = document
            .render(format)
            .unwrap_or_else(|e| panic!("Could not render test document: {e}"));
        self.write(name, &content)
    }

    /// Write a controller context file and token file.
    pub fn write_context(&self, endpoint: &str, instance_id: &str, token: &str) -> ContextFiles {
        let context = format!(
            "# written by the platform\nCONTROLLER_ENDPOINT=\"{endpoint}\"\nINSTANCE_ID={instance_id}\n"
        );
        ContextFiles {
            context_file: self.write("run/controller.env", &context),
            token_file: self.write("run/controller.token", &format!("{token}\n")),
        }
    }
}
