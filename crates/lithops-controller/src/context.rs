//! Discovery of the controller endpoint, instance identity and token
//!
//! The platform drops two files on every managed instance: a `KEY=value`
//! context file and a token file. Both are read once, when the client is
//! built; failure here is fatal and never retried.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

pub const ENDPOINT_KEY: &str = "CONTROLLER_ENDPOINT";
pub const INSTANCE_ID_KEY: &str = "INSTANCE_ID";

/// Where to look for the controller context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSource {
    pub context_file: PathBuf,
    pub token_file: PathBuf,
    /// Environment variable overriding the endpoint from the context file
    pub endpoint_env: String,
}

impl Default for ContextSource {
    fn default() -> Self {
        Self {
            context_file: PathBuf::from("/var/run/lithops/controller.env"),
            token_file: PathBuf::from("/var/run/lithops/controller.token"),
            endpoint_env: "LITHOPS_CONTROLLER_ENDPOINT".to_string(),
        }
    }
}

/// Immutable credentials captured at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct ControllerContext {
    endpoint: String,
    instance_id: String,
    token: String,
}

impl fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerContext")
            .field("endpoint", &self.endpoint)
            .field("instance_id", &self.instance_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ControllerContext {
    pub fn new(
        endpoint: impl Into<String>,
        instance_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::context(
                ENDPOINT_KEY,
                format!("'{endpoint}' is not an http(s) URL"),
            ));
        }
        let instance_id = instance_id.into();
        if instance_id.trim().is_empty() {
            return Err(Error::context(INSTANCE_ID_KEY, "instance id is empty"));
        }
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::context("token", "token is empty"));
        }
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            instance_id,
            token,
        })
    }

    /// Read the context from `source`, honouring the endpoint override in
    /// the process environment.
    pub fn discover(source: &ContextSource) -> Result<Self> {
        Self::discover_with(source, |name| std::env::var(name).ok())
    }

    /// Like [`discover`](Self::discover) with an explicit environment lookup.
    pub fn discover_with<F>(source: &ContextSource, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = source.context_file.display().to_string();
        let content = fs::read_to_string(&source.context_file)
            .map_err(|e| Error::context(&origin, e.to_string()))?;
        let values = parse_context(&content).map_err(|message| Error::context(&origin, message))?;

        let endpoint = match env(&source.endpoint_env).filter(|v| !v.trim().is_empty()) {
            Some(endpoint) => {
                tracing::debug!(var = %source.endpoint_env, "Controller endpoint overridden by environment");
                endpoint.trim().to_string()
            }
            None => values
                .get(ENDPOINT_KEY)
                .cloned()
                .ok_or_else(|| Error::context(&origin, format!("{ENDPOINT_KEY} is not set")))?,
        };
        let instance_id = values
            .get(INSTANCE_ID_KEY)
            .cloned()
            .ok_or_else(|| Error::context(&origin, format!("{INSTANCE_ID_KEY} is not set")))?;

        let token_origin = source.token_file.display().to_string();
        let token = fs::read_to_string(&source.token_file)
            .map_err(|e| Error::context(&token_origin, e.to_string()))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::context(token_origin, "token file is empty"));
        }

        let context = Self::new(endpoint, instance_id, token)?;
        tracing::debug!(endpoint = %context.endpoint, instance = %context.instance_id, "Controller context discovered");
        Ok(context)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

/// Parse `KEY=value` lines. Blank lines and `#` comments are skipped, an
/// `export ` prefix is allowed, and matching quotes around the value are
/// stripped.
fn parse_context(content: &str) -> std::result::Result<HashMap<String, String>, String> {
    let mut values = HashMap::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            return Err(format!("line {}: expected KEY=value", index + 1));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("line {}: empty key", index + 1));
        }
        values.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    Ok(values)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
