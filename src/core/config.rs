pub const TABLES_ENV: &str = "BLOCKGRAPH_TABLES";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// TABLE → ROW → CELL reconstruction. Off unless asked for.
    pub tables_enabled: bool,
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        Self {
            tables_enabled: is_truthy(&std::env::var(TABLES_ENV).unwrap_or_default()),
        }
    }

    pub fn with_tables(mut self, enabled: bool) -> Self {
        self.tables_enabled = enabled;
        self
    }
}

pub(crate) fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
