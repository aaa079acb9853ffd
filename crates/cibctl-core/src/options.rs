//! Global command flags

/// Flags that change how constraint commands validate and render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Accept duplicates, unknown option names and clone-child references
    pub force: bool,
    /// Replace clone/master children with their parent id
    pub autocorrect: bool,
    /// Show constraint ids in listings
    pub full: bool,
}

impl CommandOptions {
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }
}
