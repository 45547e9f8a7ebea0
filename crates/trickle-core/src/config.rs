//! Parser configuration
//!
//! Strictness policy and header size limit, fixed when a session is built.

/// Default limit for start line plus header section (80 KiB)
pub const DEFAULT_MAX_HEADER_SIZE: usize = 80 * 1024;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Reject historically unsafe or non-conforming input
    pub strict: bool,
    /// Maximum bytes of start line plus headers per message
    pub max_header_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict: true,
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unknown methods, bare LF, and non-token header names
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Accept the wider byte set older peers send
    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    pub fn max_header_size(mut self, bytes: usize) -> Self {
        self.max_header_size = bytes;
        self
    }

    /// Set header limit in kilobytes
    pub fn max_header_kb(self, size: usize) -> Self {
        self.max_header_size(size * 1024)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert!(config.is_strict());
        assert_eq!(config.max_header_size, 80 * 1024);
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::new().lenient().max_header_kb(8);
        assert!(!config.is_strict());
        assert_eq!(config.max_header_size, 8192);

        assert!(config.strict().is_strict());
    }
}
