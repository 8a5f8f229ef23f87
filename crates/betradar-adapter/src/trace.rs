//! Leveled progress output for feed consumers
//!
//! This is the user-facing trail of the feed run (`[*] INFO:` style lines on
//! stdout), separate from `tracing` diagnostics. Levels are an ordered enum;
//! a line is emitted iff its level ranks at or above the configured minimum,
//! so ERROR lines are emitted under every configuration.

/// Trace verbosity, ordinal-ranked: `Info < Success < Warning < Error`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl TraceLevel {
    /// Parse a level name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Some(TraceLevel::Info),
            "success" => Some(TraceLevel::Success),
            "warning" => Some(TraceLevel::Warning),
            "error" => Some(TraceLevel::Error),
            _ => None,
        }
    }

    /// Line prefix for this level
    pub fn prefix(self) -> &'static str {
        match self {
            TraceLevel::Info => "[*] INFO:",
            TraceLevel::Success => "[+] SUCCESS:",
            TraceLevel::Warning => "[!] WARNING:",
            TraceLevel::Error => "[-] ERROR:",
        }
    }
}

/// Stdout trace sink with a minimum level
#[derive(Clone, Copy, Debug)]
pub struct Trace {
    min: TraceLevel,
}

impl Trace {
    pub fn new(min: TraceLevel) -> Self {
        Self { min }
    }

    /// Whether a line at `level` would be emitted
    pub fn enabled(&self, level: TraceLevel) -> bool {
        level >= self.min
    }

    pub fn emit(&self, level: TraceLevel, msg: &str) {
        if self.enabled(level) {
            println!("{} {}", level.prefix(), msg);
        }
    }

    pub fn info(&self, msg: &str) {
        self.emit(TraceLevel::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.emit(TraceLevel::Success, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.emit(TraceLevel::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.emit(TraceLevel::Error, msg);
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new(TraceLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(TraceLevel::Info < TraceLevel::Success);
        assert!(TraceLevel::Success < TraceLevel::Warning);
        assert!(TraceLevel::Warning < TraceLevel::Error);
    }

    #[test]
    fn test_enabled_matrix() {
        let info = Trace::new(TraceLevel::Info);
        assert!(info.enabled(TraceLevel::Info));
        assert!(info.enabled(TraceLevel::Error));

        let warning = Trace::new(TraceLevel::Warning);
        assert!(!warning.enabled(TraceLevel::Info));
        assert!(!warning.enabled(TraceLevel::Success));
        assert!(warning.enabled(TraceLevel::Warning));
        assert!(warning.enabled(TraceLevel::Error));
    }

    #[test]
    fn test_error_always_enabled() {
        for min in [
            TraceLevel::Info,
            TraceLevel::Success,
            TraceLevel::Warning,
            TraceLevel::Error,
        ] {
            assert!(Trace::new(min).enabled(TraceLevel::Error));
        }
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(TraceLevel::Info.prefix(), "[*] INFO:");
        assert_eq!(TraceLevel::Success.prefix(), "[+] SUCCESS:");
        assert_eq!(TraceLevel::Warning.prefix(), "[!] WARNING:");
        assert_eq!(TraceLevel::Error.prefix(), "[-] ERROR:");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(TraceLevel::from_str("info"), Some(TraceLevel::Info));
        assert_eq!(TraceLevel::from_str("SUCCESS"), Some(TraceLevel::Success));
        assert_eq!(TraceLevel::from_str("Warning"), Some(TraceLevel::Warning));
        assert_eq!(TraceLevel::from_str("error"), Some(TraceLevel::Error));
        assert_eq!(TraceLevel::from_str("debug"), None);
    }

    #[test]
    fn test_default_min_is_error() {
        let trace = Trace::default();
        assert!(!trace.enabled(TraceLevel::Warning));
        assert!(trace.enabled(TraceLevel::Error));
    }
}
