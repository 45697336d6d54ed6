use glob::Pattern;

/// Restricts which run folders of a condition are scored
#[derive(Debug, Clone)]
pub enum RunPattern {
    /// Exact folder name
    Exact(String),
    /// Glob over the folder name (e.g., run-*)
    Glob(Pattern),
}

impl RunPattern {
    /// Parse a run pattern string
    ///
    /// Patterns containing `*`, `?` or `[` are globs; anything else must
    /// match the folder name exactly. Matching is case-sensitive like the
    /// folder names themselves.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        if pattern.contains(['*', '?', '[']) {
            let glob_pattern = Pattern::new(pattern).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            Ok(RunPattern::Glob(glob_pattern))
        } else if pattern.is_empty() {
            Err(crate::Error::InvalidPattern(
                "Run pattern must not be empty".to_string(),
            ))
        } else {
            Ok(RunPattern::Exact(pattern.to_string()))
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            RunPattern::Exact(pattern) => name == pattern,
            RunPattern::Glob(pattern) => pattern.matches(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let pattern = RunPattern::parse("run1").unwrap();
        assert!(pattern.matches("run1"));
        assert!(!pattern.matches("run10"));
        assert!(!pattern.matches("RUN1"));
    }

    #[test]
    fn test_glob_prefix() {
        let pattern = RunPattern::parse("run*").unwrap();
        assert!(pattern.matches("run1"));
        assert!(pattern.matches("run_2024_02_15"));
        assert!(!pattern.matches("warmup"));
    }

    #[test]
    fn test_glob_character_class() {
        let pattern = RunPattern::parse("test[1-3]").unwrap();
        assert!(pattern.matches("test1"));
        assert!(pattern.matches("test3"));
        assert!(!pattern.matches("test4"));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(RunPattern::parse("run[").is_err());
    }

    #[test]
    fn test_empty_pattern() {
        assert!(RunPattern::parse("").is_err());
    }
}
