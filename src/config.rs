//! Parser configuration
//!
//! Defaults can be overridden per process through environment variables:
//! - `JAVAPARSE_MAX_ERRORS`: error count after which parsing stops (default 100)
//! - `JAVAPARSE_NO_RECOVERY`: stop at the first syntax error
//! - `JAVAPARSE_DROP_DOC_COMMENTS`: do not attach `/** */` comments to declarations
//! - `JAVAPARSE_NO_DEPRECATION`: do not warn about `@deprecated` without `@Deprecated`

use once_cell::sync::Lazy;

use crate::parser::ParserOptions;

pub const DEFAULT_MAX_ERRORS: usize = 100;

static DEFAULT: Lazy<Config> = Lazy::new(Config::from_env);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Keep going after a syntax error and produce a best-effort tree
    pub allow_error_recovery: bool,
    pub keep_doc_comments: bool,
    pub report_deprecation: bool,
    pub max_errors: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allow_error_recovery: true,
            keep_doc_comments: true,
            report_deprecation: true,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

impl Config {
    /// Built-in defaults adjusted by `JAVAPARSE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// The process-wide configuration, read from the environment once
    pub fn global() -> &'static Config {
        &DEFAULT
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            allow_error_recovery: lookup("JAVAPARSE_NO_RECOVERY").is_none(),
            keep_doc_comments: lookup("JAVAPARSE_DROP_DOC_COMMENTS").is_none(),
            report_deprecation: lookup("JAVAPARSE_NO_DEPRECATION").is_none(),
            max_errors: lookup("JAVAPARSE_MAX_ERRORS")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_errors),
        };
        if config != defaults {
            log::debug!("config from environment: {:?}", config);
        }
        config
    }

    pub fn with_error_recovery(mut self, allow: bool) -> Self {
        self.allow_error_recovery = allow;
        self
    }

    pub fn with_doc_comments(mut self, keep: bool) -> Self {
        self.keep_doc_comments = keep;
        self
    }

    pub fn with_deprecation(mut self, report: bool) -> Self {
        self.report_deprecation = report;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors.max(1);
        self
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            allow_error_recovery: self.allow_error_recovery,
            keep_doc_comments: self.keep_doc_comments,
            report_deprecation: self.report_deprecation,
            max_errors: self.max_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup_in(&[])), Config::default());
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup_in(&[
            ("JAVAPARSE_NO_RECOVERY", "1"),
            ("JAVAPARSE_MAX_ERRORS", "7"),
            ("JAVAPARSE_DROP_DOC_COMMENTS", ""),
        ]));
        assert!(!config.allow_error_recovery);
        assert!(!config.keep_doc_comments);
        assert!(config.report_deprecation);
        assert_eq!(config.max_errors, 7);
    }

    #[test]
    fn bad_max_errors_falls_back() {
        let config = Config::from_lookup(lookup_in(&[("JAVAPARSE_MAX_ERRORS", "lots")]));
        assert_eq!(config.max_errors, DEFAULT_MAX_ERRORS);
        let config = Config::from_lookup(lookup_in(&[("JAVAPARSE_MAX_ERRORS", "0")]));
        assert_eq!(config.max_errors, DEFAULT_MAX_ERRORS);
    }
}
