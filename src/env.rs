//! Per-call parse environment
//!
//! A [`ParseEnvironment`] binds one source, one fresh [`DiagnosticCollector`] and the parser
//! options for exactly one parse call. Nothing in it is shared with any other call, so concurrent
//! or repeated calls cannot observe each other. Dropping the environment disposes it; that happens
//! on every exit path of the dispatcher, rejection and early returns included.

use std::sync::Arc;

use crate::config::Config;
use crate::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::parser::{Parser, ParserOptions};
use crate::source::SourceFile;

pub struct ParseEnvironment {
    source: Arc<SourceFile>,
    collector: DiagnosticCollector,
    options: ParserOptions,
}

impl ParseEnvironment {
    /// Never fails; reading the source already happened
    pub fn create(source: Arc<SourceFile>, config: &Config) -> Self {
        log::trace!("parse environment created for {}", source.name());
        Self {
            source,
            collector: DiagnosticCollector::new(),
            options: config.parser_options(),
        }
    }

    /// Parser over this environment's source, reporting into its collector
    pub fn new_parser(&mut self) -> Parser<'_> {
        Parser::new(&self.source, self.options, &mut self.collector)
    }

    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn collector(&self) -> &DiagnosticCollector {
        &self.collector
    }

    /// Diagnostics recorded so far, in emission order
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        self.collector.drain()
    }
}

impl Drop for ParseEnvironment {
    fn drop(&mut self) {
        log::trace!(
            "parse environment for {} disposed ({} undrained diagnostics)",
            self.source.name(),
            self.collector.len()
        );
    }
}
