#![allow(dead_code)]

use javaparse::{Diagnostic, FragmentParser};

pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

pub fn parser() -> FragmentParser {
    init_logging();
    FragmentParser::default()
}

pub fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}
