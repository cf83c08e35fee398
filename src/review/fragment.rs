use super::{ReviewError, ReviewResult};
use crate::parser::{Lexer, LexicalToken, Token};
use crate::source::SourceFile;

/// Kind of compilation-unit construct the text opens with, if any
///
/// Leading annotations and modifiers are looked through, so `@Deprecated public class C {}` is a
/// class. Lexical errors are ignored here; the parse proper reports them.
pub fn leading_declaration(source: &SourceFile) -> Option<&'static str> {
    let (tokens, _) = Lexer::new(source).keep_doc_comments(false).tokenize();
    let start = skip_modifiers(&tokens);
    let word = |i: usize, w: &str| tokens.get(i).map_or(false, |t| t.is_word(w));
    let token = |i: usize| tokens.get(i).map(|t| &t.token);

    match token(start)? {
        Token::Package => Some("package declaration"),
        Token::Import => Some("import"),
        Token::Class => Some("class"),
        Token::Interface => Some("interface"),
        Token::Enum => Some("enum"),
        Token::At if token(start + 1) == Some(&Token::Interface) => Some("annotation type"),
        Token::Identifier if word(start, "record") && token(start + 1) == Some(&Token::Identifier) => Some("record"),
        Token::Identifier if word(start, "module") && token(start + 1) == Some(&Token::Identifier) => {
            Some("module declaration")
        }
        Token::Identifier if word(start, "open") && word(start + 1, "module") => Some("module declaration"),
        _ => None,
    }
}

fn skip_modifiers(tokens: &[LexicalToken]) -> usize {
    let mut i = 0;
    while let Some(t) = tokens.get(i) {
        match t.token {
            Token::At if tokens.get(i + 1).map(|n| &n.token) != Some(&Token::Interface) => {
                i = skip_annotation(tokens, i);
            }
            ref k if k.is_modifier() => i += 1,
            Token::Identifier if t.is_word("sealed") => i += 1,
            Token::Identifier if t.is_word("non") && tokens.get(i + 2).map_or(false, |s| s.is_word("sealed")) => i += 3,
            _ => break,
        }
    }
    i
}

/// Index after `@Name.Qualified(...)` starting at the `@`
fn skip_annotation(tokens: &[LexicalToken], at: usize) -> usize {
    let mut i = at + 1;
    while tokens.get(i).map(|t| &t.token) == Some(&Token::Identifier) {
        i += 1;
        if tokens.get(i).map(|t| &t.token) == Some(&Token::Dot) {
            i += 1;
        } else {
            break;
        }
    }
    if tokens.get(i).map(|t| &t.token) == Some(&Token::LParen) {
        let mut depth = 0usize;
        while let Some(t) = tokens.get(i) {
            i += 1;
            match t.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    i
}

pub fn review_expression(source: &SourceFile) -> ReviewResult<()> {
    match leading_declaration(source) {
        Some(kind) => {
            log::debug!("expression rejected: text starts a {}", kind);
            Err(ReviewError::NotAnExpression { kind, text: source.content().to_string() })
        }
        None => Ok(()),
    }
}

pub fn review_type_use(source: &SourceFile) -> ReviewResult<()> {
    match leading_declaration(source) {
        Some(kind) => {
            log::debug!("type use rejected: text starts a {}", kind);
            Err(ReviewError::NotATypeUse { kind, text: source.content().to_string() })
        }
        None => Ok(()),
    }
}
