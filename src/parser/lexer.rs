use logos::{FilterResult, Logos};

use crate::ast::Span;
use crate::diagnostics::DiagnosticCode;
use crate::source::SourceFile;

/// Problems the tokenizer can hit; each becomes one error diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexError {
    #[default]
    IllegalChar,
    UnclosedString,
    UnclosedChar,
    EmptyChar,
    UnclosedComment,
    UnclosedTextBlock,
    TextBlockOpen,
}

impl LexError {
    /// Diagnostic code and javac-style message for an error over `text`
    pub fn describe(&self, text: &str) -> (DiagnosticCode, String) {
        match self {
            LexError::IllegalChar => {
                let c = text.chars().next().unwrap_or('\u{0}');
                (DiagnosticCode::IllegalChar, format!("illegal character: '\\u{:04x}'", c as u32))
            }
            LexError::UnclosedString => (DiagnosticCode::UnclosedStrLit, "unclosed string literal".to_string()),
            LexError::UnclosedChar => (DiagnosticCode::UnclosedCharLit, "unclosed character literal".to_string()),
            LexError::EmptyChar => (DiagnosticCode::EmptyCharLit, "empty character literal".to_string()),
            LexError::UnclosedComment => (DiagnosticCode::UnclosedComment, "unclosed comment".to_string()),
            LexError::UnclosedTextBlock => (DiagnosticCode::UnclosedTextBlock, "unclosed text block".to_string()),
            LexError::TextBlockOpen => (
                DiagnosticCode::IllegalTextBlockOpen,
                "illegal text block open delimiter sequence, missing line terminator".to_string(),
            ),
        }
    }
}

/// Token types for Java source
///
/// Restricted identifiers and contextual keywords (`var`, `yield`, `record`, `sealed`,
/// `permits`, `module`, `open`, `requires`, ...) are lexed as [`Token::Identifier`] and
/// recognised by the parser from context.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f\u{FEFF}\u{1A}]+")]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("static")]
    Static,
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("abstract")]
    Abstract,
    #[token("final")]
    Final,
    #[token("native")]
    Native,
    #[token("synchronized")]
    Synchronized,
    #[token("transient")]
    Transient,
    #[token("volatile")]
    Volatile,
    #[token("strictfp")]
    Strictfp,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("new")]
    New,
    #[token("this")]
    This,
    #[token("super")]
    Super,
    #[token("instanceof")]
    InstanceOf,
    #[token("void")]
    Void,
    #[token("boolean")]
    Boolean,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("char")]
    Char,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("assert")]
    Assert,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("const")]
    Const,
    #[token("goto")]
    Goto,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Operators
    #[token("=")]
    Assign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    DivAssign,
    #[token("%=")]
    ModAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("<<=")]
    LShiftAssign,
    #[token(">>=")]
    RShiftAssign,
    #[token(">>>=")]
    URShiftAssign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token(">>>")]
    URShift,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    PipePipe,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token("->")]
    Arrow,

    // Separators
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("...")]
    Ellipsis,

    // Literals
    #[token("\"", string_literal)]
    StringLiteral,
    #[token("\"\"\"", text_block)]
    TextBlock,
    #[token("'", char_literal)]
    CharLiteral,
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    #[regex(r"0[bB][01_]+[lL]?")]
    #[regex(r"[0-9][0-9_]*[lL]?")]
    IntegerLiteral,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9][0-9_]*)?[fFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    #[regex(r"0[xX][0-9a-fA-F_]*\.?[0-9a-fA-F_]*[pP][+-]?[0-9][0-9_]*[fFdD]?")]
    FloatingLiteral,

    // Identifiers
    #[regex(r"[\p{L}\p{Nl}_$][\p{L}\p{Nl}\p{Nd}\p{Mn}\p{Mc}\p{Pc}$]*")]
    Identifier,

    // Comments; only documentation comments survive as tokens
    #[regex(r"//[^\n\r]*", logos::skip)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
    #[token("/**", doc_comment)]
    DocComment(String),
}

fn string_literal(lex: &mut logos::Lexer<Token>) -> Result<(), LexError> {
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, '\n' | '\r')) | None = chars.next() {
                    lex.bump(i + 1);
                    return Err(LexError::UnclosedString);
                }
            }
            '"' => {
                lex.bump(i + 1);
                return Ok(());
            }
            '\n' | '\r' => {
                lex.bump(i);
                return Err(LexError::UnclosedString);
            }
            _ => {}
        }
    }
    lex.bump(rest.len());
    Err(LexError::UnclosedString)
}

fn char_literal(lex: &mut logos::Lexer<Token>) -> Result<(), LexError> {
    let rest = lex.remainder();
    if rest.starts_with('\'') {
        lex.bump(1);
        return Err(LexError::EmptyChar);
    }
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, '\n' | '\r')) | None = chars.next() {
                    lex.bump(i + 1);
                    return Err(LexError::UnclosedChar);
                }
            }
            '\'' => {
                lex.bump(i + 1);
                return Ok(());
            }
            '\n' | '\r' => {
                lex.bump(i);
                return Err(LexError::UnclosedChar);
            }
            _ => {}
        }
    }
    lex.bump(rest.len());
    Err(LexError::UnclosedChar)
}

fn text_block(lex: &mut logos::Lexer<Token>) -> Result<(), LexError> {
    let rest = lex.remainder();
    // The opening delimiter must be followed by optional blanks and a line terminator
    let opening = rest.find(|c: char| c != ' ' && c != '\t' && c != '\u{c}');
    match opening.and_then(|i| rest[i..].chars().next()) {
        Some('\n' | '\r') => {}
        _ => {
            let line_end = rest.find(['\n', '\r']).unwrap_or(rest.len());
            lex.bump(line_end);
            return Err(LexError::TextBlockOpen);
        }
    }

    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' if rest[i..].starts_with("\"\"\"") => {
                lex.bump(i + 3);
                return Ok(());
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    Err(LexError::UnclosedTextBlock)
}

fn block_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), LexError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(LexError::UnclosedComment)
        }
    }
}

fn doc_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<String, LexError> {
    let rest = lex.remainder();
    // `/**/` is an empty ordinary comment
    if rest.starts_with('/') {
        lex.bump(1);
        return FilterResult::Skip;
    }
    match rest.find("*/") {
        Some(end) => {
            let body = doc_text(&rest[..end]);
            lex.bump(end + 2);
            FilterResult::Emit(body)
        }
        None => {
            lex.bump(rest.len());
            FilterResult::Error(LexError::UnclosedComment)
        }
    }
}

/// Doc comment body with the leading `*` decoration of each line removed
fn doc_text(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(stripped) => stripped.strip_prefix(' ').unwrap_or(stripped),
                None => trimmed,
            }
            .trim_end()
        })
        .collect();
    let first = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let last = lines.iter().rposition(|l| !l.is_empty()).map_or(first, |i| i + 1);
    lines[first..last.max(first)].join("\n")
}

impl Token {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self,
            Token::Package | Token::Import | Token::Static |
            Token::Public | Token::Protected | Token::Private |
            Token::Abstract | Token::Final | Token::Native |
            Token::Synchronized | Token::Transient | Token::Volatile |
            Token::Strictfp | Token::Default | Token::Class | Token::Interface |
            Token::Enum | Token::Extends | Token::Implements |
            Token::New | Token::This | Token::Super |
            Token::InstanceOf | Token::Void | Token::Boolean |
            Token::Byte | Token::Short | Token::Int |
            Token::Long | Token::Char | Token::Float |
            Token::Double | Token::If | Token::Else |
            Token::For | Token::While | Token::Do |
            Token::Switch | Token::Case | Token::Assert |
            Token::Break | Token::Continue | Token::Return |
            Token::Throw | Token::Throws | Token::Try |
            Token::Catch | Token::Finally | Token::Const | Token::Goto |
            Token::True | Token::False | Token::Null
        )
    }

    /// Check if this token is a modifier keyword
    pub fn is_modifier(&self) -> bool {
        matches!(self,
            Token::Public | Token::Protected | Token::Private |
            Token::Abstract | Token::Final | Token::Native |
            Token::Synchronized | Token::Transient | Token::Volatile |
            Token::Static | Token::Strictfp | Token::Default
        )
    }

    /// Check if this token is a primitive type (or `void`)
    pub fn is_primitive_type(&self) -> bool {
        matches!(self,
            Token::Boolean | Token::Byte | Token::Short |
            Token::Int | Token::Long | Token::Char |
            Token::Float | Token::Double | Token::Void
        )
    }

    /// Check if this token is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self,
            Token::StringLiteral | Token::TextBlock | Token::CharLiteral |
            Token::IntegerLiteral | Token::FloatingLiteral |
            Token::True | Token::False | Token::Null
        )
    }

    /// Check if this token is a class, interface or enum keyword
    pub fn is_type_decl_keyword(&self) -> bool {
        matches!(self, Token::Class | Token::Interface | Token::Enum)
    }
}

/// Lexical token with location information
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub span: Span,
    /// Documentation comment immediately preceding this token
    pub doc: Option<String>,
}

impl LexicalToken {
    pub fn new(token: Token, lexeme: String, span: Span) -> Self {
        Self { token, lexeme, span, doc: None }
    }

    /// Get the token type
    pub fn token_type(&self) -> &Token {
        &self.token
    }

    /// Get the lexeme (actual text)
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Check if this token matches the given token type
    pub fn is(&self, token_type: &Token) -> bool {
        std::mem::discriminant(&self.token) == std::mem::discriminant(token_type)
    }

    /// Identifier with exactly this text, used for contextual keywords
    pub fn is_word(&self, word: &str) -> bool {
        self.token == Token::Identifier && self.lexeme == word
    }
}

/// A tokenization failure with the text it covered
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalError {
    pub error: LexError,
    pub text: String,
    pub span: Span,
}

/// Lexer for Java source
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    source: &'a SourceFile,
    pending_doc: Option<String>,
    keep_doc_comments: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceFile) -> Self {
        Self {
            lexer: Token::lexer(source.content()),
            source,
            pending_doc: None,
            keep_doc_comments: true,
        }
    }

    pub fn keep_doc_comments(mut self, keep: bool) -> Self {
        self.keep_doc_comments = keep;
        self
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<Result<LexicalToken, LexicalError>> {
        loop {
            let token = self.lexer.next()?;
            let range = self.lexer.span();
            let span = self.source.span_of(range.start, range.end);
            let lexeme = self.lexer.slice().to_string();

            return match token {
                Ok(Token::DocComment(text)) => {
                    if self.keep_doc_comments {
                        self.pending_doc = Some(text);
                    }
                    continue;
                }
                Ok(token) => {
                    let mut token = LexicalToken::new(token, lexeme, span);
                    token.doc = self.pending_doc.take();
                    Some(Ok(token))
                }
                Err(error) => Some(Err(LexicalError { error, text: lexeme, span })),
            };
        }
    }

    /// Get all tokens from the source, with the errors met along the way
    pub fn tokenize(mut self) -> (Vec<LexicalToken>, Vec<LexicalError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        while let Some(result) = self.next_token() {
            match result {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }

        (tokens, errors)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<LexicalToken, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> (Vec<LexicalToken>, Vec<LexicalError>) {
        let source = SourceFile::from_string(text);
        Lexer::new(&source).tokenize()
    }

    fn kinds(text: &str) -> Vec<Token> {
        let (tokens, errors) = lex(text);
        assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);
        tokens.into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_lexer_keywords() {
        assert_eq!(
            kinds("public class Test extends Object implements Interface"),
            vec![
                Token::Public,
                Token::Class,
                Token::Identifier,
                Token::Extends,
                Token::Identifier,
                Token::Implements,
                Token::Identifier,
            ]
        );
    }

    #[test]
    fn contextual_keywords_are_identifiers() {
        let (tokens, _) = lex("record var yield sealed permits module");
        assert!(tokens.iter().all(|t| t.token == Token::Identifier));
        assert!(tokens[0].is_word("record"));
    }

    #[test]
    fn test_lexer_literals() {
        assert_eq!(
            kinds(r#"42 0x1F_FFL 0b1010 1_000 3.14 1e10 .5f 2d 0x1.8p1 "hello" 'a' 'A' true null"#),
            vec![
                Token::IntegerLiteral,
                Token::IntegerLiteral,
                Token::IntegerLiteral,
                Token::IntegerLiteral,
                Token::FloatingLiteral,
                Token::FloatingLiteral,
                Token::FloatingLiteral,
                Token::FloatingLiteral,
                Token::FloatingLiteral,
                Token::StringLiteral,
                Token::CharLiteral,
                Token::CharLiteral,
                Token::True,
                Token::Null,
            ]
        );
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        let (tokens, errors) = lex(r#"s = "a \"quoted\" word";"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[2].lexeme, r#""a \"quoted\" word""#);
        assert_eq!(tokens[3].token, Token::Semicolon);
    }

    #[test]
    fn text_block_spans_lines() {
        let (tokens, errors) = lex("x = \"\"\"\n    hello \"\"\n    \"\"\";");
        assert!(errors.is_empty());
        assert_eq!(tokens[2].token, Token::TextBlock);
        assert_eq!(tokens[3].token, Token::Semicolon);
    }

    #[test]
    fn test_lexer_operators() {
        assert_eq!(
            kinds("+ - >>= >>> -> :: ... & &&"),
            vec![
                Token::Plus,
                Token::Minus,
                Token::RShiftAssign,
                Token::URShift,
                Token::Arrow,
                Token::DoubleColon,
                Token::Ellipsis,
                Token::Amp,
                Token::AndAnd,
            ]
        );
    }

    #[test]
    fn test_lexer_comments() {
        assert!(kinds("// line\n/* block */ /**/").is_empty());
    }

    #[test]
    fn doc_comment_attaches_to_next_token() {
        let (tokens, _) = lex("/**\n * Says hi.\n * @deprecated\n */\nclass A {}");
        assert_eq!(tokens[0].token, Token::Class);
        assert_eq!(tokens[0].doc.as_deref(), Some("Says hi.\n@deprecated"));
        assert_eq!(tokens[1].doc, None);
    }

    #[test]
    fn lexical_errors_are_collected() {
        let (tokens, errors) = lex("int # x = \"open\n;");
        let found: Vec<_> = errors.iter().map(|e| e.error.clone()).collect();
        assert_eq!(found, vec![LexError::IllegalChar, LexError::UnclosedString]);
        assert_eq!(tokens.last().map(|t| &t.token), Some(&Token::Semicolon));
        assert_eq!(errors[0].span.start.column, 5);
    }

    #[test]
    fn unclosed_comment_and_empty_char() {
        let (_, errors) = lex("'' /* never closed");
        let found: Vec<_> = errors.iter().map(|e| e.error.clone()).collect();
        assert_eq!(found, vec![LexError::EmptyChar, LexError::UnclosedComment]);
    }
}
