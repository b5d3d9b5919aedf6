//! Parser for nested-structure text.
//!
//! The format describes a fragment of a record:
//!
//! ```text
//! items   := item ( ',' item )* ','?
//! item    := name ':' text          (literal)
//!          | name? '{' items? '}'   (group)
//! name    := text
//! text    := quoted | bare
//! ```
//!
//! Quoted text uses `'` or `"` with backslash escapes. Bare text runs up to
//! the next `,`, `:`, `{`, `}`, or quote and is trimmed; a backslash makes
//! the following character literal.
//!
//! Parsing emits `start_entity`, `literal`, and `end_entity` calls into a
//! receiver that already has a record open.

use recflow_foundation::{Error, Result};
use recflow_stream::StreamReceiver;

/// Deepest group nesting the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

// =============================================================================
// Tokens
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum TokenKind {
    Text(String),
    Colon,
    Comma,
    LBrace,
    RBrace,
    Eof,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            Self::Text(text) => format!("text {text:?}"),
            Self::Colon => "':'".to_owned(),
            Self::Comma => "','".to_owned(),
            Self::LBrace => "'{'".to_owned(),
            Self::RBrace => "'}'".to_owned(),
            Self::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

// =============================================================================
// Lexer
// =============================================================================

/// Splits nested-structure text into tokens.
struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in the source.
    position: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let offset = self.position;
        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(':') => {
                self.advance();
                TokenKind::Colon
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some('{') => {
                self.advance();
                TokenKind::LBrace
            }
            Some('}') => {
                self.advance();
                TokenKind::RBrace
            }
            Some(quote @ ('\'' | '"')) => TokenKind::Text(self.scan_quoted(quote)?),
            Some(_) => TokenKind::Text(self.scan_bare()?),
        };
        Ok(Token { kind, offset })
    }

    fn scan_quoted(&mut self, quote: char) -> Result<String> {
        let start = self.position;
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(text);
                }
                Some('\\') => {
                    let escape_at = self.position;
                    self.advance();
                    let decoded = match self.peek_char() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(c @ ('\\' | '\'' | '"')) => c,
                        Some(c) => {
                            return Err(Error::parse(
                                format!("invalid escape sequence: \\{c}"),
                                escape_at,
                            ));
                        }
                        None => {
                            return Err(Error::parse("unexpected end of input in escape", escape_at));
                        }
                    };
                    self.advance();
                    text.push(decoded);
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => return Err(Error::parse("unterminated quoted text", start)),
            }
        }
    }

    fn scan_bare(&mut self) -> Result<String> {
        let mut text = String::new();
        // Length of `text` up to the last escaped or non-whitespace char,
        // so trailing whitespace is trimmed but escaped whitespace kept.
        let mut keep = 0;
        while let Some(c) = self.peek_char() {
            match c {
                ',' | ':' | '{' | '}' | '\'' | '"' => break,
                '\\' => {
                    let escape_at = self.position;
                    self.advance();
                    let Some(escaped) = self.peek_char() else {
                        return Err(Error::parse("unexpected end of input in escape", escape_at));
                    };
                    self.advance();
                    text.push(escaped);
                    keep = text.len();
                }
                c => {
                    self.advance();
                    text.push(c);
                    if !c.is_whitespace() {
                        keep = text.len();
                    }
                }
            }
        }
        text.truncate(keep);
        Ok(text)
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parser for nested-structure text.
///
/// At nesting level 0 an empty group or literal name is replaced by the
/// default name, which lets a bare `{ ... }` fragment take its name from
/// context.
pub struct FormetaParser<'src, 'r, R: ?Sized> {
    lexer: Lexer<'src>,
    current: Token,
    default_name: &'src str,
    depth: usize,
    receiver: &'r mut R,
}

impl<'src, 'r, R: StreamReceiver + ?Sized> FormetaParser<'src, 'r, R> {
    /// Parses `text` and emits the result into `receiver`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` with the byte offset of the first syntax error,
    /// or any error the receiver raises. Events emitted before the error
    /// are not retracted.
    pub fn parse(text: &'src str, default_name: &'src str, receiver: &'r mut R) -> Result<()> {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token()?;
        let mut parser = Self {
            lexer,
            current,
            default_name,
            depth: 0,
            receiver,
        };
        parser.parse_items(&TokenKind::Eof)?;
        parser.expect(&TokenKind::Eof)
    }

    fn bump(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if &self.current.kind == kind {
            self.bump()?;
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected {}", kind.describe())))
        }
    }

    fn unexpected(&self, expectation: &str) -> Error {
        Error::parse(
            format!("{expectation}, found {}", self.current.kind.describe()),
            self.current.offset,
        )
    }

    fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        if self.depth == 0 && name.is_empty() {
            self.default_name
        } else {
            name
        }
    }

    fn parse_items(&mut self, end: &TokenKind) -> Result<()> {
        loop {
            if &self.current.kind == end {
                return Ok(());
            }
            self.parse_item()?;
            match &self.current.kind {
                TokenKind::Comma => {
                    self.bump()?;
                }
                kind if kind == end => return Ok(()),
                _ => return Err(self.unexpected(&format!("expected ',' or {}", end.describe()))),
            }
        }
    }

    /// Consumes the current token, returning its text if it is a text token.
    fn take_text(&mut self) -> Result<String> {
        Ok(match self.bump()?.kind {
            TokenKind::Text(text) => text,
            _ => String::new(),
        })
    }

    fn parse_item(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::LBrace => self.parse_group(""),
            TokenKind::Text(_) => {
                let name = self.take_text()?;
                match self.current.kind {
                    TokenKind::Colon => {
                        self.bump()?;
                        self.parse_literal(&name)
                    }
                    TokenKind::LBrace => self.parse_group(&name),
                    _ => Err(self.unexpected("expected ':' or '{'")),
                }
            }
            _ => Err(self.unexpected("expected a name or '{'")),
        }
    }

    fn parse_literal(&mut self, name: &str) -> Result<()> {
        let value = match self.current.kind {
            TokenKind::Text(_) => self.take_text()?,
            TokenKind::Comma | TokenKind::RBrace | TokenKind::Eof => String::new(),
            _ => return Err(self.unexpected("expected a value")),
        };
        let name = self.resolve_name(name).to_owned();
        self.receiver.literal(&name, &value)
    }

    fn parse_group(&mut self, name: &str) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::parse(
                format!("groups nested deeper than {MAX_NESTING_DEPTH}"),
                self.current.offset,
            ));
        }
        self.expect(&TokenKind::LBrace)?;
        let name = self.resolve_name(name).to_owned();
        self.receiver.start_entity(&name)?;
        self.depth += 1;
        self.parse_items(&TokenKind::RBrace)?;
        self.expect(&TokenKind::RBrace)?;
        self.depth -= 1;
        self.receiver.end_entity()
    }
}
