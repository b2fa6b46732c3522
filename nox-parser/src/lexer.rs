use logos::Logos;
use nox_source::Diagnostic;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // literals
    #[regex("[0-9]+")]
    IntLit,
    #[regex(r"[0-9]+\.[0-9]*")]
    FloatLit,
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    StringLit,
    /// Both the `null` keyword and the null literal.
    #[token("null")]
    Null,

    // identifiers
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // operators
    #[token("=")]
    Equals,
    #[token("+")]
    Plus, // NOTE: can also be unary
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // keywords
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("func")]
    Func,
    #[token("return")]
    Return,

    // misc
    #[regex(r"[ \t\n\r\x0B\x0C]+", logos::skip)]
    #[regex(r"#[^\n]*", logos::skip)] // single line comments
    #[error]
    Error,

    /// Only generated by [`tokenize`] once the input is exhausted.
    Eof,
}

impl TokenKind {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` is reserved for accepting any expression.
    pub fn binop_bp(self) -> Option<(u8, u8)> {
        match self {
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((1, 2)),
            /* Multiplicative */
            TokenKind::Asterisk | TokenKind::Slash => Some((3, 4)),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::IntLit => "integer literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::StringLit => "string literal",
            TokenKind::Null => "`null`",
            TokenKind::Identifier => "identifier",
            TokenKind::Equals => "`=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Asterisk => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::OpenBrace => "`{`",
            TokenKind::CloseBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semi => "`;`",
            TokenKind::Var => "`var`",
            TokenKind::Const => "`const`",
            TokenKind::Func => "`func`",
            TokenKind::Return => "`return`",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A lexical unit. `text` is set for identifiers and literals only.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Identifier name, literal text as written for numbers, unescaped value for strings.
    pub text: Option<String>,
    /// Byte range in the source.
    pub span: Range<usize>,
}

impl Token {
    fn eof(offset: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: None,
            span: offset..offset,
        }
    }
}

/// Represents an error raised while splitting source into tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character {ch:?} at position {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
    #[error("unterminated string literal starting at position {offset}")]
    UnterminatedString { offset: usize },
    #[error("escape character at end of input at position {offset}")]
    DanglingEscape { offset: usize },
    #[error("second decimal point in number literal at position {offset}")]
    SecondDecimalPoint { offset: usize },
    #[error("unexpected end of input at position {offset}")]
    UnexpectedEof { offset: usize },
}

impl Diagnostic for LexError {
    fn offset(&self) -> Option<usize> {
        match *self {
            LexError::UnexpectedCharacter { offset, .. }
            | LexError::UnterminatedString { offset }
            | LexError::DanglingEscape { offset }
            | LexError::SecondDecimalPoint { offset }
            | LexError::UnexpectedEof { offset } => Some(offset),
        }
    }
}

/// Splits `source` into tokens. The result always ends with exactly one [`TokenKind::Eof`].
/// Stops at the first malformed token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let text = match kind {
            TokenKind::Error => return Err(classify_error(source, span.start)),
            TokenKind::FloatLit => {
                if lexer.remainder().starts_with('.') {
                    return Err(LexError::SecondDecimalPoint { offset: span.end });
                }
                Some(slice.to_string())
            }
            TokenKind::IntLit | TokenKind::Identifier => Some(slice.to_string()),
            TokenKind::StringLit => Some(unescape(&slice[1..slice.len() - 1])),
            _ => None,
        };
        tokens.push(Token { kind, text, span });
    }

    tokens.push(Token::eof(source.len()));
    tracing::debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Works out why the lexer rejected the input starting at `start`.
fn classify_error(source: &str, start: usize) -> LexError {
    let rest = &source[start..];
    match rest.chars().next() {
        Some('"') => {
            let mut chars = rest.char_indices().skip(1);
            while let Some((i, ch)) = chars.next() {
                if ch == '\\' && chars.next().is_none() {
                    return LexError::DanglingEscape { offset: start + i };
                }
            }
            LexError::UnterminatedString { offset: start }
        }
        Some(ch) => LexError::UnexpectedCharacter { ch, offset: start },
        None => LexError::UnexpectedEof { offset: start },
    }
}

/// Resolves `\` escapes: `\n` is a newline, any other escaped character stands for itself.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(if escaped == 'n' { '\n' } else { escaped });
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<Option<String>> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn test_empty() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \n\t  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(
            kinds("null var const func return variable _x1 funcs"),
            vec![Null, Var, Const, Func, Return, Identifier, Identifier, Identifier, Eof]
        );
        assert_eq!(
            texts("var foo_bar"),
            vec![None, Some("foo_bar".to_string()), None]
        );
    }

    #[test]
    fn test_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("=;,+-*/(){}"),
            vec![
                Equals, Semi, Comma, Plus, Minus, Asterisk, Slash, OpenParen, CloseParen,
                OpenBrace, CloseBrace, Eof
            ]
        );
    }

    #[test]
    fn test_numbers_keep_literal_text() {
        use TokenKind::*;
        assert_eq!(kinds("42 3.25 7."), vec![IntLit, FloatLit, FloatLit, Eof]);
        assert_eq!(
            texts("042 3.250"),
            vec![Some("042".to_string()), Some("3.250".to_string()), None]
        );
    }

    #[test]
    fn test_second_decimal_point() {
        assert_eq!(
            tokenize("1.2.3"),
            Err(LexError::SecondDecimalPoint { offset: 3 })
        );
        assert_eq!(
            tokenize("x = 1..;"),
            Err(LexError::SecondDecimalPoint { offset: 6 })
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            texts(r#""hello" "a\nb" "q\"uote" "back\\slash" "\t""#),
            vec![
                Some("hello".to_string()),
                Some("a\nb".to_string()),
                Some("q\"uote".to_string()),
                Some("back\\slash".to_string()),
                Some("t".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(
            tokenize(r#"var s = "abc"#),
            Err(LexError::UnterminatedString { offset: 8 })
        );
        assert_eq!(
            tokenize(r#""abc\"#),
            Err(LexError::DanglingEscape { offset: 4 })
        );
    }

    #[test]
    fn test_comments_interleave_with_whitespace() {
        use TokenKind::*;
        let source = "# leading comment\n  var x # trailing\n\n# another\n= 1;# eof comment";
        assert_eq!(kinds(source), vec![Var, Identifier, Equals, IntLit, Semi, Eof]);
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("var x = 1 $ 2;"),
            Err(LexError::UnexpectedCharacter { ch: '$', offset: 10 })
        );
        assert_eq!(
            tokenize("x.y"),
            Err(LexError::UnexpectedCharacter { ch: '.', offset: 1 })
        );
    }

    #[test]
    fn test_spans_and_eof() {
        let tokens = tokenize("var ab = 1;").unwrap();
        assert_eq!(tokens[1].span, 4..6);
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.span, 11..11);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
            1
        );
    }

    #[test]
    fn test_deterministic() {
        let source = "func f(a, b = 2.5) { return a * b; } # done";
        assert_eq!(tokenize(source), tokenize(source));
    }
}
