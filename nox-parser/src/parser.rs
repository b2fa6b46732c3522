use crate::ast::{BinaryOp, Decl, Expr, FuncDecl, OptionalParam, Program, Stmt, UnaryOp};
use crate::lexer::{Token, TokenKind};
use nox_source::Diagnostic;

mod expr;
mod stmt;

/// Maximum height of an expression tree, and maximum nesting of primary expressions
/// (parentheses, unary operators, call arguments).
pub const MAX_NESTING_DEPTH: usize = 256;

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    text: None,
    span: 0..0,
};

/// Represents an error raised while building the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at position {offset}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        offset: usize,
    },
    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: String, offset: usize },
    #[error("parameter `{param}` of function `{func}` is declared more than once")]
    DuplicateParam {
        func: String,
        param: String,
        offset: usize,
    },
    #[error("required parameter `{param}` of function `{func}` follows a parameter with a default value")]
    RequiredAfterOptional {
        func: String,
        param: String,
        offset: usize,
    },
    #[error("number literal `{text}` is out of range")]
    InvalidNumber { text: String, offset: usize },
    #[error("expression nested more than {} levels deep", MAX_NESTING_DEPTH)]
    NestingTooDeep { offset: usize },
}

impl Diagnostic for ParseError {
    fn offset(&self) -> Option<usize> {
        match *self {
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnexpectedEof { offset, .. }
            | ParseError::DuplicateParam { offset, .. }
            | ParseError::RequiredAfterOptional { offset, .. }
            | ParseError::InvalidNumber { offset, .. }
            | ParseError::NestingTooDeep { offset } => Some(offset),
        }
    }
}

pub struct Parser<'a> {
    /// Token stream, terminated by [`TokenKind::Eof`].
    tokens: &'a [Token],
    /// Index of the current token.
    index: usize,
    /// Current primary expression nesting.
    depth: usize,
    /// Height of the expression tree parsed last.
    height: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
            height: 0,
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses declarations until the end of input.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut decls = Vec::new();
        while self.current().kind != TokenKind::Eof {
            decls.push(self.parse_declaration()?);
        }
        tracing::debug!(count = decls.len(), "parsed program");
        Ok(Program { decls })
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn current(&self) -> &'a Token {
        self.tokens
            .get(self.index)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    /// Returns the token after the current one without consuming anything.
    fn peek(&self) -> &'a Token {
        self.tokens
            .get(self.index + 1)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    fn next(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Predicate that tests whether the current token is of `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current().kind == kind {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(kind))
        }
    }

    /// Eats an identifier and returns its name.
    fn expect_ident(&mut self) -> Result<String, ParseError> {
        let token = self.current();
        match (token.kind, &token.text) {
            (TokenKind::Identifier, Some(ident)) => {
                self.next();
                Ok(ident.clone())
            }
            _ => Err(self.unexpected(TokenKind::Identifier)),
        }
    }

    /// Builds an unexpected token error for the current token.
    fn unexpected(&self, expected: impl ToString) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                expected: expected.to_string(),
                offset: token.span.start,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind,
                offset: token.span.start,
            }
        }
    }
}

/// Parses a complete token stream into a [`Program`].
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn program(source: &str) -> Result<Program, ParseError> {
        parse(&tokenize(source).unwrap())
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(program(""), Ok(Program::default()));
        assert_eq!(program("# only a comment"), Ok(Program::default()));
    }

    #[test]
    fn test_declarations_in_source_order() {
        let ast = program("const a = 1; var b; var c = a; func f() {}").unwrap();
        assert_eq!(
            ast.decls,
            vec![
                Decl::GlobalConst {
                    ident: "a".to_string(),
                    initializer: Expr::Int(1),
                },
                Decl::GlobalVar {
                    ident: "b".to_string(),
                    initializer: None,
                },
                Decl::GlobalVar {
                    ident: "c".to_string(),
                    initializer: Some(Expr::Name("a".to_string())),
                },
                Decl::FuncDecl(FuncDecl {
                    ident: "f".to_string(),
                    required_params: vec![],
                    optional_params: vec![],
                    body: vec![],
                }),
            ]
        );
    }

    #[test]
    fn test_statement_at_top_level_is_rejected() {
        assert_eq!(
            program("x = 1;"),
            Err(ParseError::UnexpectedToken {
                expected: "declaration".to_string(),
                found: TokenKind::Identifier,
                offset: 0,
            })
        );
    }

    #[test]
    fn test_premature_end_of_input() {
        assert_eq!(
            program("var x = 1"),
            Err(ParseError::UnexpectedEof {
                expected: "`;`".to_string(),
                offset: 9,
            })
        );
        assert_eq!(
            program("func f() { return 1;"),
            Err(ParseError::UnexpectedEof {
                expected: "statement".to_string(),
                offset: 20,
            })
        );
    }

    #[test]
    fn test_parse_empty_token_slice() {
        assert_eq!(parse(&[]), Ok(Program::default()));
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_NESTING_DEPTH + 1;
        let source = format!("var x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            program(&source),
            Err(ParseError::NestingTooDeep { .. })
        ));

        let depth = MAX_NESTING_DEPTH - 1;
        let source = format!("var x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        assert!(program(&source).is_ok());
    }

    fn chain(terms: usize) -> String {
        format!("1{}", " + 1".repeat(terms - 1))
    }

    #[test]
    fn test_long_operator_chain() {
        // a chain of n terms is a left leaning tree of height n
        let source = format!("var x = {};", chain(MAX_NESTING_DEPTH));
        assert!(program(&source).is_ok());

        let source = format!("var x = {};", chain(MAX_NESTING_DEPTH + 1));
        assert_eq!(
            program(&source),
            Err(ParseError::NestingTooDeep {
                offset: 8 + 2 + 4 * (MAX_NESTING_DEPTH - 1),
            })
        );

        let source = format!("var x = {};", chain(200_000));
        assert!(matches!(
            program(&source),
            Err(ParseError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn test_nested_chains_add_up() {
        let half = MAX_NESTING_DEPTH / 2 + 1;
        let source = format!("var x = ({}) + {};", chain(half), chain(half));
        assert!(matches!(
            program(&source),
            Err(ParseError::NestingTooDeep { .. })
        ));

        let source = format!("var x = f({}) * -({});", chain(100), chain(100));
        assert!(program(&source).is_ok());
    }
}
