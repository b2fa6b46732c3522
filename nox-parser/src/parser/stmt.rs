use super::*;

impl<'a> Parser<'a> {
    /// Parses a top level declaration.
    pub fn parse_declaration(&mut self) -> Result<Decl, ParseError> {
        tracing::trace!(token = %self.current().kind, "parsing declaration");
        match self.current().kind {
            TokenKind::Const => {
                let (ident, initializer) = self.parse_const_binding()?;
                Ok(Decl::GlobalConst { ident, initializer })
            }
            TokenKind::Var => {
                let (ident, initializer) = self.parse_var_binding()?;
                Ok(Decl::GlobalVar { ident, initializer })
            }
            TokenKind::Func => Ok(Decl::FuncDecl(self.parse_fn_declaration()?)),
            _ => Err(self.unexpected("declaration")),
        }
    }

    /// Parses a statement inside a function body.
    pub fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current().kind {
            TokenKind::Const => {
                let (ident, initializer) = self.parse_const_binding()?;
                Ok(Stmt::ConstDecl { ident, initializer })
            }
            TokenKind::Var => {
                let (ident, initializer) = self.parse_var_binding()?;
                Ok(Stmt::VarDecl {
                    ident,
                    initializer: initializer.unwrap_or(Expr::Null),
                })
            }
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Identifier if self.peek().kind == TokenKind::OpenParen => {
                // call statement
                let call = self.parse_call_expr()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::ExprStmt(call))
            }
            TokenKind::Identifier => self.parse_var_set_stmt(),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// Parses `const NAME = expr ;`.
    fn parse_const_binding(&mut self) -> Result<(String, Expr), ParseError> {
        self.expect(TokenKind::Const)?;
        let ident = self.expect_ident()?;
        self.expect(TokenKind::Equals)?;
        let initializer = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok((ident, initializer))
    }

    /// Parses `var NAME (= expr)? ;`.
    fn parse_var_binding(&mut self) -> Result<(String, Option<Expr>), ParseError> {
        self.expect(TokenKind::Var)?;
        let ident = self.expect_ident()?;
        let initializer = if self.eat(TokenKind::Equals) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semi)?;
        Ok((ident, initializer))
    }

    fn parse_var_set_stmt(&mut self) -> Result<Stmt, ParseError> {
        let ident = self.expect_ident()?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::VarSet { ident, value })
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Return)?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Return(expr))
    }

    fn parse_fn_declaration(&mut self) -> Result<FuncDecl, ParseError> {
        self.expect(TokenKind::Func)?;
        let ident = self.expect_ident()?;

        self.expect(TokenKind::OpenParen)?;
        let mut required_params = Vec::new();
        let mut optional_params: Vec<OptionalParam> = Vec::new();
        if !self.eat(TokenKind::CloseParen) {
            loop {
                let offset = self.current().span.start;
                let param = self.expect_ident()?;

                if required_params.contains(&param)
                    || optional_params.iter().any(|optional| optional.ident == param)
                {
                    return Err(ParseError::DuplicateParam {
                        func: ident,
                        param,
                        offset,
                    });
                }

                if self.eat(TokenKind::Equals) {
                    optional_params.push(OptionalParam {
                        ident: param,
                        default: self.parse_expr()?,
                    });
                } else if optional_params.is_empty() {
                    required_params.push(param);
                } else {
                    return Err(ParseError::RequiredAfterOptional {
                        func: ident,
                        param,
                        offset,
                    });
                }

                if self.eat(TokenKind::CloseParen) {
                    break;
                } else if !self.eat(TokenKind::Comma) {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }

        self.expect(TokenKind::OpenBrace)?;

        let mut body = Vec::new();
        while !self.eat(TokenKind::CloseBrace) {
            body.push(self.parse_stmt()?);
        }

        Ok(FuncDecl {
            ident,
            required_params,
            optional_params,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use insta::assert_debug_snapshot;
    use pretty_assertions::assert_eq;

    fn try_stmt(source: &str) -> Result<Stmt, ParseError> {
        let tokens = tokenize(source).unwrap();
        Parser::new(&tokens).parse_stmt()
    }

    fn stmt(source: &str) -> Stmt {
        try_stmt(source).unwrap()
    }

    fn try_decl(source: &str) -> Result<Decl, ParseError> {
        let tokens = tokenize(source).unwrap();
        Parser::new(&tokens).parse_declaration()
    }

    #[test]
    fn test_const_and_var_decl() {
        assert_eq!(
            stmt("const x = 1;"),
            Stmt::ConstDecl {
                ident: "x".to_string(),
                initializer: Expr::Int(1),
            }
        );
        assert_eq!(
            stmt("var y = \"s\";"),
            Stmt::VarDecl {
                ident: "y".to_string(),
                initializer: Expr::String("s".to_string()),
            }
        );
        assert_eq!(
            stmt("var z;"),
            Stmt::VarDecl {
                ident: "z".to_string(),
                initializer: Expr::Null,
            }
        );
    }

    #[test]
    fn test_const_requires_initializer() {
        assert_eq!(
            try_stmt("const x;"),
            Err(ParseError::UnexpectedToken {
                expected: "`=`".to_string(),
                found: TokenKind::Semi,
                offset: 7,
            })
        );
    }

    #[test]
    fn test_assignment_vs_call() {
        assert_eq!(
            stmt("x = x + 1;"),
            Stmt::VarSet {
                ident: "x".to_string(),
                value: Expr::Binary {
                    op: BinaryOp::Add,
                    lhs: Box::new(Expr::Name("x".to_string())),
                    rhs: Box::new(Expr::Int(1)),
                },
            }
        );
        assert_eq!(
            stmt("print(x);"),
            Stmt::ExprStmt(Expr::FuncCall {
                callee: Box::new(Expr::Name("print".to_string())),
                args: vec![Expr::Name("x".to_string())],
            })
        );
    }

    #[test]
    fn test_bare_identifier_is_not_a_statement() {
        assert_eq!(
            try_stmt("x;"),
            Err(ParseError::UnexpectedToken {
                expected: "`=`".to_string(),
                found: TokenKind::Semi,
                offset: 1,
            })
        );
    }

    #[test]
    fn test_call_statement_requires_semi() {
        assert_eq!(
            try_stmt("f() + 1;"),
            Err(ParseError::UnexpectedToken {
                expected: "`;`".to_string(),
                found: TokenKind::Plus,
                offset: 4,
            })
        );
    }

    #[test]
    fn test_return() {
        assert_eq!(stmt("return null;"), Stmt::Return(Expr::Null));
        assert!(matches!(
            try_stmt("return;"),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::Semi,
                ..
            })
        ));
    }

    #[test]
    fn test_fn_declaration() {
        assert_debug_snapshot!(try_decl("func add(a, b = 10) { return a + b; }").unwrap(), @r###"
        FuncDecl(
            FuncDecl {
                ident: "add",
                required_params: [
                    "a",
                ],
                optional_params: [
                    OptionalParam {
                        ident: "b",
                        default: Int(
                            10,
                        ),
                    },
                ],
                body: [
                    Return(
                        Binary {
                            op: Add,
                            lhs: Name(
                                "a",
                            ),
                            rhs: Name(
                                "b",
                            ),
                        },
                    ),
                ],
            },
        )
        "###);
    }

    #[test]
    fn test_default_may_reference_earlier_param() {
        let decl = try_decl("func f(a = 1, b = a * 2) {}").unwrap();
        match decl {
            Decl::FuncDecl(func) => {
                assert!(func.required_params.is_empty());
                assert_eq!(func.optional_params.len(), 2);
                assert_eq!(func.arity(), (0, 2));
            }
            other => panic!("expected a function, got {:?}", other),
        }
    }

    #[test]
    fn test_required_after_optional() {
        assert_eq!(
            try_decl("func f(a = 1, b) {}"),
            Err(ParseError::RequiredAfterOptional {
                func: "f".to_string(),
                param: "b".to_string(),
                offset: 14,
            })
        );
    }

    #[test]
    fn test_duplicate_param() {
        assert_eq!(
            try_decl("func f(a, a) {}"),
            Err(ParseError::DuplicateParam {
                func: "f".to_string(),
                param: "a".to_string(),
                offset: 10,
            })
        );
        assert!(matches!(
            try_decl("func f(a, b = 1, b = 2) {}"),
            Err(ParseError::DuplicateParam { offset: 17, .. })
        ));
    }

    #[test]
    fn test_param_list_errors() {
        assert!(matches!(
            try_decl("func f(a,) {}"),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::CloseParen,
                ..
            })
        ));
        assert!(matches!(
            try_decl("func f(a b) {}"),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::Identifier,
                ..
            })
        ));
    }

    #[test]
    fn test_nested_function_is_rejected() {
        assert_eq!(
            try_decl("func f() { func g() {} }"),
            Err(ParseError::UnexpectedToken {
                expected: "statement".to_string(),
                found: TokenKind::Func,
                offset: 11,
            })
        );
    }
}
