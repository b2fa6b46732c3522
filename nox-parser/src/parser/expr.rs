use super::*;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses a primary (atom) expression, tracking nesting depth.
    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                offset: self.current().span.start,
            });
        }
        self.depth += 1;
        let expr = self.parse_atom();
        self.depth -= 1;
        expr
    }

    /// Records the height of a node whose tallest child is `child` high.
    fn grow(&mut self, child: usize, offset: usize) -> Result<(), ParseError> {
        if child >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep { offset });
        }
        self.height = child + 1;
        Ok(())
    }

    fn parse_unary_expr(&mut self, op: UnaryOp) -> Result<Expr, ParseError> {
        let offset = self.current().span.start;
        self.next(); // eat operator
        let operand = self.parse_primary_expr()?;
        self.grow(self.height, offset)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        // NOTE: prefix operators are handled here
        match self.current().kind {
            TokenKind::IntLit | TokenKind::FloatLit | TokenKind::StringLit | TokenKind::Null => {
                self.parse_literal_expr()
            }
            TokenKind::Identifier => self.parse_identifier_or_call_expr(),
            TokenKind::Plus => self.parse_unary_expr(UnaryOp::Plus),
            TokenKind::Minus => self.parse_unary_expr(UnaryOp::Minus),
            TokenKind::OpenParen => {
                self.next();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_primary_expr()?;

        loop {
            let binop = self.current().kind;
            let (l_bp, r_bp) = match binop.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // binop is a valid binop
            let offset = self.current().span.start;
            let lhs_height = self.height;
            self.next();

            let rhs = self.parse_expr_bp(r_bp)?;
            // chains are built in this loop, so the left operand keeps getting deeper
            self.grow(lhs_height.max(self.height), offset)?;

            lhs = Expr::Binary {
                op: match binop {
                    TokenKind::Plus => BinaryOp::Add,
                    TokenKind::Minus => BinaryOp::Sub,
                    TokenKind::Asterisk => BinaryOp::Mult,
                    _ => BinaryOp::Div,
                },
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }
        }

        Ok(lhs)
    }

    /* Expressions.Literals */
    /// Parses a literal expression.
    /// Number literals are converted from their source text here.
    fn parse_literal_expr(&mut self) -> Result<Expr, ParseError> {
        let token = self.current();
        let text = token.text.clone().unwrap_or_default();
        let invalid_number = || ParseError::InvalidNumber {
            text: text.clone(),
            offset: token.span.start,
        };

        let val = match token.kind {
            TokenKind::IntLit => Expr::Int(text.parse().map_err(|_| invalid_number())?),
            TokenKind::FloatLit => Expr::Float(text.parse().map_err(|_| invalid_number())?),
            TokenKind::StringLit => Expr::String(text.clone()),
            TokenKind::Null => Expr::Null,
            _ => return Err(self.unexpected("literal")),
        };
        self.next(); // eat parsed token
        self.height = 1;
        Ok(val)
    }

    /* Expressions.Identifier */
    /// Parses an identifier or a call expression.
    /// The token after the identifier decides which one it is.
    fn parse_identifier_or_call_expr(&mut self) -> Result<Expr, ParseError> {
        if self.peek().kind == TokenKind::OpenParen {
            self.parse_call_expr()
        } else {
            let ident = self.expect_ident()?;
            self.height = 1;
            Ok(Expr::Name(ident))
        }
    }

    /// Parses `identifier(args)`. A trailing comma is not allowed.
    pub(super) fn parse_call_expr(&mut self) -> Result<Expr, ParseError> {
        let offset = self.current().span.start;
        let ident = self.expect_ident()?;
        self.expect(TokenKind::OpenParen)?;

        let mut args = Vec::new();
        let mut height = 0;
        if !self.eat(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expr()?);
                height = height.max(self.height);

                if self.eat(TokenKind::CloseParen) {
                    break;
                } else if !self.eat(TokenKind::Comma) {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }

        self.grow(height, offset)?;
        Ok(Expr::FuncCall {
            callee: Box::new(Expr::Name(ident)),
            args,
        })
    }
}
