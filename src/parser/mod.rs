use crate::ast::*;
use crate::error::{Error, Result, SourceLocation};
use crate::lexer::{Token, TokenKind};

/// hawk parser using recursive descent
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse a complete hawk program
    pub fn parse(&mut self) -> Result<Program> {
        let mut program = Program::new();

        self.skip_terminators();

        while !self.is_at_end() {
            if self.check(&TokenKind::Func) {
                program.functions.push(self.parse_function()?);
            } else {
                program.rules.push(self.parse_rule()?);
            }
            // Rules and declarations are separated by newlines or semicolons.
            if !self.is_at_end() && !self.at_terminator() {
                return Err(self.unexpected("';'"));
            }
            self.skip_terminators();
        }

        Ok(program)
    }

    /// Parse a function declaration: func name(a, b) { ... }
    fn parse_function(&mut self) -> Result<FuncDecl> {
        let location = self.current_location();
        self.expect(&TokenKind::Func, "'func'")?;

        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LeftParen, "'('")?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            params.push(self.expect_identifier()?);
            while self.match_token(&TokenKind::Comma) {
                params.push(self.expect_identifier()?);
            }
        }
        self.expect(&TokenKind::RightParen, "')'")?;

        let body = self.parse_block()?;

        Ok(FuncDecl {
            name,
            params,
            body,
            location,
        })
    }

    /// Parse a pattern-action rule
    fn parse_rule(&mut self) -> Result<Rule> {
        let location = self.current_location();

        if self.match_token(&TokenKind::Begin) {
            let action = Some(self.parse_block()?);
            return Ok(Rule {
                pattern: Some(Pattern::Begin),
                action,
                location,
            });
        }

        if self.match_token(&TokenKind::End) {
            let action = Some(self.parse_block()?);
            return Ok(Rule {
                pattern: Some(Pattern::End),
                action,
                location,
            });
        }

        // Action without a pattern: runs for every record.
        if self.check(&TokenKind::LeftBrace) {
            let action = Some(self.parse_block()?);
            return Ok(Rule {
                pattern: None,
                action,
                location,
            });
        }

        // Pattern expression, with an optional action on the same line.
        let pattern = Some(Pattern::Expr(self.parse_expression()?));
        let action = if self.check(&TokenKind::LeftBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Rule {
            pattern,
            action,
            location,
        })
    }

    /// Parse a braced block
    fn parse_block(&mut self) -> Result<Block> {
        let location = self.current_location();
        self.expect(&TokenKind::LeftBrace, "'{'")?;
        self.skip_terminators();

        let mut statements = Vec::new();

        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
            if self.check(&TokenKind::RightBrace) {
                break;
            }
            if !self.at_terminator() {
                return Err(self.unexpected("';'"));
            }
            self.skip_terminators();
        }

        self.expect(&TokenKind::RightBrace, "'}'")?;

        Ok(Block::new(statements, location))
    }

    /// Parse a single statement
    fn parse_statement(&mut self) -> Result<Stmt> {
        let location = self.current_location();

        if self.check(&TokenKind::Semicolon) {
            self.advance();
            return Ok(Stmt::Empty);
        }

        if self.check(&TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.parse_block()?));
        }

        if self.match_token(&TokenKind::If) {
            return self.parse_if_statement(location);
        }

        if self.match_token(&TokenKind::For) {
            return self.parse_for_statement(location);
        }

        if self.match_token(&TokenKind::Break) {
            return Ok(Stmt::Break { location });
        }

        if self.match_token(&TokenKind::Continue) {
            return Ok(Stmt::Continue { location });
        }

        if self.match_token(&TokenKind::Return) {
            let value = if self.can_start_expression() {
                Some(self.parse_expression()?)
            } else {
                None
            };
            return Ok(Stmt::Return { value, location });
        }

        if self.match_token(&TokenKind::Print) {
            return self.parse_print_statement(location);
        }

        self.parse_simple_statement()
    }

    /// Assignments, `++`/`--`, and expression statements; also the only
    /// statement forms allowed in a `for` clause.
    fn parse_simple_statement(&mut self) -> Result<Stmt> {
        let location = self.current_location();

        if let Some(TokenKind::Ident(name)) = self.peek_kind() {
            let name = name.clone();

            if let Some(op) = assign_op(self.peek_kind_at(1)) {
                self.advance(); // identifier
                self.advance(); // operator
                let value = self.parse_expression()?;
                return Ok(Stmt::Assign {
                    target: AssignTarget::Name(name),
                    op,
                    value,
                    location,
                });
            }

            // x++ and x-- are sugar for x += 1 and x -= 1.
            if let Some(kind @ (TokenKind::Increment | TokenKind::Decrement)) =
                self.peek_kind_at(1)
            {
                let op = if *kind == TokenKind::Increment {
                    AssignOp::Add
                } else {
                    AssignOp::Sub
                };
                self.advance();
                self.advance();
                return Ok(Stmt::Assign {
                    target: AssignTarget::Name(name),
                    op,
                    value: Expr::Number(1.0, location),
                    location,
                });
            }

            // a[i] = v needs a lookahead past the subscript; anything else
            // backtracks to an ordinary expression statement.
            if matches!(self.peek_kind_at(1), Some(TokenKind::LeftBracket)) {
                let saved_pos = self.current;
                self.advance(); // identifier
                self.advance(); // '['
                let index = self.parse_expression()?;
                if self.match_token(&TokenKind::RightBracket)
                    && let Some(op) = assign_op(self.peek_kind())
                {
                    self.advance(); // operator
                    let value = self.parse_expression()?;
                    return Ok(Stmt::Assign {
                        target: AssignTarget::Index(name, Box::new(index)),
                        op,
                        value,
                        location,
                    });
                }
                self.current = saved_pos;
            }
        }

        let expr = self.parse_expression()?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt> {
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            let else_loc = self.current_location();
            if self.match_token(&TokenKind::If) {
                Some(Box::new(self.parse_if_statement(else_loc)?))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block()?)))
            }
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    /// `for x in a { }`, `for cond { }`, or `for init; cond; post { }`.
    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt> {
        if let Some(TokenKind::Ident(name)) = self.peek_kind() {
            let name = name.clone();
            if matches!(self.peek_kind_at(1), Some(TokenKind::In)) {
                self.advance(); // identifier
                self.advance(); // 'in'
                let array = self.expect_identifier()?;
                let body = self.parse_block()?;
                return Ok(Stmt::ForIn {
                    var: name,
                    array,
                    body,
                    location,
                });
            }
        }

        let init = if self.check(&TokenKind::Semicolon) || self.check(&TokenKind::LeftBrace) {
            None
        } else {
            Some(self.parse_simple_statement()?)
        };

        if !self.check(&TokenKind::Semicolon) {
            // Condition-only loop: the clause just parsed must be a bare
            // expression.
            return match init {
                Some(Stmt::Expr(cond)) => {
                    let body = self.parse_block()?;
                    Ok(Stmt::For {
                        init: None,
                        condition: Some(cond),
                        update: None,
                        body,
                        location,
                    })
                }
                _ => Err(self.unexpected("';'")),
            };
        }

        self.expect(&TokenKind::Semicolon, "';'")?;
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, "';'")?;

        let update = if self.check(&TokenKind::LeftBrace) {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()?))
        };

        let body = self.parse_block()?;

        Ok(Stmt::For {
            init: init.map(Box::new),
            condition,
            update,
            body,
            location,
        })
    }

    fn parse_print_statement(&mut self, location: SourceLocation) -> Result<Stmt> {
        let mut args = Vec::new();

        // print without arguments prints the whole record.
        if self.can_start_expression() {
            args.push(self.parse_expression()?);
            while self.match_token(&TokenKind::Comma) {
                args.push(self.parse_expression()?);
            }
        }

        Ok(Stmt::Print { args, location })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Result<Expr> {
        let expr = self.parse_or()?;

        if self.match_token(&TokenKind::Question) {
            let location = expr.location();
            let then_expr = self.parse_expression()?;
            self.expect(&TokenKind::Colon, "':'")?;
            let else_expr = self.parse_ternary()?;
            return Ok(Expr::Ternary {
                condition: Box::new(expr),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
                location,
            });
        }

        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut expr = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            let location = self.current_location();
            self.advance();
            let right = self.parse_and()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOp::Or,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut expr = self.parse_match()?;

        while self.check(&TokenKind::And) {
            let location = self.current_location();
            self.advance();
            let right = self.parse_match()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOp::And,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn parse_match(&mut self) -> Result<Expr> {
        let expr = self.parse_comparison()?;

        let location = self.current_location();
        if self.match_token(&TokenKind::Match) {
            let pattern = self.parse_comparison()?;
            return Ok(Expr::Match {
                expr: Box::new(expr),
                pattern: Box::new(pattern),
                negated: false,
                location,
            });
        }

        if self.match_token(&TokenKind::NotMatch) {
            let pattern = self.parse_comparison()?;
            return Ok(Expr::Match {
                expr: Box::new(expr),
                pattern: Box::new(pattern),
                negated: true,
                location,
            });
        }

        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut expr = self.parse_additive()?;

        loop {
            let location = self.current_location();
            let op = if self.match_token(&TokenKind::Less) {
                BinaryOp::Lt
            } else if self.match_token(&TokenKind::LessEqual) {
                BinaryOp::Le
            } else if self.match_token(&TokenKind::Greater) {
                BinaryOp::Gt
            } else if self.match_token(&TokenKind::GreaterEqual) {
                BinaryOp::Ge
            } else if self.match_token(&TokenKind::EqualEqual) {
                BinaryOp::Eq
            } else if self.match_token(&TokenKind::NotEqual) {
                BinaryOp::Ne
            } else {
                break;
            };

            let right = self.parse_additive()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut expr = self.parse_multiplicative()?;

        loop {
            let location = self.current_location();
            let op = if self.match_token(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.match_token(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };

            let right = self.parse_multiplicative()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unary()?;

        loop {
            let location = self.current_location();
            let op = if self.match_token(&TokenKind::Star) {
                BinaryOp::Mul
            } else if self.match_token(&TokenKind::Slash) {
                BinaryOp::Div
            } else if self.match_token(&TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };

            let right = self.parse_unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let location = self.current_location();

        if self.match_token(&TokenKind::Not) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                location,
            });
        }

        if self.match_token(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                location,
            });
        }

        if self.match_token(&TokenKind::Dollar) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Field(Box::new(operand), location));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let location = self.current_location();

        let Some(kind) = self.peek_kind() else {
            return Err(self.unexpected("expression"));
        };

        match kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n, location))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(s, location))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, location))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, location))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LeftBracket => {
                self.advance();
                let mut elems = Vec::new();
                if !self.check(&TokenKind::RightBracket) {
                    elems.push(self.parse_expression()?);
                    while self.match_token(&TokenKind::Comma) {
                        elems.push(self.parse_expression()?);
                    }
                }
                self.expect(&TokenKind::RightBracket, "']'")?;
                Ok(Expr::ArrayLit(elems, location))
            }
            TokenKind::Ident(name) => {
                self.advance();

                if self.match_token(&TokenKind::LeftParen) {
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RightParen) {
                        args.push(self.parse_expression()?);
                        while self.match_token(&TokenKind::Comma) {
                            args.push(self.parse_expression()?);
                        }
                    }
                    self.expect(&TokenKind::RightParen, "')'")?;
                    return Ok(Expr::Call {
                        name,
                        args,
                        location,
                    });
                }

                if self.match_token(&TokenKind::LeftBracket) {
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RightBracket, "']'")?;
                    return Ok(Expr::Index {
                        array: name,
                        index: Box::new(index),
                        location,
                    });
                }

                Ok(Expr::Var(name, location))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), Some(TokenKind::Eof) | None)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.current).map(|t| &t.kind)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + offset).map(|t| &t.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current.min(self.tokens.len() - 1)];
        if self.current < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<()> {
        if self.match_token(kind) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        if let Some(TokenKind::Ident(name)) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn at_terminator(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Newline | TokenKind::Semicolon)
        )
    }

    fn skip_terminators(&mut self) {
        while self.at_terminator() {
            self.advance();
        }
    }

    fn can_start_expression(&self) -> bool {
        self.peek_kind()
            .map(TokenKind::can_start_expression)
            .unwrap_or(false)
    }

    fn current_location(&self) -> SourceLocation {
        self.tokens
            .get(self.current)
            .map(|t| t.location)
            .unwrap_or(SourceLocation::new(0, 0))
    }

    fn unexpected(&self, expected: &str) -> Error {
        let loc = self.current_location();
        let found = self
            .peek_kind()
            .map(token_name)
            .unwrap_or_else(|| "end of input".to_string());
        Error::parser(
            format!("unexpected {found}, expecting {expected}"),
            loc.line,
            loc.column,
        )
    }
}

fn assign_op(kind: Option<&TokenKind>) -> Option<AssignOp> {
    match kind {
        Some(TokenKind::Assign) => Some(AssignOp::Assign),
        Some(TokenKind::PlusAssign) => Some(AssignOp::Add),
        Some(TokenKind::MinusAssign) => Some(AssignOp::Sub),
        Some(TokenKind::StarAssign) => Some(AssignOp::Mul),
        Some(TokenKind::SlashAssign) => Some(AssignOp::Div),
        Some(TokenKind::PercentAssign) => Some(AssignOp::Mod),
        _ => None,
    }
}

/// Token spelling for diagnostics
fn token_name(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number {n}"),
        TokenKind::Str(s) => format!("string {s:?}"),
        TokenKind::Ident(name) => format!("identifier {name}"),
        TokenKind::Begin => "BEGIN".to_string(),
        TokenKind::End => "END".to_string(),
        TokenKind::Newline => "newline".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        other => format!("{other:?}"),
    }
}
