use std::iter::Peekable;

use crate::error::{Error, Result};
use crate::sql::parser::ast::Condition;
use crate::sql::parser::lexer::{Keyword, Lexer, Token};
use crate::storage::Column;

pub mod ast;
mod lexer;

/// Command parser - converts tokens into a [`ast::Statement`]
pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input).peekable(),
        }
    }

    /// Parses one statement. The trailing semicolon is optional, but nothing
    /// may follow it.
    pub fn parse(&mut self) -> Result<ast::Statement> {
        let stmt = self.parse_statement()?;
        self.next_if_token(Token::Semicolon);
        if let Some(token) = self.peek()? {
            return Err(Error::Parse(format!("[Parser] Unexpected token {}", token)));
        }
        Ok(stmt)
    }

    fn parse_statement(&mut self) -> Result<ast::Statement> {
        match self.peek()? {
            Some(Token::Keyword(Keyword::Create)) => self.parse_create_table(),
            Some(Token::Keyword(Keyword::Drop)) => self.parse_drop_table(),
            Some(Token::Keyword(Keyword::Insert)) => self.parse_insert(),
            Some(Token::Keyword(Keyword::Select)) => self.parse_select(),
            Some(Token::Keyword(Keyword::Delete)) => self.parse_delete(),
            Some(Token::Keyword(Keyword::Update)) => self.parse_update(),
            Some(Token::Keyword(Keyword::Export)) => self.parse_export(),
            Some(t) => Err(Error::Parse(format!("[Parser] Unexpected token {}", t))),
            None => Err(Error::Parse("[Parser] Unexpected end of input".to_string())),
        }
    }

    fn parse_create_table(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Create))?;
        self.next_expect(Token::Keyword(Keyword::Table))?;
        let name = self.next_ident()?;
        self.next_expect(Token::OpenParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column()?);
            match self.next()? {
                Token::CloseParen => break,
                Token::Comma => {}
                token => return Err(Error::Parse(format!("[Parser] Unexpected token {}", token))),
            }
        }
        Ok(ast::Statement::CreateTable { name, columns })
    }

    /// Parses `name [type[(n[, m])]]`. The type is kept as written.
    fn parse_column(&mut self) -> Result<Column> {
        let name = self.next_ident()?;
        let mut datatype = match self.next_if(|t| matches!(t, Token::Ident(_))) {
            Some(token) => token.to_string(),
            None => String::new(),
        };

        if !datatype.is_empty() && self.next_if_token(Token::OpenParen).is_some() {
            datatype.push('(');
            loop {
                match self.next()? {
                    Token::Number(n) => datatype.push_str(&n),
                    token => return Err(Error::Parse(format!("[Parser] Unexpected token {}", token))),
                }
                match self.next()? {
                    Token::CloseParen => break,
                    Token::Comma => datatype.push(','),
                    token => return Err(Error::Parse(format!("[Parser] Unexpected token {}", token))),
                }
            }
            datatype.push(')');
        }
        Ok(Column { name, datatype })
    }

    fn parse_drop_table(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Drop))?;
        self.next_expect(Token::Keyword(Keyword::Table))?;
        Ok(ast::Statement::DropTable {
            name: self.next_ident()?,
        })
    }

    fn parse_insert(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Insert))?;
        self.next_expect(Token::Keyword(Keyword::Into))?;
        let table_name = self.next_ident()?;
        self.next_expect(Token::Keyword(Keyword::Values))?;
        self.next_expect(Token::OpenParen)?;

        let mut values = Vec::new();
        loop {
            values.push(self.parse_value()?);
            match self.next()? {
                Token::CloseParen => break,
                Token::Comma => {}
                token => return Err(Error::Parse(format!("[Parser] Unexpected token {}", token))),
            }
        }
        Ok(ast::Statement::Insert { table_name, values })
    }

    /// Only `SELECT *` is supported
    fn parse_select(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Select))?;
        self.next_expect(Token::Asterisk)?;
        self.next_expect(Token::Keyword(Keyword::From))?;
        let table_name = self.next_ident()?;
        Ok(ast::Statement::Select {
            table_name,
            where_clause: self.parse_where_clause()?,
        })
    }

    fn parse_delete(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Delete))?;
        self.next_expect(Token::Keyword(Keyword::From))?;
        let table_name = self.next_ident()?;
        match self.parse_where_clause()? {
            Some(where_clause) => Ok(ast::Statement::Delete {
                table_name,
                where_clause,
            }),
            None => Err(Error::Parse(
                "[Parser] DELETE requires a WHERE clause".to_string(),
            )),
        }
    }

    fn parse_update(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Update))?;
        let table_name = self.next_ident()?;
        self.next_expect(Token::Keyword(Keyword::Set))?;
        let column = self.next_ident()?;
        self.next_expect(Token::Equal)?;
        let value = self.parse_value()?;
        match self.parse_where_clause()? {
            Some(where_clause) => Ok(ast::Statement::Update {
                table_name,
                column,
                value,
                where_clause,
            }),
            None => Err(Error::Parse(
                "[Parser] UPDATE requires a WHERE clause".to_string(),
            )),
        }
    }

    fn parse_export(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Export))?;
        self.next_expect(Token::Keyword(Keyword::Table))?;
        let table_name = self.next_ident()?;
        self.next_expect(Token::Keyword(Keyword::To))?;
        match self.next()? {
            Token::String(path) => Ok(ast::Statement::Export { table_name, path }),
            token => Err(Error::Parse(format!(
                "[Parser] Expected quoted path, got token {}",
                token
            ))),
        }
    }

    /// Parses a literal into its stored text: quotes are dropped, numbers
    /// and bare words are kept as written, keywords become upper case.
    fn parse_value(&mut self) -> Result<String> {
        Ok(match self.next()? {
            Token::Number(n) => n,
            Token::Minus => match self.next()? {
                Token::Number(n) => format!("-{}", n),
                t => return Err(Error::Parse(format!("[Parser] Unexpected value token {}", t))),
            },
            Token::String(s) => s,
            Token::Ident(s) => s,
            Token::Keyword(k @ (Keyword::True | Keyword::False | Keyword::Null)) => k.to_string(),
            t => return Err(Error::Parse(format!("[Parser] Unexpected value token {}", t))),
        })
    }

    /// Parses an optional `WHERE column = value`
    fn parse_where_clause(&mut self) -> Result<Option<Condition>> {
        if self.next_if_token(Token::Keyword(Keyword::Where)).is_none() {
            return Ok(None);
        }
        let column = self.next_ident()?;
        self.next_expect(Token::Equal)?;
        let value = self.parse_value()?;
        Ok(Some(Condition { column, value }))
    }

    fn peek(&mut self) -> Result<Option<Token>> {
        self.lexer.peek().cloned().transpose()
    }

    fn next(&mut self) -> Result<Token> {
        self.lexer
            .next()
            .unwrap_or_else(|| Err(Error::Parse("[Parser] Unexpected end of input".to_string())))
    }

    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            token => Err(Error::Parse(format!(
                "[Parser] Expected ident, got token {}",
                token
            ))),
        }
    }

    fn next_expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::Parse(format!(
                "[Parser] Expected token {}, got {}",
                expect, token
            )));
        }
        Ok(())
    }

    /// Consumes next token if it satisfies the predicate
    fn next_if<F: Fn(&Token) -> bool>(&mut self, predicate: F) -> Option<Token> {
        self.peek().unwrap_or(None).filter(|t| predicate(t))?;
        self.next().ok()
    }

    fn next_if_token(&mut self, token: Token) -> Option<Token> {
        self.next_if(|t| t == &token)
    }
}
