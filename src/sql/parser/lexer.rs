//! Command lexer - splits an input line into tokens

use std::{fmt::Display, iter::Peekable, str::Chars};

use crate::error::{Error, Result};

/// Represents a single lexical token in the input
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Reserved keyword
    Keyword(Keyword),
    /// Identifier such as table, column or type name, case preserved
    Ident(String),
    /// Quoted string literal, quotes removed
    String(String),
    /// Numeric literal (integer or decimal)
    Number(String),
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
    Asterisk,
    Minus,
    Equal,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Token::Keyword(keyword) => keyword.to_str(),
            Token::Ident(ident) => ident,
            Token::String(v) => v,
            Token::Number(n) => n,
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Asterisk => "*",
            Token::Minus => "-",
            Token::Equal => "=",
        })
    }
}

/// Reserved keywords
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword {
    Create,
    Drop,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Delete,
    Update,
    Set,
    Export,
    To,
    True,
    False,
    Null,
}

impl Keyword {
    /// Attempts to parse a string as a keyword (case-insensitive)
    pub fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_str() {
            "CREATE" => Keyword::Create,
            "DROP" => Keyword::Drop,
            "TABLE" => Keyword::Table,
            "INSERT" => Keyword::Insert,
            "INTO" => Keyword::Into,
            "VALUES" => Keyword::Values,
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "WHERE" => Keyword::Where,
            "DELETE" => Keyword::Delete,
            "UPDATE" => Keyword::Update,
            "SET" => Keyword::Set,
            "EXPORT" => Keyword::Export,
            "TO" => Keyword::To,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "NULL" => Keyword::Null,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Drop => "DROP",
            Keyword::Table => "TABLE",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Delete => "DELETE",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::Export => "EXPORT",
            Keyword::To => "TO",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Null => "NULL",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scan() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => self
                .iter
                .peek()
                .map(|c| Err(Error::Parse(format!("[Lexer] Unexpected character {}", c)))),
            Err(err) => Some(Err(err)),
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            iter: text.chars().peekable(),
        }
    }

    /// Consumes the next character if it satisfies the predicate
    fn next_if<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        self.iter.peek().filter(|&c| predicate(*c))?;
        self.iter.next()
    }

    /// Consumes consecutive characters while they satisfy the predicate
    fn next_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    fn next_if_token<F: Fn(char) -> Option<Token>>(&mut self, predicate: F) -> Option<Token> {
        let token = self.iter.peek().and_then(|c| predicate(*c))?;
        self.iter.next();
        Some(token)
    }

    fn erase_whitespace(&mut self) {
        self.next_while(|c| c.is_whitespace());
    }

    fn scan(&mut self) -> Result<Option<Token>> {
        self.erase_whitespace();
        match self.iter.peek() {
            Some(&quote) if quote == '\'' || quote == '"' => self.scan_string(quote),
            Some(c) if c.is_ascii_digit() => Ok(self.scan_number()),
            Some(c) if c.is_alphabetic() || *c == '_' => Ok(self.scan_ident()),
            Some(_) => Ok(self.scan_symbol()),
            None => Ok(None),
        }
    }

    /// Scans a string literal enclosed in `quote`
    fn scan_string(&mut self, quote: char) -> Result<Option<Token>> {
        self.iter.next();
        let mut val = String::new();

        loop {
            match self.iter.next() {
                Some(c) if c == quote => break,
                Some(c) => val.push(c),
                None => return Err(Error::Parse("[Lexer] Unexpected end of string".to_string())),
            }
        }
        Ok(Some(Token::String(val)))
    }

    fn scan_number(&mut self) -> Option<Token> {
        let mut val = self.next_while(|c| c.is_ascii_digit())?;
        if let Some(sep) = self.next_if(|c| c == '.') {
            val.push(sep);
            while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
                val.push(c);
            }
        }
        Some(Token::Number(val))
    }

    /// Scans an identifier or keyword. Identifiers keep their case since
    /// table and column names are matched exactly.
    fn scan_ident(&mut self) -> Option<Token> {
        let mut val = self.next_if(|c| c.is_alphabetic() || c == '_')?.to_string();
        while let Some(c) = self.next_if(|c| c.is_alphanumeric() || c == '_') {
            val.push(c);
        }
        Some(Keyword::from_str(&val).map_or(Token::Ident(val), Token::Keyword))
    }

    fn scan_symbol(&mut self) -> Option<Token> {
        self.next_if_token(|c| match c {
            '*' => Some(Token::Asterisk),
            '(' => Some(Token::OpenParen),
            ')' => Some(Token::CloseParen),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            '-' => Some(Token::Minus),
            '=' => Some(Token::Equal),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Keyword, Lexer, Token};
    use crate::error::{Error, Result};

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    #[test]
    fn test_lexer_create_table() -> Result<()> {
        let tokens = Lexer::new(
            "CREATE table Users
                (
                    id int,
                    name varchar(20)
                );",
        )
        .collect::<Result<Vec<_>>>()?;

        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Create),
                Token::Keyword(Keyword::Table),
                ident("Users"),
                Token::OpenParen,
                ident("id"),
                ident("int"),
                Token::Comma,
                ident("name"),
                ident("varchar"),
                Token::OpenParen,
                Token::Number("20".to_string()),
                Token::CloseParen,
                Token::CloseParen,
                Token::Semicolon,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_lexer_insert_into() -> Result<()> {
        let tokens = Lexer::new("insert into tbl values (1, -2.5, 'a b', \"it's\", true, null)")
            .collect::<Result<Vec<_>>>()?;

        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Insert),
                Token::Keyword(Keyword::Into),
                ident("tbl"),
                Token::Keyword(Keyword::Values),
                Token::OpenParen,
                Token::Number("1".to_string()),
                Token::Comma,
                Token::Minus,
                Token::Number("2.5".to_string()),
                Token::Comma,
                Token::String("a b".to_string()),
                Token::Comma,
                Token::String("it's".to_string()),
                Token::Comma,
                Token::Keyword(Keyword::True),
                Token::Comma,
                Token::Keyword(Keyword::Null),
                Token::CloseParen,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_lexer_where_clause() -> Result<()> {
        let tokens = Lexer::new("select * from t where _Name='x';").collect::<Result<Vec<_>>>()?;

        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Select),
                Token::Asterisk,
                Token::Keyword(Keyword::From),
                ident("t"),
                Token::Keyword(Keyword::Where),
                ident("_Name"),
                Token::Equal,
                Token::String("x".to_string()),
                Token::Semicolon,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_lexer_errors() {
        let unterminated = Lexer::new("'abc").collect::<Result<Vec<_>>>();
        assert!(matches!(unterminated, Err(Error::Parse(_))));

        let unknown = Lexer::new("a > b").collect::<Result<Vec<_>>>();
        assert!(matches!(unknown, Err(Error::Parse(_))));
    }
}
