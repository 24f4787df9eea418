use crate::error::ParseError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Number(f32),
    /// Straight-alpha RGBA bytes.
    Color([u8; 4]),
    Colon,
    LBrace,
    RBrace,
    Eof,
}

/// A token with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1 }
    }

    /// Lexes the whole input. The result always ends with [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<TokenWithPos>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let (line, col) = (self.line, self.col);
            let token = self.next_token()?;
            let eof = token == Token::Eof;
            tokens.push(TokenWithPos { token, line, col });
            if eof {
                return Ok(tokens);
            }
        }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.line, self.col)
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            if self.rest().starts_with("//") {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
            } else if self.rest().starts_with("/*") {
                let start = self.err("unterminated block comment");
                self.advance();
                self.advance();
                loop {
                    if self.rest().starts_with("*/") {
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.advance().is_none() {
                        return Err(start);
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let Some(ch) = self.peek() else {
            return Ok(Token::Eof);
        };

        match ch {
            ':' => {
                self.advance();
                Ok(Token::Colon)
            }
            '{' => {
                self.advance();
                Ok(Token::LBrace)
            }
            '}' => {
                self.advance();
                Ok(Token::RBrace)
            }
            '"' => self.lex_string(),
            '#' => self.lex_color(),
            c if c.is_ascii_digit() || c == '-' => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.lex_ident()),
            other => Err(self.err(format!("unexpected character {other:?}"))),
        }
    }

    fn lex_string(&mut self) -> Result<Token, ParseError> {
        let start = self.err("unterminated string literal");
        self.advance();
        let mut s = String::new();
        loop {
            match self.advance() {
                None => return Err(start),
                Some('"') => return Ok(Token::Str(s)),
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(c) => s.push(c),
                    None => return Err(start),
                },
                Some(c) => s.push(c),
            }
        }
    }

    fn lex_color(&mut self) -> Result<Token, ParseError> {
        let start = self.err("");
        self.advance();

        let mut nibbles = Vec::with_capacity(8);
        while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
            self.advance();
            nibbles.push(d as u8);
        }
        if matches!(self.peek(), Some(c) if c.is_alphanumeric()) || !matches!(nibbles.len(), 6 | 8) {
            return Err(ParseError {
                message: "color literal must be #rrggbb or #rrggbbaa".into(),
                ..start
            });
        }

        let byte = |i: usize| nibbles[i * 2] << 4 | nibbles[i * 2 + 1];
        let a = if nibbles.len() == 8 { byte(3) } else { 255 };
        Ok(Token::Color([byte(0), byte(1), byte(2), a]))
    }

    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        let at = self.err("");
        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.src[start..self.pos];
        text.parse::<f32>().map(Token::Number).map_err(|_| ParseError {
            message: format!("invalid number {text:?}"),
            ..at
        })
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '-') {
            self.advance();
        }
        Token::Ident(self.src[start..self.pos].to_string())
    }
}
