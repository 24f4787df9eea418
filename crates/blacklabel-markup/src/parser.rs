use crate::ast::{Document, Node, Prop, Value};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

/// Deepest node nesting accepted. Pages are a handful of levels deep; the
/// cap keeps hostile input from exhausting the stack.
pub const MAX_DEPTH: usize = 64;

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    fn current(&self) -> Option<&TokenWithPos> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    fn peek(&self) -> &Token {
        self.current().map_or(&Token::Eof, |t| &t.token)
    }

    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map_or(&Token::Eof, |t| &t.token)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Error positioned at the current (not yet consumed) token.
    fn err(&self, message: impl Into<String>) -> ParseError {
        let (line, col) = self.current().map_or((1, 1), |t| (t.line, t.col));
        ParseError::new(message, line, col)
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let root = self.parse_node()?;
        match self.peek() {
            Token::Eof => Ok(Document { root }),
            tok => Err(self.err(format!("expected end of input after root node, got {tok:?}"))),
        }
    }

    // ── Node ──────────────────────────────────────────────────────────────

    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let (line, col) = self.current().map_or((1, 1), |t| (t.line, t.col));
        let name = match self.peek() {
            Token::Ident(name) => name.clone(),
            tok => return Err(self.err(format!("expected a node name, got {tok:?}"))),
        };
        if self.depth >= MAX_DEPTH {
            return Err(self.err(format!("`{name}` is nested deeper than {MAX_DEPTH} levels")));
        }
        self.advance();

        let content = match self.peek() {
            Token::Str(s) => {
                let s = s.clone();
                self.advance();
                Some(s)
            }
            _ => None,
        };

        let (props, children) = if self.peek() == &Token::LBrace {
            self.depth += 1;
            let block = self.parse_block();
            self.depth -= 1;
            block?
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Node { name, content, props, children, line, col })
    }

    /// `{ item* }`: an identifier followed by `:` starts a property, any other
    /// identifier starts a child node.
    fn parse_block(&mut self) -> Result<(Vec<Prop>, Vec<Node>), ParseError> {
        let open = self.err("unclosed '{' block");
        self.advance();

        let mut props = Vec::new();
        let mut children = Vec::new();
        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    return Ok((props, children));
                }
                Token::Eof => return Err(open),
                Token::Ident(_) if self.peek_ahead(1) == &Token::Colon => {
                    props.push(self.parse_prop()?);
                }
                Token::Ident(_) => children.push(self.parse_node()?),
                tok => {
                    return Err(self.err(format!(
                        "unexpected {tok:?} in block; expected `key: value` or a node name"
                    )));
                }
            }
        }
    }

    fn parse_prop(&mut self) -> Result<Prop, ParseError> {
        let Token::Ident(key) = self.advance() else {
            return Err(self.err("expected property name"));
        };
        self.advance(); // `:`
        let value = self.parse_value()?;
        Ok(Prop { key, value })
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let value = match self.peek() {
            Token::Str(s) => Value::Str(s.clone()),
            Token::Number(n) => Value::Number(*n),
            Token::Color(c) => Value::Color(*c),
            Token::Ident(s) => Value::Ident(s.clone()),
            tok => return Err(self.err(format!("expected a value, got {tok:?}"))),
        };
        self.advance();
        Ok(value)
    }
}

/// Parses `.blm` source into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_document()
}
