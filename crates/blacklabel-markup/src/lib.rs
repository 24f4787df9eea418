//! Lexer, parser and AST for the Black Label page markup (`.blm`).
//!
//! A page is one tree of named nodes. Each node may carry a quoted content
//! string and a `{ ... }` block mixing `key: value` properties with child
//! nodes:
//!
//! ```rust
//! use blacklabel_markup::parse_str;
//!
//! let doc = parse_str(r##"
//!     Page {
//!         background: #050509
//!         Header "EXOTIC BLACK" {
//!             Link "Fleet" { href: "#fleet" }
//!         }
//!     }
//! "##).unwrap();
//!
//! assert_eq!(doc.root.name, "Page");
//! assert_eq!(doc.root.children[0].content.as_deref(), Some("EXOTIC BLACK"));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Document, Node, Prop, Value};
pub use error::ParseError;
pub use parser::parse_str;
