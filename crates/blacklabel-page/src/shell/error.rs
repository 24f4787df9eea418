use blacklabel_markup::ParseError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("expected a `Page` root at {line}:{col}, found `{found}`")]
    UnexpectedRoot { found: String, line: usize, col: usize },

    #[error("`{parent}` at {line}:{col} has no `{node}`")]
    MissingNode { node: &'static str, parent: String, line: usize, col: usize },

    #[error("`{node}` at {line}:{col} needs a quoted text")]
    MissingText { node: String, line: usize, col: usize },

    #[error("unknown button style `{style}` at {line}:{col}; expected `primary` or `ghost`")]
    UnknownStyle { style: String, line: usize, col: usize },

    #[error("backdrop height_ratio {value} at {line}:{col} is outside (0, 1]")]
    InvalidRatio { value: f32, line: usize, col: usize },
}
