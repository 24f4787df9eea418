use std::fmt;

use blacklabel_engine::gfx::EngineError;

/// Something activation needs but was not given.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Prerequisite {
    /// No host container, or it was removed from the host.
    Container,
    /// No 3D engine was injected.
    Engine,
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Prerequisite::Container => "host container",
            Prerequisite::Engine => "3D engine",
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackdropError {
    #[error("{0} unavailable")]
    PrerequisiteMissing(Prerequisite),

    #[error("3D engine failed: {0}")]
    Engine(#[from] EngineError),
}

impl From<Prerequisite> for BackdropError {
    fn from(p: Prerequisite) -> Self {
        BackdropError::PrerequisiteMissing(p)
    }
}
