//! Black Label landing page.
//!
//! - [`shell`]: the static header and hero, authored in `.blm` markup
//! - [`backdrop`]: the animated 3D scene mounted behind the hero
//! - [`Application`]: builder that wires both into the window runtime
//!
//! ```rust,ignore
//! use blacklabel_page::Application;
//!
//! Application::new()
//!     .title("EXOTIC BLACK")
//!     .page(include_str!("../ui/landing.blm"))
//!     .run();
//! ```

pub mod backdrop;
pub mod shell;

mod app;

pub use app::Application;
pub use backdrop::{BackdropConfig, BackgroundAnimation};
pub use shell::PageShell;
