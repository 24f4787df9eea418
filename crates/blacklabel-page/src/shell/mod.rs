//! Page Shell: the static header and hero around the backdrop.
//!
//! [`PageShell`] is the typed model, built from `.blm` markup or taken from
//! [`PageShell::default`]. [`PageLayout`] places it in a viewport and
//! [`paint_page`] turns the result into draw commands. Nothing here reacts to
//! input; the call-to-action buttons are drawn, never wired.

mod error;
mod layout;
mod model;
mod painter;

pub use error::ShellError;
pub use layout::{ButtonBox, PageLayout, TextBlock, estimate_text};
pub use model::{BackdropSlot, CallToAction, CtaStyle, HeroCopy, NavLink, PageShell, Theme};
pub use painter::paint_page;
