//! Shape renderers for the page chrome.

mod common;

pub mod rect;
pub mod text;
