//! Terminal output helpers for the CLI.

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;
