use owo_colors::OwoColorize;
use std::fmt::Display;

/// Semantic colors for CLI output.
pub struct Style;

impl Style {
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Configuration keys and field names.
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Language codes, e.g. in the `languages` listing.
    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }
}
