//! Input spans with position tracking.

use nom_locate::LocatedSpan;

/// Input type with position tracking.
pub type Span<'a> = LocatedSpan<&'a str>;

/// Creates a new span from a string slice.
pub fn span(input: &str) -> Span<'_> {
    Span::new(input)
}
