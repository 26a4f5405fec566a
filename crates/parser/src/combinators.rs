//! Nom parser combinators for the pipeline file format.
//!
//! Line-oriented: [`line`] splits the input, and each `*_line` parser must
//! consume a whole line.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, line_ending, not_line_ending, space0},
    combinator::{all_consuming, eof, map, map_res, opt, value},
    multi::separated_list1,
    sequence::{delimited, terminated},
};

use crate::span::Span;

// ============================================================================
// Utility combinators
// ============================================================================

/// Wraps a parser with surrounding spaces and tabs.
fn padded<'a, F, O>(mut inner: F) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, O>
where
    F: Parser<Span<'a>, Output = O, Error = nom::error::Error<Span<'a>>>,
{
    move |input| {
        let (input, _) = space0(input)?;
        let (input, result) = inner.parse(input)?;
        let (input, _) = space0(input)?;
        Ok((input, result))
    }
}

/// Splits off one line, consuming its terminator or the end of input.
pub fn line(input: Span) -> IResult<Span, Span> {
    terminated(not_line_ending, alt((line_ending, eof))).parse(input)
}

/// Parses a task or group name: a run of anything but whitespace and commas.
pub fn name(input: Span) -> IResult<Span, String> {
    map(
        take_while1(|c: char| !c.is_whitespace() && c != ','),
        |s: Span| s.fragment().to_string(),
    )
    .parse(input)
}

// ============================================================================
// Record lines
// ============================================================================

/// Parses the `END` marker that terminates a pipeline early.
pub fn end_marker(input: Span) -> IResult<Span, ()> {
    value((), all_consuming(padded(tag("END")))).parse(input)
}

/// Parses line 1 of a record: the task name.
pub fn name_line(input: Span) -> IResult<Span, String> {
    all_consuming(padded(name)).parse(input)
}

/// Parses line 2 of a record: the duration in minutes.
pub fn duration_line(input: Span) -> IResult<Span, u32> {
    all_consuming(padded(map_res(digit1, |s: Span| s.fragment().parse::<u32>()))).parse(input)
}

/// Parses line 3 of a record: the group name, blank for ungrouped.
pub fn group_line(input: Span) -> IResult<Span, Option<String>> {
    all_consuming(padded(opt(name))).parse(input)
}

/// Parses line 4 of a record: `a, b, c`, blank for no dependencies.
pub fn dependency_line(input: Span) -> IResult<Span, Vec<String>> {
    map(
        all_consuming(padded(opt(separated_list1(
            delimited(space0, char(','), space0),
            name,
        )))),
        Option::unwrap_or_default,
    )
    .parse(input)
}
