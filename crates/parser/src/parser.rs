//! Record reader and AST to Pipeline conversion.

use std::path::Path;

use makespan_core::{Pipeline, Task};
use nom::IResult;

use crate::ast::{AstPipeline, AstTask};
use crate::combinators::{dependency_line, duration_line, end_marker, group_line, line, name_line};
use crate::error::ParseError;
use crate::span::{Span, span};

type Result<T> = std::result::Result<T, ParseError>;

/// Parses a pipeline from source content.
pub fn parse_pipeline(content: &str, path: &Path) -> Result<Pipeline> {
    let ast = read_records(content)?;
    Ok(convert_ast(ast, path))
}

/// Reads four-line records until `END` or the end of input.
fn read_records(src: &str) -> Result<AstPipeline> {
    let mut input = span(src);
    let mut ast = AstPipeline::default();

    while !input.fragment().trim().is_empty() {
        let (rest, first) = next_line(input, src)?;
        if end_marker(first).is_ok() {
            break;
        }

        let name = field(name_line, first, src, "expected a task name without spaces or commas")?;

        let (rest, text) = required_line(rest, src, &name, "duration")?;
        let duration = field(duration_line, text, src, "expected a positive integer duration")?;
        if duration == 0 {
            return Err(ParseError::at(
                format!("task '{name}' must take at least one minute"),
                src,
                text,
            ));
        }

        let (rest, text) = required_line(rest, src, &name, "group")?;
        let group = field(group_line, text, src, "group name must be a single word")?;

        let (rest, text) = required_line(rest, src, &name, "dependency")?;
        let dependencies = field(
            dependency_line,
            text,
            src,
            "expected a comma-separated list of task names",
        )?;

        ast.records.push(AstTask {
            name,
            duration,
            group,
            dependencies,
        });
        input = rest;
    }

    Ok(ast)
}

fn next_line<'a>(input: Span<'a>, src: &str) -> Result<(Span<'a>, Span<'a>)> {
    line(input).map_err(|_| ParseError::at("unreadable line", src, input))
}

/// Like [`next_line`], but a record that runs out of input is an error.
fn required_line<'a>(
    input: Span<'a>,
    src: &str,
    task: &str,
    what: &str,
) -> Result<(Span<'a>, Span<'a>)> {
    if input.fragment().is_empty() {
        return Err(ParseError::eof(
            format!("unexpected end of file: task '{task}' has no {what} line"),
            src,
        ));
    }
    next_line(input, src)
}

/// Runs a whole-line parser, labelling the first unparsed character on failure.
fn field<'a, O>(
    parser: fn(Span<'a>) -> IResult<Span<'a>, O>,
    text: Span<'a>,
    src: &str,
    message: &str,
) -> Result<O> {
    parser(text).map(|(_, out)| out).map_err(|err| match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => ParseError::at(message, src, e.input),
        nom::Err::Incomplete(_) => ParseError::at(message, src, text),
    })
}

/// Converts the AST to a Pipeline.
fn convert_ast(ast: AstPipeline, path: &Path) -> Pipeline {
    let mut pipeline = Pipeline::new(path);

    for record in ast.records {
        pipeline.add_task(convert_task(record));
    }

    pipeline
}

fn convert_task(ast: AstTask) -> Task {
    let mut task = Task::new(ast.name, ast.duration).with_dependencies(ast.dependencies);

    if let Some(group) = ast.group {
        task = task.with_group(group);
    }

    task
}
