//! This module provides the parser for transition tables, utilizing the `pest` crate.
//! It defines the grammar for table files and functions to parse the input into a `Machine`.

use crate::{
    analyzer::analyze,
    types::{Direction, Machine, TapeConvention, TranslationError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the table grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TableParser;

/// Parses the given input string into a `Machine`.
///
/// The header line selects the tape convention; every rule line becomes one
/// transition, in file order and without deduplication. The parsed machine is
/// validated before being returned.
///
/// # Returns
///
/// * `Ok(Machine)` if the input is successfully parsed and validated.
/// * `Err(TranslationError::ParseError)` if there are any syntax errors.
/// * `Err(TranslationError::UnsupportedConvention)` if the header tag is neither `S` nor `I`.
/// * `Err(TranslationError::ValidationError)` if the table fails validation.
pub fn parse(input: &str) -> Result<Machine, TranslationError> {
    let root = TableParser::parse(Rule::program, input.trim())
        .map_err(|e| TranslationError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TranslationError::ValidationError("Empty table".into()))?;

    let machine = parse_program(root)?;

    analyze(&machine)?;

    Ok(machine)
}

/// Builds a `Machine` from a `Pair<Rule::program>`.
fn parse_program(pair: Pair<Rule>) -> Result<Machine, TranslationError> {
    let mut machine: Option<Machine> = None;

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::header => machine = Some(Machine::new(parse_header(p)?)),
            Rule::transition => {
                let span = p.as_span();
                let machine = machine
                    .as_mut()
                    .ok_or_else(|| parse_error("Rule line before the header", span))?;
                parse_transition(p, machine)?;
            }
            _ => {} // EOI
        }
    }

    machine.ok_or_else(|| TranslationError::ValidationError("Missing ';S' or ';I' header".into()))
}

/// Reads the tape convention from a `Pair<Rule::header>`.
fn parse_header(pair: Pair<Rule>) -> Result<TapeConvention, TranslationError> {
    let span = pair.as_span();
    let tag = pair
        .into_inner()
        .next()
        .ok_or_else(|| parse_error("Missing tape convention", span))?;

    TapeConvention::from_tag(tag.as_str())
}

/// Parses one rule line and appends it to `machine`.
fn parse_transition(pair: Pair<Rule>, machine: &mut Machine) -> Result<(), TranslationError> {
    let span = pair.as_span();
    let tokens: Vec<Pair<Rule>> = pair.into_inner().collect();

    // Rule: transition > state symbol symbol movement state
    let [state, read, write, movement, next] = tokens.as_slice() else {
        return Err(parse_error("Expected 'state read write move next'", span));
    };

    machine.add_transition(
        state.as_str(),
        parse_symbol(read)?,
        parse_symbol(write)?,
        parse_direction(movement)?,
        next.as_str(),
    );

    Ok(())
}

/// Creates a `TranslationError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TranslationError {
    TranslationError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Parses a single direction from a `Pair<Rule::movement>`.
///
/// Supports 'l' or 'L' for Left, 'r' or 'R' for Right, and '*' for Stay.
/// The legacy 'd' code is rejected: some tables use it for "stay" and
/// others for "down", so there is no safe reading of it.
fn parse_direction(pair: &Pair<Rule>) -> Result<Direction, TranslationError> {
    let span = pair.as_span();
    match pair.as_str() {
        "l" | "L" => Ok(Direction::Left),
        "r" | "R" => Ok(Direction::Right),
        "*" => Ok(Direction::Stay),
        "d" | "D" => Err(parse_error(
            &format!("Ambiguous move code '{}'", pair.as_str()),
            span,
        )),
        other => Err(parse_error(&format!("Unsupported move code: {other}"), span)),
    }
}

/// Parses a single character symbol from a `Pair<Rule::symbol>`.
fn parse_symbol(pair: &Pair<Rule>) -> Result<char, TranslationError> {
    pair.as_str()
        .chars()
        .next()
        .ok_or_else(|| parse_error("Missing symbol", pair.as_span()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transition;

    #[test]
    fn test_parse_simple_table() {
        let input = r#"
;S
0 0 1 r 0
0 _ _ * halt
"#;

        let result = parse(input);
        assert!(result.is_ok());

        let machine = result.unwrap();
        assert_eq!(machine.convention, TapeConvention::OneWayInfinite);
        assert_eq!(
            machine.transitions,
            vec![
                Transition::new("0", '0', '1', Direction::Right, "0"),
                Transition::new("0", '_', '_', Direction::Stay, "halt"),
            ]
        );
    }

    #[test]
    fn test_parse_two_way_header() {
        let machine = parse(";I\n0 * * l halt-accept").unwrap();
        assert_eq!(machine.convention, TapeConvention::TwoWayInfinite);
        assert_eq!(
            machine.transitions[0],
            Transition::new("0", '*', '*', Direction::Left, "halt-accept")
        );
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let input = ";S\n\n; walks right\n  0 a b R 0   \n\t\n; done\n0 _ _ L halt\n";

        let machine = parse(input).unwrap();
        assert_eq!(machine.len(), 2);
        assert_eq!(machine.transitions[0].direction, Direction::Right);
        assert_eq!(machine.transitions[1].direction, Direction::Left);
    }

    #[test]
    fn test_parse_keeps_duplicate_rules() {
        let machine = parse(";S\n0 0 0 r 0\n0 0 0 r 0").unwrap();
        assert_eq!(machine.len(), 2);
    }

    #[test]
    fn test_parse_empty_table() {
        let machine = parse(";I\n").unwrap();
        assert!(machine.is_empty());
    }

    #[test]
    fn test_parse_unsupported_convention() {
        let result = parse(";X\n0 0 0 r 0");
        assert_eq!(
            result,
            Err(TranslationError::UnsupportedConvention("X".into()))
        );
    }

    #[test]
    fn test_parse_missing_header() {
        let result = parse("0 0 1 r halt");
        assert!(matches!(result, Err(TranslationError::ParseError(_))));
    }

    #[test]
    fn test_parse_ambiguous_move_code() {
        let result = parse(";S\n0 0 1 d halt");
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(matches!(error, TranslationError::ParseError(_)));
        assert!(error.to_string().contains("Ambiguous move code 'd'"));
    }

    #[test]
    fn test_parse_unsupported_move_code() {
        let error = parse(";S\n0 0 1 > halt").unwrap_err();
        assert!(matches!(error, TranslationError::ParseError(_)));
        assert!(error.to_string().contains("Unsupported move code: >"));
    }

    #[test]
    fn test_parse_multi_character_symbol() {
        let result = parse(";S\n0 ab 1 r halt");
        assert!(matches!(result, Err(TranslationError::ParseError(_))));
    }

    #[test]
    fn test_parse_wrong_token_count() {
        assert!(matches!(
            parse(";S\n0 0 1 r"),
            Err(TranslationError::ParseError(_))
        ));
        assert!(matches!(
            parse(";S\n0 0 1 r halt extra"),
            Err(TranslationError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_reports_line() {
        let error = parse(";S\n0 0 1 r 0\n0 1 0 x 0").unwrap_err();
        assert!(error.to_string().contains("3:"));
    }

    #[test]
    fn test_parse_runs_analyzer() {
        let result = parse(";S\n* 0 1 r halt");
        assert!(matches!(result, Err(TranslationError::ValidationError(_))));
    }
}
