// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Scanner for iCalendar content lines.
//!
//! ```text
//! Source Text → Lexer → Token Stream → Scanner → Content Lines
//! ```
//!
//! Per RFC 5545, a content line has the format:
//! ```text
//! contentline = name *(";" param) ":" value CRLF
//! ```

use std::iter::Peekable;

use crate::parser::ParseError;
use crate::syntax::lexer::{SpannedToken, Token, tokenize};
use crate::syntax::{Parameter, Property};

/// A scanned content line with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// The property the line carries.
    pub property: Property,
    /// Byte offset of the first character of the line.
    pub start: usize,
}

/// Scan `src` into content lines, stopping at the first malformed one.
///
/// Blank lines are skipped.
pub fn scan_content_lines(src: &str) -> Result<Vec<ContentLine>, ParseError> {
    let mut tokens = tokenize(src).peekable();
    let mut lines = Vec::new();

    while let Some(SpannedToken(token, span)) = tokens.peek() {
        if matches!(token, Token::Newline) {
            tokens.next();
            continue;
        }

        let start = span.start;
        let property = scan_content_line(&mut tokens)
            .map_err(|kind| kind.at(line_number(src, start)))?;
        lines.push(ContentLine { property, start });
    }

    Ok(lines)
}

/// 1-based line number of the byte at `offset`.
pub fn line_number(src: &str, offset: usize) -> usize {
    let before = src.get(..offset).unwrap_or(src);
    before.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Scan errors before the line number is known.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanError {
    OrphanContinuation,
    MissingValue,
    InvalidName(String),
    UnterminatedQuote,
}

impl ScanError {
    fn at(self, line: usize) -> ParseError {
        match self {
            Self::OrphanContinuation => ParseError::OrphanContinuation { line },
            Self::MissingValue => ParseError::MissingValue { line },
            Self::InvalidName(name) => ParseError::InvalidName { line, name },
            Self::UnterminatedQuote => ParseError::UnterminatedQuote { line },
        }
    }
}

/// Scan one line: `name *(";" param) ":" value`, consuming its line break.
fn scan_content_line<'src, I>(tokens: &mut Peekable<I>) -> Result<Property, ScanError>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    if matches!(
        tokens.peek(),
        Some(SpannedToken(Token::Text(text), span)) if span.start == 0 && text.starts_with([' ', '\t'])
    ) {
        return Err(ScanError::OrphanContinuation);
    }

    let name = scan_name(tokens)?;

    let mut parameters = Vec::new();
    while next_if(tokens, |t| matches!(t, Token::Semicolon)) {
        parameters.push(scan_parameter(tokens)?);
    }

    if !next_if(tokens, |t| matches!(t, Token::Colon)) {
        return Err(ScanError::MissingValue);
    }

    let mut value = String::new();
    for SpannedToken(token, _) in tokens.by_ref() {
        if matches!(token, Token::Newline) {
            break;
        }
        value.push_str(token.as_str());
    }

    Ok(Property {
        name,
        parameters,
        value,
    })
}

/// A property or parameter name, followed by the delimiter the caller expects.
fn scan_name<'src, I>(tokens: &mut Peekable<I>) -> Result<String, ScanError>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let mut name = String::new();
    while let Some(SpannedToken(Token::Word(word), _)) = tokens.peek() {
        name.push_str(word);
        tokens.next();
    }

    match tokens.peek() {
        Some(SpannedToken(Token::Semicolon | Token::Colon | Token::Equal, _)) if !name.is_empty() => {
            Ok(name)
        }
        Some(SpannedToken(Token::Newline, _)) | None if !name.is_empty() => {
            Err(ScanError::MissingValue)
        }
        _ => {
            // keep the offending text in the error up to the next delimiter
            while let Some(SpannedToken(token, _)) = tokens.peek() {
                if matches!(
                    token,
                    Token::Semicolon | Token::Colon | Token::Equal | Token::Newline
                ) {
                    break;
                }
                name.push_str(token.as_str());
                tokens.next();
            }
            Err(ScanError::InvalidName(name))
        }
    }
}

/// `name "=" param-value *("," param-value)`
fn scan_parameter<'src, I>(tokens: &mut Peekable<I>) -> Result<Parameter, ScanError>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let name = scan_name(tokens)?;
    if !next_if(tokens, |t| matches!(t, Token::Equal)) {
        return Err(ScanError::MissingValue);
    }

    let mut values = vec![scan_parameter_value(tokens)?];
    while next_if(tokens, |t| matches!(t, Token::Comma)) {
        values.push(scan_parameter_value(tokens)?);
    }

    Ok(Parameter { name, values })
}

/// A quoted or bare parameter value, unquoted.
fn scan_parameter_value<'src, I>(tokens: &mut Peekable<I>) -> Result<String, ScanError>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let mut value = String::new();

    if next_if(tokens, |t| matches!(t, Token::DQuote)) {
        loop {
            match tokens.next() {
                Some(SpannedToken(Token::DQuote, _)) => return Ok(value),
                Some(SpannedToken(Token::Newline, _)) | None => {
                    return Err(ScanError::UnterminatedQuote);
                }
                Some(SpannedToken(token, _)) => value.push_str(token.as_str()),
            }
        }
    }

    while let Some(SpannedToken(token, _)) = tokens.peek() {
        match token {
            Token::Comma | Token::Semicolon | Token::Colon => return Ok(value),
            Token::Newline => return Err(ScanError::MissingValue),
            token => {
                value.push_str(token.as_str());
                tokens.next();
            }
        }
    }
    Err(ScanError::MissingValue)
}

fn next_if<'src, I>(tokens: &mut Peekable<I>, pred: impl Fn(&Token<'src>) -> bool) -> bool
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    tokens.next_if(|SpannedToken(token, _)| pred(token)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(src: &str) -> Result<Property, ParseError> {
        scan_content_lines(src).map(|mut lines| lines.remove(0).property)
    }

    #[test]
    fn parses_quoted_and_multi_valued_parameters() {
        let property = scan_one(
            r#"ATTENDEE;CN="Doe, Jane";DELEGATED-TO="mailto:a@x","mailto:b@x":mailto:jane@x"#,
        )
        .unwrap();
        assert_eq!(property.name, "ATTENDEE");
        assert_eq!(property.parameter_value("cn"), Some("Doe, Jane"));
        assert_eq!(
            property.parameter("DELEGATED-TO").unwrap().values,
            vec!["mailto:a@x", "mailto:b@x"]
        );
        assert_eq!(property.value, "mailto:jane@x");
    }

    #[test]
    fn value_may_contain_delimiters() {
        let property = scan_one("DESCRIPTION:a;b:c=\"d\",e\r\n").unwrap();
        assert!(property.parameters.is_empty());
        assert_eq!(property.value, "a;b:c=\"d\",e");
    }

    #[test]
    fn bare_parameter_value_may_contain_equals() {
        let property = scan_one("X-LINK;X-URL=a=b:v").unwrap();
        assert_eq!(property.parameter_value("X-URL"), Some("a=b"));
    }

    #[test]
    fn unfolds_continuation_lines() {
        let lines = scan_content_lines("SUMMARY:Long\r\n  meeting\r\n\tname\r\nUID:1\r\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].property.value, "Long meetingname");
        assert_eq!(lines[1].property.value, "1");
        assert_eq!(lines[1].start, 32);
    }

    #[test]
    fn skips_blank_lines() {
        let lines = scan_content_lines("\r\nA:1\n\nB:2").unwrap();
        let names: Vec<_> = lines.iter().map(|l| l.property.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn rejects_unterminated_quote() {
        let src = "A:1\r\nB:2\r\nC:3\r\nATTENDEE;CN=\"Jane:mailto:j@x\r\n";
        assert_eq!(
            scan_content_lines(src).unwrap_err(),
            ParseError::UnterminatedQuote { line: 4 }
        );
    }

    #[test]
    fn rejects_invalid_name() {
        let err = scan_content_lines("A:1\nSUM MARY:x\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidName {
                line: 2,
                name: "SUM MARY".to_string()
            }
        );
    }

    #[test]
    fn rejects_missing_colon() {
        assert_eq!(
            scan_content_lines("VERSION\r\n").unwrap_err(),
            ParseError::MissingValue { line: 1 }
        );
        assert_eq!(
            scan_content_lines("DTSTART;TZID:20250101").unwrap_err(),
            ParseError::MissingValue { line: 1 }
        );
    }

    #[test]
    fn rejects_leading_continuation() {
        assert_eq!(
            scan_content_lines(" orphan\r\n").unwrap_err(),
            ParseError::OrphanContinuation { line: 1 }
        );
    }

    #[test]
    fn counts_lines_by_offset() {
        let src = "A\r\nB\nC";
        assert_eq!(line_number(src, 0), 1);
        assert_eq!(line_number(src, 3), 2);
        assert_eq!(line_number(src, 5), 3);
    }
}
