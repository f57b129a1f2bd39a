//! A `nom`-based parser for the query language.
//!
//! Grammar:
//!
//! ```text
//! expression := literal | function_call | selection
//! selection  := '$' identifier ( '.' identifier | '[' digits ']' )*
//! function   := identifier '(' ( expression ( ',' expression )* )? ')'
//! literal    := null | true | false | number | 'string'
//! ```
//!
//! Bare identifiers are not selections: every path must start at a binding.
use super::ast::{Expression, PathSegment, Selection};
use crate::error::QueryError;
use banded_types::Value;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::{alpha1, char, multispace0, u64 as nom_u64},
    combinator::{map, opt, recognize},
    multi::{many0, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, preceded},
};

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, QueryError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(QueryError::Parse {
            expression: input.to_string(),
            message: format!("Parser did not consume all input. Remainder: '{}'", rem),
        }),
        Err(e) => Err(QueryError::Parse {
            expression: input.to_string(),
            message: e.to_string(),
        }),
    }
}

// --- Combinators ---

fn expression(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        map(literal, Expression::Literal),
        function_call,
        map(selection, Expression::Selection),
    )))
    .parse(input)
}

// --- Literal Parsers ---

fn keyword(input: &str) -> IResult<&str, Value> {
    alt((
        map(tag("true"), |_| Value::Bool(true)),
        map(tag("false"), |_| Value::Bool(false)),
        map(tag("null"), |_| Value::Null),
    ))
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Value> {
    map(
        delimited(char('\''), opt(is_not("'")), char('\'')),
        |s: Option<&str>| Value::from(s.unwrap_or_default()),
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    map(double, |n| {
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
    })
    .parse(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    // Keywords must not swallow the prefix of a function name such as `nullify(...)`.
    let (rest, value) = alt((keyword, number, string_literal)).parse(input)?;
    if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '(') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((rest, value))
}

// --- Path/Selection Parser ---

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(preceded(char('.'), identifier), |s| {
        PathSegment::Key(s.to_string())
    })
    .parse(input)
}

fn index_segment(input: &str) -> IResult<&str, PathSegment> {
    map(delimited(char('['), nom_u64, char(']')), |i| {
        PathSegment::Index(i as usize)
    })
    .parse(input)
}

fn path_segment(input: &str) -> IResult<&str, PathSegment> {
    alt((key_segment, index_segment)).parse(input)
}

fn selection(input: &str) -> IResult<&str, Selection> {
    map(
        pair(preceded(char('$'), identifier), many0(path_segment)),
        |(binding, path)| Selection {
            binding: binding.to_string(),
            path,
        },
    )
    .parse(input)
}

// --- Function Call Parser ---

fn function_call(input: &str) -> IResult<&str, Expression> {
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, args) = delimited(
        char('('),
        separated_list0(ws(char(',')), expression),
        preceded(multispace0, char(')')),
    )
    .parse(input)?;

    Ok((
        input,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_with_segments() {
        let expr = parse_expression("$parent.orders[2].lines").unwrap();
        assert_eq!(
            expr,
            Expression::Selection(Selection {
                binding: "parent".into(),
                path: vec![
                    PathSegment::Key("orders".into()),
                    PathSegment::Index(2),
                    PathSegment::Key("lines".into()),
                ],
            })
        );
    }

    #[test]
    fn test_parse_function_with_literals() {
        let expr = parse_expression("filter($parent.items, 'status', 'open')").unwrap();
        match expr {
            Expression::FunctionCall { name, args } => {
                assert_eq!(name, "filter");
                assert_eq!(args.len(), 3);
                assert_eq!(args[2], Expression::Literal(Value::from("open")));
            }
            other => panic!("unexpected expression: {:?}", other),
        }
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_expression("3").unwrap(), Expression::Literal(Value::Int(3)));
        assert_eq!(parse_expression("2.5").unwrap(), Expression::Literal(Value::Float(2.5)));
    }

    #[test]
    fn test_keyword_prefix_does_not_shadow_function() {
        let expr = parse_expression("nullify()").unwrap();
        assert!(matches!(expr, Expression::FunctionCall { ref name, .. } if name == "nullify"));
    }

    #[test]
    fn test_bare_identifiers_are_rejected() {
        assert!(parse_expression("Message.objects").is_err());
        assert!(parse_expression("$parent.").is_err());
        assert!(parse_expression("count($parent.items").is_err());
    }
}
