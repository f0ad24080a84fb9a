//! Text reader for clauses and goals.
//!
//! Operators, loosest first:
//!
//! | Operators | Associativity |
//! |---|---|
//! | `,` | right |
//! | `;` | right |
//! | `is` `=` `==` `<` `>` `=<` `>=` | none |
//! | `+` `-` | left |
//! | `*` `/` | left |
//! | `^` | right |
//!
//! Arguments and list elements are read below `,`. Each bare `_` is a
//! distinct anonymous variable. `%` starts a comment running to end of line.

use crate::error::ParseError;
use crate::term::{Clause, Term};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::{char, digit1, multispace1, satisfy},
    combinator::{cut, map, map_res, not, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use std::rc::Rc;

type PResult<'a, T> = IResult<&'a str, T>;

const ANONYMOUS: &str = "_";

/// Parses a single term; a trailing `.` is allowed.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] for malformed input and
/// [`ParseError::TrailingInput`] if text remains after the term.
pub fn parse_term(source: &str) -> Result<Term, ParseError> {
    let (rest, term) = conjunction(source).map_err(|e| syntax_error(source, e))?;
    let (rest, _) = opt(symbol("."))(rest).map_err(|e| syntax_error(source, e))?;
    expect_end(source, rest)?;
    Ok(name_anonymous(&term, &mut 0))
}

/// Parses a single clause terminated by `.`.
///
/// # Errors
///
/// Fails on malformed input, trailing text, or a head that is not callable.
pub fn parse_clause(source: &str) -> Result<Clause, ParseError> {
    let (rest, (head, body)) = clause(source).map_err(|e| syntax_error(source, e))?;
    expect_end(source, rest)?;
    build_clause(&head, body.as_ref())
}

/// Parses every clause of a program.
///
/// # Errors
///
/// Stops at the first clause that fails to parse.
pub fn parse_program(source: &str) -> Result<Vec<Clause>, ParseError> {
    let mut clauses = Vec::new();
    let mut rest = source;
    loop {
        let (after, ()) = skip(rest).map_err(|e| syntax_error(source, e))?;
        if after.is_empty() {
            return Ok(clauses);
        }
        let (after, (head, body)) = clause(after).map_err(|e| syntax_error(source, e))?;
        clauses.push(build_clause(&head, body.as_ref())?);
        rest = after;
    }
}

fn build_clause(head: &Term, body: Option<&Term>) -> Result<Clause, ParseError> {
    let mut counter = 0;
    let head = name_anonymous(head, &mut counter);
    let body = body.map(|body| name_anonymous(body, &mut counter));
    Ok(Clause::new(head, body)?)
}

fn expect_end(source: &str, rest: &str) -> Result<(), ParseError> {
    let (rest, ()) = skip(rest).map_err(|e| syntax_error(source, e))?;
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ParseError::TrailingInput {
            offset: source.len() - rest.len(),
        })
    }
}

fn syntax_error(source: &str, error: nom::Err<Error<&str>>) -> ParseError {
    match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near: String = e.input.chars().take(16).collect();
            let message = if near.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected `{near}` ({:?})", e.code)
            };
            ParseError::Syntax {
                offset: source.len() - e.input.len(),
                message,
            }
        }
        nom::Err::Incomplete(_) => ParseError::Syntax {
            offset: source.len(),
            message: "incomplete input".to_string(),
        },
    }
}

/// Gives every `_` its own variable name
fn name_anonymous(term: &Term, counter: &mut usize) -> Term {
    match term {
        Term::Variable(name) if &**name == ANONYMOUS => {
            *counter += 1;
            Term::var(format!("_#{counter}"))
        }
        Term::Struct { functor, args } => Term::Struct {
            functor: Rc::clone(functor),
            args: args.iter().map(|arg| name_anonymous(arg, counter)).collect(),
        },
        Term::List { head, tail } => {
            let head = name_anonymous(head, counter);
            Term::cons(head, name_anonymous(tail, counter))
        }
        other => other.clone(),
    }
}

/// Whitespace and `%` comments
fn skip(input: &str) -> PResult<'_, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            recognize(pair(char('%'), opt(is_not("\n")))),
        ))),
    )(input)
}

fn symbol<'a>(text: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    preceded(skip, tag(text))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn clause(input: &str) -> PResult<'_, (Term, Option<Term>)> {
    let (input, head) = conjunction(input)?;
    let (input, body) = opt(preceded(symbol(":-"), cut(conjunction)))(input)?;
    let (input, _) = cut(symbol("."))(input)?;
    Ok((input, (head, body)))
}

fn infix(functor: &str, left: Term, right: Option<Term>) -> Term {
    match right {
        Some(right) => Term::binary(functor, left, right),
        None => left,
    }
}

fn conjunction(input: &str) -> PResult<'_, Term> {
    let (input, left) = disjunction(input)?;
    let (input, right) = opt(preceded(symbol(","), cut(conjunction)))(input)?;
    Ok((input, infix(",", left, right)))
}

fn disjunction(input: &str) -> PResult<'_, Term> {
    let (input, left) = comparison(input)?;
    let (input, right) = opt(preceded(symbol(";"), cut(disjunction)))(input)?;
    Ok((input, infix(";", left, right)))
}

fn comparison_operator(input: &str) -> PResult<'_, &str> {
    preceded(
        skip,
        alt((
            tag("=<"),
            tag(">="),
            tag("=="),
            tag("="),
            tag("<"),
            tag(">"),
            terminated(tag("is"), not(satisfy(is_name_char))),
        )),
    )(input)
}

fn comparison(input: &str) -> PResult<'_, Term> {
    let (input, left) = additive(input)?;
    let (input, right) = opt(pair(comparison_operator, cut(additive)))(input)?;
    Ok((
        input,
        match right {
            Some((operator, right)) => Term::binary(operator, left, right),
            None => left,
        },
    ))
}

/// Left-associative chain of `operand (operator operand)*`
fn left_assoc<'a>(
    input: &'a str,
    operators: (&'static str, &'static str),
    operand: fn(&'a str) -> PResult<'a, Term>,
) -> PResult<'a, Term> {
    let (mut input, mut term) = operand(input)?;
    loop {
        let step = pair(
            preceded(skip, alt((tag(operators.0), tag(operators.1)))),
            cut(operand),
        )(input);
        match step {
            Ok((rest, (operator, right))) => {
                term = Term::binary(operator, term, right);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, term)),
            Err(e) => return Err(e),
        }
    }
}

fn additive(input: &str) -> PResult<'_, Term> {
    left_assoc(input, ("+", "-"), multiplicative)
}

fn multiplicative(input: &str) -> PResult<'_, Term> {
    left_assoc(input, ("*", "/"), power)
}

fn power(input: &str) -> PResult<'_, Term> {
    let (input, base) = primary(input)?;
    let (input, exponent) = opt(preceded(symbol("^"), cut(power)))(input)?;
    Ok((input, infix("^", base, exponent)))
}

fn primary(input: &str) -> PResult<'_, Term> {
    let (input, ()) = skip(input)?;
    alt((
        number,
        negation,
        list,
        parenthesized,
        variable,
        atom_or_compound,
        map(char('!'), |_| Term::atom("!")),
    ))(input)
}

fn number(input: &str) -> PResult<'_, Term> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |text: &str| text.parse::<f64>().map(Term::Number),
    )(input)
}

fn negation(input: &str) -> PResult<'_, Term> {
    let (input, operand) = preceded(char('-'), primary)(input)?;
    let term = match operand {
        Term::Number(value) => Term::Number(-value),
        other => Term::Struct {
            functor: "-".into(),
            args: Rc::from(vec![other]),
        },
    };
    Ok((input, term))
}

fn parenthesized(input: &str) -> PResult<'_, Term> {
    delimited(char('('), conjunction, cut(symbol(")")))(input)
}

fn variable(input: &str) -> PResult<'_, Term> {
    map(
        recognize(pair(
            satisfy(|c| c.is_uppercase() || c == '_'),
            take_while(is_name_char),
        )),
        Term::var,
    )(input)
}

fn quoted(input: &str) -> PResult<'_, &str> {
    delimited(char('\''), take_while(|c: char| c != '\''), cut(char('\'')))(input)
}

fn plain_name(input: &str) -> PResult<'_, &str> {
    recognize(pair(satisfy(char::is_lowercase), take_while(is_name_char)))(input)
}

/// An element below `,`: a struct argument or a list item
fn element(input: &str) -> PResult<'_, Term> {
    disjunction(input)
}

fn atom_or_compound(input: &str) -> PResult<'_, Term> {
    let (rest, name) = alt((quoted, plain_name))(input)?;
    let (rest, args) = opt(preceded(
        char('('),
        cut(terminated(
            separated_list1(symbol(","), element),
            symbol(")"),
        )),
    ))(rest)?;
    match args {
        None => Ok((rest, Term::atom(name))),
        Some(args) => match Term::compound(name, args) {
            Ok(term) => Ok((rest, term)),
            Err(_) => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
        },
    }
}

fn list(input: &str) -> PResult<'_, Term> {
    let (input, _) = char('[')(input)?;
    let (input, items) = opt(separated_list1(symbol(","), element))(input)?;
    let Some(items) = items else {
        let (input, _) = cut(symbol("]"))(input)?;
        return Ok((input, Term::nil()));
    };
    let (input, tail) = opt(preceded(symbol("|"), cut(element)))(input)?;
    let (input, _) = cut(symbol("]"))(input)?;
    Ok((input, Term::list_with_tail(items, tail.unwrap_or_else(Term::nil))))
}
