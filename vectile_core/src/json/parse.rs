use super::JsonValue;
use anyhow::{bail, Result};
use nom::{
	Err, IResult, Parser,
	branch::alt,
	bytes::complete::{tag, take_while, take_while1},
	character::complete::{char, one_of},
	combinator::{cut, map, map_opt, map_res, value, verify},
	error::{ContextError, ParseError, VerboseError, context, convert_error},
	multi::{fold_many0, many0, separated_list0},
	number::complete::double,
	sequence::{preceded, separated_pair, terminated},
};
use std::collections::BTreeMap;
use std::str;

/// Parses a complete JSON document into a [`JsonValue`] tree.
pub fn parse_json(input: &str) -> Result<JsonValue> {
	let result = json_value::<VerboseError<&str>>(input);
	match result {
		Ok((_, v)) => Ok(v),
		Err(Err::Error(e)) | Err(Err::Failure(e)) => bail!(convert_error(input, e)),
		Err(e) => bail!(e.to_string()),
	}
}

fn json_value<'a, E: ParseError<&'a str> + ContextError<&'a str>>(i: &'a str) -> IResult<&'a str, JsonValue, E> {
	preceded(
		sp,
		alt((
			map(hash, JsonValue::Object),
			map(array, JsonValue::Array),
			map(string, JsonValue::Str),
			map(double, JsonValue::Num),
			map(boolean, JsonValue::Boolean),
			map(null, |()| JsonValue::Null),
		)),
	)
	.parse(i)
}

fn hash<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
	i: &'a str,
) -> IResult<&'a str, BTreeMap<String, JsonValue>, E> {
	context(
		"object",
		preceded(
			char('{'),
			cut(terminated(
				map(separated_list0(preceded(sp, char(',')), key_value), |pairs| {
					pairs.into_iter().collect()
				}),
				preceded(sp, char('}')),
			)),
		),
	)
	.parse(i)
}

fn key_value<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
	i: &'a str,
) -> IResult<&'a str, (String, JsonValue), E> {
	separated_pair(preceded(sp, string), cut(preceded(sp, char(':'))), json_value).parse(i)
}

fn array<'a, E: ParseError<&'a str> + ContextError<&'a str>>(i: &'a str) -> IResult<&'a str, Vec<JsonValue>, E> {
	context(
		"array",
		preceded(
			char('['),
			cut(terminated(
				separated_list0(preceded(sp, char(',')), json_value),
				preceded(sp, char(']')),
			)),
		),
	)
	.parse(i)
}

fn string<'a, E: ParseError<&'a str> + ContextError<&'a str>>(i: &'a str) -> IResult<&'a str, String, E> {
	context("string", preceded(char('"'), cut(terminated(parse_str, char('"'))))).parse(i)
}

/// Parses the content of a JSON string (without the surrounding quotes), unescaping
/// backslash escapes (`\"`, `\\`, `\/`, `\b`, `\f`, `\n`, `\r`, `\t`, `\uXXXX`).
fn parse_str<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, String, E> {
	fold_many0(string_fragment, String::new, |mut acc, fragment| {
		acc.push_str(&fragment);
		acc
	})
	.parse(i)
}

fn string_fragment<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, String, E> {
	alt((
		map(take_while1(|c| c != '"' && c != '\\'), String::from),
		map(escaped_char, |c| c.to_string()),
	))
	.parse(i)
}

fn escaped_char<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, char, E> {
	preceded(
		char('\\'),
		alt((
			value('"', char('"')),
			value('\\', char('\\')),
			value('/', char('/')),
			value('\u{8}', char('b')),
			value('\u{c}', char('f')),
			value('\n', char('n')),
			value('\r', char('r')),
			value('\t', char('t')),
			unicode_escape,
		)),
	)
	.parse(i)
}

fn unicode_escape<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, char, E> {
	map_opt(
		map_res(preceded(char('u'), hex4), |hex| u32::from_str_radix(hex, 16)),
		char::from_u32,
	)
	.parse(i)
}

fn hex4<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, &'a str, E> {
	verify(
		take_while(|c: char| c.is_ascii_hexdigit()),
		|s: &str| s.len() == 4,
	)
	.parse(i)
}

fn sp<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, (), E> {
	map(many0(one_of(" \t\r\n")), |_| ()).parse(i)
}

fn boolean<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, bool, E> {
	alt((value(true, tag("true")), value(false, tag("false")))).parse(input)
}

fn null<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (), E> {
	value((), tag("null")).parse(input)
}
