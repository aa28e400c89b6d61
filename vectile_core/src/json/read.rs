use super::{parse_json, JsonValue};
use anyhow::Result;
use std::io::BufRead;

pub fn read_ndjson(reader: impl BufRead) -> impl Iterator<Item = Result<JsonValue>> {
	reader.lines().filter_map(|line| {
		match line {
			Ok(line) if line.trim().is_empty() => None, // Skip empty or whitespace-only lines
			Ok(line) => Some(parse_json(&line).map_err(anyhow::Error::from)),
			Err(e) => Some(Err(anyhow::Error::from(e))),
		}
	})
}
