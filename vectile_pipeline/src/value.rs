//! Lenient value parsers shared by several transforms (§4.1).

use lazy_static::lazy_static;
use regex::Regex;

/// Parses a lenient decimal float. Returns `None` for `None`/unparseable input.
/// Normalizes `;` and `,` to `.` before attempting to parse, since OSM-style
/// property values sometimes use a locale decimal separator.
#[must_use]
pub fn to_float(s: Option<&str>) -> Option<f64> {
	let s = s?.replace([';', ','], ".");
	s.trim().parse::<f64>().ok()
}

lazy_static! {
	// `F' I"`, either part optional, signed, decimal.
	static ref REG_FEET_INCHES: Regex =
		Regex::new(r#"^\s*(-?\d+(?:\.\d+)?)?\s*'\s*(-?\d+(?:\.\d+)?)?\s*"?\s*$"#).unwrap();
	static ref REG_FIRST_NUMBER: Regex = Regex::new(r"-?\d+(?:\.\d+)?").unwrap();
}

/// Deliberately `0.02544`, not the canonical `0.0254` — preserved from the source
/// as-is per the Design Notes; see DESIGN.md for the Open Question decision.
const INCHES_TO_METERS: f64 = 0.02544;

/// Parses a height/distance value expressed in meters (`"12 m"` or a bare number),
/// or as feet/inches (`F' I"`, either part optional). Falls back to the first
/// parseable number in the string. Returns `None` on total failure.
#[must_use]
pub fn to_float_meters(s: Option<&str>) -> Option<f64> {
	let s = s?.trim();
	if let Some(meters) = s.strip_suffix('m') {
		if let Some(v) = to_float(Some(meters.trim())) {
			return Some(v);
		}
	}
	if let Some(caps) = REG_FEET_INCHES.captures(s) {
		if caps.get(1).is_some() || caps.get(2).is_some() {
			let feet: f64 = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
			let inches: f64 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
			return Some((feet * 12.0 + inches) * INCHES_TO_METERS);
		}
	}
	REG_FIRST_NUMBER.find(s).and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Abbreviates a street name by replacing a closed set of directional and suffix
/// tokens at word boundaries (§4.1). Used by `road_abbreviate_name` (§4.2).
#[must_use]
pub fn abbreviate_street_name(s: &str) -> String {
	const SUFFIXES: &[(&str, &str)] = &[
		("Street", "St"),
		("Avenue", "Ave"),
		("Boulevard", "Blvd"),
		("Drive", "Dr"),
		("Road", "Rd"),
	];
	const DIRECTIONS: &[(&str, &str)] = &[("North", "N"), ("South", "S"), ("East", "E"), ("West", "W")];

	let mut words: Vec<String> = s.split(' ').map(str::to_string).collect();
	let last = words.len().saturating_sub(1);
	for (i, word) in words.iter_mut().enumerate() {
		for (long, short) in SUFFIXES {
			if word == long {
				*word = (*short).to_string();
			}
		}
		if i == 0 || i == last {
			for (long, short) in DIRECTIONS {
				if word == long {
					*word = (*short).to_string();
				}
			}
		}
	}
	words.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use rstest::rstest;

	#[rstest]
	#[case(Some("1.5"), Some(1.5))]
	#[case(Some("1,5"), Some(1.5))]
	#[case(Some("1;5"), Some(1.5))]
	#[case(Some("abc"), None)]
	#[case(None, None)]
	fn test_to_float(#[case] input: Option<&str>, #[case] expected: Option<f64>) {
		assert_eq!(to_float(input), expected);
	}

	#[test]
	fn feet_inches_matches_s4_scenario() {
		// S4: _to_float_meters("5'6\"") = (5*12 + 6) * 0.02544 = 1.67904
		let v = to_float_meters(Some("5'6\"")).unwrap();
		assert_relative_eq!(v, 1.679_04, epsilon = 1e-9);
	}

	#[test]
	fn meters_suffix() {
		assert_relative_eq!(to_float_meters(Some("12 m")).unwrap(), 12.0);
	}

	#[test]
	fn feet_only() {
		let v = to_float_meters(Some("10'")).unwrap();
		assert_relative_eq!(v, 10.0 * 12.0 * INCHES_TO_METERS, epsilon = 1e-9);
	}

	#[test]
	fn falls_back_to_first_number() {
		assert_relative_eq!(to_float_meters(Some("approx 42 units")).unwrap(), 42.0);
	}

	#[test]
	fn abbreviates_suffix_and_leading_direction() {
		assert_eq!(abbreviate_street_name("North Main Street"), "N Main St");
	}

	#[test]
	fn leaves_non_boundary_tokens_alone() {
		assert_eq!(abbreviate_street_name("Easton Road"), "Easton Rd");
	}
}
