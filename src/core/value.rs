// Numeric values from SCPI text responses

use crate::core::constants::{SI_PREFIXES, UNIT_SUFFIXES};
use crate::core::error::{Result, ScopeError};

/// Unit suffixes and SI prefixes recognised by [`ValueParser`].
///
/// Suffixes are kept longest-first so `Sa/s` is stripped whole instead of
/// losing only its trailing `s`.
#[derive(Debug, Clone)]
pub struct UnitTable {
    suffixes: Vec<String>,
    prefixes: Vec<(char, f64)>,
}

impl UnitTable {
    pub fn new<S: Into<String>>(
        suffixes: impl IntoIterator<Item = S>,
        prefixes: impl IntoIterator<Item = (char, f64)>,
    ) -> Self {
        let mut suffixes: Vec<String> = suffixes.into_iter().map(Into::into).collect();
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));

        Self {
            suffixes,
            prefixes: prefixes.into_iter().collect(),
        }
    }

    fn strip_unit<'a>(&self, token: &'a str) -> &'a str {
        self.suffixes
            .iter()
            .find_map(|unit| token.strip_suffix(unit.as_str()))
            .unwrap_or(token)
    }

    fn strip_prefix<'a>(&self, numeral: &'a str) -> (&'a str, f64) {
        let Some(last) = numeral.chars().last() else {
            return (numeral, 1.0);
        };

        match self.prefixes.iter().find(|(p, _)| *p == last) {
            Some((_, multiplier)) => (&numeral[..numeral.len() - last.len_utf8()], *multiplier),
            None => (numeral, 1.0),
        }
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::new(UNIT_SUFFIXES.iter().copied(), SI_PREFIXES.iter().copied())
    }
}

/// Parses responses shaped like `"<echo> <numeral><prefix><unit>"`.
#[derive(Debug, Clone, Default)]
pub struct ValueParser {
    units: UnitTable,
}

impl ValueParser {
    pub fn new(units: UnitTable) -> Self {
        Self { units }
    }

    /// Value of the last whitespace-separated token, with unit and SI prefix
    /// resolved. `"SARA 500MSa/s"` yields `5e8`.
    pub fn parse(&self, response: &str) -> Result<f64> {
        let token = response
            .split_whitespace()
            .last()
            .ok_or_else(|| ScopeError::parse(response, "empty response"))?;

        let numeral = self.units.strip_unit(token);
        let (numeral, multiplier) = self.units.strip_prefix(numeral);

        if numeral.is_empty() {
            return Err(ScopeError::parse(response, "no numeral before unit"));
        }

        let value: f64 = numeral
            .parse()
            .map_err(|e| ScopeError::parse(response, format!("{numeral:?}: {e}")))?;

        let value = value * multiplier;
        if !value.is_finite() {
            return Err(ScopeError::parse(response, "value is not finite"));
        }

        Ok(value)
    }
}

/// [`ValueParser::parse`] with the default Siglent unit table.
pub fn parse_value(response: &str) -> Result<f64> {
    ValueParser::default().parse(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(f64::MIN_POSITIVE)
    }

    #[test]
    fn test_documented_responses() {
        assert!(close(parse_value("C1:VDIV 2.00E-01V").unwrap(), 0.2));
        assert!(close(parse_value("TDIV 1.00E-03s").unwrap(), 0.001));
        assert!(close(parse_value("SARA 5.00E+08Sa/s").unwrap(), 500_000_000.0));
        assert!(close(parse_value("SARA 500MSa/s").unwrap(), 500_000_000.0));
    }

    #[test]
    fn test_trailing_whitespace_and_bare_values() {
        assert!(close(parse_value("C2:OFST -1.50E+00V\n").unwrap(), -1.5));
        assert!(close(parse_value("  42  ").unwrap(), 42.0));
        assert!(close(parse_value("MSIZ 14Mpts").unwrap(), 14e6));
        assert!(close(parse_value("TDIV 10ms").unwrap(), 0.01));
        assert!(close(parse_value("SARA 1.00GSa/s").unwrap(), 1e9));
        assert!(close(parse_value("FREQ 2.5khz").unwrap(), 2500.0));
    }

    #[test]
    fn test_round_trip_over_units_and_prefixes() {
        let values = [0.2, -3.75, 1.0e-3, 123.456, 5.0e8];
        for unit in UNIT_SUFFIXES {
            for (prefix, multiplier) in SI_PREFIXES {
                for x in values {
                    let response = format!("ECHO {:e}{}{}", x / multiplier, prefix, unit);
                    let parsed = parse_value(&response).unwrap();
                    assert!(close(parsed, x), "{response} -> {parsed}, expected {x}");
                }
            }
            for x in values {
                let response = format!("ECHO {:E}{}", x, unit);
                assert!(close(parse_value(&response).unwrap(), x), "{response}");
            }
        }
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_value(""), Err(ScopeError::ParseError { .. })));
        assert!(matches!(parse_value("   "), Err(ScopeError::ParseError { .. })));
        assert!(matches!(parse_value("C1:VDIV V"), Err(ScopeError::ParseError { .. })));
        assert!(matches!(parse_value("C1:VDIV mV"), Err(ScopeError::ParseError { .. })));
        assert!(matches!(parse_value("TDIV abcs"), Err(ScopeError::ParseError { .. })));
        assert!(matches!(parse_value("X inf"), Err(ScopeError::ParseError { .. })));
        assert!(matches!(parse_value("X NaN"), Err(ScopeError::ParseError { .. })));
        // finite numeral that overflows once the prefix is applied
        assert!(matches!(parse_value("C1:VDIV 1e308GV"), Err(ScopeError::ParseError { .. })));
        assert!(matches!(parse_value("SARA 1e300GSa/s"), Err(ScopeError::ParseError { .. })));
    }

    #[test]
    fn test_custom_table_order_is_longest_first() {
        let parser = ValueParser::new(UnitTable::new(["s", "Sa/s"], [('M', 1e6)]));
        assert!(close(parser.parse("SARA 2MSa/s").unwrap(), 2e6));
    }
}
