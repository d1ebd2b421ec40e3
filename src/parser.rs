//! Parse textual KNX notation (addresses, datapoint ids) using PEST.

use crate::model::address::{KnxAddress, KnxGroupAddress};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "address.pest"]
struct NotationParser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("Parse error: {0}")]
    Syntax(String),
    #[error("{part} {value} out of range (max {max})")]
    OutOfRange {
        part: &'static str,
        value: u64,
        max: u64,
    },
}

fn parse_rule(rule: Rule, source: &str) -> Result<Vec<Pair<'_, Rule>>, AddressParseError> {
    let mut pairs = NotationParser::parse(rule, source.trim()).map_err(|e| AddressParseError::Syntax(e.to_string()))?;
    let top = pairs
        .next()
        .ok_or_else(|| AddressParseError::Syntax("empty input".to_string()))?;
    Ok(top.into_inner().collect())
}

/// Collects every `number` below `pairs`, in order.
fn numbers(pairs: Vec<Pair<'_, Rule>>) -> Vec<Pair<'_, Rule>> {
    let mut out = Vec::new();
    for pair in pairs {
        match pair.as_rule() {
            Rule::number => out.push(pair),
            Rule::EOI => {}
            _ => out.extend(numbers(pair.into_inner().collect())),
        }
    }
    out
}

fn bounded(pair: &Pair<'_, Rule>, part: &'static str, max: u64) -> Result<u64, AddressParseError> {
    let text = pair.as_str();
    // Overlong digit strings are out of range rather than unparseable.
    let value = text.parse::<u64>().unwrap_or(u64::MAX);
    if value > max {
        return Err(AddressParseError::OutOfRange { part, value, max });
    }
    Ok(value)
}

/// Parse `area.line.device`, e.g. `1.1.5`.
pub fn parse_individual_address(source: &str) -> Result<KnxAddress, AddressParseError> {
    let parts = numbers(parse_rule(Rule::individual_address, source)?);
    match parts.as_slice() {
        [area, line, device] => Ok(KnxAddress {
            main_group: bounded(area, "area", 0x0F)? as u8,
            middle_group: bounded(line, "line", 0x0F)? as u8,
            sub_group: bounded(device, "device", 0xFF)? as u8,
        }),
        _ => Err(AddressParseError::Syntax(format!("expected area.line.device, got '{}'", source))),
    }
}

/// Parse `main/middle/sub`, `main/sub` or a free-level `sub`.
pub fn parse_group_address(source: &str) -> Result<KnxGroupAddress, AddressParseError> {
    let inner = parse_rule(Rule::group_address, source)?;
    let form = inner
        .into_iter()
        .find(|p| p.as_rule() != Rule::EOI)
        .ok_or_else(|| AddressParseError::Syntax("empty group address".to_string()))?;
    let rule = form.as_rule();
    let parts = numbers(form.into_inner().collect());
    match (rule, parts.as_slice()) {
        (Rule::three_level, [main, middle, sub]) => Ok(KnxGroupAddress::ThreeLevel {
            main_group: bounded(main, "main group", 0x1F)? as u8,
            middle_group: bounded(middle, "middle group", 0x07)? as u8,
            sub_group: bounded(sub, "sub group", 0xFF)? as u8,
        }),
        (Rule::two_level, [main, sub]) => Ok(KnxGroupAddress::TwoLevel {
            main_group: bounded(main, "main group", 0x1F)? as u8,
            sub_group: bounded(sub, "sub group", 0x07FF)? as u16,
        }),
        (Rule::free_level, [sub]) => Ok(KnxGroupAddress::FreeLevel {
            sub_group: bounded(sub, "sub group", 0xFFFF)? as u16,
        }),
        _ => Err(AddressParseError::Syntax(format!("unrecognised group address '{}'", source))),
    }
}

/// Parse a datapoint id into (main, sub) numbers.
pub fn parse_datapoint_id(source: &str) -> Result<(u16, u16), AddressParseError> {
    let parts = numbers(parse_rule(Rule::datapoint_id, source)?);
    match parts.as_slice() {
        [main, sub] => Ok((
            bounded(main, "main number", 0xFFFF)? as u16,
            bounded(sub, "sub number", 9_999)? as u16,
        )),
        _ => Err(AddressParseError::Syntax(format!("expected main.sub, got '{}'", source))),
    }
}
