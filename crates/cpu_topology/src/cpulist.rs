//! Parsing and emitting the `cpulist` format used by Linux tooling and sysfs
//! for lists of numeric hardware identifiers.
//!
//! A cpulist is a comma-separated list of items, where each item is a single
//! integer (`1`), an inclusive range (`2-4`) or a range with a stride
//! (`5-9:2`, equivalent to `5,7,9`). Whitespace is not allowed inside the
//! string; callers trim line endings before handing content over.

use itertools::Itertools;

use crate::{Error, Result};

/// Parses a cpulist and returns the items in ascending order, removing
/// duplicates.
///
/// An empty string is valid input and yields an empty result.
pub(crate) fn parse(cpulist: &str) -> Result<Vec<u32>> {
    let item_ranges: Result<Vec<Vec<u32>>> = cpulist.split(',').map(parse_part).collect();

    item_ranges.map(|ranges| ranges.into_iter().flatten().sorted().dedup().collect())
}

fn parse_part(part: &str) -> Result<Vec<u32>> {
    if part.is_empty() {
        return Ok(Vec::new());
    }

    if let Some((range_start, range_end)) = part.split_once('-') {
        parse_range(range_start, range_end)
    } else {
        parse_item(part).map(|item| vec![item])
    }
}

fn parse_range(range_start: &str, range_end: &str) -> Result<Vec<u32>> {
    let start = parse_item(range_start)?;

    // A missing stride is the same as a stride of one.
    let (end, stride) = match range_end.split_once(':') {
        Some((end, stride)) => (parse_item(end)?, parse_item(stride)?),
        None => (parse_item(range_end)?, 1),
    };

    if stride == 0 {
        return Err(Error::InvalidCpulist {
            invalid_value: format!("{range_start}-{range_end}"),
            problem: "a range stride cannot be zero".to_string(),
        });
    }

    if end < start {
        return Err(Error::InvalidCpulist {
            invalid_value: format!("{range_start}-{range_end}"),
            problem: "range end cannot be less than range start".to_string(),
        });
    }

    Ok((start..=end).step_by(stride as usize).collect())
}

fn parse_item(item: &str) -> Result<u32> {
    item.parse::<u32>().map_err(|inner| Error::InvalidCpulist {
        invalid_value: item.to_string(),
        problem: format!("could not be parsed as an integer: {inner}"),
    })
}

/// Emits a cpulist from an iterator of items, collapsing consecutive runs
/// into ranges.
///
/// Input order does not matter; the output is ascending and deduplicated.
pub(crate) fn emit(items: impl IntoIterator<Item = u32>) -> String {
    let mut items = items.into_iter().sorted().dedup();

    let Some(first) = items.next() else {
        return String::new();
    };

    let mut groups: Vec<String> = Vec::new();
    let mut start = first;
    let mut last = first;

    for item in items {
        if item == last + 1 {
            last = item;
            continue;
        }

        groups.push(emit_group(start, last));
        start = item;
        last = item;
    }

    groups.push(emit_group(start, last));
    groups.join(",")
}

fn emit_group(start: u32, end: u32) -> String {
    if start == end {
        format!("{start}")
    } else {
        format!("{start}-{end}")
    }
}
