//! Compact text form for sets of calendar days.
//!
//! `{1, 3, 4, 5, 7}` is written `1,3-5,7`: maximal runs of consecutive days
//! become `start-end`, lone days stay bare, runs are joined with commas.

use std::collections::BTreeSet;

/// Compress a set of days into the range expression.
///
/// Input order does not matter and duplicates are ignored. An empty input
/// compresses to an empty string.
pub fn compress_days<I>(days: I) -> String
where
    I: IntoIterator<Item = u8>,
{
    let sorted: BTreeSet<u8> = days.into_iter().collect();

    let mut runs: Vec<String> = Vec::new();
    let mut open: Option<(u8, u8)> = None;

    for day in sorted {
        open = match open {
            Some((start, end)) if end.checked_add(1) == Some(day) => Some((start, day)),
            Some(run) => {
                runs.push(format_run(run));
                Some((day, day))
            }
            None => Some((day, day)),
        };
    }
    if let Some(run) = open {
        runs.push(format_run(run));
    }

    runs.join(",")
}

fn format_run((start, end): (u8, u8)) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}

/// Expand a range expression back into its set of days.
///
/// Whitespace around items is ignored. Returns an error naming the first
/// item that is not a day or an ascending `start-end` range.
pub fn expand_days(text: &str) -> Result<BTreeSet<u8>, String> {
    let mut days = BTreeSet::new();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(days);
    }

    for item in trimmed.split(',') {
        let item = item.trim();
        let parse = |s: &str| {
            s.trim()
                .parse::<u8>()
                .map_err(|_| format!("Invalid day range item '{}'", item))
        };
        match item.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse(start)?, parse(end)?);
                if start > end {
                    return Err(format!("Descending day range '{}'", item));
                }
                days.extend(start..=end);
            }
            None => {
                days.insert(parse(item)?);
            }
        }
    }
    Ok(days)
}
