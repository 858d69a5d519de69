//! Parsing of the recursive-mode selection line.

/// Parse a comma-separated list of numbers, ignoring tokens that don't parse.
///
/// Numbers are returned as typed, including zero, negatives, and duplicates;
/// range checks happen against the result list.
pub fn parse_selection(input: &str) -> Vec<i64> {
    input
        .trim()
        .split(',')
        .filter_map(|token| token.trim().parse::<i64>().ok())
        .collect()
}

/// Map a 1-based selection number to a 0-based index into `len` items.
pub fn selected_index(number: i64, len: usize) -> Option<usize> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    (index < len).then_some(index)
}
