//! Category range table validators

use crate::core::types::CategoryRange;

/// Ranges must be 1-based, well-formed, named and non-overlapping
pub fn validate_category_ranges(ranges: &[CategoryRange]) -> Result<(), String> {
    for range in ranges {
        if range.name.trim().is_empty() {
            return Err(format!(
                "range {}..={} has an empty category name",
                range.start, range.end
            ));
        }

        if range.start == 0 {
            return Err(format!(
                "category '{}' starts at 0; row indexes are 1-based",
                range.name
            ));
        }

        if range.start > range.end {
            return Err(format!(
                "category '{}' has start {} after end {}",
                range.name, range.start, range.end
            ));
        }
    }

    let mut sorted: Vec<&CategoryRange> = ranges.iter().collect();
    sorted.sort_by_key(|r| r.start);
    for pair in sorted.windows(2) {
        if pair[1].start <= pair[0].end {
            return Err(format!(
                "categories '{}' and '{}' overlap at row {}",
                pair[0].name, pair[1].name, pair[1].start
            ));
        }
    }

    Ok(())
}
