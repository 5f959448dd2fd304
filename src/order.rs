//! Byte ordering that mirrors SQL Server's `uniqueidentifier` sort order.

use core::cmp::Ordering;

/// Byte indices in the order SQL Server compares them: the last six bytes first, then 8-9, 6-7,
/// 4-5, and finally 0-3.
pub const COMPARE_ORDER: [usize; 16] = [10, 11, 12, 13, 14, 15, 8, 9, 6, 7, 4, 5, 0, 1, 2, 3];

/// Compares two byte views in [`COMPARE_ORDER`].
pub fn compare(x: &[u8; 16], y: &[u8; 16]) -> Ordering {
    for i in COMPARE_ORDER {
        match x[i].cmp(&y[i]) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }
    Ordering::Equal
}
