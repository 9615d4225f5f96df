//! Domain-specific assertions for kdash harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! list invariant broke.

use kdash_core::Record;

/// Titles of `records`, in order.
pub fn titles<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(|r| r.title.clone()).collect()
}

/// Assert that `records` are ordered by date with `cmp` between neighbours.
///
/// ```rust,ignore
/// assert_dated_order!(rows, <=);
/// ```
#[macro_export]
macro_rules! assert_dated_order {
    ($records:expr, $op:tt) => {{
        let dates: Vec<_> = $records.iter().map(|r| r.date).collect();
        for pair in dates.windows(2) {
            let (a, b) = (pair[0].expect("dated record"), pair[1].expect("dated record"));
            if !(a $op b) {
                panic!(
                    "assert_dated_order! failed: {:?} {} {:?} does not hold\n  dates: {:?}",
                    a,
                    stringify!($op),
                    b,
                    dates
                );
            }
        }
    }};
}

/// Assert that every record's search text contains `query`.
#[macro_export]
macro_rules! assert_all_match {
    ($records:expr, $query:expr) => {{
        let query: &str = $query;
        for r in $records.iter() {
            let record: &kdash_core::Record = r;
            if !record.raw_text().contains(query) {
                panic!(
                    "assert_all_match! failed: {:?} does not contain {:?}",
                    record.raw_text(),
                    query
                );
            }
        }
    }};
}
