//! Recoverable diagnostics.
//!
//! Warnings accumulate in [`Data`](crate::Data) and can be queried after
//! each call. Only the first occurrence of each kind is logged.

/// Warning kinds.
/// `repr(u8)` for compact storage; cast to `usize` for table indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Warning {
    /// The output arena could not hold the island index. `info` is the
    /// size in bytes of the request that failed.
    ArenaFull = 0,
}

/// Number of warning kinds.
pub const NUM_WARNINGS: usize = 1;

/// Per-warning statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WarningStat {
    /// Context of the most recent occurrence.
    pub last_info: usize,
    /// Occurrences since the table was last cleared.
    pub count: u32,
}

fn warning_text(warning: Warning, info: usize) -> String {
    match warning {
        Warning::ArenaFull => {
            format!("arena full: island index allocation of {info} bytes failed")
        }
    }
}

/// Record a warning, logging it on first occurrence.
pub(crate) fn record(table: &mut [WarningStat; NUM_WARNINGS], warning: Warning, info: usize) {
    let stat = &mut table[warning as usize];
    if stat.count == 0 {
        tracing::warn!("{}", warning_text(warning, info));
    }
    stat.last_info = info;
    stat.count = stat.count.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_and_keeps_last_info() {
        let mut table = [WarningStat::default(); NUM_WARNINGS];
        record(&mut table, Warning::ArenaFull, 64);
        record(&mut table, Warning::ArenaFull, 128);
        assert_eq!(
            table[Warning::ArenaFull as usize],
            WarningStat {
                last_info: 128,
                count: 2,
            }
        );
    }

    #[test]
    fn text_names_the_size() {
        assert!(warning_text(Warning::ArenaFull, 96).contains("96 bytes"));
    }
}
