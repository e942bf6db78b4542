//! Decides which countdown warning, if any, a tick should fire.
//
//  This module is deliberately pure: no async, no IO.

/// Pick the threshold to warn for, given the seconds remaining on a
/// countdown and the last threshold already fired for it.
///
/// Returns the closest threshold at or above `remaining_secs` that has not
/// fired yet this countdown: the smallest `t` with `remaining_secs <= t`
/// and (`last_fired` absent or `t < last_fired`).
///
/// Consequences of that rule:
///   - each threshold fires at most once per countdown
///   - thresholds fire in strictly descending order
///   - a threshold jumped over by coarse polling is passed over in favor
///     of the one matching the remaining time actually observed; it is
///     detected late, never lost
///
/// `thresholds_desc` must be sorted descending
/// (`SweepConfig::thresholds_desc`).
pub fn next_warning(
    remaining_secs: u64,
    thresholds_desc: &[u64],
    last_fired: Option<u64>,
) -> Option<u64> {
    let mut candidate = None;

    for &t in thresholds_desc {
        if t < remaining_secs {
            // Descending order: every later entry is below remaining too.
            break;
        }
        if let Some(last) = last_fired {
            if t >= last {
                continue;
            }
        }
        // Qualifying, and closer to `remaining_secs` than any previous one.
        candidate = Some(t);
    }

    candidate
}
