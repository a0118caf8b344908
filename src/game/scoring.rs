use crate::game::{Resolution, MIN_RUN};

pub const RUN_BASE: u64 = 10;

/// Points for a single run of `len` panels: `10 * k * (k - 2)`, so one long
/// run always beats any split of the same panels into shorter runs.
pub fn run_value(len: usize) -> u64 {
    if len < MIN_RUN {
        return 0;
    }
    let k = len as u64;
    RUN_BASE * k * (k - 2)
}

/// Points for a whole resolution episode. Pass `n` (1-based) multiplies its
/// runs by `n`, so chains pay more than the same runs cleared separately.
pub fn resolution_score(resolution: &Resolution) -> u64 {
    resolution
        .passes
        .iter()
        .zip(1u64..)
        .map(|(pass, chain)| chain * pass.runs.iter().map(|&k| run_value(k)).sum::<u64>())
        .sum()
}
