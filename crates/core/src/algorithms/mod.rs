use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::StepDriver;
use crate::pacing::Cancelled;
use crate::SortVizError;

/// The five supported sorting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Self; 5] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Quick,
        Self::Merge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Quick => "quick",
            Self::Merge => "merge",
        }
    }

    pub(crate) fn execute(self, driver: &mut StepDriver<'_>) -> Result<(), Cancelled> {
        match self {
            Self::Bubble => bubble(driver),
            Self::Selection => selection(driver),
            Self::Insertion => insertion(driver),
            Self::Quick => quick(driver),
            Self::Merge => merge(driver),
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Bubble
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bubble" => Ok(Self::Bubble),
            "selection" => Ok(Self::Selection),
            "insertion" => Ok(Self::Insertion),
            "quick" => Ok(Self::Quick),
            "merge" => Ok(Self::Merge),
            other => Err(SortVizError::InvalidConfig(format!(
                "unknown algorithm `{other}` (expected one of bubble, selection, insertion, quick, merge)"
            ))),
        }
    }
}

/// Adjacent-pair passes over a shrinking unsorted suffix. A step fires only
/// when an inversion forces a swap.
fn bubble(d: &mut StepDriver<'_>) -> Result<(), Cancelled> {
    let n = d.len();
    for i in 0..n.saturating_sub(1) {
        for j in 0..n - 1 - i {
            if d.value(j) > d.value(j + 1) {
                d.swap(j, j + 1)?;
            }
        }
    }
    Ok(())
}

/// Scans the unsorted suffix for its minimum and swaps it into place. The
/// inner scan stays silent; only the per-position swap emits a step, and a
/// swap that would not move anything is skipped.
fn selection(d: &mut StepDriver<'_>) -> Result<(), Cancelled> {
    let n = d.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..n {
            if d.value(j) < d.value(min) {
                min = j;
            }
        }
        if min != i {
            d.swap(i, min)?;
        }
    }
    Ok(())
}

/// Shift-right-until-in-place. Every shift emits a step, as does the final
/// placement of the key when it actually moved.
fn insertion(d: &mut StepDriver<'_>) -> Result<(), Cancelled> {
    for i in 1..d.len() {
        let key = d.value(i);
        let mut j = i;
        while j > 0 && d.value(j - 1) > key {
            let shifted = d.value(j - 1);
            d.overwrite(j, shifted)?;
            j -= 1;
        }
        if j != i {
            d.overwrite(j, key)?;
        }
    }
    Ok(())
}

fn quick(d: &mut StepDriver<'_>) -> Result<(), Cancelled> {
    let n = d.len();
    if n > 1 {
        quick_range(d, 0, n - 1)?;
    }
    Ok(())
}

/// Lomuto partitioning with the last element as pivot. Each non-trivial
/// invocation redraws once more on the way out of the recursion.
fn quick_range(d: &mut StepDriver<'_>, low: usize, high: usize) -> Result<(), Cancelled> {
    if low >= high {
        return Ok(());
    }
    let pivot_index = partition(d, low, high)?;
    if pivot_index > low {
        quick_range(d, low, pivot_index - 1)?;
    }
    if pivot_index < high {
        quick_range(d, pivot_index + 1, high)?;
    }
    d.refresh()
}

fn partition(d: &mut StepDriver<'_>, low: usize, high: usize) -> Result<usize, Cancelled> {
    let pivot = d.value(high);
    let mut boundary = low;
    for j in low..high {
        if d.value(j) < pivot {
            // A self-swap still emits, matching the classic animation.
            d.swap(boundary, j)?;
            boundary += 1;
        }
    }
    d.swap(boundary, high)?;
    Ok(boundary)
}

fn merge(d: &mut StepDriver<'_>) -> Result<(), Cancelled> {
    let n = d.len();
    if n > 1 {
        merge_range(d, 0, n - 1)?;
    }
    Ok(())
}

/// Top-down merge sort. Every write-back emits a step; each non-trivial
/// invocation redraws once more on the way out of the recursion.
fn merge_range(d: &mut StepDriver<'_>, left: usize, right: usize) -> Result<(), Cancelled> {
    if left >= right {
        return Ok(());
    }
    let mid = left + (right - left) / 2;
    merge_range(d, left, mid)?;
    merge_range(d, mid + 1, right)?;
    merge_halves(d, left, mid, right)?;
    d.refresh()
}

fn merge_halves(
    d: &mut StepDriver<'_>,
    left: usize,
    mid: usize,
    right: usize,
) -> Result<(), Cancelled> {
    let left_buf = d.copy_range(left, mid);
    let right_buf = d.copy_range(mid + 1, right);

    let mut i = 0;
    let mut j = 0;
    let mut k = left;
    while i < left_buf.len() && j < right_buf.len() {
        if left_buf[i] <= right_buf[j] {
            d.overwrite(k, left_buf[i])?;
            i += 1;
        } else {
            d.overwrite(k, right_buf[j])?;
            j += 1;
        }
        k += 1;
    }

    while i < left_buf.len() {
        d.overwrite(k, left_buf[i])?;
        i += 1;
        k += 1;
    }

    while j < right_buf.len() {
        d.overwrite(k, right_buf[j])?;
        j += 1;
        k += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, StepKind};
    use crate::pacing::Pacer;
    use crate::Sequence;

    fn trace(algorithm: Algorithm, input: &[u32]) -> (Vec<u32>, Vec<(StepKind, Vec<u32>)>) {
        let mut values = input.to_vec();
        let mut steps = Vec::new();
        let pacer = Pacer::unpaced();
        let summary = engine::run(algorithm, &mut values, &pacer, |step| {
            steps.push((step.kind, step.values.to_vec()));
        });
        assert!(summary.completed());
        assert_eq!(summary.steps as usize, steps.len());
        (values, steps)
    }

    /// Runs without recording state snapshots, for inputs large enough that
    /// a full trace would dominate the test's memory.
    fn sort_counting_steps(algorithm: Algorithm, input: &[u32]) -> (Vec<u32>, u64) {
        let mut values = input.to_vec();
        let pacer = Pacer::unpaced();
        let summary = engine::run(algorithm, &mut values, &pacer, |_| {});
        assert!(summary.completed());
        (values, summary.steps)
    }

    fn assert_sorted_permutation(input: &[u32], output: &[u32]) {
        assert!(output.windows(2).all(|w| w[0] <= w[1]), "not sorted: {output:?}");
        let mut expected = input.to_vec();
        expected.sort_unstable();
        assert_eq!(output, expected.as_slice(), "not a permutation of the input");
    }

    #[test]
    fn every_algorithm_sorts_hostile_inputs() {
        let descending: Vec<u32> = (0..500).rev().collect();
        let all_equal = vec![9_u32; 64];
        let with_duplicates = vec![5, 3, 5, 1, 3, 5, 0, 1];
        let random = Sequence::generate(101, 50, 250).unwrap().values().to_vec();

        for algorithm in Algorithm::ALL {
            for input in [&descending, &all_equal, &with_duplicates, &random] {
                let (output, _) = sort_counting_steps(algorithm, input);
                assert_sorted_permutation(input, &output);
            }
        }
    }

    #[test]
    fn empty_and_single_element_inputs_emit_no_steps() {
        for algorithm in Algorithm::ALL {
            let (output, steps) = sort_counting_steps(algorithm, &[]);
            assert!(output.is_empty());
            assert_eq!(steps, 0);

            let (output, steps) = sort_counting_steps(algorithm, &[42]);
            assert_eq!(output, vec![42]);
            assert_eq!(steps, 0);
        }
    }

    #[test]
    fn bubble_selection_insertion_are_idempotent_on_sorted_input() {
        let sorted = [1_u32, 2, 3, 4, 5];
        for algorithm in [Algorithm::Bubble, Algorithm::Selection, Algorithm::Insertion] {
            let (output, steps) = trace(algorithm, &sorted);
            assert_eq!(output, sorted);
            assert!(steps.is_empty(), "{algorithm} stepped on sorted input");
        }
    }

    #[test]
    fn bubble_golden_trace() {
        let (output, steps) = trace(Algorithm::Bubble, &[5, 4, 3, 2, 1]);
        assert_eq!(output, vec![1, 2, 3, 4, 5]);
        assert_eq!(steps.len(), 10);
        assert!(steps
            .iter()
            .all(|(kind, _)| matches!(kind, StepKind::Swap { .. })));

        let states: Vec<Vec<u32>> = steps.iter().map(|(_, state)| state.clone()).collect();
        assert_eq!(
            states,
            vec![
                vec![4, 5, 3, 2, 1],
                vec![4, 3, 5, 2, 1],
                vec![4, 3, 2, 5, 1],
                vec![4, 3, 2, 1, 5],
                vec![3, 4, 2, 1, 5],
                vec![3, 2, 4, 1, 5],
                vec![3, 2, 1, 4, 5],
                vec![2, 3, 1, 4, 5],
                vec![2, 1, 3, 4, 5],
                vec![1, 2, 3, 4, 5],
            ]
        );
    }

    #[test]
    fn selection_golden_trace() {
        let (output, steps) = trace(Algorithm::Selection, &[5, 4, 3, 2, 1]);
        assert_eq!(output, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            steps,
            vec![
                (StepKind::Swap { a: 0, b: 4 }, vec![1, 4, 3, 2, 5]),
                (StepKind::Swap { a: 1, b: 3 }, vec![1, 2, 3, 4, 5]),
            ]
        );
    }

    #[test]
    fn insertion_golden_trace() {
        let (output, steps) = trace(Algorithm::Insertion, &[5, 4, 3, 2, 1]);
        assert_eq!(output, vec![1, 2, 3, 4, 5]);
        assert_eq!(steps.len(), 14);

        let states: Vec<Vec<u32>> = steps.iter().map(|(_, state)| state.clone()).collect();
        assert_eq!(
            states,
            vec![
                vec![5, 5, 3, 2, 1],
                vec![4, 5, 3, 2, 1],
                vec![4, 5, 5, 2, 1],
                vec![4, 4, 5, 2, 1],
                vec![3, 4, 5, 2, 1],
                vec![3, 4, 5, 5, 1],
                vec![3, 4, 4, 5, 1],
                vec![3, 3, 4, 5, 1],
                vec![2, 3, 4, 5, 1],
                vec![2, 3, 4, 5, 5],
                vec![2, 3, 4, 4, 5],
                vec![2, 3, 3, 4, 5],
                vec![2, 2, 3, 4, 5],
                vec![1, 2, 3, 4, 5],
            ]
        );
    }

    #[test]
    fn quick_golden_trace() {
        let (output, steps) = trace(Algorithm::Quick, &[3, 1, 2]);
        assert_eq!(output, vec![1, 2, 3]);
        assert_eq!(
            steps,
            vec![
                (StepKind::Swap { a: 0, b: 1 }, vec![1, 3, 2]),
                (StepKind::Swap { a: 1, b: 2 }, vec![1, 2, 3]),
                (StepKind::Refresh, vec![1, 2, 3]),
            ]
        );
    }

    #[test]
    fn quick_self_swaps_and_unwind_redraws_are_emitted() {
        // Already-sorted input: every partition comparison self-swaps, the
        // pivot swap lands in place, and each recursion level redraws.
        let (output, steps) = trace(Algorithm::Quick, &[1, 2, 3]);
        assert_eq!(output, vec![1, 2, 3]);

        let kinds: Vec<StepKind> = steps.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Swap { a: 0, b: 0 },
                StepKind::Swap { a: 1, b: 1 },
                StepKind::Swap { a: 2, b: 2 },
                StepKind::Swap { a: 0, b: 0 },
                StepKind::Swap { a: 1, b: 1 },
                StepKind::Refresh,
                StepKind::Refresh,
            ]
        );
        assert!(steps.iter().all(|(_, state)| state == &vec![1, 2, 3]));
    }

    #[test]
    fn merge_golden_trace() {
        let (output, steps) = trace(Algorithm::Merge, &[2, 1]);
        assert_eq!(output, vec![1, 2]);
        assert_eq!(
            steps,
            vec![
                (StepKind::Overwrite { index: 0, value: 1 }, vec![1, 1]),
                (StepKind::Overwrite { index: 1, value: 2 }, vec![1, 2]),
                (StepKind::Refresh, vec![1, 2]),
            ]
        );
    }

    #[test]
    fn merge_ties_prefer_the_left_run() {
        // Equal keys must come from the left buffer first so the merge is
        // stable over the run boundaries.
        let (output, steps) = trace(Algorithm::Merge, &[2, 2, 1]);
        assert_eq!(output, vec![1, 2, 2]);
        assert!(steps
            .iter()
            .any(|(kind, _)| matches!(kind, StepKind::Refresh)));
    }

    #[test]
    fn algorithm_names_round_trip() {
        for algorithm in Algorithm::ALL {
            let parsed: Algorithm = algorithm.name().parse().unwrap();
            assert_eq!(parsed, algorithm);
        }
        assert_eq!("BUBBLE".parse::<Algorithm>().unwrap(), Algorithm::Bubble);
        assert!("bogo".parse::<Algorithm>().is_err());
    }
}
