//! Ingestion status aggregation.

use crate::types::Status;

/// Derive an ingestion's status from its batches.
///
/// - every batch `yet_to_start` → `yet_to_start`
/// - every batch `completed` → `completed`
/// - anything else → `triggered`
///
/// An empty slice never occurs for a planned ingestion; it maps to
/// `yet_to_start`.
pub fn overall_status<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    let mut all_pending = true;
    let mut all_done = true;
    let mut seen_any = false;

    for s in statuses {
        seen_any = true;
        all_pending &= s == Status::YetToStart;
        all_done &= s == Status::Completed;
    }

    if !seen_any || all_pending {
        Status::YetToStart
    } else if all_done {
        Status::Completed
    } else {
        Status::Triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Status; 3] = [Status::YetToStart, Status::Triggered, Status::Completed];

    /// Every status sequence of the given length.
    fn sequences(len: usize) -> Vec<Vec<Status>> {
        let mut out: Vec<Vec<Status>> = vec![Vec::new()];
        for _ in 0..len {
            out = out
                .into_iter()
                .flat_map(|prefix| {
                    ALL.into_iter().map(move |s| {
                        let mut next = prefix.clone();
                        next.push(s);
                        next
                    })
                })
                .collect();
        }
        out
    }

    #[test]
    fn exhaustive_sequences_up_to_four() {
        let mut checked = 0;
        for len in 1..=4 {
            for seq in sequences(len) {
                let got = overall_status(seq.iter().copied());
                let expected = if seq.iter().all(|s| *s == Status::YetToStart) {
                    Status::YetToStart
                } else if seq.iter().all(|s| *s == Status::Completed) {
                    Status::Completed
                } else {
                    Status::Triggered
                };
                assert_eq!(got, expected, "sequence {:?}", seq);
                checked += 1;
            }
        }
        // 3 + 9 + 27 + 81
        assert_eq!(checked, 120);
    }

    #[test]
    fn mixed_pending_and_completed_is_triggered() {
        let s = overall_status([Status::Completed, Status::YetToStart]);
        assert_eq!(s, Status::Triggered);
    }

    #[test]
    fn single_batch_follows_batch() {
        for s in ALL {
            assert_eq!(overall_status([s]), s);
        }
    }

    #[test]
    fn empty_is_yet_to_start() {
        assert_eq!(overall_status(std::iter::empty()), Status::YetToStart);
    }
}
