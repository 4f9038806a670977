use crate::config::CheckerErrors;

/// Edit costs for the weighted Levenshtein distance.
///
/// Costs are validated once at construction: negative costs are rejected.
/// Zero costs are legal and make the corresponding operation free.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct EditCosts {
    insert: u64,
    delete: u64,
    replace: u64,
}

impl EditCosts {
    pub const DEFAULT: EditCosts = EditCosts {
        insert: 1,
        delete: 1,
        replace: 1,
    };

    pub fn new(insert: i64, delete: i64, replace: i64) -> Result<EditCosts, CheckerErrors> {
        for c in [insert, delete, replace] {
            if c < 0 {
                return Err(CheckerErrors::InvalidCost(c));
            }
        }
        Ok(EditCosts {
            insert: insert as u64,
            delete: delete as u64,
            replace: replace as u64,
        })
    }
}

/// The Levenshtein distance with all costs equal to one.
pub fn levenshtein<T: PartialEq>(splits: &[T], controls: &[T]) -> u64 {
    levenshtein_with_costs(splits, controls, &EditCosts::DEFAULT)
}

/// The weighted Levenshtein distance between two sequences.
///
/// Arguments:
/// * `splits` the recorded sequence, e.g. the punches read from a card
/// * `controls` the expected sequence, e.g. the course control codes
/// * `costs` the cost of inserting an element of `controls`, deleting an
///   element of `splits`, and substituting one for the other
///
/// A matching pair of elements costs nothing and is never substituted.
/// Runs in O(|splits| * |controls|) time with a rolling row.
pub fn levenshtein_with_costs<T: PartialEq>(
    splits: &[T],
    controls: &[T],
    costs: &EditCosts,
) -> u64 {
    let n = controls.len();
    // Distance from the empty prefix of splits: insertions only.
    let mut prev: Vec<u64> = (0..=n).map(|j| j as u64 * costs.insert).collect();
    for (i, s) in splits.iter().enumerate() {
        let mut cur: Vec<u64> = vec![0; n + 1];
        cur[0] = (i as u64 + 1) * costs.delete;
        for (j, c) in controls.iter().enumerate() {
            cur[j + 1] = if s == c {
                prev[j]
            } else {
                let substitution = prev[j] + costs.replace;
                let insertion = cur[j] + costs.insert;
                let deletion = prev[j + 1] + costs.delete;
                substitution.min(insertion).min(deletion)
            };
        }
        prev = cur;
    }
    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lev_str(splits: &str, controls: &str, costs: &EditCosts) -> u64 {
        let a: Vec<char> = splits.chars().collect();
        let b: Vec<char> = controls.chars().collect();
        levenshtein_with_costs(&a, &b, costs)
    }

    fn lev_default(splits: &str, controls: &str) -> u64 {
        lev_str(splits, controls, &EditCosts::DEFAULT)
    }

    #[test]
    fn empty_seqs() {
        assert_eq!(lev_default("", ""), 0);
    }

    #[test]
    fn delete_only() {
        assert_eq!(lev_default("abc", ""), 3);
    }

    #[test]
    fn insert_only() {
        assert_eq!(lev_default("", "xyz"), 3);
    }

    #[test]
    fn replace_only() {
        assert_eq!(lev_default("abc", "xyz"), 3);
    }

    #[test]
    fn mixed_operations() {
        assert_eq!(lev_default("kitten", "sitting"), 3);
    }

    #[test]
    fn custom_costs() {
        let cases: &[(&str, &str, i64, i64, i64, u64)] = &[
            ("", "xyz", 2, 1, 1, 6),
            ("abc", "", 1, 2, 1, 6),
            ("abc", "xyz", 1, 1, 1, 3),
            ("abc", "xyz", 2, 1, 1, 3),
            ("abc", "xyz", 1, 1, 3, 6),
            ("abc", "abc", 1, 1, 1, 0),
            ("abxc", "abc", 1, 0, 1, 0),
            ("axc", "abc", 1, 0, 1, 1),
            ("ac", "abc", 1, 0, 1, 1),
        ];
        for (splits, controls, insert, delete, replace, expected) in cases {
            let costs = EditCosts::new(*insert, *delete, *replace).unwrap();
            assert_eq!(
                lev_str(splits, controls, &costs),
                *expected,
                "distance between {:?} and {:?} with costs {:?}",
                splits,
                controls,
                costs
            );
        }
    }

    #[test]
    fn swapping_sequences_swaps_costs() {
        let pairs = [("kitten", "sitting"), ("abxc", "abc"), ("", "xyz")];
        let forward = EditCosts::new(2, 3, 5).unwrap();
        let backward = EditCosts::new(3, 2, 5).unwrap();
        for (a, b) in pairs {
            assert_eq!(lev_str(a, b, &forward), lev_str(b, a, &backward));
        }
    }

    #[test]
    fn numeric_sequences() {
        let splits: Vec<u32> = vec![31, 32, 99, 33];
        let controls: Vec<u32> = vec![31, 32, 33];
        assert_eq!(levenshtein(&splits, &controls), 1);
    }

    #[test]
    fn negative_costs_rejected() {
        assert_eq!(
            EditCosts::new(-1, 1, 1),
            Err(CheckerErrors::InvalidCost(-1))
        );
        assert_eq!(
            EditCosts::new(1, -2, 1),
            Err(CheckerErrors::InvalidCost(-2))
        );
        assert_eq!(
            EditCosts::new(1, 1, -3),
            Err(CheckerErrors::InvalidCost(-3))
        );
        assert!(EditCosts::new(0, 0, 0).is_ok());
    }
}
