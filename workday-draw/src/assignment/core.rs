//! Sampling without replacement over a candidate pool

use rand::Rng;

use super::models::{Assignment, CandidatePool};

/// More labels were submitted than the pool has values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustedPoolError {
    pub requested: usize,
    pub available: usize,
}

impl ExhaustedPoolError {
    /// How many values the pool is short by
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.available)
    }
}

impl std::fmt::Display for ExhaustedPoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Not enough values to assign: {} requested, {} available ({} short)",
            self.requested,
            self.available,
            self.shortfall()
        )
    }
}

impl std::error::Error for ExhaustedPoolError {}

/// Draw one value per label, uniformly at random, without replacement
///
/// Labels are processed in order. Each draw picks an index uniformly from
/// whatever is left in `pool` and removes the first instance equal to the
/// value found there.
/// The size check runs before any draw, so on error `pool` is untouched.
pub fn assign<R: Rng + ?Sized>(
    pool: &mut CandidatePool,
    labels: &[String],
    rng: &mut R,
) -> Result<Assignment, ExhaustedPoolError> {
    if labels.len() > pool.len() {
        return Err(ExhaustedPoolError {
            requested: labels.len(),
            available: pool.len(),
        });
    }

    let mut assignment = Assignment::with_capacity(labels.len());

    for label in labels {
        let index = rng.random_range(0..pool.len());
        let Some(chosen) = pool.take_at(index) else {
            // index comes from 0..pool.len(), so this never fires
            return Err(ExhaustedPoolError {
                requested: labels.len(),
                available: assignment.len(),
            });
        };

        log::debug!("Assigned {:?} to '{}' ({} left)", chosen, label, pool.len());
        assignment.push(label.clone(), chosen);
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::CellValue;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn pool(values: &[&str]) -> CandidatePool {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    fn sorted(values: Vec<CellValue>) -> Vec<String> {
        let mut out: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_full_draw_is_a_bijection() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = pool(&["Alice", "Bob", "Carol"]);

        let result = assign(&mut pool, &labels(&["Mon", "Tue", "Wed"]), &mut rng).unwrap();

        assert_eq!(result.len(), 3);
        let days: Vec<&str> = result.entries().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(days, vec!["Mon", "Tue", "Wed"]);
        assert_eq!(
            sorted(result.values().cloned().collect()),
            vec!["Alice", "Bob", "Carol"]
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn test_exhausted_pool_fails_without_mutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = pool(&["X", "Y"]);
        let before = pool.clone();

        let err = assign(&mut pool, &labels(&["Mon", "Tue", "Wed"]), &mut rng).unwrap_err();

        assert_eq!(err.requested, 3);
        assert_eq!(err.available, 2);
        assert_eq!(err.shortfall(), 1);
        assert!(err.to_string().contains("1 short"));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_empty_pool_and_no_labels() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = CandidatePool::new();

        let result = assign(&mut pool, &[], &mut rng).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_pool_with_labels_is_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = CandidatePool::new();

        let err = assign(&mut pool, &labels(&["Mon"]), &mut rng).unwrap_err();

        assert_eq!(err.shortfall(), 1);
    }

    #[test]
    fn test_duplicate_values_removed_one_at_a_time() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = pool(&["A", "A", "B"]);

            let result = assign(&mut pool, &labels(&["Mon", "Tue"]), &mut rng).unwrap();

            let drawn = sorted(result.values().cloned().collect());
            assert!(
                drawn == vec!["A", "A"] || drawn == vec!["A", "B"],
                "unexpected draw {:?}",
                drawn
            );
            assert_eq!(pool.len(), 1);

            // Drawn values plus leftovers reproduce the original multiset
            let mut all: Vec<CellValue> = result.values().cloned().collect();
            all.extend(pool.into_values());
            assert_eq!(sorted(all), vec!["A", "A", "B"]);
        }
    }

    #[test]
    fn test_duplicate_labels_keep_both_entries() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = pool(&["A", "B", "C"]);

        let result = assign(&mut pool, &labels(&["Mon", "Mon"]), &mut rng).unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.entries().iter().all(|(l, _)| l == "Mon"));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let names = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];
        let days = labels(&["Mon", "Tue", "Wed", "Thu"]);

        let mut first_pool = pool(&names);
        let mut second_pool = pool(&names);
        let first = assign(&mut first_pool, &days, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = assign(&mut second_pool, &days, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_pool, second_pool);
    }

    #[test]
    fn test_values_come_from_pool() {
        let names = ["Alice", "Bob", "Carol", "Dave", "Erin"];
        for seed in 0..20 {
            let mut pool = pool(&names);
            let result = assign(
                &mut pool,
                &labels(&["Mon", "Tue"]),
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap();

            assert_eq!(result.len(), 2);
            for value in result.values() {
                assert!(names.contains(&value.as_str().unwrap()));
            }
            let drawn: Vec<&CellValue> = result.values().collect();
            assert_ne!(drawn[0], drawn[1]);
        }
    }

    fn index_of(value: &CellValue) -> usize {
        match value.as_str() {
            Some("A") => 0,
            Some("B") => 1,
            Some("C") => 2,
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_single_draw_is_uniform() {
        let mut counts = [0usize; 3];
        for seed in 0..3000 {
            let mut pool = pool(&["A", "B", "C"]);
            let result = assign(&mut pool, &labels(&["Mon"]), &mut StdRng::seed_from_u64(seed)).unwrap();
            counts[index_of(result.get("Mon").unwrap())] += 1;
        }

        // Expect ~1000 each; the bounds sit far outside normal sampling noise
        for count in counts {
            assert!((800..=1200).contains(&count), "skewed draw counts {:?}", counts);
        }
    }

    #[test]
    fn test_leftover_after_partial_draw_is_uniform() {
        let mut counts = [0usize; 3];
        for seed in 0..3000 {
            let mut pool = pool(&["A", "B", "C"]);
            assign(&mut pool, &labels(&["Mon", "Tue"]), &mut StdRng::seed_from_u64(seed)).unwrap();
            counts[index_of(&pool.values()[0])] += 1;
        }

        for count in counts {
            assert!((800..=1200).contains(&count), "skewed leftover counts {:?}", counts);
        }
    }

    #[test]
    fn test_mixed_cell_types() {
        let mut pool = CandidatePool::from_values(vec![
            CellValue::Null,
            CellValue::Int(3),
            CellValue::Bool(false),
        ]);

        let result = assign(
            &mut pool,
            &labels(&["Mon", "Tue", "Wed"]),
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();

        assert_eq!(result.len(), 3);
        assert!(result.values().any(|v| v.is_null()));
        assert!(pool.is_empty());
    }
}
