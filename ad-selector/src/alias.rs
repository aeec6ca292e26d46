use log::warn;
use rand::Rng;

/// Walker alias table over a discrete weight distribution: O(n) to build,
/// O(1) per draw.
///
/// Candidate sets differ per request, so the table is rebuilt for every
/// selection call rather than cached.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    prob: Vec<f64>,
    alias: Vec<usize>,
}

impl AliasTable {
    /// Builds the table. `None` when the weights cannot form a distribution:
    /// empty, containing a negative or non-finite entry, or summing to zero.
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let count = weights.len();
        let mut scaled: Vec<f64> = weights.iter().map(|w| w * count as f64 / total).collect();
        let mut prob = vec![0.0; count];
        let mut alias: Vec<usize> = (0..count).collect();

        let (mut small, mut large): (Vec<usize>, Vec<usize>) =
            (0..count).partition(|&index| scaled[index] < 1.0);

        while let (Some(lo), Some(hi)) = (small.pop(), large.pop()) {
            prob[lo] = scaled[lo];
            alias[lo] = hi;
            scaled[hi] = (scaled[hi] + scaled[lo]) - 1.0;
            if scaled[hi] < 1.0 {
                small.push(hi);
            } else {
                large.push(hi);
            }
        }
        // Whatever is left on either list is 1.0 up to rounding.
        for index in small.into_iter().chain(large) {
            prob[index] = 1.0;
        }

        Some(Self { prob, alias })
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// Draws one index from the distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let column = rng.gen_range(0..self.prob.len());
        if rng.gen::<f64>() < self.prob[column] {
            column
        } else {
            self.alias[column]
        }
    }
}

/// Weighted draw over `items`, one weight per item.
///
/// Returns `None` only when `items` is empty. A degenerate weight set falls
/// back to a uniform draw instead of failing the request; the recovery is
/// logged and non-fatal.
pub fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], weights: &[f64], rng: &mut R) -> Option<&'a T> {
    assert_eq!(items.len(), weights.len(), "one weight per candidate");
    if items.is_empty() {
        return None;
    }

    match AliasTable::new(weights) {
        Some(table) => Some(&items[table.sample(rng)]),
        None => {
            warn!(
                target: "selection",
                "weighted draw found no winner, falling back to a uniform pick"
            );
            Some(&items[rng.gen_range(0..items.len())])
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_candidates_select_nothing() {
        let nothing: [&str; 0] = [];

        assert_eq!(None, pick(&nothing, &[], &mut rand::thread_rng()));
    }

    #[test]
    fn winners_always_come_from_the_candidate_set() {
        let items = ["a", "b", "c", "d"];
        let weights = [0.0, 2.5, 0.25, 1.0];
        let mut rng = rand::thread_rng();

        for _ in 0..1_000 {
            let winner = pick(&items, &weights, &mut rng).expect("candidates are non-empty");
            assert!(items.contains(winner));
        }
    }

    #[test]
    fn a_single_candidate_always_wins() {
        let items = ["only"];
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            assert_eq!(Some(&"only"), pick(&items, &[1.0], &mut rng));
        }
    }

    #[test]
    fn zero_weight_candidates_are_never_drawn_by_the_table() {
        let table = AliasTable::new(&[0.0, 1.0]).expect("one positive weight");
        let mut rng = rand::thread_rng();

        for _ in 0..1_000 {
            assert_eq!(1, table.sample(&mut rng));
        }
    }

    #[test]
    fn degenerate_weights_still_produce_a_winner() {
        let items = ["a", "b"];
        let mut rng = rand::thread_rng();

        assert_eq!(None, AliasTable::new(&[0.0, 0.0]));
        let winner = pick(&items, &[0.0, 0.0], &mut rng).expect("uniform fallback");
        assert!(items.contains(winner));

        assert_eq!(None, AliasTable::new(&[1.0, -1.0]));
        assert_eq!(None, AliasTable::new(&[f64::NAN, 1.0]));
        assert_eq!(None, AliasTable::new(&[]));
    }

    #[test]
    fn selection_frequency_tracks_the_weights() {
        let items = [0usize, 1];
        let weights = [3.0, 1.0];
        let mut rng = rand::thread_rng();

        let trials = 40_000;
        let mut first = 0u32;
        for _ in 0..trials {
            if let Some(&0) = pick(&items, &weights, &mut rng) {
                first += 1;
            }
        }

        // expectation 0.75; 0.02 is far beyond the binomial 3-sigma bound
        let observed = f64::from(first) / f64::from(trials);
        assert!(
            (observed - 0.75).abs() < 0.02,
            "expected ~75% for the 3:1 weight, observed {observed}"
        );
    }
}
