use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// One train/test split
#[derive(Debug, Clone)]
pub struct Fold<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
    pub fold_num: usize,
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub num_folds: usize,
    pub ratio: f64, // share of each label group used for training
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            num_folds: 5,
            ratio: 0.8,
            seed: None,
        }
    }
}

/// Repeated stratified sub-sampling
///
/// Every fold is an independent shuffle of each label group, so training sets of
/// different folds may overlap. This is not a k-way partition.
pub fn create_folds<T, L, F, R>(
    instances: &[T],
    num_folds: usize,
    ratio: f64,
    label_of: F,
    rng: &mut R,
) -> Vec<Fold<T>>
where
    T: Clone,
    L: Ord + Debug,
    F: Fn(&T) -> L,
    R: Rng + ?Sized,
{
    let mut groups: BTreeMap<L, Vec<&T>> = BTreeMap::new();
    for instance in instances {
        groups.entry(label_of(instance)).or_default().push(instance);
    }

    let mut folds: Vec<Fold<T>> = (0..num_folds)
        .map(|fold_num| Fold {
            train: Vec::new(),
            test: Vec::new(),
            fold_num,
        })
        .collect();

    for (label, group) in &groups {
        let size = group.len();
        if size < 2 {
            log::warn!(
                "Label {:?} has {} instance(s); too few for a test split, left out of all folds",
                label,
                size
            );
            continue;
        }

        let mut train_size = (ratio * size as f64).round() as usize;
        if train_size >= size {
            train_size = size - 1;
        }

        for fold in folds.iter_mut() {
            let mut shuffled = group.clone();
            shuffled.shuffle(rng);
            let (train, test) = shuffled.split_at(train_size);
            fold.train.extend(train.iter().map(|&t| t.clone()));
            fold.test.extend(test.iter().map(|&t| t.clone()));
        }
    }

    folds
}

pub trait DataSplitter<T>: Send + Sync {
    /// Split data into folds
    fn split(&self, data: &[T]) -> Vec<Fold<T>>;

    fn config(&self) -> &SplitConfig;
}

/// Stratified splitter keyed by a label function, with its own seeded RNG
pub struct StratifiedSplitter<F> {
    config: SplitConfig,
    label_of: F,
}

impl<F> StratifiedSplitter<F> {
    pub fn new(config: SplitConfig, label_of: F) -> Self {
        Self { config, label_of }
    }
}

impl<T, L, F> DataSplitter<T> for StratifiedSplitter<F>
where
    T: Clone,
    L: Ord + Debug,
    F: Fn(&T) -> L + Send + Sync,
{
    fn split(&self, data: &[T]) -> Vec<Fold<T>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        create_folds(data, self.config.num_folds, self.config.ratio, &self.label_of, &mut rng)
    }

    fn config(&self) -> &SplitConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(counts: &[(&'static str, usize)]) -> Vec<(usize, &'static str)> {
        let mut items = Vec::new();
        for &(label, n) in counts {
            for _ in 0..n {
                items.push((items.len(), label));
            }
        }
        items
    }

    #[test]
    fn test_train_share_per_label() {
        let data = labelled(&[("a", 10), ("b", 5), ("c", 3)]);
        let mut rng = StdRng::seed_from_u64(7);
        let folds = create_folds(&data, 4, 0.6, |x| x.1, &mut rng);

        assert_eq!(folds.len(), 4);
        for fold in &folds {
            let count = |set: &[(usize, &str)], label| set.iter().filter(|x| x.1 == label).count();
            assert_eq!(count(&fold.train[..], "a"), 6);
            assert_eq!(count(&fold.train[..], "b"), 3);
            assert_eq!(count(&fold.train[..], "c"), 2);
            assert_eq!(fold.train.len() + fold.test.len(), data.len());
        }
    }

    #[test]
    fn test_full_ratio_still_leaves_a_test_item() {
        let data = labelled(&[("a", 3)]);
        let mut rng = StdRng::seed_from_u64(1);
        let folds = create_folds(&data, 2, 1.0, |x| x.1, &mut rng);
        for fold in &folds {
            assert_eq!(fold.train.len(), 2);
            assert_eq!(fold.test.len(), 1);
        }
    }

    #[test]
    fn test_singleton_label_is_left_out() {
        let data = labelled(&[("a", 4), ("rare", 1)]);
        let mut rng = StdRng::seed_from_u64(3);
        let folds = create_folds(&data, 3, 0.5, |x| x.1, &mut rng);
        for fold in &folds {
            assert!(fold.train.iter().chain(&fold.test).all(|x| x.1 == "a"));
            assert_eq!(fold.test.len(), 2);
        }
    }

    #[test]
    fn test_seeded_splitter_is_deterministic() {
        let data = labelled(&[("a", 8), ("b", 8)]);
        let config = SplitConfig {
            num_folds: 3,
            ratio: 0.75,
            seed: Some(42),
        };
        let splitter = StratifiedSplitter::new(config, |x: &(usize, &'static str)| x.1);
        let first: Vec<Vec<usize>> = splitter.split(&data).iter().map(|f| f.test.iter().map(|x| x.0).collect()).collect();
        let second: Vec<Vec<usize>> = splitter.split(&data).iter().map(|f| f.test.iter().map(|x| x.0).collect()).collect();
        assert_eq!(first, second);
        assert_eq!(splitter.config.num_folds, 3);
    }
}
