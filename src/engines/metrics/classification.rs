use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelScores {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

/// Precision, recall and F-beta from (prediction, gold) pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub beta: f64,
    pub total: usize,
    pub per_label: BTreeMap<String, LabelScores>,
    /// Micro-averaged; with one prediction per instance this equals accuracy
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    pub macro_f_score: f64,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    let b2 = beta * beta;
    let denominator = b2 * precision + recall;
    if denominator == 0.0 {
        0.0
    } else {
        (1.0 + b2) * precision * recall / denominator
    }
}

impl ClassificationReport {
    pub fn from_pairs(pairs: &[(String, String)], beta: f64) -> Self {
        let labels: BTreeSet<&str> = pairs
            .iter()
            .flat_map(|(p, g)| [p.as_str(), g.as_str()])
            .collect();

        let mut per_label: BTreeMap<String, LabelScores> = labels
            .into_iter()
            .map(|l| (l.to_string(), LabelScores::default()))
            .collect();

        for (predicted, gold) in pairs {
            if predicted == gold {
                if let Some(s) = per_label.get_mut(gold) {
                    s.true_positives += 1;
                }
            } else {
                if let Some(s) = per_label.get_mut(predicted) {
                    s.false_positives += 1;
                }
                if let Some(s) = per_label.get_mut(gold) {
                    s.false_negatives += 1;
                }
            }
        }

        let (mut tp, mut fp, mut fn_) = (0, 0, 0);
        for scores in per_label.values_mut() {
            scores.precision = ratio(scores.true_positives, scores.true_positives + scores.false_positives);
            scores.recall = ratio(scores.true_positives, scores.true_positives + scores.false_negatives);
            scores.f_score = f_beta(scores.precision, scores.recall, beta);
            tp += scores.true_positives;
            fp += scores.false_positives;
            fn_ += scores.false_negatives;
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let macro_f_score = if per_label.is_empty() {
            0.0
        } else {
            per_label.values().map(|s| s.f_score).sum::<f64>() / per_label.len() as f64
        };

        Self {
            beta,
            total: pairs.len(),
            per_label,
            precision,
            recall,
            f_score: f_beta(precision, recall, beta),
            macro_f_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(p, g)| (p.to_string(), g.to_string())).collect()
    }

    #[test]
    fn test_perfect_predictions() {
        let report = ClassificationReport::from_pairs(&pairs(&[("a", "a"), ("b", "b")]), 1.0);
        assert_eq!(report.f_score, 1.0);
        assert_eq!(report.macro_f_score, 1.0);
    }

    #[test]
    fn test_per_label_counts() {
        let report = ClassificationReport::from_pairs(
            &pairs(&[("a", "a"), ("a", "b"), ("b", "b"), ("b", "b")]),
            1.0,
        );
        let a = &report.per_label["a"];
        assert_eq!((a.true_positives, a.false_positives, a.false_negatives), (1, 1, 0));
        assert_eq!(a.precision, 0.5);
        assert_eq!(a.recall, 1.0);

        let b = &report.per_label["b"];
        assert!((b.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.f_score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let report = ClassificationReport::from_pairs(&[], 1.0);
        assert_eq!(report.total, 0);
        assert_eq!(report.f_score, 0.0);
    }
}
