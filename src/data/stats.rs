use std::collections::HashMap;
use std::f64::consts::PI;

use super::error::{DashboardError, DashboardResult};
use super::model::DrugDataset;

/// Delimiter between side effect names in the `side_effects` field.
pub const SIDE_EFFECT_DELIMITER: char = ';';

/// Number of points the density curve is sampled at.
const DENSITY_SAMPLES: usize = 200;

// ---------------------------------------------------------------------------
// Value-count ranking
// ---------------------------------------------------------------------------

/// A distinct value and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCount {
    pub label: String,
    pub count: usize,
}

/// Count each distinct item and return the `n` most frequent, most frequent
/// first. Ties keep the order in which the items were first seen.
fn rank_by_count<'a>(items: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<RankedCount> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match slot.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }

    // `sort_by` is stable, so first-seen order survives among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(label, count)| RankedCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Split a `;`-delimited side effect field into trimmed, non-empty tokens.
pub fn side_effect_tokens(field: &str) -> impl Iterator<Item = &str> {
    field
        .split(SIDE_EFFECT_DELIMITER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The `n` most frequently reported side effects across all records.
/// Records without a side effects field contribute nothing.
pub fn top_side_effects(dataset: &DrugDataset, n: usize) -> Vec<RankedCount> {
    let tokens = dataset
        .iter()
        .filter_map(|r| r.side_effects.as_deref())
        .flat_map(side_effect_tokens);
    rank_by_count(tokens, n)
}

/// The `n` most frequent medical conditions, compared exactly.
pub fn top_conditions(dataset: &DrugDataset, n: usize) -> Vec<RankedCount> {
    rank_by_count(
        dataset.iter().filter_map(|r| r.medical_condition.as_deref()),
        n,
    )
}

/// The `n` drug names that appear in the most rows.
pub fn top_drug_names(dataset: &DrugDataset, n: usize) -> Vec<RankedCount> {
    rank_by_count(dataset.iter().filter_map(|r| r.drug_name.as_deref()), n)
}

// ---------------------------------------------------------------------------
// Review totals per drug
// ---------------------------------------------------------------------------

/// One drug with its review count summed over all of its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewedDrug {
    pub drug_name: String,
    pub total_reviews: u64,
    /// First non-missing side effects text of the drug, cut to the preview
    /// length. The caller appends the ellipsis.
    pub side_effects_preview: Option<String>,
}

/// Group by drug name, sum `no_of_reviews` and return the `n` largest totals.
///
/// Missing review counts add nothing to a total; rows without a drug name
/// form no group. Ties keep first-seen order.
pub fn top_reviewed_drugs(
    dataset: &DrugDataset,
    n: usize,
    preview_chars: usize,
) -> DashboardResult<Vec<ReviewedDrug>> {
    if dataset.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }

    struct Group<'a> {
        name: &'a str,
        total: u64,
        side_effects: Option<&'a str>,
    }

    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for record in dataset {
        let Some(name) = record.drug_name.as_deref() else {
            continue;
        };
        let i = *slot.entry(name).or_insert_with(|| {
            groups.push(Group {
                name,
                total: 0,
                side_effects: None,
            });
            groups.len() - 1
        });
        let group = &mut groups[i];
        group.total = group.total.saturating_add(record.no_of_reviews.unwrap_or(0));
        if group.side_effects.is_none() {
            group.side_effects = record.side_effects.as_deref();
        }
    }

    groups.sort_by(|a, b| b.total.cmp(&a.total));
    Ok(groups
        .into_iter()
        .take(n)
        .map(|g| ReviewedDrug {
            drug_name: g.name.to_string(),
            total_reviews: g.total,
            side_effects_preview: g
                .side_effects
                .map(|s| truncate_chars(s, preview_chars).to_string()),
        })
        .collect())
}

/// Hard cut after `max` characters, no word-boundary handling.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Rating histogram
// ---------------------------------------------------------------------------

/// One equal-width histogram bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBucket {
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Rating distribution: bucket counts plus a smoothed density curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingHistogram {
    pub buckets: Vec<HistogramBucket>,
    /// `[rating, estimate]` points of a Gaussian KDE, scaled to bucket counts
    /// so it overlays the bars. Empty with fewer than two distinct ratings.
    pub density: Vec<[f64; 2]>,
    /// Number of ratings counted (missing ratings excluded).
    pub observations: usize,
}

impl RatingHistogram {
    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }
}

/// Bucket the observed ratings into `bucket_count` equal-width buckets that
/// span the observed minimum and maximum.
///
/// Buckets are `[lower, upper)` except the last, which is `[lower, upper]`.
/// When every rating is equal the span is widened by 0.5 on each side.
pub fn rating_histogram(dataset: &DrugDataset, bucket_count: usize) -> RatingHistogram {
    let ratings: Vec<f64> = dataset
        .iter()
        .filter_map(|r| r.rating)
        .filter(|v| v.is_finite())
        .collect();
    if ratings.is_empty() {
        return RatingHistogram::default();
    }

    let bucket_count = bucket_count.max(1);
    let mut lo = ratings.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bucket_count as f64;

    let mut buckets: Vec<HistogramBucket> = (0..bucket_count)
        .map(|i| HistogramBucket {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bucket_count {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    // Place by the stored bounds, not by `(v - lo) / width`: the quotient
    // can round below an exact lower bound.
    for &v in &ratings {
        let idx = buckets.partition_point(|b| b.lower <= v).saturating_sub(1);
        buckets[idx].count += 1;
    }

    let density = kernel_density(&ratings, lo, hi)
        .into_iter()
        .map(|[x, d]| [x, d * ratings.len() as f64 * width])
        .collect();

    RatingHistogram {
        buckets,
        density,
        observations: ratings.len(),
    }
}

/// Gaussian kernel density estimate with Scott's rule bandwidth, sampled
/// evenly on `[lo, hi]`.
fn kernel_density(samples: &[f64], lo: f64, hi: f64) -> Vec<[f64; 2]> {
    let n = samples.len();
    if n < 2 {
        return Vec::new();
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev < f64::EPSILON {
        return Vec::new();
    }

    let bandwidth = std_dev * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());
    let step = (hi - lo) / (DENSITY_SAMPLES - 1) as f64;

    (0..DENSITY_SAMPLES)
        .map(|i| {
            let x = lo + i as f64 * step;
            let sum: f64 = samples
                .iter()
                .map(|s| (-0.5 * ((x - s) / bandwidth).powi(2)).exp())
                .sum();
            [x, sum * norm]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DrugRecord;

    fn row(name: &str, condition: &str, reviews: u64, side_effects: &str) -> DrugRecord {
        DrugRecord {
            drug_name: Some(name.into()),
            medical_condition: Some(condition.into()),
            no_of_reviews: Some(reviews),
            side_effects: Some(side_effects.into()),
            ..Default::default()
        }
    }

    fn rated(rating: Option<f64>) -> DrugRecord {
        DrugRecord {
            rating,
            ..Default::default()
        }
    }

    fn aspirin() -> DrugDataset {
        DrugDataset::from_records(vec![
            row("Aspirin", "Pain", 5, "Nausea;Headache"),
            row("Aspirin", "Pain", 10, "Headache"),
        ])
    }

    #[test]
    fn aspirin_reviews_are_summed() {
        let top = top_reviewed_drugs(&aspirin(), 1, 150).unwrap();
        assert_eq!(
            top,
            vec![ReviewedDrug {
                drug_name: "Aspirin".into(),
                total_reviews: 15,
                side_effects_preview: Some("Nausea;Headache".into()),
            }]
        );
    }

    #[test]
    fn aspirin_side_effects_are_split_and_counted() {
        let top = top_side_effects(&aspirin(), 2);
        assert_eq!(
            top,
            vec![
                RankedCount { label: "Headache".into(), count: 2 },
                RankedCount { label: "Nausea".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn empty_dataset_has_no_review_ranking() {
        let err = top_reviewed_drugs(&DrugDataset::default(), 5, 150).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset));
    }

    #[test]
    fn review_ranking_is_non_increasing_with_first_seen_ties() {
        let ds = DrugDataset::from_records(vec![
            row("B", "x", 10, "a"),
            row("A", "x", 30, "a"),
            row("C", "x", 10, "a"),
            row("B", "x", 20, "a"),
            row("D", "x", 30, "a"),
        ]);
        let top = top_reviewed_drugs(&ds, 5, 150).unwrap();
        let names: Vec<_> = top.iter().map(|d| d.drug_name.as_str()).collect();
        // B=30, A=30, D=30 tie in first-seen order, C=10 last.
        assert_eq!(names, vec!["B", "A", "D", "C"]);
        assert!(top.windows(2).all(|w| w[0].total_reviews >= w[1].total_reviews));
    }

    #[test]
    fn preview_uses_first_present_side_effects_and_cuts_hard() {
        let long = "é".repeat(200);
        let mut first = row("A", "x", 1, "");
        first.side_effects = None;
        let ds = DrugDataset::from_records(vec![first, row("A", "x", 1, &long)]);

        let top = top_reviewed_drugs(&ds, 1, 150).unwrap();
        let preview = top[0].side_effects_preview.as_deref().unwrap();
        assert_eq!(preview.chars().count(), 150);
    }

    #[test]
    fn missing_names_and_counts_are_tolerated() {
        let mut unnamed = row("", "x", 100, "a");
        unnamed.drug_name = None;
        let mut uncounted = row("A", "x", 0, "a");
        uncounted.no_of_reviews = None;
        let ds = DrugDataset::from_records(vec![unnamed, uncounted, row("A", "x", 4, "a")]);

        let top = top_reviewed_drugs(&ds, 5, 150).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].total_reviews, 4);
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 150), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn side_effect_tokens_are_trimmed_and_non_empty() {
        let tokens: Vec<_> = side_effect_tokens(" hives ;; ; fever;").collect();
        assert_eq!(tokens, vec!["hives", "fever"]);
    }

    #[test]
    fn side_effect_counts_are_bounded_and_unique() {
        let mut empty = row("C", "y", 1, "");
        empty.side_effects = None;
        let ds = DrugDataset::from_records(vec![
            row("A", "x", 1, "hives; fever ;nausea"),
            row("B", "x", 1, "fever;;rash"),
            empty,
        ]);
        let top = top_side_effects(&ds, 10);
        let total: usize = top.iter().map(|c| c.count).sum();
        assert_eq!(total, 5);
        let mut labels: Vec<_> = top.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["fever", "hives", "nausea", "rash"]);
        labels.dedup();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn conditions_are_counted_exactly() {
        let ds = DrugDataset::from_records(vec![
            row("A", "Pain", 1, "a"),
            row("B", "pain", 1, "a"),
            row("C", "Acne", 1, "a"),
            row("D", "Acne", 1, "a"),
            row("E", "Pain", 1, "a"),
            row("F", "Acne", 1, "a"),
        ]);
        let top = top_conditions(&ds, 2);
        assert_eq!(
            top,
            vec![
                RankedCount { label: "Acne".into(), count: 3 },
                RankedCount { label: "Pain".into(), count: 2 },
            ]
        );
        assert_eq!(top_conditions(&ds, 10), top_conditions(&ds, 10));
    }

    #[test]
    fn drug_names_ranked_by_row_count() {
        let ds = DrugDataset::from_records(vec![
            row("A", "x", 1, "a"),
            row("B", "x", 1, "a"),
            row("B", "x", 1, "a"),
        ]);
        let top = top_drug_names(&ds, 100);
        assert_eq!(top[0], RankedCount { label: "B".into(), count: 2 });
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn histogram_last_bucket_is_closed() {
        let ds = DrugDataset::from_records(
            [1.0, 2.0, 2.5, 3.0, 5.0]
                .into_iter()
                .map(|v| rated(Some(v)))
                .chain([rated(None)])
                .collect(),
        );
        let hist = rating_histogram(&ds, 4);
        let counts: Vec<_> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 1, 1]);
        assert_eq!(hist.observations, 5);
        assert_eq!(hist.buckets[0].lower, 1.0);
        assert_eq!(hist.buckets[3].upper, 5.0);
        assert_eq!(hist.density.len(), DENSITY_SAMPLES);
        assert!(hist.density.iter().all(|[_, d]| *d >= 0.0));
    }

    fn histogram_of(values: &[f64], buckets: usize) -> RatingHistogram {
        rating_histogram(
            &DrugDataset::from_records(values.iter().map(|&v| rated(Some(v))).collect()),
            buckets,
        )
    }

    /// Count `values` per bucket using only the stored bounds.
    fn counts_by_bounds(hist: &RatingHistogram, values: &[f64]) -> Vec<usize> {
        let last = hist.buckets.len() - 1;
        hist.buckets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                values
                    .iter()
                    .filter(|&&v| v >= b.lower && (v < b.upper || (i == last && v <= b.upper)))
                    .count()
            })
            .collect()
    }

    #[test]
    fn ratings_on_interior_bounds_land_in_the_upper_bucket() {
        // lo = 1, hi = 10, 10 buckets of width 0.9.
        let span = histogram_of(&[1.0, 10.0], 10);
        let mut values = vec![1.0, 10.0];
        values.extend(span.buckets.iter().skip(1).map(|b| b.lower));

        let hist = histogram_of(&values, 10);
        assert_eq!(hist.buckets.len(), 10);
        let counts: Vec<_> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 2]);
        assert_eq!(counts, counts_by_bounds(&hist, &values));
    }

    #[test]
    fn tenth_step_ratings_respect_stored_bounds() {
        let values: Vec<f64> = (10..=100).map(|i| i as f64 / 10.0).collect();
        for buckets in [3, 7, 10, 12] {
            let hist = histogram_of(&values, buckets);
            let counts: Vec<_> = hist.buckets.iter().map(|b| b.count).collect();
            assert_eq!(counts, counts_by_bounds(&hist, &values), "{buckets} buckets");
            assert_eq!(counts.iter().sum::<usize>(), values.len());
        }
    }

    #[test]
    fn histogram_of_equal_ratings_is_widened() {
        let ds = DrugDataset::from_records(vec![rated(Some(7.0)), rated(Some(7.0))]);
        let hist = rating_histogram(&ds, 10);
        assert_eq!(hist.buckets.len(), 10);
        assert_eq!(hist.buckets[0].lower, 6.5);
        assert_eq!(hist.buckets[9].upper, 7.5);
        assert_eq!(hist.buckets.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(hist.density.is_empty());
    }

    #[test]
    fn histogram_without_ratings_is_empty() {
        let ds = DrugDataset::from_records(vec![rated(None)]);
        let hist = rating_histogram(&ds, 10);
        assert!(hist.is_empty());
        assert!(hist.buckets.is_empty());
    }
}
