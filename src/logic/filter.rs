//! Pluggable search predicates for the results list.

use crate::state::{Sample, StrategyKind};
use crate::util::{fuzzy_score, match_rank};

/// What: Decide whether (and how well) a sample matches a search query.
///
/// Details:
/// - `score` returns `None` for non-matches and a rank (lower is better) otherwise.
/// - When `ranks()` is `false` the browser keeps catalog order among matches.
pub trait MatchStrategy: Send + Sync + std::fmt::Debug {
    /// Which selectable kind this strategy implements.
    fn kind(&self) -> StrategyKind;

    /// Score `sample` against an already lowercased, trimmed, non-empty query.
    fn score(&self, sample: &Sample, query_lower: &str) -> Option<u32>;

    /// Whether matches should be ordered by score rather than catalog position.
    fn ranks(&self) -> bool {
        false
    }
}

/// Case-insensitive substring match over name, description, and category.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatch;

impl MatchStrategy for SubstringMatch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Substring
    }

    fn score(&self, sample: &Sample, query_lower: &str) -> Option<u32> {
        let fields = [
            sample.name.as_str(),
            sample.description.as_str(),
            sample.category.as_deref().unwrap_or(""),
        ];
        let best = fields
            .iter()
            .map(|f| match_rank(f, query_lower))
            .min()
            .unwrap_or(3);
        (best < 3).then_some(u32::from(best))
    }
}

/// Ordered-subsequence match; names score better than descriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FuzzyMatch;

/// Added to description scores so a name hit always outranks them.
const DESCRIPTION_PENALTY: u32 = 1_000;

impl MatchStrategy for FuzzyMatch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fuzzy
    }

    fn score(&self, sample: &Sample, query_lower: &str) -> Option<u32> {
        let by_name = fuzzy_score(&sample.name, query_lower);
        let by_desc = || {
            fuzzy_score(&sample.description, query_lower)
                .map(|s| s.saturating_add(DESCRIPTION_PENALTY))
        };
        by_name.or_else(by_desc)
    }

    fn ranks(&self) -> bool {
        true
    }
}

/// Build the boxed strategy for a configured kind.
pub fn strategy_for(kind: StrategyKind) -> Box<dyn MatchStrategy> {
    match kind {
        StrategyKind::Substring => Box::new(SubstringMatch),
        StrategyKind::Fuzzy => Box::new(FuzzyMatch),
    }
}

/// What: Compute the displayed list for a query.
///
/// Inputs:
/// - `samples`: Full catalog in manifest order.
/// - `query`: Raw search text; surrounding whitespace is ignored.
/// - `strategy`: Predicate and ranking to apply.
///
/// Output:
/// - Catalog indices to display. An empty query yields every index in order.
///
/// Details:
/// - Ranking strategies sort by score and break ties by catalog order, so results are stable.
pub fn filter_indices(samples: &[Sample], query: &str, strategy: &dyn MatchStrategy) -> Vec<usize> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return (0..samples.len()).collect();
    }
    let mut hits: Vec<(u32, usize)> = samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| strategy.score(s, &q).map(|score| (score, i)))
        .collect();
    if strategy.ranks() {
        hits.sort_unstable();
    }
    hits.into_iter().map(|(_, i)| i).collect()
}
