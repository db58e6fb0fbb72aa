//! Existence predicates attached to filterable containers.
//!
//! A container's chain is combined on demand into one `PredicateChain`:
//! entries run in order and the first failing entry stops evaluation.
//! An empty chain combines to `None` rather than to an always-true chain so
//! callers can keep the unfiltered fast path.

use std::fmt;
use std::sync::Arc;

use ewise_core::Value;

pub type FilterPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A container (vector/matrix view) that may carry existence predicates.
pub trait Filterable {
    fn filter_chain(&self) -> &[FilterPredicate];

    fn has_filter(&self) -> bool {
        !self.filter_chain().is_empty()
    }
}

#[derive(Clone)]
pub struct PredicateChain {
    filters: Arc<[FilterPredicate]>,
}

impl PredicateChain {
    /// A chain with no entries; passes everything.
    pub fn always_pass() -> Self {
        Self {
            filters: Arc::from(Vec::new()),
        }
    }

    pub fn test(&self, x: &Value) -> bool {
        self.filters.iter().all(|f| f(x))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for PredicateChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateChain")
            .field("len", &self.filters.len())
            .finish()
    }
}

/// Combined predicate for `obj`, or `None` if it has no filter.
pub fn combined_predicate<F: Filterable + ?Sized>(obj: &F) -> Option<PredicateChain> {
    if !obj.has_filter() {
        return None;
    }
    Some(PredicateChain {
        filters: obj.filter_chain().iter().cloned().collect(),
    })
}

/// Filter state of a container view.
///
/// Attaching a filter yields a new view; views that already handed out
/// their chain never see it change.
#[derive(Clone, Default)]
pub struct FilteredView {
    chain: Vec<FilterPredicate>,
}

impl FilteredView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter<P>(&self, pred: P) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let mut chain = self.chain.clone();
        chain.push(Arc::new(pred));
        Self { chain }
    }

    pub fn without_filters(&self) -> Self {
        Self::default()
    }
}

impl Filterable for FilteredView {
    fn filter_chain(&self) -> &[FilterPredicate] {
        &self.chain
    }
}

impl fmt::Debug for FilteredView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredView")
            .field("filters", &self.chain.len())
            .finish()
    }
}
