use super::transaction::{Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(TransactionKind),
}

impl KindFilter {
    /// Parses `all`, `income`, or `expense`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Some(KindFilter::All);
        }
        TransactionKind::parse(raw).map(KindFilter::Only)
    }

    pub fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(expected) => *expected == kind,
        }
    }
}

/// Search term and kind filter combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    search: String,
    pub kind: KindFilter,
}

impl TransactionFilter {
    pub fn new(search: &str, kind: KindFilter) -> Self {
        Self {
            search: search.to_lowercase(),
            kind,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.matches(transaction.kind)
            && (self.search.is_empty()
                || transaction.description.to_lowercase().contains(&self.search))
    }
}
