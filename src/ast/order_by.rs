/// Sort direction of one `ORDER BY` term. Terms without a modifier sort
/// ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One `property [asc|desc]` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByTerm {
    pub property: String,
    pub direction: SortDirection,
}

/// A parsed `ORDER BY` clause: terms in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderByClause {
    pub terms: Vec<OrderByTerm>,
}

impl OrderByClause {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
