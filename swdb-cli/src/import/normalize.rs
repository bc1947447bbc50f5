//! Map free-text cells onto controlled vocabularies

use calamine::Data;

use super::excel::cells::row_context;
use super::types::{Field, Issue, Vocabulary};

/// Where a value came from, for issue reporting
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub sheet: &'a str,
    pub row_number: usize,
    pub cells: &'a [Data],
}

/// Field normalizer collecting issues for one run
#[derive(Debug, Default)]
pub struct Normalizer {
    issues: Vec<Issue>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `raw` into `V`
    ///
    /// Blank cells are missing values and return `None` silently. Anything
    /// else that fails to match records exactly one issue.
    pub fn normalize<V: Vocabulary>(&mut self, raw: &str, ctx: &RowContext<'_>) -> Option<V> {
        if raw.trim().is_empty() {
            return None;
        }

        match V::parse(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("{} row {}: {}", ctx.sheet, ctx.row_number, err);
                self.report(err.field, raw, ctx);
                None
            }
        }
    }

    /// Record an issue for a value that could not be used
    pub fn report(&mut self, field: Field, raw: &str, ctx: &RowContext<'_>) {
        self.issues.push(Issue::unknown_value(
            field,
            raw,
            ctx.sheet,
            ctx.row_number,
            &row_context(ctx.cells),
        ));
    }

    #[cfg(test)]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
