use std::fmt;

/// Ordered `label: value` lines describing a file record.
///
/// Field order is part of the output format: base fields first, then the
/// type label, then variant metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    fields: Vec<(&'static str, String)>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field.
    pub fn push(&mut self, label: &'static str, value: impl ToString) {
        self.fields.push((label, value.to_string()));
    }

    /// All fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Value of the first field with `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in &self.fields {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}
