//! Non-fatal problems collected while converting a workbook

use serde::{Deserialize, Serialize};

/// Source field an issue or parse error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    LevelOfCare,
    SoftwareStatus,
    InstallStatus,
    VersionControl,
    Area,
    VerificationDate,
}

impl Field {
    /// Human readable label used in issue messages
    pub fn label(&self) -> &'static str {
        match self {
            Field::LevelOfCare => "level of care",
            Field::SoftwareStatus => "sw status",
            Field::InstallStatus => "installation status",
            Field::VersionControl => "version control",
            Field::Area => "area",
            Field::VerificationDate => "verification date",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A warning raised for a single cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub field: Field,
    /// Warning text, including the row context
    pub msg: String,
    /// The raw cell value that could not be used
    pub value: String,
    /// Worksheet the row came from
    pub sheet: String,
    /// 1-based worksheet row number
    pub row: usize,
}

impl Issue {
    pub fn unknown_value(
        field: Field,
        value: impl Into<String>,
        sheet: impl Into<String>,
        row: usize,
        context: &str,
    ) -> Self {
        Self {
            field,
            msg: format!(
                "WARNING: unknown {} listed for this record: {}",
                field.label(),
                context
            ),
            value: value.into(),
            sheet: sheet.into(),
            row,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} row {}: {} (value: '{}')",
            self.sheet, self.row, self.msg, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_value_message() {
        let issue = Issue::unknown_value(Field::Area, "LS9", "DRR01", 4, "ioc1 desc LS9");
        assert_eq!(
            issue.msg,
            "WARNING: unknown area listed for this record: ioc1 desc LS9"
        );
        assert_eq!(issue.value, "LS9");
        assert_eq!(
            issue.to_string(),
            "DRR01 row 4: WARNING: unknown area listed for this record: ioc1 desc LS9 (value: 'LS9')"
        );
    }
}
