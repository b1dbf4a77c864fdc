use colored::Colorize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformation {
    #[error("pattern is empty")]
    Empty,
    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedCharacter(char, usize),
}

/// Every way `compile` can fail. Compilation is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("malformed pattern: {0}")]
    MalformedPattern(Malformation),
    #[error("mismatched grouping at offset {offset}")]
    MismatchedGrouping { offset: usize },
    #[error("invalid expression at offset {offset}: {reason}")]
    InvalidExpression { offset: usize, reason: String },
}

impl CompileError {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Self::MalformedPattern(Malformation::Empty) => None,
            Self::MalformedPattern(Malformation::UnexpectedCharacter(_, offset))
            | Self::MismatchedGrouping { offset }
            | Self::InvalidExpression { offset, .. } => Some(offset),
        }
    }

    fn code(&self) -> u8 {
        match self {
            Self::MalformedPattern(_) => 1,
            Self::MismatchedGrouping { .. } => 2,
            Self::InvalidExpression { .. } => 3,
        }
    }

    /// Pretty diagnostic pointing at the offending character of `pattern`.
    pub fn render(&self, pattern: &str) -> String {
        let header = format!(
            "{} {}",
            format!("[{:0>3}]", self.code()).red().bold(),
            self
        );
        match self.offset() {
            Some(offset) => format!(
                "{}:\n | {}\n | {}{}",
                header,
                pattern,
                " ".repeat(offset),
                "^".green()
            ),
            None => header,
        }
    }
}
