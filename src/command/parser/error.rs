#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The filter text does not match the grammar
    Syntax {
        line: usize,
        column: usize,
        expected: String,
    },

    /// Field path that does not name a run attribute
    UnknownField(String),

    /// Field root that is not mapped to a table
    UnknownEntity(String),

    /// Date literal that cannot be read as a point in time
    InvalidDate(String),

    /// Literal of a type the field cannot be compared with
    InvalidValue(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Syntax {
                line,
                column,
                expected,
            } => write!(
                f,
                "Invalid filter at line {}, column {}: expected {}",
                line, column, expected
            ),
            ParseError::UnknownField(field) => write!(f, "Unknown field: {}", field),
            ParseError::UnknownEntity(entity) => {
                write!(f, "Unknown entity '{}' in filter", entity)
            }
            ParseError::InvalidDate(arg) => write!(
                f,
                "Invalid date: '{}'. Expected YYYY-MM-DD, YYYY-MM-DD HH:MM[:SS] or RFC 3339",
                arg
            ),
            ParseError::InvalidValue(arg) => write!(f, "Invalid value: {}", arg),
        }
    }
}

impl std::error::Error for ParseError {}
