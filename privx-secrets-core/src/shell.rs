//! Shell assignment statements.

/// Output syntax for assignment-mode keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `NAME=value`
    #[default]
    Plain,
    /// `NAME=value; export NAME;`
    Bourne,
    /// `setenv NAME value`
    CShell,
}

impl Dialect {
    /// Picks the dialect from the `-c` and `-s` flags.
    ///
    /// Neither flag selects [`Dialect::Plain`]. `-c` wins when both are set.
    pub fn from_flags(cshell: bool, bourne: bool) -> Self {
        if cshell {
            Dialect::CShell
        } else if bourne {
            Dialect::Bourne
        } else {
            Dialect::Plain
        }
    }

    /// Formats one assignment line, newline included.
    pub fn assignment(&self, name: &str, value: &str) -> String {
        match self {
            Dialect::Plain => format!("{}={}\n", name, value),
            Dialect::Bourne => format!("{}={}; export {};\n", name, value, name),
            Dialect::CShell => format!("setenv {} {}\n", name, value),
        }
    }
}

/// Formats `name` and an already rendered `value` for `dialect`.
///
/// Neither argument is escaped.
pub fn format_assignment(name: &str, value: &str, dialect: Dialect) -> String {
    dialect.assignment(name, value)
}
