use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Header,
    Syntax,
    IO,
    Validation,
}

impl ParseErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            "E1001" | "E1002" | "E1003" => Self::Header,

            "E1101" | "E1102" | "E1201" | "E1301" | "E1401" => Self::Syntax,

            "E2001" | "E2002" => Self::IO,

            "E3001" | "E3002" | "E3003" => Self::Validation,

            _ => Self::Syntax,
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message} (line {line})")]
pub struct ParseError {
    pub code: &'static str,
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: usize,

    pub file: Option<String>,
    pub section: Option<&'static str>,
    pub context: Option<String>,
}

impl ParseError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>, line: usize) -> Self {
        Self {
            code,
            kind: ParseErrorKind::from_code(code),
            message: message.into(),
            line,

            file: None,
            section: None,
            context: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_section(mut self, section: &'static str) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
