//! Where a line of output came from.

/// Standard output or standard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// A step and one of its streams.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    /// Step label, e.g. `Backend`.
    pub label: String,
    /// Stream the line was read from.
    pub stream: Stream,
}

impl Source {
    /// Standard output of `label`.
    pub fn stdout(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stream: Stream::Stdout,
        }
    }

    /// Standard error of `label`.
    pub fn stderr(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stream: Stream::Stderr,
        }
    }

    /// Separator printed before a run of lines from this source.
    #[must_use]
    pub fn header(&self) -> String {
        match self.stream {
            Stream::Stdout => format!("--------------{}-------------------", self.label),
            Stream::Stderr => format!("--------------Error - {}-------------------", self.label),
        }
    }
}

/// One line read from a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    /// Origin.
    pub source: Source,
    /// Line without its terminator.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        assert_eq!(
            Source::stdout("Backend").header(),
            "--------------Backend-------------------"
        );
        assert_eq!(
            Source::stderr("Backend").header(),
            "--------------Error - Backend-------------------"
        );
    }
}
