use thiserror::Error;

/// Why the pipeline could not produce a result from the supplied records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsufficientData {
    /// Input was empty, or no record carried a parseable date.
    #[error("no valid dated matches")]
    NoValidDates,
    /// Dates parsed but no record had three strictly positive odds.
    #[error("insufficient valid odds data")]
    NoValidOdds,
}

/// Business errors surfaced by the engine. Always recoverable: callers map
/// these to a non-success response, never to a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{0}")]
    InsufficientData(#[from] InsufficientData),
}

impl EngineError {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_match_wire_strings() {
        let e: EngineError = InsufficientData::NoValidDates.into();
        assert_eq!(e.reason(), "no valid dated matches");
        let e: EngineError = InsufficientData::NoValidOdds.into();
        assert_eq!(e.reason(), "insufficient valid odds data");
    }
}
