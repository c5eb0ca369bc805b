use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing study id (set --study-id or fetch.study_id in the config file).")]
    MissingStudyId,
    #[error("Invalid date '{value}'. Expected YYYY-MM-DD.")]
    InvalidDateBound { value: String },
    #[error("Start date {start} is after end date {end}.")]
    DateBoundsReversed { start: String, end: String },
    #[error("Invalid UTC offset '{value}'. Expected +HH:MM or -HH:MM.")]
    InvalidUtcOffset { value: String },
    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
    #[error("Invalid value for {field}: {value} (expected {min}..={max}).")]
    ValueOutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("Invalid number '{value}': {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Unknown subject '{subject}'.")]
    UnknownSubject { subject: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
