use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(
        "Chromosome ordinal {ordinal} was first seen as '{recorded}' but is now named '{given}'. Is the reference genome consistent across inputs?"
    )]
    ChromosomeNameMismatch {
        ordinal: u8,
        recorded: String,
        given: String,
    },

    #[error("Unknown chromosome: {0}")]
    UnknownChromosome(String),

    #[error("Position {position} on {chromosome} cannot be encoded")]
    PositionOutOfRange { chromosome: String, position: i64 },

    #[error("Table is not sorted by genomic position at {chromosome}:{position}")]
    UnsortedTable { chromosome: String, position: i64 },

    #[error("Error parsing record in {file}: {message}")]
    RecordParseError { file: String, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
