use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Invalid time key '{key}', expected format {format}")]
    InvalidTimeKey { key: String, format: &'static str },

    #[error("{rows} rows starting at row {offset} do not fit an array of {len} rows")]
    SlotOutOfBounds {
        offset: usize,
        rows: usize,
        len: usize,
    },

    #[error("Patch {patch} does not exist, array has {patches} patches")]
    PatchOutOfBounds { patch: usize, patches: usize },
}
