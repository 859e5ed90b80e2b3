/// Generates a random ID.
pub fn random_id() -> u32 {
    rand::random()
}

#[cfg(feature = "serde")]
/// Reads bars from a JSON file (an array of `Bar` objects with ISO dates)
/// and returns them in file order.
///
/// Deserialized bars bypass the builder, so the engine re-validates prices
/// and ordering at ingestion.
pub fn bars_from_file(filepath: std::path::PathBuf) -> crate::errors::Result<Vec<crate::engine::Bar>> {
    use crate::errors::Error;
    use std::{fs::File, io::BufReader};

    let file = File::open(filepath)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(Error::from)
}
