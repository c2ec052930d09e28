use std::{fs::OpenOptions, path::Path};
use sha2::{Sha256, Digest};

use crate::structures::Error;
use crate::traits::PersistenceContext;

/// Opens a file and calculates it's SHA256 hash
pub(crate) fn get_hash(file_path: &Path) -> Result<String, Error> {
	let mut file = OpenOptions::new().read(true).open(file_path).persistence_context(file_path)?;
	let mut sha256 = Sha256::new();
	std::io::copy(&mut file, &mut sha256).persistence_context(file_path)?;
	Ok(hex::encode_upper(sha256.finalize()))
}

/// SHA256 of an in-memory buffer, in the same form as `get_hash`
pub fn hash_bytes(bytes: &[u8]) -> String {
	hex::encode_upper(Sha256::digest(bytes))
}
