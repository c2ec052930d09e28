use std::path::PathBuf;

/// A structural problem in a version descriptor or hash list.
/// Every variant that has a `usize` carries the 1-based line on which it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
	/// First line was not `[versions]`, argument is what was found instead
	BadHeader(String),
	InvalidVersionLine(usize, String),
	InvalidVersionValue(usize, String),
	DuplicateTitle(usize, String),
	DuplicateServer(usize, String),
	DuplicateTag(usize, String),
	/// A version block ended without all of title, server and tag
	IncompleteVersion(usize, Vec<&'static str>),
	InvalidTagName(usize, String),
	DuplicateSection(usize, String),
	InvalidFileLine(usize, String),
	DuplicateFile { line: usize, path: String, tag: String },
	/// A declared version whose tag has no file entries
	UnreferencedTag(String),
	/// Absolute paths or paths escaping the installation directory
	UnsafePath(usize, String),
	InvalidHashListLine(usize, String),
	DuplicateHashListPath(usize, String),
	NotUtf8(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
	Timeout,
	/// Status code and reason phrase
	HttpStatus(u16, String),
	EmptyBody,
	Transport(String),
}

#[derive(Debug)]
pub enum Error {
	Parse(ParseError),
	Network(NetworkError),
	/// Hash of the written file did not match the expected one
	Integrity { path: String, expected: String, actual: String },
	/// Writing the local hash list or a destination file failed
	Persistence(PathBuf, std::io::Error),
	/// The retry budget ran out, carrying the last error and how many retries were made
	RetriesExhausted { error: Box<Error>, retries: u32 },
	InvalidConfiguration(String),
	Cancelled,
}
