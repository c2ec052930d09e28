/// A Response to a submitted request, independent of the transport that produced it.
#[derive(Debug, Clone, Default)]
pub struct Response {
  pub status: u16,
  pub reason: String,
  pub headers: Vec<(String, String)>,
  pub body: Vec<u8>,
}

/// The body of a successful download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
  pub body: Vec<u8>,
  pub bytes: u64,
}
