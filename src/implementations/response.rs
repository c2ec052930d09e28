use crate::structures::{ParseError, Payload, Response};

impl Response {
  pub fn new(status: u16, reason: String, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
    Self {
      status,
      reason,
      headers,
      body,
    }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

impl Payload {
  pub fn text(self) -> Result<String, ParseError> {
    Ok(String::from_utf8(self.body)?)
  }
}

impl AsRef<[u8]> for Payload {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.body.as_ref()
    }
}
