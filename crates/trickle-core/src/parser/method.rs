//! HTTP Method enum
//!
//! Closed set of request methods the parser recognizes, plus the literal
//! table the byte-level matcher walks.

/// HTTP Method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Method {
    Delete = 0,
    Get = 1,
    Head = 2,
    Post = 3,
    Put = 4,
}

/// Literal-to-tag lookup used while a method streams in
pub(crate) const METHODS: [(&[u8], Method); 5] = [
    (b"DELETE", Method::Delete),
    (b"GET", Method::Get),
    (b"HEAD", Method::Head),
    (b"POST", Method::Post),
    (b"PUT", Method::Put),
];

impl Method {
    /// Parse method from bytes - exact, case-sensitive
    #[inline]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        METHODS
            .iter()
            .find(|(literal, _)| *literal == bytes)
            .map(|&(_, method)| method)
    }

    /// Method whose literal starts with `byte`, taking the first in table order
    #[inline]
    pub(crate) fn candidate(byte: u8) -> Option<Self> {
        METHODS
            .iter()
            .find(|(literal, _)| literal[0] == byte)
            .map(|&(_, method)| method)
    }

    /// Continue matching at `index`, switching to a sibling literal that
    /// shares the prefix seen so far (POST vs PUT)
    #[inline]
    pub(crate) fn advance(self, index: usize, byte: u8) -> Option<Self> {
        let current = self.as_bytes();
        if current.get(index) == Some(&byte) {
            return Some(self);
        }
        METHODS
            .iter()
            .find(|(literal, _)| {
                literal.len() > index && literal[..index] == current[..index] && literal[index] == byte
            })
            .map(|&(_, method)| method)
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Delete => http::Method::DELETE,
            Method::Get => http::Method::GET,
            Method::Head => http::Method::HEAD,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
        }
    }
}
