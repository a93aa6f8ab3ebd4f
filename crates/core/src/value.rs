/// A single column value handed over by the driver, reduced to the variants
/// the prompt needs to render.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bytes(Vec<u8>),
    Int(i64),
    UInt(u64),
    Double(f64),
    Text(String),
}

impl SqlValue {
    /// Display text for one cell. Byte strings decode as UTF-8 text rather
    /// than showing a type descriptor.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Int(value) => value.to_string(),
            Self::UInt(value) => value.to_string(),
            Self::Double(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}
