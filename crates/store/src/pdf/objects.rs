//! PDF Object Model
//!
//! The handful of object types needed to describe an image-only document,
//! plus their serialized syntax.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// PDF object types
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    /// Name object, written with a leading `/`
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    /// Indirect reference to an object number (generation is always 0)
    Reference(u32),
}

/// PDF string encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfString {
    /// Literal string enclosed in parentheses
    Literal(Vec<u8>),
    /// Hexadecimal string enclosed in angle brackets
    Hex(Vec<u8>),
}

impl PdfString {
    /// Text string for the info dictionary. ASCII stays literal; anything
    /// else is written as UTF-16BE with a byte order mark.
    pub fn text(s: &str) -> Self {
        if s.is_ascii() {
            PdfString::Literal(s.as_bytes().to_vec())
        } else {
            let mut bytes = vec![0xFE, 0xFF];
            for unit in s.encode_utf16() {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
            PdfString::Hex(bytes)
        }
    }
}

/// PDF dictionary with deterministic key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with its `/Type` entry set
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.insert("Type", PdfObject::name(type_name));
        dict
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.entries.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: PdfObject) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

/// PDF stream (dictionary + data)
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Whether `data` is already flate encoded
    pub compressed: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            compressed: false,
        }
    }

    pub fn with_dict(dict: PdfDictionary, data: Vec<u8>) -> Self {
        Self {
            dict,
            data,
            compressed: false,
        }
    }
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn text(s: &str) -> Self {
        PdfObject::String(PdfString::text(s))
    }

    pub fn reference(obj_num: u32) -> Self {
        PdfObject::Reference(obj_num)
    }

    /// `[0 0 w h]`-style rectangle
    pub fn rect(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Real(llx),
            PdfObject::Real(lly),
            PdfObject::Real(urx),
            PdfObject::Real(ury),
        ])
    }
}

impl From<i64> for PdfObject {
    fn from(n: i64) -> Self {
        PdfObject::Integer(n)
    }
}

impl From<u32> for PdfObject {
    fn from(n: u32) -> Self {
        PdfObject::Integer(i64::from(n))
    }
}

impl From<f64> for PdfObject {
    fn from(n: f64) -> Self {
        PdfObject::Real(n)
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

/// Format a real with at most four decimals and no trailing zeros
pub(crate) fn format_real(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        let s = format!("{:.4}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
    )
}

/// Serializer for PDF objects
pub struct PdfSerializer<W: Write> {
    writer: W,
}

impl<W: Write> PdfSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Null => self.writer.write_all(b"null"),
            PdfObject::Boolean(b) => write!(self.writer, "{}", b),
            PdfObject::Integer(n) => write!(self.writer, "{}", n),
            PdfObject::Real(n) => write!(self.writer, "{}", format_real(*n)),
            PdfObject::String(s) => self.write_string(s),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::Array(items) => {
                self.writer.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.writer.write_all(b" ")?;
                    }
                    self.write_object(item)?;
                }
                self.writer.write_all(b"]")
            }
            PdfObject::Dictionary(dict) => self.write_dictionary(dict),
            PdfObject::Reference(num) => write!(self.writer, "{} 0 R", num),
        }
    }

    pub fn write_stream(&mut self, stream: &PdfStream) -> io::Result<()> {
        self.write_dictionary(&stream.dict)?;
        self.writer.write_all(b"\nstream\n")?;
        self.writer.write_all(&stream.data)?;
        self.writer.write_all(b"\nendstream")
    }

    fn write_string(&mut self, s: &PdfString) -> io::Result<()> {
        match s {
            PdfString::Literal(data) => {
                self.writer.write_all(b"(")?;
                for &byte in data {
                    match byte {
                        b'(' | b')' | b'\\' => write!(self.writer, "\\{}", byte as char)?,
                        b'\n' => self.writer.write_all(b"\\n")?,
                        b'\r' => self.writer.write_all(b"\\r")?,
                        0x20..=0x7E => self.writer.write_all(&[byte])?,
                        _ => write!(self.writer, "\\{:03o}", byte)?,
                    }
                }
                self.writer.write_all(b")")
            }
            PdfString::Hex(data) => {
                self.writer.write_all(b"<")?;
                for byte in data {
                    write!(self.writer, "{:02X}", byte)?;
                }
                self.writer.write_all(b">")
            }
        }
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        self.writer.write_all(b"/")?;
        for byte in name.bytes() {
            if (0x21..=0x7E).contains(&byte) && !is_delimiter(byte) {
                self.writer.write_all(&[byte])?;
            } else {
                write!(self.writer, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &PdfDictionary) -> io::Result<()> {
        self.writer.write_all(b"<<")?;
        for (key, value) in dict.iter() {
            self.writer.write_all(b" ")?;
            self.write_name(key)?;
            self.writer.write_all(b" ")?;
            self.write_object(value)?;
        }
        self.writer.write_all(b" >>")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_pdf_string(obj: &PdfObject) -> String {
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(obj).unwrap();
        String::from_utf8_lossy(&serializer.into_inner()).into_owned()
    }

    #[test]
    fn test_serialize_scalars() {
        assert_eq!(to_pdf_string(&PdfObject::Null), "null");
        assert_eq!(to_pdf_string(&PdfObject::Boolean(true)), "true");
        assert_eq!(to_pdf_string(&PdfObject::Integer(42)), "42");
        assert_eq!(to_pdf_string(&PdfObject::Real(22.6772)), "22.6772");
        assert_eq!(to_pdf_string(&PdfObject::Real(595.0)), "595");
        assert_eq!(to_pdf_string(&PdfObject::reference(7)), "7 0 R");
    }

    #[test]
    fn test_serialize_name_escapes_delimiters() {
        assert_eq!(to_pdf_string(&PdfObject::name("XObject")), "/XObject");
        assert_eq!(to_pdf_string(&PdfObject::name("A B/C")), "/A#20B#2FC");
    }

    #[test]
    fn test_literal_string_escapes() {
        assert_eq!(to_pdf_string(&PdfObject::text("Ana (CV)")), "(Ana \\(CV\\))");
    }

    #[test]
    fn test_non_ascii_text_is_utf16_hex() {
        assert_eq!(to_pdf_string(&PdfObject::text("í")), "<FEFF00ED>");
    }

    #[test]
    fn test_serialize_dictionary_and_array() {
        let dict = PdfDictionary::typed("Page").with("MediaBox", PdfObject::rect(0.0, 0.0, 595.0, 842.0));
        assert_eq!(
            to_pdf_string(&PdfObject::Dictionary(dict)),
            "<< /MediaBox [0 0 595 842] /Type /Page >>"
        );
    }
}
