//! Bridging of embedded PNG and JPEG 2000 payloads to external decoders.

use std::io;

use crate::image::Image;

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
const JP2_SIGNATURE: &[u8] = &[0x00, 0x00, 0x00, 0x0c, 0x6a, 0x50, 0x20, 0x20,
                               0x0d, 0x0a, 0x87, 0x0a];
const J2K_CODESTREAM_SIGNATURE: &[u8] = &[0xff, 0x4f, 0xff, 0x51];

/// The kind of self-contained image file stored in a PNG/JPEG 2000 element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EmbeddedFormat {
    /// A PNG file.
    Png,
    /// A JPEG 2000 file (JP2 container or bare codestream).
    Jp2,
}

impl EmbeddedFormat {
    /// Identifies an embedded payload by its leading signature bytes.
    pub fn sniff(data: &[u8]) -> Option<EmbeddedFormat> {
        if data.starts_with(PNG_SIGNATURE) {
            Some(EmbeddedFormat::Png)
        } else if data.starts_with(JP2_SIGNATURE) ||
                  data.starts_with(J2K_CODESTREAM_SIGNATURE) {
            Some(EmbeddedFormat::Jp2)
        } else {
            None
        }
    }
}

/// Decoders for the image files embedded in modern icon elements.  The
/// returned image may be in any pixel format; it is converted to RGBA by the
/// caller.
pub trait EmbeddedCodec {
    /// Decodes a complete PNG file.
    fn decode_png(&self, data: &[u8]) -> io::Result<Image>;

    /// Decodes a complete JPEG 2000 file.
    fn decode_jp2(&self, data: &[u8]) -> io::Result<Image>;
}

/// The codec backed by this crate's optional `png` and `hayro-jpeg2000`
/// dependencies.  Formats whose feature is disabled fail to decode.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCodec;

impl EmbeddedCodec for BuiltinCodec {
    #[cfg(feature = "pngio")]
    fn decode_png(&self, data: &[u8]) -> io::Result<Image> {
        Image::read_png(io::Cursor::new(data))
    }

    #[cfg(not(feature = "pngio"))]
    fn decode_png(&self, _data: &[u8]) -> io::Result<Image> {
        Err(io::Error::new(io::ErrorKind::Unsupported,
                           "PNG support is not enabled"))
    }

    #[cfg(feature = "jp2io")]
    fn decode_jp2(&self, data: &[u8]) -> io::Result<Image> {
        Image::read_jp2(data)
    }

    #[cfg(not(feature = "jp2io"))]
    fn decode_jp2(&self, _data: &[u8]) -> io::Result<Image> {
        Err(io::Error::new(io::ErrorKind::Unsupported,
                           "JPEG 2000 support is not enabled"))
    }
}

/// Sniffs the payload format and hands it to the matching delegate.  A
/// codec that lacks support for the format reports
/// `io::ErrorKind::Unsupported`.
pub(crate) fn decode(codec: &dyn EmbeddedCodec, data: &[u8]) -> io::Result<Image> {
    match EmbeddedFormat::sniff(data) {
        Some(EmbeddedFormat::Png) => codec.decode_png(data),
        Some(EmbeddedFormat::Jp2) => codec.decode_jp2(data),
        None => Err(io::Error::new(io::ErrorKind::InvalidData,
                                   "payload is neither PNG nor JPEG 2000")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_signatures() {
        assert_eq!(EmbeddedFormat::sniff(b"\x89PNG\r\n\x1a\nrest"),
                   Some(EmbeddedFormat::Png));
        assert_eq!(EmbeddedFormat::sniff(b"\0\0\0\x0cjP  \r\n\x87\nrest"),
                   Some(EmbeddedFormat::Jp2));
        assert_eq!(EmbeddedFormat::sniff(b"\xff\x4f\xff\x51rest"),
                   Some(EmbeddedFormat::Jp2));
        assert_eq!(EmbeddedFormat::sniff(b"GIF89a"), None);
        assert_eq!(EmbeddedFormat::sniff(b""), None);
    }

    #[test]
    fn decode_rejects_unknown_payload() {
        let result = decode(&BuiltinCodec, b"\0\0\0\0");
        assert_eq!(result.map_err(|err| err.kind()).err(),
                   Some(io::ErrorKind::InvalidData));
    }
}
