//! Library for decoding Apple Icon Image (.icns) files
//!
//! An ICNS file bundles several icons at different sizes and bit depths.
//! Classic icons are stored as raw 1-, 4- or 8-bit palette bitmaps or as
//! RLE-compressed 24-bit color, with their transparency kept in separate
//! mask elements; modern icons embed complete PNG or JPEG 2000 files.  This
//! crate decodes every displayable icon in a file into an RGBA raster,
//! compositing masks onto the color images they belong to.
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file format.
//!
//! # Example
//!
//! ```
//! let data = b"icns\0\0\0\x08";
//! let icons = icns_decode::decode(data).expect("invalid icns data");
//! assert!(icons.is_empty());
//! ```

#![warn(missing_docs)]

mod compose;
mod element;
mod embedded;
mod error;
mod family;
mod icontype;
mod image;
mod options;
mod palette;

#[cfg(feature = "jp2io")]
mod jp2io;
#[cfg(feature = "pngio")]
mod pngio;

pub use crate::element::{DecodedElement, IconElement};
pub use crate::embedded::{BuiltinCodec, EmbeddedCodec, EmbeddedFormat};
pub use crate::error::{DecodeError, Diagnostic, Result};
pub use crate::family::{Decoded, IcnsInfo, IconFamily};
pub use crate::icontype::{Encoding, IconDescriptor, IconType, OSType, Role};
pub use crate::image::{DisplayableIcon, Image, PixelFormat};
pub use crate::options::{DecodeOptions, ElementPolicy};

/// Decodes every displayable icon in an ICNS file, in container order.
///
/// Any element that fails to decode fails the whole call; use
/// [`decode_with_options`](fn.decode_with_options.html) with
/// [`ElementPolicy::Skip`](enum.ElementPolicy.html) to collect the icons that
/// do decode instead.  Elements with unknown OSTypes are always skipped.
pub fn decode(data: &[u8]) -> Result<Vec<DisplayableIcon>> {
    let options = DecodeOptions::new(ElementPolicy::Escalate);
    Ok(decode_with_options(data, &options)?.icons)
}

/// Decodes every displayable icon in an ICNS file, also returning the list
/// of elements that were skipped.
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<Decoded> {
    IconFamily::read(data)?.decode(options)
}

/// Counts the displayable icons in an ICNS file and reports the size of the
/// first one, without decoding any pixel data.
pub fn image_info(data: &[u8]) -> Result<IcnsInfo> {
    Ok(IconFamily::read(data)?.info())
}

/// Result of a query that does not apply to every image format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Support<T> {
    /// The query applies, with this answer.
    Available(T),
    /// The query is structurally inapplicable to this format.
    NotSupported,
}

/// Embedded image metadata.  ICNS files carry none, so this type has no
/// values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Metadata {}

/// Extracts embedded metadata from an ICNS file.  The format has no
/// metadata, so this always returns `Support::NotSupported`.
pub fn metadata(_data: &[u8]) -> Support<Metadata> {
    Support::NotSupported
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_empty_icon_family() {
        let icons = decode(b"icns\0\0\0\x08").expect("decode failed");
        assert!(icons.is_empty());
    }

    #[test]
    fn metadata_is_not_supported() {
        assert_eq!(metadata(b"icns\0\0\0\x08"), Support::NotSupported);
        assert_eq!(metadata(b""), Support::NotSupported);
    }
}
