use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, warn};
use std::io::{Cursor, Read};

use crate::compose;
use crate::element::{DecodedElement, IconElement};
use crate::error::{DecodeError, Diagnostic, Result};
use crate::image::DisplayableIcon;
use crate::options::{DecodeOptions, ElementPolicy};

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// A set of icon elements stored in a single ICNS file.
#[derive(Clone, Debug)]
pub struct IconFamily {
    /// The icon elements stored in the ICNS file, in file order.
    pub elements: Vec<IconElement>,
}

/// The outcome of a successful decode.
#[derive(Debug)]
pub struct Decoded {
    /// The composited icons, in container order.
    pub icons: Vec<DisplayableIcon>,
    /// Elements that were skipped, in container order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Summary of an ICNS file, computed from element headers alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IcnsInfo {
    /// The number of displayable (color) elements.
    pub count: usize,
    /// Pixel width of the first displayable element, or zero if none.
    pub width: u32,
    /// Pixel height of the first displayable element, or zero if none.
    pub height: u32,
}

impl IconFamily {
    /// Returns true if the icon family contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Reads an icon family from the complete contents of an ICNS file.
    ///
    /// The header's total length must fit within `data` and be covered
    /// exactly by the elements that follow it; bytes beyond the declared
    /// length are ignored.
    pub fn read(data: &[u8]) -> Result<IconFamily> {
        let mut reader = Cursor::new(data);
        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|_| DecodeError::format(0, "truncated icns header"))?;
        if magic != *ICNS_MAGIC_LITERAL {
            return Err(DecodeError::format(0, "not an icns file (wrong magic literal)"));
        }
        let file_length = reader
            .read_u32::<BigEndian>()
            .map_err(|_| DecodeError::format(4, "truncated icns header"))?;
        if file_length < ICON_FAMILY_HEADER_LENGTH {
            let msg = format!("declared length {} is shorter than the header",
                              file_length);
            return Err(DecodeError::format(4, msg));
        }
        if file_length as usize > data.len() {
            let msg = format!("declared length {} exceeds the {} bytes available",
                              file_length,
                              data.len());
            return Err(DecodeError::format(4, msg));
        }
        let mut file_position: u32 = ICON_FAMILY_HEADER_LENGTH;
        let mut family = IconFamily { elements: Vec::new() };
        while file_position < file_length {
            let element = IconElement::read(reader.by_ref(),
                                            file_position as usize,
                                            file_length - file_position)?;
            file_position += element.total_length();
            family.elements.push(element);
        }
        debug!("read icns header and {} element(s) ({} bytes)",
               family.elements.len(),
               file_length);
        Ok(family)
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        let mut length = ICON_FAMILY_HEADER_LENGTH;
        for element in &self.elements {
            length += element.total_length();
        }
        length
    }

    /// Decodes every displayable icon in the family.
    ///
    /// All elements are decoded first; masks are then composited onto
    /// same-sized color images, and the color images are returned in
    /// container order.  Elements with unknown OSTypes are skipped and
    /// reported in the diagnostics.
    pub fn decode(&self, options: &DecodeOptions) -> Result<Decoded> {
        let mut diagnostics = Vec::new();
        let mut decoded = self.decode_elements(options, &mut diagnostics)?;
        compose::apply_masks(&mut decoded);
        let icons = compose::assemble(decoded);
        debug!("assembled {} icon(s), skipped {} element(s)",
               icons.len(),
               diagnostics.len());
        Ok(Decoded { icons, diagnostics })
    }

    fn decode_elements(&self,
                       options: &DecodeOptions,
                       diagnostics: &mut Vec<Diagnostic>)
                       -> Result<Vec<DecodedElement>> {
        let mut decoded = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            if element.icon_type().is_none() {
                warn!("skipping unknown '{}' element at offset {}",
                      element.ostype(),
                      element.offset());
                diagnostics.push(Diagnostic::UnknownElement {
                    ostype: element.ostype(),
                    offset: element.offset(),
                });
                continue;
            }
            match element.decode_with(options.codec()) {
                Ok(images) => decoded.push(images),
                Err(err) if err.is_fatal_to_container() => return Err(err),
                Err(err) => match options.policy() {
                    ElementPolicy::Escalate => return Err(err),
                    ElementPolicy::Skip => {
                        warn!("skipping undecodable element: {}", err);
                        diagnostics.push(Diagnostic::SkippedElement {
                            ostype: element.ostype(),
                            offset: element.offset(),
                            error: err,
                        });
                    }
                },
            }
        }
        Ok(decoded)
    }

    /// Summarizes the family from its element headers, without decoding any
    /// pixel data.
    pub fn info(&self) -> IcnsInfo {
        let mut colors = self
            .elements
            .iter()
            .filter_map(|element| element.icon_type())
            .filter(|icon_type| icon_type.role().has_color());
        match colors.next() {
            Some(first) => IcnsInfo {
                count: 1 + colors.count(),
                width: first.pixel_width(),
                height: first.pixel_height(),
            },
            None => IcnsInfo {
                count: 0,
                width: 0,
                height: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icontype::OSType;

    #[test]
    fn read_empty_icon_family() {
        let family = IconFamily::read(b"icns\0\0\0\x08").expect("read failed");
        assert!(family.is_empty());
        assert_eq!(family.total_length(), 8);
    }

    #[test]
    fn read_icon_family_with_fake_elements() {
        let input = b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#";
        let family = IconFamily::read(input).expect("read failed");
        assert_eq!(2, family.elements.len());
        assert_eq!(OSType(*b"quux"), family.elements[0].ostype());
        assert_eq!(8, family.elements[0].offset());
        assert_eq!(6, family.elements[0].data().len());
        assert_eq!(OSType(*b"baz!"), family.elements[1].ostype());
        assert_eq!(22, family.elements[1].offset());
        assert_eq!(1, family.elements[1].data().len());
        assert_eq!(family.total_length(), 0x1f);
    }

    #[test]
    fn read_ignores_bytes_past_declared_length() {
        let family = IconFamily::read(b"icns\0\0\0\x08junk").expect("read failed");
        assert!(family.is_empty());
    }

    #[test]
    fn read_wrong_magic() {
        let result = IconFamily::read(b"ICNZ\0\0\0\x08");
        assert!(matches!(result, Err(DecodeError::Format { offset: 0, .. })));
    }

    #[test]
    fn read_declared_length_too_long() {
        let result = IconFamily::read(b"icns\0\0\0\x09");
        assert!(matches!(result, Err(DecodeError::Format { offset: 4, .. })));
    }

    #[test]
    fn read_declared_length_too_short() {
        let result = IconFamily::read(b"icns\0\0\0\x07");
        assert!(matches!(result, Err(DecodeError::Format { offset: 4, .. })));
    }

    #[test]
    fn read_element_overruns_family() {
        let input = b"icns\0\0\0\x1equux\0\0\0\x0efoobarbaz!\0\0\0\x09#";
        let result = IconFamily::read(&input[..]);
        assert!(matches!(result, Err(DecodeError::Format { offset: 22, .. })));
    }

    #[test]
    fn read_trailing_partial_header() {
        let input = b"icns\0\0\0\x0cquux";
        let result = IconFamily::read(&input[..]);
        assert!(matches!(result, Err(DecodeError::Format { offset: 8, .. })));
    }

    #[test]
    fn decode_skips_unknown_elements() {
        let input = b"icns\0\0\0\x16quux\0\0\0\x0efoobar";
        let family = IconFamily::read(input).expect("read failed");
        let decoded = family.decode(&DecodeOptions::new(ElementPolicy::Escalate))
            .expect("decode failed");
        assert!(decoded.icons.is_empty());
        assert_eq!(decoded.diagnostics,
                   vec![Diagnostic::UnknownElement {
                            ostype: OSType(*b"quux"),
                            offset: 8,
                        }]);
    }

    #[test]
    fn info_of_empty_family() {
        let family = IconFamily::read(b"icns\0\0\0\x08").expect("read failed");
        assert_eq!(family.info(), IcnsInfo { count: 0, width: 0, height: 0 });
    }
}
