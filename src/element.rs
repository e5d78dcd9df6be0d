use byteorder::{BigEndian, ReadBytesExt};
use log::trace;
use std::io::{self, Read};

use crate::embedded::{self, EmbeddedCodec};
use crate::error::{DecodeError, Result};
use crate::icontype::{Encoding, IconType, OSType};
use crate::image::{Image, PixelFormat};
use crate::palette;

/// The length of an icon element header, in bytes:
pub(crate) const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// One entry in an ICNS file.  Depending on the resource type, this may
/// represent an icon, or part of an icon (such as an alpha mask, or color
/// data without the mask).
#[derive(Clone, Debug)]
pub struct IconElement {
    ostype: OSType,
    offset: usize,
    data: Vec<u8>,
}

/// The images decoded from a single icon element.
///
/// Color data is always RGBA; mask data is always an alpha plane.  1-bit
/// icon-with-mask elements produce both.
#[derive(Debug)]
pub struct DecodedElement {
    /// The type of the element these images were decoded from.
    pub icon_type: IconType,
    /// Byte offset of the element's header within the container.
    pub offset: usize,
    /// The color image, if the element carries one.
    pub color: Option<Image>,
    /// The alpha mask, if the element carries one.
    pub mask: Option<Image>,
}

impl DecodedElement {
    /// Returns true if a separately stored mask may be composited onto this
    /// element's color data.  Embedded PNG/JPEG 2000 images carry their own
    /// alpha channel and never take a mask.
    pub fn accepts_mask(&self) -> bool {
        self.color.is_some() && self.icon_type.encoding() != Encoding::JP2PNG
    }
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement::at_offset(ostype, 0, data)
    }

    pub(crate) fn at_offset(ostype: OSType,
                            offset: usize,
                            data: Vec<u8>)
                            -> IconElement {
        IconElement {
            ostype,
            offset,
            data,
        }
    }

    /// Returns the OSType for this element (e.g. `it32` or `t8mk`).
    pub fn ostype(&self) -> OSType {
        self.ostype
    }

    /// Returns the byte offset of this element's header within the ICNS
    /// container it was read from (zero for elements built in memory).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the type of icon encoded by this element, or `None` if this
    /// element does not encode a supported icon type.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded data for this element.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ICON_ELEMENT_HEADER_LENGTH + (self.data.len() as u32)
    }

    /// Reads an icon element whose header starts at `offset` within an ICNS
    /// container, of which `remaining` bytes (counted from `offset`) are
    /// still covered by the container's declared length.
    pub(crate) fn read<R: Read>(mut reader: R,
                                offset: usize,
                                remaining: u32)
                                -> Result<IconElement> {
        if remaining < ICON_ELEMENT_HEADER_LENGTH {
            return Err(DecodeError::format(offset, "truncated element header"));
        }
        let truncated = |_| DecodeError::format(offset, "truncated element");
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype).map_err(truncated)?;
        let element_length = reader.read_u32::<BigEndian>().map_err(truncated)?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            let msg = format!("invalid element length ({} is less than the \
                               header length)",
                              element_length);
            return Err(DecodeError::format(offset, msg));
        }
        if element_length > remaining {
            let msg = format!("element length {} overruns the container \
                               ({} bytes remain)",
                              element_length,
                              remaining);
            return Err(DecodeError::format(offset, msg));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = vec![0u8; data_length as usize];
        reader.read_exact(&mut data).map_err(truncated)?;
        Ok(IconElement::at_offset(OSType(raw_ostype), offset, data))
    }

    /// Decodes the icon element into an image, using the built-in PNG and
    /// JPEG 2000 support for embedded payloads.  Color elements decode to
    /// RGBA (fully opaque unless the payload has its own alpha), and mask
    /// elements decode to an alpha plane.  Returns an error if this element
    /// does not represent an icon type supported by this library, or if the
    /// data is malformed.
    pub fn decode_image(&self) -> Result<Image> {
        let decoded = self.decode_with(&embedded::BuiltinCodec)?;
        match (decoded.color, decoded.mask) {
            (Some(color), _) => Ok(color),
            (None, Some(mask)) => Ok(mask),
            (None, None) => Err(self.unsupported("element has no image data")),
        }
    }

    /// Decodes every image carried by this element.  Embedded PNG and JPEG
    /// 2000 payloads are handed to `codec`.
    pub fn decode_with(&self, codec: &dyn EmbeddedCodec) -> Result<DecodedElement> {
        let icon_type = self.icon_type().ok_or_else(|| {
            self.unsupported(format!("unknown OSType: {}", self.ostype))
        })?;
        let width = icon_type.pixel_width();
        let height = icon_type.pixel_height();
        trace!("decoding '{}' element at offset {} ({}x{}, {:?}, {} bytes)",
               self.ostype,
               self.offset,
               width,
               height,
               icon_type.encoding(),
               self.data.len());
        let mut decoded = DecodedElement {
            icon_type,
            offset: self.offset,
            color: None,
            mask: None,
        };
        match icon_type.encoding() {
            Encoding::Mono | Encoding::Palette4 | Encoding::Palette8 => {
                let bits = icon_type.bits_per_pixel();
                self.check_length(packed_length(width, height, bits))?;
                decoded.color = Some(self.decode_indexed(&self.data, width, height, bits)?);
            }
            Encoding::MonoA => {
                let half = packed_length(width, height, 1);
                self.check_length(2 * half)?;
                let (image_bits, mask_bits) = self.data.split_at(half);
                decoded.color = Some(self.decode_indexed(image_bits, width, height, 1)?);
                decoded.mask = Some(decode_mask1(mask_bits, width, height));
            }
            Encoding::Mask8 => {
                let num_pixels = (width * height) as usize;
                self.check_length(num_pixels)?;
                decoded.mask = Image::from_data(PixelFormat::Alpha,
                                                width,
                                                height,
                                                self.data.clone());
            }
            Encoding::RLE24 => {
                let num_pixels = (width * height) as usize;
                decoded.color = Some(if self.data.len() == 4 * num_pixels {
                    self.decode_rgb32(width, height)?
                } else {
                    match self.decode_rle24(icon_type, width, height) {
                        Ok(image) => image,
                        // Some old files store plain RGB under an RLE type.
                        Err(_) if self.data.len() == 3 * num_pixels => {
                            self.decode_rgb32(width, height)?
                        }
                        Err(err) => return Err(err),
                    }
                });
            }
            Encoding::JP2PNG => {
                decoded.color = Some(self.decode_embedded(codec, width, height)?);
            }
        }
        Ok(decoded)
    }

    /// Unpacks most-significant-bit-first palette indices and maps them
    /// through the standard system palette for the given depth.
    fn decode_indexed(&self,
                      data: &[u8],
                      width: u32,
                      height: u32,
                      bits_per_pixel: u32)
                      -> Result<Image> {
        let palette = palette::for_depth(bits_per_pixel).ok_or_else(|| {
            self.unsupported(format!("no palette for {}-bit data", bits_per_pixel))
        })?;
        let bits = bits_per_pixel as usize;
        let index_mask = (1u16 << bits) - 1;
        let mut image = Image::new(PixelFormat::RGBA, width, height);
        for (pixel, rgba) in image.data_mut().chunks_exact_mut(4).enumerate() {
            let bit_offset = pixel * bits;
            let byte = u16::from(data[bit_offset / 8]);
            let shift = 8 - bits - (bit_offset % 8);
            let index = ((byte >> shift) & index_mask) as usize;
            rgba[..3].copy_from_slice(&palette[index]);
            rgba[3] = u8::MAX;
        }
        Ok(image)
    }

    /// Expands packed 24-bit RGB, or 32-bit xRGB with an unused leading
    /// byte, into opaque RGBA.
    fn decode_rgb32(&self, width: u32, height: u32) -> Result<Image> {
        let num_pixels = (width * height) as usize;
        let stride = if self.data.len() == 4 * num_pixels {
            4
        } else {
            self.check_length(3 * num_pixels)?;
            3
        };
        let mut image = Image::new(PixelFormat::RGBA, width, height);
        for (src, dest) in self.data
            .chunks_exact(stride)
            .zip(image.data_mut().chunks_exact_mut(4)) {
            dest[..3].copy_from_slice(&src[stride - 3..]);
            dest[3] = u8::MAX;
        }
        Ok(image)
    }

    fn decode_rle24(&self,
                    icon_type: IconType,
                    width: u32,
                    height: u32)
                    -> Result<Image> {
        let mut input: &[u8] = &self.data;
        // 128x128 RLE data is preceded by four zero bytes.
        if icon_type == IconType::RGB24_128x128 && input.starts_with(&[0; 4]) {
            input = &input[4..];
        }
        let num_pixels = (width * height) as usize;
        let rgb = decode_rle_rgb(input, num_pixels).map_err(|reason| self.unsupported(reason))?;
        let mut image = Image::new(PixelFormat::RGBA, width, height);
        for (src, dest) in rgb.chunks_exact(3).zip(image.data_mut().chunks_exact_mut(4)) {
            dest[..3].copy_from_slice(src);
            dest[3] = u8::MAX;
        }
        Ok(image)
    }

    fn decode_embedded(&self,
                       codec: &dyn EmbeddedCodec,
                       width: u32,
                       height: u32)
                       -> Result<Image> {
        let embedded_error = |reason: String| {
            DecodeError::EmbeddedDecode {
                ostype: self.ostype,
                offset: self.offset,
                reason,
            }
        };
        let image = embedded::decode(codec, &self.data).map_err(|err| {
            if err.kind() == io::ErrorKind::Unsupported {
                self.unsupported(err.to_string())
            } else {
                embedded_error(err.to_string())
            }
        })?;
        if image.width() != width || image.height() != height {
            let msg = format!("decoded image has wrong dimensions ({}x{} \
                               instead of {}x{})",
                              image.width(),
                              image.height(),
                              width,
                              height);
            return Err(embedded_error(msg));
        }
        Ok(image.convert_to(PixelFormat::RGBA))
    }

    fn check_length(&self, expected: usize) -> Result<()> {
        if self.data.len() != expected {
            let msg = format!("wrong data payload length for '{}' ({} \
                               instead of {})",
                              self.ostype,
                              self.data.len(),
                              expected);
            return Err(DecodeError::format(self.offset, msg));
        }
        Ok(())
    }

    fn unsupported<S: Into<String>>(&self, reason: S) -> DecodeError {
        DecodeError::UnsupportedEncoding {
            ostype: self.ostype,
            offset: self.offset,
            reason: reason.into(),
        }
    }
}

/// Number of bytes needed to hold `width * height` pixels at the given
/// depth, packed with no row padding.
fn packed_length(width: u32, height: u32, bits_per_pixel: u32) -> usize {
    let bits = (width as usize) * (height as usize) * (bits_per_pixel as usize);
    (bits + 7) / 8
}

/// Expands a 1-bit mask (most significant bit first) into an alpha plane.
fn decode_mask1(data: &[u8], width: u32, height: u32) -> Image {
    let mut mask = Image::new(PixelFormat::Alpha, width, height);
    for (pixel, alpha) in mask.data_mut().iter_mut().enumerate() {
        let bit = (data[pixel / 8] >> (7 - pixel % 8)) & 1;
        *alpha = if bit == 1 { u8::MAX } else { 0 };
    }
    mask
}

/// Decodes three RLE-compressed planes (red, then green, then blue) into
/// interleaved RGB data for `num_pixels` pixels.  Each plane must produce
/// exactly `num_pixels` bytes, and no input may be left over after the blue
/// plane.
fn decode_rle_rgb(input: &[u8], num_pixels: usize) -> std::result::Result<Vec<u8>, String> {
    let mut output = vec![0u8; 3 * num_pixels];
    let mut iter = input.iter();
    let mut plane = vec![0u8; num_pixels];
    for channel in 0..3 {
        decode_rle_plane(&mut iter, &mut plane)
            .map_err(|reason| format!("{} (channel {})", reason, channel))?;
        for (pixel, &value) in plane.iter().enumerate() {
            output[3 * pixel + channel] = value;
        }
    }
    if iter.len() != 0 {
        return Err(format!("{} unused bytes after RLE data", iter.len()));
    }
    Ok(output)
}

fn decode_rle_plane(input: &mut std::slice::Iter<u8>,
                    plane: &mut [u8])
                    -> std::result::Result<(), &'static str> {
    let mut filled = 0;
    while filled < plane.len() {
        let control = *input.next().ok_or("RLE data ends mid-plane")?;
        if control >= 128 {
            let count = (control as usize) - 125;
            let value = *input.next().ok_or("RLE data ends mid-run")?;
            if filled + count > plane.len() {
                return Err("RLE run overruns the plane");
            }
            plane[filled..filled + count].iter_mut().for_each(|p| *p = value);
            filled += count;
        } else {
            let count = (control as usize) + 1;
            if filled + count > plane.len() {
                return Err("RLE literal overruns the plane");
            }
            if input.len() < count {
                return Err("RLE data ends mid-literal");
            }
            for dest in &mut plane[filled..filled + count] {
                *dest = *input.next().ok_or("RLE data ends mid-literal")?;
            }
            filled += count;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::icontype::OSType;
    use crate::image::PixelFormat;
    use std::io::Cursor;

    #[test]
    fn decode_rle() {
        let data: Vec<u8> = vec![0, 12, 255, 0, 250, 0, 128, 34, 255, 0, 248,
                                 0, 1, 56, 99, 255, 0, 249, 0];
        let element = IconElement::new(OSType(*b"is32"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(image.pixel_format(), PixelFormat::RGBA);
        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 16);
        assert_eq!(&image.data()[0..4], &[12, 34, 56, 255]);
        assert_eq!(&image.data()[4..8], &[0, 34, 99, 255]);
        assert_eq!(&image.data()[8..12], &[0, 34, 0, 255]);
    }

    #[test]
    fn decode_rle_plane_exact_length() {
        let mut plane = [0u8; 5];
        let input = [129u8, 7, 0, 9];
        decode_rle_plane(&mut input.iter(), &mut plane).unwrap();
        assert_eq!(plane, [7, 7, 7, 7, 9]);
    }

    #[test]
    fn decode_rle_overrun() {
        // A run of 130 in a 16x16 plane, then 130 more, overruns 256 pixels.
        let data: Vec<u8> = vec![255, 1, 255, 1, 129, 1];
        let element = IconElement::new(OSType(*b"is32"), data);
        match element.decode_image() {
            Err(DecodeError::UnsupportedEncoding { ostype, .. }) => {
                assert_eq!(ostype, OSType(*b"is32"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn decode_rle_underrun() {
        let element = IconElement::new(OSType(*b"is32"), vec![255, 1]);
        assert!(matches!(element.decode_image(),
                         Err(DecodeError::UnsupportedEncoding { .. })));
    }

    #[test]
    fn decode_rle_trailing_bytes() {
        let mut data = vec![];
        for _ in 0..3 {
            data.extend_from_slice(&[255, 1, 251, 2]);
        }
        data.push(0);
        let element = IconElement::new(OSType(*b"is32"), data);
        assert!(matches!(element.decode_image(),
                         Err(DecodeError::UnsupportedEncoding { .. })));
    }

    #[test]
    fn decode_it32_with_zero_header() {
        let mut data = vec![0, 0, 0, 0];
        for value in [10u8, 20, 30] {
            for _ in 0..126 {
                data.extend_from_slice(&[255, value]);
            }
            data.extend_from_slice(&[129, value]);
        }
        let element = IconElement::new(OSType(*b"it32"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(image.width(), 128);
        assert!(image.data().chunks_exact(4).all(|p| p == [10, 20, 30, 255]));
    }

    #[test]
    fn decode_uncompressed_rgb32() {
        let mut data = vec![0u8; 16 * 16 * 4];
        data[1..4].copy_from_slice(&[1, 2, 3]);
        let element = IconElement::new(OSType(*b"is32"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(&image.data()[0..4], &[1, 2, 3, 255]);
        assert_eq!(&image.data()[4..8], &[0, 0, 0, 255]);
    }

    #[test]
    fn decode_uncompressed_rgb24() {
        let element = IconElement::new(OSType(*b"is32"), vec![1u8; 16 * 16 * 3]);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(image.width(), 16);
        assert!(image.data().chunks_exact(4).all(|p| p == [1, 1, 1, 255]));
    }

    #[test]
    fn decode_rle24_with_rgb24_length_prefers_rle() {
        // 768 bytes that happen to be valid RLE data are decoded as RLE.
        let mut data = vec![];
        for value in [7u8, 8, 9] {
            data.push(127);
            data.extend(std::iter::repeat(value).take(128));
            data.push(123);
            data.extend(std::iter::repeat(value).take(124));
            data.extend_from_slice(&[129, value]);
        }
        assert_eq!(data.len(), 16 * 16 * 3);
        let element = IconElement::new(OSType(*b"is32"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert!(image.data().chunks_exact(4).all(|p| p == [7, 8, 9, 255]));
    }

    struct PngOnlyCodec;

    impl EmbeddedCodec for PngOnlyCodec {
        fn decode_png(&self, _data: &[u8]) -> io::Result<Image> {
            Ok(Image::new(PixelFormat::RGBA, 16, 16))
        }

        fn decode_jp2(&self, _data: &[u8]) -> io::Result<Image> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "no JPEG 2000 here"))
        }
    }

    #[test]
    fn decode_embedded_without_codec_support() {
        let element = IconElement::new(OSType(*b"icp4"),
                                       b"\0\0\0\x0cjP  \r\n\x87\nrest".to_vec());
        match element.decode_with(&PngOnlyCodec) {
            Err(DecodeError::UnsupportedEncoding { ostype, .. }) => {
                assert_eq!(ostype, OSType(*b"icp4"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let element = IconElement::new(OSType(*b"icp4"),
                                       b"\x89PNG\r\n\x1a\nrest".to_vec());
        assert!(element.decode_with(&PngOnlyCodec).is_ok());
    }

    #[test]
    fn decode_mask() {
        let mut data = vec![0u8; 256];
        data[2] = 127;
        let element = IconElement::new(OSType(*b"s8mk"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(image.pixel_format(), PixelFormat::Alpha);
        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 16);
        assert_eq!(image.data()[2], 127);
    }

    #[test]
    fn decode_mask_wrong_length() {
        let element = IconElement::new(OSType(*b"s8mk"), vec![0u8; 255]);
        assert!(matches!(element.decode_image(), Err(DecodeError::Format { .. })));
    }

    #[test]
    fn decode_mono_with_mask() {
        // 16x16: 32 bytes of image, then 32 bytes of mask.
        let mut data = vec![0u8; 64];
        data[0] = 0b1000_0000;
        data[32] = 0b1100_0000;
        let element = IconElement::new(OSType(*b"ics#"), data);
        let decoded = element.decode_with(&embedded::BuiltinCodec).unwrap();
        let color = decoded.color.expect("no color image");
        let mask = decoded.mask.expect("no mask");
        assert_eq!(&color.data()[0..8], &[0, 0, 0, 255, 255, 255, 255, 255]);
        assert_eq!(&mask.data()[0..3], &[255, 255, 0]);
    }

    #[test]
    fn decode_mini_icon() {
        let element = IconElement::new(OSType(*b"icm8"), vec![0xff; 16 * 12]);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!((image.width(), image.height()), (16, 12));
        assert_eq!(&image.data()[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn decode_palette4() {
        let mut data = vec![0u8; 16 * 16 / 2];
        data[0] = 0x1f;
        let element = IconElement::new(OSType(*b"ics4"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(&image.data()[0..4], &[0xfc, 0xf3, 0x05, 0xff]);
        assert_eq!(&image.data()[4..8], &[0, 0, 0, 0xff]);
        assert_eq!(&image.data()[8..12], &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn decode_palette_wrong_length() {
        let element = IconElement::new(OSType(*b"icl8"), vec![0u8; 1023]);
        assert!(matches!(element.decode_image(), Err(DecodeError::Format { .. })));
    }

    #[test]
    fn decode_unknown_ostype() {
        let element = IconElement::new(OSType(*b"quux"), vec![]);
        assert!(matches!(element.decode_image(),
                         Err(DecodeError::UnsupportedEncoding { .. })));
    }

    #[test]
    fn decode_embedded_garbage() {
        let element = IconElement::new(OSType(*b"ic07"), b"not an image".to_vec());
        match element.decode_image() {
            Err(DecodeError::EmbeddedDecode { ostype, .. }) => {
                assert_eq!(ostype, OSType(*b"ic07"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn read_element() {
        let input = b"quux\0\0\0\x0efoobar";
        let element = IconElement::read(Cursor::new(&input[..]), 8, 14).unwrap();
        assert_eq!(element.ostype(), OSType(*b"quux"));
        assert_eq!(element.offset(), 8);
        assert_eq!(element.data(), b"foobar");
        assert_eq!(element.total_length(), 14);
    }

    #[test]
    fn read_element_overrun() {
        let input = b"quux\0\0\0\x0efoobar";
        let result = IconElement::read(Cursor::new(&input[..]), 8, 13);
        assert!(matches!(result, Err(DecodeError::Format { offset: 8, .. })));
    }

    #[test]
    fn read_element_short_length() {
        let input = b"quux\0\0\0\x07";
        let result = IconElement::read(Cursor::new(&input[..]), 8, 8);
        assert!(matches!(result, Err(DecodeError::Format { .. })));
    }
}
