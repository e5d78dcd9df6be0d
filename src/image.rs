use crate::icontype::IconType;

/// A decoded icon image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    pub(crate) format: PixelFormat,
    width: u32,
    height: u32,
    pub(crate) data: Box<[u8]>,
}

impl Image {
    /// Creates a new image with all pixel data set to zero.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Image {
        let data_bytes = format.data_length(width, height);
        Image {
            format,
            width,
            height,
            data: vec![0u8; data_bytes].into_boxed_slice(),
        }
    }

    /// Creates a new image from existing pixel data.  Returns `None` if the
    /// data length does not match the format and dimensions.
    pub fn from_data(format: PixelFormat,
                     width: u32,
                     height: u32,
                     data: Vec<u8>)
                     -> Option<Image> {
        if data.len() != format.data_length(width, height) {
            return None;
        }
        Some(Image {
            format,
            width,
            height,
            data: data.into_boxed_slice(),
        })
    }

    /// Creates a copy of this image converted to the given pixel format.  If
    /// the source image is already in that format, this is equivalent to
    /// simply calling `clone()`.
    pub fn convert_to(&self, format: PixelFormat) -> Image {
        if self.format == format {
            return self.clone();
        }
        let rgba = match self.format {
            PixelFormat::RGBA => self.data.clone(),
            PixelFormat::RGB => rgb_to_rgba(&self.data),
            PixelFormat::GrayAlpha => gray_alpha_to_rgba(&self.data),
            PixelFormat::Gray => grayscale_to_rgba(&self.data),
            PixelFormat::Alpha => alpha_to_rgba(&self.data),
        };
        Image {
            format,
            width: self.width,
            height: self.height,
            data: rgba_to(format, &rgba),
        }
    }

    /// Returns the format in which this image's pixel data is stored.
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the image's pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the image's pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Replaces the alpha channel of an RGBA image with the values of an
    /// alpha plane of the same dimensions.  Returns false (and leaves the
    /// image untouched) if the formats or dimensions disagree.
    pub fn apply_mask(&mut self, mask: &Image) -> bool {
        if self.format != PixelFormat::RGBA ||
           mask.format != PixelFormat::Alpha ||
           self.width != mask.width ||
           self.height != mask.height {
            return false;
        }
        for (pixel, &alpha) in self.data.chunks_exact_mut(4).zip(mask.data.iter()) {
            pixel[3] = alpha;
        }
        true
    }
}

/// A format for storing pixel data in an image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
    /// 32-bit color with alpha channel.
    RGBA,
    /// 24-bit color with no alpha.
    RGB,
    /// 16-bit grayscale-with-alpha.
    GrayAlpha,
    /// 8-bit grayscale with no alpha.
    Gray,
    /// 8-bit alpha mask with no color.
    Alpha,
}

impl PixelFormat {
    /// Returns the number of bits needed to store a single pixel in this
    /// format.
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::RGBA => 32,
            PixelFormat::RGB => 24,
            PixelFormat::GrayAlpha => 16,
            PixelFormat::Gray => 8,
            PixelFormat::Alpha => 8,
        }
    }

    fn data_length(self, width: u32, height: u32) -> usize {
        let bytes_per_pixel = (self.bits_per_pixel() / 8) as usize;
        bytes_per_pixel * (width as usize) * (height as usize)
    }
}

/// One fully composited icon, as returned to callers of the decoder.
#[derive(Clone, Debug)]
pub struct DisplayableIcon {
    icon_type: IconType,
    raster: Image,
}

impl DisplayableIcon {
    pub(crate) fn new(icon_type: IconType, raster: Image) -> DisplayableIcon {
        debug_assert_eq!(raster.pixel_format(), PixelFormat::RGBA);
        DisplayableIcon { icon_type, raster }
    }

    /// Returns the type of the element this icon was decoded from.
    pub fn icon_type(&self) -> IconType {
        self.icon_type
    }

    /// Returns the width of the icon, in pixels.
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Returns the height of the icon, in pixels.
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Returns the RGBA raster of the icon.
    pub fn raster(&self) -> &Image {
        &self.raster
    }

    /// Consumes the icon, returning its RGBA raster.
    pub fn into_raster(self) -> Image {
        self.raster
    }
}

fn rgb_to_rgba(rgb: &[u8]) -> Box<[u8]> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for pixel in rgb.chunks_exact(3) {
        rgba.extend_from_slice(pixel);
        rgba.push(u8::MAX);
    }
    rgba.into_boxed_slice()
}

fn gray_alpha_to_rgba(gray_alpha: &[u8]) -> Box<[u8]> {
    let mut rgba = Vec::with_capacity(gray_alpha.len() * 2);
    for pixel in gray_alpha.chunks_exact(2) {
        rgba.extend_from_slice(&[pixel[0], pixel[0], pixel[0], pixel[1]]);
    }
    rgba.into_boxed_slice()
}

fn grayscale_to_rgba(gray: &[u8]) -> Box<[u8]> {
    let mut rgba = Vec::with_capacity(gray.len() * 4);
    for &value in gray {
        rgba.extend_from_slice(&[value, value, value, u8::MAX]);
    }
    rgba.into_boxed_slice()
}

fn alpha_to_rgba(alpha: &[u8]) -> Box<[u8]> {
    let mut rgba = Vec::with_capacity(alpha.len() * 4);
    for &value in alpha {
        rgba.extend_from_slice(&[0, 0, 0, value]);
    }
    rgba.into_boxed_slice()
}

fn rgba_to(format: PixelFormat, rgba: &[u8]) -> Box<[u8]> {
    let pixels = rgba.chunks_exact(4);
    let data: Vec<u8> = match format {
        PixelFormat::RGBA => return rgba.to_vec().into_boxed_slice(),
        PixelFormat::RGB => pixels.flat_map(|p| [p[0], p[1], p[2]]).collect(),
        PixelFormat::GrayAlpha => pixels.flat_map(|p| [luma(p), p[3]]).collect(),
        PixelFormat::Gray => pixels.map(luma).collect(),
        PixelFormat::Alpha => pixels.map(|p| p[3]).collect(),
    };
    data.into_boxed_slice()
}

fn luma(pixel: &[u8]) -> u8 {
    let sum = u32::from(pixel[0]) + u32::from(pixel[1]) + u32::from(pixel[2]);
    (sum / 3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_data_checks_length() {
        assert!(Image::from_data(PixelFormat::RGB, 2, 2, vec![0; 12]).is_some());
        assert!(Image::from_data(PixelFormat::RGB, 2, 2, vec![0; 11]).is_none());
    }

    #[test]
    fn rgb_to_rgba_is_opaque() {
        let image = Image::from_data(PixelFormat::RGB, 2, 1,
                                     vec![1, 2, 3, 4, 5, 6]).unwrap();
        let rgba = image.convert_to(PixelFormat::RGBA);
        assert_eq!(rgba.data(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn gray_alpha_to_rgba() {
        let image = Image::from_data(PixelFormat::GrayAlpha, 1, 1,
                                     vec![9, 100]).unwrap();
        assert_eq!(image.convert_to(PixelFormat::RGBA).data(),
                   &[9, 9, 9, 100]);
    }

    #[test]
    fn alpha_to_gray_alpha() {
        let image = Image::from_data(PixelFormat::Alpha, 2, 1, vec![7, 8])
            .unwrap();
        assert_eq!(image.convert_to(PixelFormat::GrayAlpha).data(),
                   &[0, 7, 0, 8]);
    }

    #[test]
    fn apply_mask_replaces_alpha() {
        let mut image = Image::new(PixelFormat::RGB, 2, 1)
            .convert_to(PixelFormat::RGBA);
        let mask = Image::from_data(PixelFormat::Alpha, 2, 1, vec![0, 128])
            .unwrap();
        assert!(image.apply_mask(&mask));
        assert_eq!(image.data(), &[0, 0, 0, 0, 0, 0, 0, 128]);
    }

    #[test]
    fn apply_mask_rejects_wrong_size() {
        let mut image = Image::new(PixelFormat::RGBA, 2, 2);
        let mask = Image::new(PixelFormat::Alpha, 2, 1);
        assert!(!image.apply_mask(&mask));
    }
}
