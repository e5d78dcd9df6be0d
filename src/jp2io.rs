use hayro_jpeg2000::{self, ColorSpace};
use std::io::{self, Error, ErrorKind};

use crate::image::{Image, PixelFormat};

impl Image {
    /// Reads an image from a JPEG 2000 file.  Only grayscale and RGB images
    /// (with or without alpha) are supported.
    pub fn read_jp2(input: &[u8]) -> io::Result<Image> {
        let image = hayro_jpeg2000::Image::new(
            input,
            &hayro_jpeg2000::DecodeSettings {
                resolve_palette_indices: true,
                strict: false,
                target_resolution: None,
            },
        )
        .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;

        let pixel_format = match (image.color_space(), image.has_alpha()) {
            (ColorSpace::Gray, false) => PixelFormat::Gray,
            (ColorSpace::Gray, true) => PixelFormat::GrayAlpha,
            (ColorSpace::RGB, false) => PixelFormat::RGB,
            (ColorSpace::RGB, true) => PixelFormat::RGBA,
            (ColorSpace::CMYK, _) => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "jpeg2000 images with CMYK color space not supported",
                ));
            }
            (ColorSpace::Unknown { num_channels }, _) => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!(
                        "jpeg2000 images with Unknown ({num_channels}\
                        -channel) color space not supported"
                    ),
                ));
            }
            (ColorSpace::Icc { .. }, _) => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "jpeg2000 images with ICC profile not supported",
                ));
            }
        };
        let (width, height) = (image.width(), image.height());
        let pixels = image
            .decode()
            .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
        Image::from_data(pixel_format, width, height, pixels).ok_or_else(|| {
            Error::new(ErrorKind::InvalidData,
                       "jpeg2000 decoder produced the wrong amount of data")
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::image::Image;

    #[test]
    fn read_jp2_rejects_garbage() {
        assert!(Image::read_jp2(b"\0\0\0\x0cjP  \r\n\x87\nnot really").is_err());
    }
}
