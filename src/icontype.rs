use std::fmt;
use std::str::FromStr;

/// Types of icon elements that can be decoded as images or masks.
///
/// The discriminant order of this enum matches the order of the static
/// descriptor table, so every variant maps to exactly one
/// [`IconDescriptor`](struct.IconDescriptor.html).
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 32x32 1-bit icon (without mask).
    Mono_32x32,
    /// 32x32 1-bit icon with a 1-bit mask.
    MonoA_32x32,
    /// 16x12 1-bit "mini" icon with a 1-bit mask.
    MonoA_16x12,
    /// 16x12 4-bit "mini" icon.
    Palette4_16x12,
    /// 16x12 8-bit "mini" icon.
    Palette8_16x12,
    /// 16x16 1-bit icon with a 1-bit mask.
    MonoA_16x16,
    /// 16x16 4-bit icon.
    Palette4_16x16,
    /// 16x16 8-bit icon.
    Palette8_16x16,
    /// 16x16 24-bit icon (without alpha).
    RGB24_16x16,
    /// 16x16 8-bit alpha mask.
    Mask8_16x16,
    /// 32x32 4-bit icon.
    Palette4_32x32,
    /// 32x32 8-bit icon.
    Palette8_32x32,
    /// 32x32 24-bit icon (without alpha).
    RGB24_32x32,
    /// 32x32 8-bit alpha mask.
    Mask8_32x32,
    /// 48x48 1-bit icon with a 1-bit mask.
    MonoA_48x48,
    /// 48x48 4-bit icon.
    Palette4_48x48,
    /// 48x48 8-bit icon.
    Palette8_48x48,
    /// 48x48 24-bit icon (without alpha).
    RGB24_48x48,
    /// 48x48 8-bit alpha mask.
    Mask8_48x48,
    /// 128x128 24-bit icon (without alpha).
    RGB24_128x128,
    /// 128x128 8-bit alpha mask.
    Mask8_128x128,
    /// 16x16 32-bit icon.
    RGBA32_16x16,
    /// 32x32 32-bit icon.
    RGBA32_32x32,
    /// 64x64 32-bit icon.
    RGBA32_64x64,
    /// 128x128 32-bit icon.
    RGBA32_128x128,
    /// 256x256 32-bit icon.
    RGBA32_256x256,
    /// 512x512 32-bit icon.
    RGBA32_512x512,
    /// 512x512 32-bit icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x,
    /// 16x16 32-bit icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 128x128 32-bit icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x,
}

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    ///
    /// # Examples
    /// ```
    /// use icns_decode::{IconType, OSType};
    /// assert_eq!(IconType::from_ostype(OSType(*b"it32")),
    ///            Some(IconType::RGB24_128x128));
    /// assert_eq!(IconType::from_ostype(OSType(*b"TOC ")), None);
    /// ```
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        IconDescriptor::lookup(ostype).map(|desc| desc.icon_type)
    }

    /// Returns the catalog entry describing this icon type.
    pub fn descriptor(self) -> &'static IconDescriptor {
        &CATALOG[self as usize]
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        self.descriptor().ostype
    }

    /// Returns the pixel data width of this icon type.  Normally this is the
    /// same as the screen width, but for 2x "retina" density icons, this will
    /// be twice that value.
    ///
    /// # Examples
    /// ```
    /// use icns_decode::IconType;
    /// assert_eq!(IconType::Mask8_128x128.pixel_width(), 128);
    /// assert_eq!(IconType::RGBA32_256x256.pixel_width(), 256);
    /// assert_eq!(IconType::RGBA32_256x256_2x.pixel_width(), 512);
    /// ```
    pub fn pixel_width(self) -> u32 {
        self.descriptor().pixel_width()
    }

    /// Returns the pixel data height of this icon type.
    ///
    /// # Examples
    /// ```
    /// use icns_decode::IconType;
    /// assert_eq!(IconType::Palette8_16x12.pixel_height(), 12);
    /// assert_eq!(IconType::RGBA32_16x16_2x.pixel_height(), 32);
    /// ```
    pub fn pixel_height(self) -> u32 {
        self.descriptor().pixel_height()
    }

    /// Returns the pixel density for this icon type -- that is, 2 for 2x
    /// "retina" density icons, or 1 for other icon types.
    pub fn pixel_density(self) -> u32 {
        self.descriptor().pixel_density
    }

    /// Returns the screen width of this icon type.
    pub fn screen_width(self) -> u32 {
        self.descriptor().screen_width
    }

    /// Returns the screen height of this icon type.
    pub fn screen_height(self) -> u32 {
        self.descriptor().screen_height
    }

    /// Returns the number of bits used per pixel by the color (or mask) data
    /// of this icon type.
    pub fn bits_per_pixel(self) -> u32 {
        self.descriptor().bits_per_pixel
    }

    /// Returns the encoding used within an ICNS file for this icon type.
    pub fn encoding(self) -> Encoding {
        self.descriptor().encoding
    }

    /// Returns whether elements of this type supply color data, mask data,
    /// or both.
    pub fn role(self) -> Role {
        self.descriptor().role
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}

/// Method of encoding an image within an icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// Icon element data payload is an uncompressed 1-bit image.
    Mono,
    /// Icon element data payload is an uncompressed 1-bit image followed by
    /// an uncompressed 1-bit alpha mask of the same size.
    MonoA,
    /// Icon element data payload is an uncompressed 4-bit image indexing the
    /// standard Macintosh 16-color palette.
    Palette4,
    /// Icon element data payload is an uncompressed 8-bit image indexing the
    /// standard Macintosh 256-color palette.
    Palette8,
    /// Icon element data payload is an RLE-compressed 24-bit RGB image (or,
    /// in a historical variant, an uncompressed 32-bit xRGB image).
    RLE24,
    /// Icon element data payload is an uncompressed 8-bit alpha mask.
    Mask8,
    /// Icon element data payload is a JPEG 2000 or PNG file.
    JP2PNG,
}

/// What an element contributes to the final icons.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role {
    /// The element holds color data.
    Color,
    /// The element holds an alpha mask for a same-sized color element.
    Mask,
    /// The element holds 1-bit color data followed by a 1-bit mask.
    ColorWithMask,
}

impl Role {
    /// Returns true if elements with this role produce a displayable icon.
    pub fn has_color(self) -> bool {
        self != Role::Mask
    }

    /// Returns true if elements with this role supply an alpha mask.
    pub fn has_mask(self) -> bool {
        self != Role::Color
    }
}

/// A catalog entry describing one known icon element type.
#[derive(Debug, Eq, PartialEq)]
pub struct IconDescriptor {
    /// The icon type this entry describes.
    pub icon_type: IconType,
    /// The OSType under which this icon type is stored.
    pub ostype: OSType,
    /// Width in screen points.
    pub screen_width: u32,
    /// Height in screen points.
    pub screen_height: u32,
    /// 2 for "retina" icons, 1 otherwise.
    pub pixel_density: u32,
    /// Bits per pixel of the color or mask data.
    pub bits_per_pixel: u32,
    /// Payload encoding.
    pub encoding: Encoding,
    /// Color/mask role.
    pub role: Role,
}

impl IconDescriptor {
    /// Looks up the catalog entry for an OSType.  Returns `None` for codes
    /// this library does not know about (e.g. `TOC ` or `icnV`).
    pub fn lookup(ostype: OSType) -> Option<&'static IconDescriptor> {
        CATALOG.iter().find(|desc| desc.ostype == ostype)
    }

    /// Returns every known icon type, in catalog order.
    pub fn all() -> &'static [IconDescriptor] {
        &CATALOG
    }

    /// Width of the pixel data.
    pub fn pixel_width(&self) -> u32 {
        self.screen_width * self.pixel_density
    }

    /// Height of the pixel data.
    pub fn pixel_height(&self) -> u32 {
        self.screen_height * self.pixel_density
    }
}

const fn entry(icon_type: IconType,
               ostype: &[u8; 4],
               size: (u32, u32, u32),
               bits_per_pixel: u32,
               encoding: Encoding,
               role: Role)
               -> IconDescriptor {
    IconDescriptor {
        icon_type,
        ostype: OSType(*ostype),
        screen_width: size.0,
        screen_height: size.1,
        pixel_density: size.2,
        bits_per_pixel,
        encoding,
        role,
    }
}

use self::Encoding::{JP2PNG, Mask8, Mono, MonoA, Palette4, Palette8, RLE24};
use self::IconType as T;
use self::Role::{Color, ColorWithMask, Mask};

static CATALOG: [IconDescriptor; 32] = [
    entry(T::Mono_32x32, b"ICON", (32, 32, 1), 1, Mono, Color),
    entry(T::MonoA_32x32, b"ICN#", (32, 32, 1), 1, MonoA, ColorWithMask),
    entry(T::MonoA_16x12, b"icm#", (16, 12, 1), 1, MonoA, ColorWithMask),
    entry(T::Palette4_16x12, b"icm4", (16, 12, 1), 4, Palette4, Color),
    entry(T::Palette8_16x12, b"icm8", (16, 12, 1), 8, Palette8, Color),
    entry(T::MonoA_16x16, b"ics#", (16, 16, 1), 1, MonoA, ColorWithMask),
    entry(T::Palette4_16x16, b"ics4", (16, 16, 1), 4, Palette4, Color),
    entry(T::Palette8_16x16, b"ics8", (16, 16, 1), 8, Palette8, Color),
    entry(T::RGB24_16x16, b"is32", (16, 16, 1), 24, RLE24, Color),
    entry(T::Mask8_16x16, b"s8mk", (16, 16, 1), 8, Mask8, Mask),
    entry(T::Palette4_32x32, b"icl4", (32, 32, 1), 4, Palette4, Color),
    entry(T::Palette8_32x32, b"icl8", (32, 32, 1), 8, Palette8, Color),
    entry(T::RGB24_32x32, b"il32", (32, 32, 1), 24, RLE24, Color),
    entry(T::Mask8_32x32, b"l8mk", (32, 32, 1), 8, Mask8, Mask),
    entry(T::MonoA_48x48, b"ich#", (48, 48, 1), 1, MonoA, ColorWithMask),
    entry(T::Palette4_48x48, b"ich4", (48, 48, 1), 4, Palette4, Color),
    entry(T::Palette8_48x48, b"ich8", (48, 48, 1), 8, Palette8, Color),
    entry(T::RGB24_48x48, b"ih32", (48, 48, 1), 24, RLE24, Color),
    entry(T::Mask8_48x48, b"h8mk", (48, 48, 1), 8, Mask8, Mask),
    entry(T::RGB24_128x128, b"it32", (128, 128, 1), 24, RLE24, Color),
    entry(T::Mask8_128x128, b"t8mk", (128, 128, 1), 8, Mask8, Mask),
    entry(T::RGBA32_16x16, b"icp4", (16, 16, 1), 32, JP2PNG, Color),
    entry(T::RGBA32_32x32, b"icp5", (32, 32, 1), 32, JP2PNG, Color),
    entry(T::RGBA32_64x64, b"icp6", (64, 64, 1), 32, JP2PNG, Color),
    entry(T::RGBA32_128x128, b"ic07", (128, 128, 1), 32, JP2PNG, Color),
    entry(T::RGBA32_256x256, b"ic08", (256, 256, 1), 32, JP2PNG, Color),
    entry(T::RGBA32_512x512, b"ic09", (512, 512, 1), 32, JP2PNG, Color),
    entry(T::RGBA32_512x512_2x, b"ic10", (512, 512, 2), 32, JP2PNG, Color),
    entry(T::RGBA32_16x16_2x, b"ic11", (16, 16, 2), 32, JP2PNG, Color),
    entry(T::RGBA32_32x32_2x, b"ic12", (32, 32, 2), 32, JP2PNG, Color),
    entry(T::RGBA32_128x128_2x, b"ic13", (128, 128, 2), 32, JP2PNG, Color),
    entry(T::RGBA32_256x256_2x, b"ic14", (256, 256, 2), 32, JP2PNG, Color),
];
