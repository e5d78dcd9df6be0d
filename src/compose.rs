//! Merging of separately stored alpha masks into color images, and assembly
//! of the final icon list.

use log::debug;
use std::collections::HashMap;

use crate::element::DecodedElement;
use crate::image::DisplayableIcon;

/// Moves every mask out of `elements` and writes it into the alpha channel
/// of each color image with the same pixel dimensions.  When several masks
/// share dimensions, the one appearing last in the container wins.  Color
/// images with no matching mask stay fully opaque, and embedded PNG/JPEG
/// 2000 images are never masked.  Returns the number of images masked.
///
/// The 1-bit mask half of an `ICN#`-style element competes with the 8-bit
/// `*8mk` masks on equal terms: whichever of them comes last in the file is
/// applied to every color image of that size, including the `ICN#` image
/// itself.
pub fn apply_masks(elements: &mut [DecodedElement]) -> usize {
    let mut masks = HashMap::new();
    for element in elements.iter_mut().filter(|el| el.icon_type.role().has_mask()) {
        if let Some(mask) = element.mask.take() {
            masks.insert((mask.width(), mask.height()), mask);
        }
    }
    let mut masked = 0;
    for element in elements.iter_mut().filter(|el| el.accepts_mask()) {
        if let Some(color) = element.color.as_mut() {
            if let Some(mask) = masks.get(&(color.width(), color.height())) {
                if color.apply_mask(mask) {
                    masked += 1;
                }
            }
        }
    }
    debug!("composited {} mask(s) from {} distinct size(s)", masked, masks.len());
    masked
}

/// Collects the color images of `elements`, in order, as displayable icons.
/// Elements without color data (i.e. masks) are dropped.
pub fn assemble(elements: Vec<DecodedElement>) -> Vec<DisplayableIcon> {
    elements
        .into_iter()
        .filter_map(|element| {
            let icon_type = element.icon_type;
            element.color.map(|color| DisplayableIcon::new(icon_type, color))
        })
        .collect()
}
