use crate::error::KeyplateError;
use crate::types::{Pt, Rect, Size};

/// Scales a source aspect ratio into `target`, preserving the ratio and
/// centering the result on both axes. The source is never cropped: whichever
/// dimension is relatively larger gets clamped to the box and the other is
/// derived from it.
pub fn fit_within(source_aspect: f32, target: Rect) -> Result<Rect, KeyplateError> {
    check_aspect(source_aspect)?;
    if target.width <= Pt::ZERO || target.height <= Pt::ZERO {
        return Err(KeyplateError::InvalidGeometry(format!(
            "target box is {}x{}pt",
            target.width.to_f32(),
            target.height.to_f32()
        )));
    }

    let box_aspect = target.width.to_f32() / target.height.to_f32();
    let (width, height) = if source_aspect > box_aspect {
        let width = target.width;
        (width, width / source_aspect)
    } else {
        let height = target.height;
        (height * source_aspect, height)
    };

    Ok(Rect {
        x: target.x + (target.width - width) / 2,
        y: target.y + (target.height - height) / 2,
        width,
        height,
    })
}

/// Thumbnail rule from the source report: the longer side becomes `max_side`,
/// square counts as landscape.
pub fn fit_longest_side(source_aspect: f32, max_side: Pt) -> Result<Size, KeyplateError> {
    check_aspect(source_aspect)?;
    if max_side <= Pt::ZERO {
        return Err(KeyplateError::InvalidGeometry(format!(
            "max side is {}pt",
            max_side.to_f32()
        )));
    }
    let size = if source_aspect >= 1.0 {
        Size {
            width: max_side,
            height: max_side / source_aspect,
        }
    } else {
        Size {
            width: max_side * source_aspect,
            height: max_side,
        }
    };
    Ok(size)
}

fn check_aspect(source_aspect: f32) -> Result<(), KeyplateError> {
    if !source_aspect.is_finite() || source_aspect <= 0.0 {
        return Err(KeyplateError::InvalidGeometry(format!(
            "aspect ratio {source_aspect}"
        )));
    }
    Ok(())
}
