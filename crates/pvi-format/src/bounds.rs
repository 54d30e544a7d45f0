//! Widget bounds and the arithmetic the layout engine does on them.

use crate::error::{FormatError, Result};

/// Position and size of a widget, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Bounds {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Bounds of the given size at the origin.
    #[must_use]
    pub const fn sized(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Padding around the contents of a group or screen with a title of
    /// `title_height` above them.
    #[must_use]
    pub const fn with_title(spacing: i32, title_height: i32) -> Self {
        Self {
            x: spacing,
            y: spacing + title_height,
            w: 2 * spacing,
            h: 2 * spacing + title_height,
        }
    }

    /// Right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Field-wise sum of `self` and `other`.
    #[must_use]
    pub const fn added_to(&self, other: &Bounds) -> Bounds {
        Bounds {
            x: self.x + other.x,
            y: self.y + other.y,
            w: self.w + other.w,
            h: self.h + other.h,
        }
    }

    /// Splits off a left part `width` wide, leaving `spacing` before the
    /// right part.
    pub fn split_left(&self, width: i32, spacing: i32) -> Result<(Bounds, Bounds)> {
        let to_split = width + spacing;
        if to_split >= self.w {
            return Err(FormatError::NoRoom {
                width: to_split,
                available: self.w,
            });
        }
        let left = Bounds::new(self.x, self.y, width, self.h);
        let right = Bounds::new(self.x + to_split, self.y, self.w - to_split, self.h);
        Ok((left, right))
    }

    /// Splits horizontally by `ratio` of the width left after `spacing`
    /// between each part. Widths are truncated to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn split_by_ratio(&self, ratio: &[f64], spacing: i32) -> Vec<Bounds> {
        let splits = count(ratio.len()) - 1;
        let widget_space = f64::from(self.w - splits * spacing);
        let widths: Vec<i32> = ratio.iter().map(|r| (widget_space * r) as i32).collect();

        let mut x = self.x;
        widths
            .into_iter()
            .map(|w| {
                let bounds = Bounds::new(x, self.y, w, self.h);
                x += w + spacing;
                bounds
            })
            .collect()
    }

    /// Splits horizontally into `count` equal parts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn split_into(&self, count: usize, spacing: i32) -> Vec<Bounds> {
        if count == 0 {
            return Vec::new();
        }
        let ratio = vec![1.0 / count as f64; count];
        self.split_by_ratio(&ratio, spacing)
    }

    /// The largest square centred in `self`.
    #[must_use]
    pub fn square(&self) -> Bounds {
        let size = self.w.min(self.h);
        Bounds::new(
            self.x + (self.w - size) / 2,
            self.y + (self.h - size) / 2,
            size,
            size,
        )
    }

    /// Expands by tiling `horizontal` by `vertical` copies with `spacing`
    /// between them.
    #[must_use]
    pub fn tile(&self, horizontal: i32, vertical: i32, spacing: i32) -> Bounds {
        Bounds::new(
            self.x,
            self.y,
            self.w * horizontal + spacing * (horizontal - 1),
            self.h * vertical + spacing * (vertical - 1),
        )
    }

    /// Moves right by `amount`.
    pub fn indent(&mut self, amount: i32) {
        self.x += amount;
    }

    /// Copy moved by `dx`, `dy`.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Bounds {
        Bounds::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// Saturating conversion of a collection length to pixel arithmetic.
pub(crate) fn count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_left() {
        let bounds = Bounds::new(5, 10, 245, 20);
        let (left, right) = bounds.split_left(115, 5).expect("split");
        assert_eq!(left, Bounds::new(5, 10, 115, 20));
        assert_eq!(right, Bounds::new(125, 10, 125, 20));
    }

    #[test]
    fn test_split_left_without_room() {
        let err = Bounds::sized(120, 20).split_left(115, 5).unwrap_err();
        assert_eq!(err.to_string(), "can't split off 120 from 120");
    }

    #[test]
    fn test_split_into_truncates() {
        let parts = Bounds::new(120, 0, 125, 20).split_into(2, 5);
        assert_eq!(
            parts,
            vec![Bounds::new(120, 0, 60, 20), Bounds::new(185, 0, 60, 20)]
        );
        assert!(Bounds::sized(100, 20).split_into(0, 5).is_empty());
    }

    #[test]
    fn test_square_is_centred() {
        assert_eq!(
            Bounds::new(10, 0, 60, 20).square(),
            Bounds::new(30, 0, 20, 20)
        );
    }

    #[test]
    fn test_tile_and_padding() {
        assert_eq!(Bounds::sized(245, 20).tile(2, 1, 5), Bounds::sized(495, 20));
        let padded = Bounds::with_title(5, 25).added_to(&Bounds::new(0, 0, 250, 20));
        assert_eq!(padded, Bounds::new(5, 30, 260, 55));
    }
}
