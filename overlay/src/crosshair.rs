//! Crosshair geometry and drawing.

use reticle_core::CrosshairConfig;

use crate::surface::{Point, Surface, SurfaceError};

/// A line segment in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// The two crosshair arms for a surface of the given dimensions.
///
/// Both are centered on the integer midpoint (`w / 2`, `h / 2`) and extend
/// `size` pixels in each direction: one horizontal, one vertical.
pub fn crosshair_segments(width: u32, height: u32, size: u32) -> [Segment; 2] {
    let cx = (width / 2) as i32;
    let cy = (height / 2) as i32;
    let s = size as i32;
    [
        Segment {
            from: Point::new(cx - s, cy),
            to: Point::new(cx + s, cy),
        },
        Segment {
            from: Point::new(cx, cy - s),
            to: Point::new(cx, cy + s),
        },
    ]
}

/// Clear the surface and draw both arms from the current config.
pub fn draw_crosshair(
    surface: &mut dyn Surface,
    config: &CrosshairConfig,
) -> Result<(), SurfaceError> {
    let (width, height) = surface.dimensions();
    surface.clear()?;
    for segment in crosshair_segments(width, height, config.size) {
        surface.draw_line(segment.from, segment.to, config.color, config.thickness)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurfaceProvider;
    use crate::headless::SurfaceEvent;
    use reticle_core::{MAX_SIZE, MIN_SIZE, Rgb};

    #[test]
    fn segments_are_centered_with_half_length_size() {
        for size in [MIN_SIZE, 20, 73, MAX_SIZE] {
            let [horizontal, vertical] = crosshair_segments(1920, 1080, size);
            let s = size as i32;
            assert_eq!(horizontal.from, Point::new(960 - s, 540));
            assert_eq!(horizontal.to, Point::new(960 + s, 540));
            assert_eq!(vertical.from, Point::new(960, 540 - s));
            assert_eq!(vertical.to, Point::new(960, 540 + s));
        }
    }

    #[test]
    fn odd_dimensions_use_integer_midpoint() {
        let [horizontal, _] = crosshair_segments(1025, 769, 10);
        assert_eq!(horizontal.from, Point::new(512 - 10, 384));
    }

    #[test]
    fn draw_clears_then_draws_both_arms() {
        let provider = HeadlessSurfaceProvider::new(800, 600);
        let mut surface = provider.create_surface().unwrap();
        let mut config = CrosshairConfig::default();
        config.set_size(30);
        config.set_thickness(4);
        config.set_color(Rgb::new(0, 255, 0));

        draw_crosshair(&mut surface, &config).unwrap();

        let events = provider.journal().events();
        assert!(matches!(events[0], SurfaceEvent::Created { .. }));
        assert!(matches!(events[1], SurfaceEvent::Cleared { .. }));
        let lines: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Line {
                    from,
                    to,
                    color,
                    thickness,
                    ..
                } => Some((*from, *to, *color, *thickness)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        let [horizontal, vertical] = crosshair_segments(800, 600, 30);
        assert_eq!(lines[0].0, horizontal.from);
        assert_eq!(lines[0].1, horizontal.to);
        assert_eq!(lines[1].0, vertical.from);
        assert_eq!(lines[1].1, vertical.to);
        for (_, _, color, thickness) in lines {
            assert_eq!(color, Rgb::new(0, 255, 0));
            assert_eq!(thickness, 4);
        }
    }
}
