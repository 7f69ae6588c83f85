//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::ScreenRect;

/// Two triangles covering `rect`, in screen pixels
pub fn quad(rect: ScreenRect, color: [f32; 4]) -> [Vertex; 6] {
    let min = Vec2::new(rect.x as f32, rect.y as f32);
    let max = min + Vec2::new(rect.w as f32, rect.h as f32);

    let tl = Vertex::new(min.x, min.y, color);
    let tr = Vertex::new(max.x, min.y, color);
    let bl = Vertex::new(min.x, max.y, color);
    let br = Vertex::new(max.x, max.y, color);

    [tl, bl, br, tl, br, tr]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_rect() {
        let rect = ScreenRect { x: 20, y: 40, w: 20, h: 10 };
        let verts = quad(rect, [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 50.0);
    }
}
