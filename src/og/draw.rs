//! 线条与形状绘制。
//!
//! `imageproc` 只提供 1px 线段，粗线由“线段四边形 + 拐点圆”拼出，
//! 效果等同于圆角连接（端点保持平头）。

use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

use super::layout::PixelRect;

/// 填充轴对齐矩形，零尺寸时不绘制。
pub fn fill_rect(canvas: &mut RgbaImage, rect: PixelRect, color: Rgba<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    draw_filled_rect_mut(
        canvas,
        Rect::at(rect.x, rect.y).of_size(rect.width, rect.height),
        color,
    );
}

/// 绘制指定线宽的折线，内部拐点使用圆角连接。
pub fn draw_thick_polyline(
    canvas: &mut RgbaImage,
    points: &[(f32, f32)],
    width: u32,
    color: Rgba<u8>,
) {
    for segment in points.windows(2) {
        draw_thick_segment(canvas, segment[0], segment[1], width, color);
    }

    let radius = (width / 2) as i32;
    if radius == 0 || points.len() < 3 {
        return;
    }
    for &(x, y) in &points[1..points.len() - 1] {
        draw_filled_circle_mut(canvas, (x.round() as i32, y.round() as i32), radius, color);
    }
}

/// 绘制单条粗线段（平头）。
pub fn draw_thick_segment(
    canvas: &mut RgbaImage,
    start: (f32, f32),
    end: (f32, f32),
    width: u32,
    color: Rgba<u8>,
) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return;
    }

    let half = width as f32 / 2.0;
    let (nx, ny) = (-dy / length * half, dx / length * half);
    let corner = |x: f32, y: f32| Point::new(x.round() as i32, y.round() as i32);

    let quad = [
        corner(start.0 + nx, start.1 + ny),
        corner(end.0 + nx, end.1 + ny),
        corner(end.0 - nx, end.1 - ny),
        corner(start.0 - nx, start.1 - ny),
    ];

    // 线宽过细时四边形会退化（首尾重合），draw_polygon_mut 对此会 panic
    if width <= 1 || quad[0] == quad[3] || quad[0] == quad[1] {
        draw_line_segment_mut(canvas, start, end, color);
        return;
    }
    draw_polygon_mut(canvas, &quad, color);
}
