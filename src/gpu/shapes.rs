//! Instance data and WGSL for the shape pipeline.
//!
//! Every [`DrawCommand`] becomes one [`ShapeInstance`]: a screen-space quad
//! whose fragment shader works out coverage for a soft disc, an anti-aliased
//! gradient line, or a full-screen wash.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::surface::{DrawCommand, DrawList};
use crate::visuals::sample_gradient;

/// `params.x` for a disc.
pub const KIND_CIRCLE: f32 = 0.0;
/// `params.x` for a line.
pub const KIND_LINE: f32 = 1.0;
/// `params.x` for a full-surface wash.
pub const KIND_RECT: f32 = 2.0;

/// One instanced quad.
///
/// | kind   | `a`    | `b` | colors            | `params`                |
/// |--------|--------|-----|-------------------|-------------------------|
/// | circle | centre | -   | `color0`          | kind, radius, blur      |
/// | line   | from   | to  | start, mid, end   | kind, width             |
/// | rect   | -      | -   | `color0`          | kind                    |
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub color0: [f32; 4],
    pub color1: [f32; 4],
    pub color2: [f32; 4],
    pub params: [f32; 4],
}

fn rgba(color: Vec3, alpha: f32) -> [f32; 4] {
    color.extend(alpha.clamp(0.0, 1.0)).to_array()
}

impl ShapeInstance {
    /// Vertex attributes matching `ShapeIn` in [`SHAPE_SHADER`].
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    /// Per-instance vertex buffer layout.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Encode one recorded draw call.
    pub fn from_command(command: &DrawCommand) -> Self {
        match command {
            DrawCommand::FillRect { color, alpha } => Self {
                color0: rgba(*color, *alpha),
                params: [KIND_RECT, 0.0, 0.0, 0.0],
                ..Self::zeroed()
            },
            DrawCommand::Circle {
                center,
                radius,
                color,
                alpha,
                blur,
            } => Self {
                a: center.to_array(),
                color0: rgba(*color, *alpha),
                params: [KIND_CIRCLE, *radius, *blur, 0.0],
                ..Self::zeroed()
            },
            DrawCommand::Line {
                from,
                to,
                stops,
                width,
            } => {
                // The shader interpolates three evenly spaced samples.
                let at = |t: f32| {
                    let (color, alpha) = sample_gradient(stops, t);
                    rgba(color, alpha)
                };
                Self {
                    a: from.to_array(),
                    b: to.to_array(),
                    color0: at(0.0),
                    color1: at(0.5),
                    color2: at(1.0),
                    params: [KIND_LINE, *width, 0.0, 0.0],
                }
            }
        }
    }
}

/// Encode a whole draw list, preserving order.
pub fn encode(list: &DrawList, out: &mut Vec<ShapeInstance>) {
    out.clear();
    out.extend(list.commands().iter().map(ShapeInstance::from_command));
}

/// Viewport uniform.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Globals {
    pub viewport: [f32; 2],
    pub _padding: [f32; 2],
}

/// Vertex and fragment stages of the shape pipeline.
pub const SHAPE_SHADER: &str = r#"
struct Globals {
    viewport: vec2<f32>,
    _padding: vec2<f32>,
};

@group(0) @binding(0) var<uniform> globals: Globals;

struct ShapeIn {
    @location(0) a: vec2<f32>,
    @location(1) b: vec2<f32>,
    @location(2) color0: vec4<f32>,
    @location(3) color1: vec4<f32>,
    @location(4) color2: vec4<f32>,
    @location(5) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) pixel: vec2<f32>,
    @location(1) @interpolate(flat) a: vec2<f32>,
    @location(2) @interpolate(flat) b: vec2<f32>,
    @location(3) @interpolate(flat) color0: vec4<f32>,
    @location(4) @interpolate(flat) color1: vec4<f32>,
    @location(5) @interpolate(flat) color2: vec4<f32>,
    @location(6) @interpolate(flat) params: vec4<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, shape: ShapeIn) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0),
    );
    let corner = corners[vertex_index];
    let kind = u32(shape.params.x + 0.5);

    var lo = vec2<f32>(0.0, 0.0);
    var hi = globals.viewport;
    if kind == 0u {
        let reach = shape.params.y + max(shape.params.z, 0.5);
        lo = shape.a - vec2<f32>(reach);
        hi = shape.a + vec2<f32>(reach);
    } else if kind == 1u {
        let reach = shape.params.y * 0.5 + 1.0;
        lo = min(shape.a, shape.b) - vec2<f32>(reach);
        hi = max(shape.a, shape.b) + vec2<f32>(reach);
    }

    let pixel = mix(lo, hi, corner);
    let ndc = vec2<f32>(
        pixel.x / globals.viewport.x * 2.0 - 1.0,
        1.0 - pixel.y / globals.viewport.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.pixel = pixel;
    out.a = shape.a;
    out.b = shape.b;
    out.color0 = shape.color0;
    out.color1 = shape.color1;
    out.color2 = shape.color2;
    out.params = shape.params;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let kind = u32(in.params.x + 0.5);
    var color = in.color0;
    var coverage = 1.0;

    if kind == 0u {
        let feather = max(in.params.z, 0.5);
        let d = distance(in.pixel, in.a);
        coverage = clamp((in.params.y + feather - d) / (2.0 * feather), 0.0, 1.0);
    } else if kind == 1u {
        let axis = in.b - in.a;
        let len_sq = dot(axis, axis);
        var t = 0.0;
        if len_sq > 0.0 {
            t = clamp(dot(in.pixel - in.a, axis) / len_sq, 0.0, 1.0);
        }
        let d = distance(in.pixel, in.a + axis * t);
        coverage = clamp(in.params.y * 0.5 + 0.5 - d, 0.0, 1.0);
        if t < 0.5 {
            color = mix(in.color0, in.color1, t * 2.0);
        } else {
            color = mix(in.color1, in.color2, t * 2.0 - 1.0);
        }
    }

    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(color.rgb, color.a * coverage);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RenderSurface;
    use crate::visuals::{connection_gradient, CONNECTION_EDGE, CONNECTION_MIDDLE};
    use glam::Vec2;

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 80);
        assert_eq!(std::mem::size_of::<Globals>(), 16);
    }

    #[test]
    fn test_encode_preserves_order_and_kinds() {
        let mut list = DrawList::new(100.0, 100.0);
        list.fill_rect(Vec3::ONE, 0.02);
        list.draw_circle(Vec2::new(10.0, 20.0), 3.0, Vec3::X, 0.4, 2.0);
        list.draw_line(Vec2::ZERO, Vec2::new(50.0, 0.0), &connection_gradient(0.1), 1.0);

        let mut out = Vec::new();
        encode(&list, &mut out);
        let kinds: Vec<f32> = out.iter().map(|s| s.params[0]).collect();
        assert_eq!(kinds, vec![KIND_RECT, KIND_CIRCLE, KIND_LINE]);

        assert_eq!(out[1].a, [10.0, 20.0]);
        assert_eq!(out[1].params[1..3], [3.0, 2.0]);
        assert_eq!(out[1].color0, [1.0, 0.0, 0.0, 0.4]);

        let close = |got: [f32; 4], want: Vec3| {
            (glam::Vec4::from_array(got) - want.extend(0.1)).abs().max_element() < 1e-6
        };
        assert!(close(out[2].color0, CONNECTION_EDGE));
        assert!(close(out[2].color1, CONNECTION_MIDDLE));
        assert!(close(out[2].color2, CONNECTION_EDGE));
    }

    #[test]
    fn test_shader_validates() {
        let module = naga::front::wgsl::parse_str(SHAPE_SHADER).expect("shape shader should parse");
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
            .validate(&module)
            .expect("shape shader should validate");
    }
}
