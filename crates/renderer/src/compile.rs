use std::borrow::Cow;
use std::fmt::Write as _;

use wgpu::naga::ShaderStage;

use crate::error::{ProgramError, ShaderStageKind};
use crate::types::TEXTURE_SLOT_CAPACITY;

/// Compiles one GLSL stage inside a validation error scope so a bad shader
/// surfaces as a [`ProgramError`] instead of an uncaptured device error.
pub(crate) fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStageKind,
    source: String,
) -> Result<wgpu::ShaderModule, ProgramError> {
    let (label, naga_stage) = match stage {
        ShaderStageKind::Vertex => ("watercolor vertex", ShaderStage::Vertex),
        ShaderStageKind::Fragment => ("watercolor fragment", ShaderStage::Fragment),
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source),
            stage: naga_stage,
            defines: &[],
        },
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(ProgramError::Compile {
            stage,
            diagnostic: err.to_string(),
        });
    }
    Ok(module)
}

pub(crate) fn vertex_source() -> String {
    VERTEX_SHADER_GLSL.to_string()
}

/// Assembles the watercolor fragment shader.
///
/// The texture bindings and the slot-selection cascade are generated from
/// [`TEXTURE_SLOT_CAPACITY`]; the GLSL frontend has no sampler arrays, so
/// each slot is a separate texture/sampler pair on bind group 1.
pub(crate) fn fragment_source() -> String {
    let mut bindings = String::new();
    let mut cascade = String::new();
    for slot in 0..TEXTURE_SLOT_CAPACITY {
        let _ = writeln!(
            bindings,
            "layout(set = 1, binding = {texture}) uniform texture2D artwork{slot}_texture;\n\
             layout(set = 1, binding = {sampler}) uniform sampler artwork{slot}_sampler;",
            texture = slot * 2,
            sampler = slot * 2 + 1,
        );
        let keyword = if slot == 0 { "if" } else { "} else if" };
        let _ = writeln!(
            cascade,
            "    {keyword} (index == {slot}) {{\n        \
             return textureLod(sampler2D(artwork{slot}_texture, artwork{slot}_sampler), uv, 0.0);"
        );
    }
    cascade.push_str("    }\n");

    format!("{FRAGMENT_HEADER}\n{bindings}\n{NOISE_GLSL}\nvec4 sample_artwork(int index, vec2 uv) {{\n{cascade}    return vec4(0.0);\n}}\n\n{FRAGMENT_MAIN}")
}

const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 a_position;
layout(location = 0) out vec2 v_texCoord;

void main() {
    v_texCoord = a_position * 0.5 + 0.5;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

/// Must match [`crate::uniforms::WatercolorUniforms`].
const FRAGMENT_HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_texCoord;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform WatercolorParams {
    vec2 resolution;
    float time;
    float aspect;
    vec2 mouse;
    vec2 grid_dims;
    float slot_count;
} params;
";

/// 2D simplex noise (Ashima Arts / Ian McEwan).
const NOISE_GLSL: &str = r"const vec4 SIMPLEX_C = vec4(
    0.211324865405187,
    0.366025403784439,
    -0.577350269189626,
    0.024390243902439
);

vec3 permute(vec3 x) {
    return mod(((x * 34.0) + 1.0) * x, 289.0);
}

float snoise(vec2 v) {
    vec2 i = floor(v + dot(v, SIMPLEX_C.yy));
    vec2 x0 = v - i + dot(i, SIMPLEX_C.xx);
    vec2 i1 = (x0.x > x0.y) ? vec2(1.0, 0.0) : vec2(0.0, 1.0);
    vec4 x12 = x0.xyxy + SIMPLEX_C.xxzz;
    x12 = vec4(x12.xy - i1, x12.zw);
    i = mod(i, 289.0);
    vec3 p = permute(permute(i.y + vec3(0.0, i1.y, 1.0)) + i.x + vec3(0.0, i1.x, 1.0));
    vec3 m = max(0.5 - vec3(dot(x0, x0), dot(x12.xy, x12.xy), dot(x12.zw, x12.zw)), 0.0);
    m = m * m;
    m = m * m;
    vec3 x = 2.0 * fract(p * SIMPLEX_C.www) - 1.0;
    vec3 h = abs(x) - 0.5;
    vec3 ox = floor(x + 0.5);
    vec3 a0 = x - ox;
    m = m * (1.79284291400159 - 0.85373472095314 * (a0 * a0 + h * h));
    vec3 g = vec3(a0.x * x0.x + h.x * x0.y, a0.yz * x12.xz + h.yz * x12.yw);
    return 130.0 * dot(m, g);
}
";

const FRAGMENT_MAIN: &str = r"void main() {
    // Grid row 0 is the top of the canvas.
    vec2 st = vec2(v_texCoord.x, 1.0 - v_texCoord.y);
    vec2 uv = vec2(st.x * params.aspect, st.y);

    // The pointer has a bottom-left origin, like v_texCoord.
    vec2 pointer = params.mouse / params.resolution;
    vec2 pointer_uv = vec2(pointer.x * params.aspect, pointer.y);
    vec2 frag_uv = vec2(v_texCoord.x * params.aspect, v_texCoord.y);
    float ripple = 1.0 - smoothstep(0.0, 0.2, distance(frag_uv, pointer_uv));
    float displacement = snoise(uv * 5.0 + params.time * 0.2) * 0.01
        + ripple * snoise(uv * 15.0 - params.time) * 0.03;
    vec2 distorted_uv = uv + vec2(displacement);

    float paper_noise = snoise(distorted_uv * 20.0) * 0.5 + 0.5;
    vec3 paper_color = vec3(0.051) + paper_noise * 0.02;

    vec2 grid_uv = fract(st * params.grid_dims);
    vec2 cell_id = floor(st * params.grid_dims);
    int index = int(cell_id.y * params.grid_dims.x + cell_id.x);
    vec2 distorted_grid_uv = fract((st + vec2(displacement)) * params.grid_dims);
    vec3 art_color = sample_artwork(index, distorted_grid_uv).rgb;
    float bound = (index < int(params.slot_count)) ? 1.0 : 0.0;

    float edge_x = smoothstep(0.0, 0.05, grid_uv.x) - smoothstep(0.95, 1.0, grid_uv.x);
    float edge_y = smoothstep(0.0, 0.05, grid_uv.y) - smoothstep(0.95, 1.0, grid_uv.y);
    float edge_softness = edge_x * edge_y * (1.0 - ripple * 0.5) * bound;

    outColor = vec4(mix(paper_color, art_color, edge_softness), 1.0);
}
";
