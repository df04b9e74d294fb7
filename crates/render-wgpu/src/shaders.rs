/// WGSL shader for instanced scene boxes and their spot-light shadow map.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    fog_color: vec4<f32>,
    // x = fog near, y = fog far, z = ambient, w = spot intensity
    params: vec4<f32>,
    spot_position: vec4<f32>,
    // xyz = direction the spot points, w = cos(cone half-angle)
    spot_direction: vec4<f32>,
    // x = shadows on, y = depth bias, z = shadow map texel size
    shadow: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var shadow_map: texture_depth_2d;
@group(1) @binding(1)
var shadow_sampler: sampler_comparison;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec3<f32>,
    @location(4) receive_shadow: f32,
};

fn instance_model(instance: InstanceInput) -> mat4x4<f32> {
    return mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
}

@vertex
fn vs_shadow(vertex: VertexInput, instance: InstanceInput) -> @builtin(position) vec4<f32> {
    let world_pos = instance_model(instance) * vec4<f32>(vertex.position, 1.0);
    return uniforms.light_view_proj * world_pos;
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = instance_model(instance);
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.emissive = instance.emissive.rgb;
    out.receive_shadow = instance.emissive.w;
    return out;
}

// 3x3 PCF over the shadow map; 1 is fully lit.
fn shadow_factor(world_position: vec3<f32>) -> f32 {
    let clip = uniforms.light_view_proj * vec4<f32>(world_position, 1.0);
    if (clip.w <= 0.0) {
        return 1.0;
    }
    let ndc = clip.xyz / clip.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5);
    if (any(uv < vec2<f32>(0.0)) || any(uv > vec2<f32>(1.0)) || ndc.z > 1.0) {
        return 1.0;
    }
    let depth = ndc.z - uniforms.shadow.y;
    var lit = 0.0;
    for (var x = -1; x <= 1; x += 1) {
        for (var y = -1; y <= 1; y += 1) {
            let offset = vec2<f32>(f32(x), f32(y)) * uniforms.shadow.z;
            lit += textureSampleCompareLevel(shadow_map, shadow_sampler, uv + offset, depth);
        }
    }
    return lit / 9.0;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let to_light = normalize(uniforms.spot_position.xyz - in.world_position);
    let cos_angle = dot(-to_light, normalize(uniforms.spot_direction.xyz));
    let cone = smoothstep(uniforms.spot_direction.w, min(uniforms.spot_direction.w + 0.02, 1.0), cos_angle);
    let shadow = mix(1.0, shadow_factor(in.world_position), uniforms.shadow.x * in.receive_shadow);
    let diffuse = max(dot(in.world_normal, to_light), 0.0) * uniforms.params.w * cone * shadow;
    // a little sky fill so faces outside the cone keep their shape
    let fill = max(dot(in.world_normal, normalize(vec3<f32>(0.3, 1.0, 0.5))), 0.0) * 0.25;
    let lighting = uniforms.params.z + diffuse + fill;
    let lit = in.color.rgb * lighting + in.emissive;

    let distance = length(in.world_position - uniforms.eye.xyz);
    let fog = clamp((distance - uniforms.params.x) / max(uniforms.params.y - uniforms.params.x, 0.001), 0.0, 1.0);
    return vec4<f32>(mix(lit, uniforms.fog_color.rgb, fog), in.color.a);
}
"#;
