//! WGSL reflection via naga.

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::shader::{ScalarKind, ShaderFunction, ShaderSource, ShaderStage, StageLocation};
use crate::error::{InitResult, InitializationError};

/// naga capabilities a device with `features` can run.
///
/// Unmapped features grant nothing, so a shader needing them fails reflection
/// instead of device-side validation.
pub fn shader_capabilities(features: wgpu::Features) -> Capabilities {
    let mut caps = Capabilities::empty();
    if features.contains(wgpu::Features::SHADER_F64) {
        caps |= Capabilities::FLOAT64;
    }
    if features.contains(wgpu::Features::SHADER_PRIMITIVE_INDEX) {
        caps |= Capabilities::PRIMITIVE_INDEX;
    }
    caps
}

/// Parses and validates `source`, returning every entry point it declares.
pub fn reflect_wgsl(source: &ShaderSource, capabilities: Capabilities) -> InitResult<Vec<ShaderFunction>> {
    let unavailable = |reason: String| InitializationError::ShaderLibraryUnavailable {
        library: source.label.to_string(),
        reason,
    };

    let module = naga::front::wgsl::parse_str(&source.wgsl)
        .map_err(|e| unavailable(e.emit_to_string(&source.wgsl)))?;

    let info = Validator::new(ValidationFlags::all(), capabilities)
        .validate(&module)
        .map_err(|e| unavailable(e.to_string()))?;

    let functions = module
        .entry_points
        .iter()
        .enumerate()
        .map(|(i, ep)| {
            let stage = match ep.stage {
                naga::ShaderStage::Vertex => ShaderStage::Vertex,
                naga::ShaderStage::Fragment => ShaderStage::Fragment,
                _ => ShaderStage::Other,
            };

            let mut inputs = Vec::new();
            let mut outputs = Vec::new();
            match stage {
                ShaderStage::Vertex => {
                    for arg in &ep.function.arguments {
                        collect_locations(&module, arg.binding.as_ref(), arg.ty, &mut inputs);
                    }
                }
                ShaderStage::Fragment => {
                    if let Some(result) = &ep.function.result {
                        collect_locations(&module, result.binding.as_ref(), result.ty, &mut outputs);
                    }
                }
                ShaderStage::Other => {}
            }
            inputs.sort_unstable_by_key(|l| l.location);
            outputs.sort_unstable_by_key(|l| l.location);

            let usage = info.get_entry_point(i);
            let mut resource_bindings: Vec<(u32, u32)> = module
                .global_variables
                .iter()
                .filter(|(handle, _)| !usage[*handle].is_empty())
                .filter_map(|(_, var)| var.binding.as_ref().map(|b| (b.group, b.binding)))
                .collect();
            resource_bindings.sort_unstable();

            ShaderFunction {
                name: ep.name.clone(),
                stage,
                inputs,
                outputs,
                resource_bindings,
            }
        })
        .collect();

    Ok(functions)
}

fn collect_locations(
    module: &naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    out: &mut Vec<StageLocation>,
) {
    match binding {
        Some(binding) => push_location(module, binding, ty, out),
        // Struct value: bindings live on the members.
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    if let Some(binding) = &m.binding {
                        push_location(module, binding, m.ty, out);
                    }
                }
            }
        }
    }
}

fn push_location(
    module: &naga::Module,
    binding: &naga::Binding,
    ty: naga::Handle<naga::Type>,
    out: &mut Vec<StageLocation>,
) {
    let naga::Binding::Location { location, .. } = binding else { return };

    let (components, scalar) = match &module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => (1, *scalar),
        naga::TypeInner::Vector { size, scalar } => (*size as u32, *scalar),
        _ => return,
    };

    let kind = match scalar.kind {
        naga::ScalarKind::Float | naga::ScalarKind::AbstractFloat => ScalarKind::Float,
        naga::ScalarKind::Sint | naga::ScalarKind::AbstractInt => ScalarKind::Sint,
        naga::ScalarKind::Uint => ScalarKind::Uint,
        naga::ScalarKind::Bool => ScalarKind::Bool,
    };

    out.push(StageLocation {
        location: *location,
        components,
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> Capabilities {
        shader_capabilities(wgpu::Features::empty())
    }

    #[test]
    fn colored_library_exposes_both_entry_points() {
        let fns = reflect_wgsl(&ShaderSource::colored(), baseline()).unwrap();
        let vs = fns.iter().find(|f| f.name == "vertexShader").unwrap();
        let fs = fns.iter().find(|f| f.name == "fragmentShader").unwrap();

        assert_eq!(vs.stage, ShaderStage::Vertex);
        assert_eq!(fs.stage, ShaderStage::Fragment);
        assert_eq!(vs.inputs, vec![StageLocation::float(0, 2), StageLocation::float(1, 4)]);
        assert!(vs.outputs.is_empty());
        assert_eq!(fs.outputs, vec![StageLocation::float(0, 4)]);
        assert!(fs.resource_bindings.is_empty());
    }

    #[test]
    fn textured_fragment_uses_group_zero_resources() {
        let fns = reflect_wgsl(&ShaderSource::textured(), baseline()).unwrap();
        let vs = fns.iter().find(|f| f.name == "vertexShader").unwrap();
        let fs = fns.iter().find(|f| f.name == "fragmentShader").unwrap();

        assert_eq!(vs.inputs.len(), 3);
        assert_eq!(vs.inputs[2], StageLocation::float(2, 2));
        assert!(vs.resource_bindings.is_empty());
        assert_eq!(fs.resource_bindings, vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn integer_inputs_keep_their_kind() {
        let src = ShaderSource::new(
            "ints",
            r#"
            @vertex fn vertexShader(@location(0) p: vec2<i32>, @location(1) c: vec4<u32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(vec2<f32>(p), f32(c.x), 1.0);
            }
            "#,
        );
        let fns = reflect_wgsl(&src, baseline()).unwrap();
        assert_eq!(
            fns[0].inputs,
            vec![
                StageLocation { location: 0, components: 2, kind: ScalarKind::Sint },
                StageLocation { location: 1, components: 4, kind: ScalarKind::Uint },
            ]
        );
    }

    #[test]
    fn struct_fragment_outputs_are_collected() {
        let src = ShaderSource::new(
            "targets",
            r#"
            struct Out {
                @location(1) extra: vec4<f32>,
                @location(0) color: vec4<f32>,
            }
            @fragment fn fragmentShader() -> Out {
                return Out(vec4<f32>(0.0), vec4<f32>(1.0));
            }
            "#,
        );
        let fns = reflect_wgsl(&src, baseline()).unwrap();
        assert_eq!(fns[0].outputs, vec![StageLocation::float(0, 4), StageLocation::float(1, 4)]);
    }

    #[test]
    fn fragment_without_result_has_no_outputs() {
        let src = ShaderSource::new("silent", "@fragment fn fragmentShader() {}");
        let fns = reflect_wgsl(&src, baseline()).unwrap();
        assert!(fns[0].outputs.is_empty());
    }

    #[test]
    fn capabilities_follow_device_features() {
        assert!(baseline().is_empty());
        let caps = shader_capabilities(wgpu::Features::SHADER_F64 | wgpu::Features::SHADER_PRIMITIVE_INDEX);
        assert!(caps.contains(Capabilities::FLOAT64));
        assert!(caps.contains(Capabilities::PRIMITIVE_INDEX));
    }

    #[test]
    fn f64_needs_device_support() {
        let src = ShaderSource::new(
            "double",
            r#"
            @fragment fn fragmentShader() -> @location(0) vec4<f32> {
                let x: f64 = 1.0lf;
                return vec4<f32>(f32(x));
            }
            "#,
        );
        let err = reflect_wgsl(&src, baseline()).unwrap_err();
        assert!(matches!(
            err,
            InitializationError::ShaderLibraryUnavailable { ref library, .. } if library == "double"
        ));
    }

    #[test]
    fn malformed_source_is_library_unavailable() {
        let src = ShaderSource::new("broken", "fn vertexShader( {");
        let err = reflect_wgsl(&src, baseline()).unwrap_err();
        assert!(matches!(
            err,
            InitializationError::ShaderLibraryUnavailable { ref library, .. } if library == "broken"
        ));
    }
}
