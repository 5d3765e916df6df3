//! Shader program validation and module creation.
//!
//! Source is parsed and validated on the CPU first so that a broken program
//! surfaces as a [`ShaderError`] instead of a device-level validation panic.

use naga::ShaderStage;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use thiserror::Error;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Built-in program: per-face MVP uniform plus one sampled texture.
pub const DEFAULT_SHADER: &str = include_str!("shaders/cylinder.wgsl");

#[derive(Debug, Error)]
pub enum ShaderError {
    /// The source did not parse or did not validate.
    #[error("shader compilation failed:\n{message}")]
    Compile { message: String },

    /// The program compiled but cannot be linked into a render pipeline.
    #[error("shader program has no {stage} entry point named `{entry_point}`")]
    Link {
        stage: &'static str,
        entry_point: &'static str,
    },
}

/// Parses, validates and checks the entry points of a WGSL program.
pub fn validate(source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        message: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            message: e.emit_to_string(source),
        })?;

    require_entry_point(&module, ShaderStage::Vertex, "vertex", VERTEX_ENTRY)?;
    require_entry_point(&module, ShaderStage::Fragment, "fragment", FRAGMENT_ENTRY)?;

    Ok(module)
}

fn require_entry_point(
    module: &naga::Module,
    stage: ShaderStage,
    stage_name: &'static str,
    entry_point: &'static str,
) -> Result<(), ShaderError> {
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage && ep.name == entry_point);

    if found {
        Ok(())
    } else {
        Err(ShaderError::Link {
            stage: stage_name,
            entry_point,
        })
    }
}

/// Validates `source` and creates the GPU module from it.
pub fn create_module(
    device: &wgpu::Device,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let module = validate(source)?;
    log::debug!(
        "cylinder shader validated ({} entry points)",
        module.entry_points.len()
    );

    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("carousel cylinder shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_program_is_valid() {
        let module = validate(DEFAULT_SHADER).expect("built-in shader");
        assert_eq!(module.entry_points.len(), 2);
    }

    #[test]
    fn syntax_error_is_compile_error() {
        let err = validate("fn broken( {").unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn type_error_is_compile_error() {
        let src = r#"
            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                let x: f32 = true;
                return vec4<f32>(x);
            }
        "#;
        assert!(matches!(validate(src), Err(ShaderError::Compile { .. })));
    }

    #[test]
    fn missing_fragment_stage_is_link_error() {
        let src = r#"
            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                return vec4<f32>(0.0, 0.0, 0.0, 1.0);
            }
        "#;
        match validate(src) {
            Err(ShaderError::Link { entry_point, .. }) => assert_eq!(entry_point, FRAGMENT_ENTRY),
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_entry_name_is_link_error() {
        let src = DEFAULT_SHADER.replace("fn vs_main", "fn vertex_main");
        match validate(&src) {
            Err(ShaderError::Link { entry_point, .. }) => assert_eq!(entry_point, VERTEX_ENTRY),
            other => panic!("expected link error, got {other:?}"),
        }
    }
}
