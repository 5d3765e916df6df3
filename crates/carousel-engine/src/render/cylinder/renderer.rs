use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use image::DynamicImage;

use crate::render::{RenderCtx, RenderTarget};

use super::geometry::{
    CylinderLayout, FaceDraw, QUAD_POSITIONS, QUAD_TEXCOORDS, QUAD_VERTEX_COUNT,
};
use super::shader::{self, ShaderError, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::texture;
use super::MeshError;

/// Per-face uniform: the full model-view-projection matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FaceUniform {
    mvp: [[f32; 4]; 4],
}

impl FaceUniform {
    fn new(mvp: Mat4) -> Self {
        Self { mvp: mvp.to_cols_array_2d() }
    }
}

/// GPU resources owned by one face.
struct FaceRecord {
    _texture: wgpu::Texture,
    _view: wgpu::TextureView,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Renders the faceted cylinder: one draw call per face.
///
/// Lifecycle: [`initialize`](Self::initialize) once the surface exists,
/// [`load_textures`](Self::load_textures) exactly once, then
/// [`draw`](Self::draw) every frame.
pub struct CylinderRenderer {
    layout: CylinderLayout,

    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipeline_formats: (wgpu::TextureFormat, wgpu::TextureFormat),
    pipeline: wgpu::RenderPipeline,

    sampler: wgpu::Sampler,

    positions_vbo: wgpu::Buffer,
    texcoords_vbo: wgpu::Buffer,

    texture_subsample: u32,
    faces: Vec<FaceRecord>,
}

impl CylinderRenderer {
    /// Builds the vertex buffers, compiles `shader_source` and creates the
    /// pipeline. Compile and link failures are fatal.
    pub fn initialize(
        ctx: &RenderCtx<'_>,
        layout: CylinderLayout,
        shader_source: &str,
    ) -> Result<Self, ShaderError> {
        let shader = shader::create_module(ctx.device, shader_source)?;

        let positions_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("carousel cylinder positions"),
            contents: bytemuck::cast_slice(&QUAD_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let texcoords_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("carousel cylinder texcoords"),
            contents: bytemuck::cast_slice(&QUAD_TEXCOORDS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("carousel cylinder bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: wgpu::BufferSize::new(
                                    std::mem::size_of::<FaceUniform>() as u64,
                                ),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("carousel cylinder pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline_formats = (ctx.surface_format, ctx.depth_format);
        let pipeline = create_pipeline(ctx.device, &shader, &pipeline_layout, pipeline_formats);

        let sampler = ctx.device.create_sampler(&texture::face_sampler_descriptor());

        log::info!(
            "cylinder initialized: {} faces, radius {:.3}",
            layout.faces(),
            layout.radius()
        );

        Ok(Self {
            layout,
            shader,
            bind_group_layout,
            pipeline_layout,
            pipeline_formats,
            pipeline,
            sampler,
            positions_vbo,
            texcoords_vbo,
            texture_subsample: 1,
            faces: Vec::new(),
        })
    }

    #[inline]
    pub fn layout(&self) -> CylinderLayout {
        self.layout
    }

    #[inline]
    pub fn textures_loaded(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Divides each face image side by `factor` before upload. Takes effect
    /// on the next [`load_textures`](Self::load_textures).
    pub fn set_texture_subsample(&mut self, factor: u32) {
        self.texture_subsample = factor.max(1);
    }

    /// Uploads one image per face, in face order. May be called once.
    ///
    /// Each image is consumed; CPU pixels are dropped as soon as the upload
    /// has been queued.
    pub fn load_textures(
        &mut self,
        ctx: &RenderCtx<'_>,
        images: Vec<DynamicImage>,
    ) -> Result<(), MeshError> {
        check_load(&self.layout, self.textures_loaded(), images.len())?;

        let max_dim = ctx.device.limits().max_texture_dimension_2d;
        let subsample = self.texture_subsample;

        // Prepare everything first so a bad image leaves no partial state.
        let prepared = images
            .into_iter()
            .enumerate()
            .map(|(face, img)| texture::prepare_face_image(face, img, subsample, max_dim))
            .collect::<Result<Vec<_>, _>>()?;

        let mut faces = Vec::with_capacity(prepared.len());
        for (face, pixels) in prepared.into_iter().enumerate() {
            let (tex, view) = texture::upload_face_texture(ctx, face, &pixels);
            log::debug!("face {face}: uploaded {}x{}", pixels.width(), pixels.height());
            drop(pixels);

            faces.push(self.create_face_record(ctx, face, tex, view));
        }

        self.faces = faces;
        log::info!("cylinder textures loaded ({} faces)", self.faces.len());
        Ok(())
    }

    /// Draws every face in order into `target`, loading existing color and
    /// depth. Returns the number of draw calls issued.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_projection: Mat4,
        angle: f32,
    ) -> Result<usize, MeshError> {
        let plan = draw_plan(&self.layout, self.textures_loaded(), view_projection, angle)?;

        self.ensure_pipeline(ctx);

        for d in &plan {
            let u = FaceUniform::new(d.mvp);
            ctx.queue
                .write_buffer(&self.faces[d.face].uniform, 0, bytemuck::bytes_of(&u));
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("carousel cylinder pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.positions_vbo.slice(..));
        rpass.set_vertex_buffer(1, self.texcoords_vbo.slice(..));

        for d in &plan {
            rpass.set_bind_group(0, &self.faces[d.face].bind_group, &[]);
            rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }

        log::trace!("cylinder: {} draws at angle {angle}", plan.len());
        Ok(plan.len())
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let formats = (ctx.surface_format, ctx.depth_format);
        if self.pipeline_formats == formats {
            return;
        }
        log::debug!("cylinder: target formats changed to {formats:?}; rebuilding pipeline");
        self.pipeline = create_pipeline(ctx.device, &self.shader, &self.pipeline_layout, formats);
        self.pipeline_formats = formats;
    }

    fn create_face_record(
        &self,
        ctx: &RenderCtx<'_>,
        face: usize,
        texture: wgpu::Texture,
        view: wgpu::TextureView,
    ) -> FaceRecord {
        let uniform = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("carousel face ubo"),
            size: std::mem::size_of::<FaceUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let label = format!("carousel face {face} bind group");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        FaceRecord {
            _texture: texture,
            _view: view,
            uniform,
            bind_group,
        }
    }
}

/// Rejects a second upload and an image count that differs from the face count.
fn check_load(layout: &CylinderLayout, loaded: bool, images: usize) -> Result<(), MeshError> {
    if loaded {
        return Err(MeshError::TexturesAlreadyLoaded);
    }
    if images != layout.faces() {
        return Err(MeshError::FaceCountMismatch {
            expected: layout.faces(),
            actual: images,
        });
    }
    Ok(())
}

/// One entry per draw call `draw` will issue, or `TexturesNotLoaded`.
fn draw_plan(
    layout: &CylinderLayout,
    loaded: bool,
    view_projection: Mat4,
    angle: f32,
) -> Result<Vec<FaceDraw>, MeshError> {
    if !loaded {
        return Err(MeshError::TexturesNotLoaded);
    }
    Ok(layout.plan_frame(view_projection, angle))
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    (color_format, depth_format): (wgpu::TextureFormat, wgpu::TextureFormat),
) -> wgpu::RenderPipeline {
    const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const TEXCOORD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

    let buffers = [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEXCOORD_ATTRS,
        },
    ];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("carousel cylinder pipeline"),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Faces are visible from both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_uniform_is_column_major_mat4() {
        assert_eq!(std::mem::size_of::<FaceUniform>(), 64);

        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let u = FaceUniform::new(m);
        assert_eq!(u.mvp[3], [1.0, 2.0, 3.0, 1.0]);
    }

    // ── lifecycle guards ─────────────────────────────────────────────────

    fn layout(faces: usize) -> CylinderLayout {
        CylinderLayout::new(faces).unwrap()
    }

    #[test]
    fn first_load_with_matching_count_is_accepted() {
        assert!(check_load(&layout(8), false, 8).is_ok());
    }

    #[test]
    fn second_load_rejected() {
        assert!(matches!(
            check_load(&layout(8), true, 8),
            Err(MeshError::TexturesAlreadyLoaded)
        ));
    }

    #[test]
    fn second_load_reported_before_count() {
        assert!(matches!(
            check_load(&layout(8), true, 3),
            Err(MeshError::TexturesAlreadyLoaded)
        ));
    }

    #[test]
    fn wrong_image_count_rejected() {
        for images in [0, 7, 9] {
            match check_load(&layout(8), false, images) {
                Err(MeshError::FaceCountMismatch { expected, actual }) => {
                    assert_eq!(expected, 8);
                    assert_eq!(actual, images);
                }
                other => panic!("expected mismatch for {images}, got {other:?}"),
            }
        }
    }

    #[test]
    fn draw_before_load_rejected() {
        assert!(matches!(
            draw_plan(&layout(8), false, Mat4::IDENTITY, 0.0),
            Err(MeshError::TexturesNotLoaded)
        ));
    }

    #[test]
    fn draw_issues_one_call_per_face() {
        for faces in [3, 8, 12] {
            let plan = draw_plan(&layout(faces), true, Mat4::IDENTITY, 42.0).unwrap();
            assert_eq!(plan.len(), faces);

            let order: Vec<usize> = plan.iter().map(|d| d.face).collect();
            assert_eq!(order, (0..faces).collect::<Vec<_>>());
        }
    }
}
