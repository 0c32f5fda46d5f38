//! `wgpu` backend for the procedural kinds.
//!
//! One device per engine. Every draw goes through a single `Mutex<GpuContext>`, so frames
//! rendered on worker threads queue up for the device instead of sharing it.

use std::sync::{Arc, Mutex};

use bytemuck::{Pod, Zeroable};

use crate::animation::phase::Phase;
use crate::effects::blend::composite_overlay_in_place;
use crate::flames::options::FlameOptions;
use crate::flames::ramp::HeatRamp;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::particles::cpu::visible_particles;
use crate::particles::options::{MAX_PARTICLES, ParticleOptions, ParticleShape};
use crate::render::backend::{BackendKind, CpuBackend, FlameBackend, ParticleBackend};

const FLAME_SHADER: &str = include_str!("shaders/flames.wgsl");
const PARTICLE_SHADER: &str = include_str!("shaders/particles.wgsl");

const RAMP_BYTES: u64 = 256 * 16;
const MAX_PALETTE: usize = 16;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct FlameParams {
    size: [f32; 2],
    phase: f32,
    speed: f32,
    height: f32,
    turbulence: f32,
    scale: f32,
    octaves: u32,
    direction: u32,
    area: u32,
    fade: f32,
    brightness: f32,
    contrast: f32,
    seed: u32,
    algorithm: u32,
    _pad: u32,
}

impl FlameParams {
    fn new(o: &FlameOptions, width: u32, height: u32, phase: Phase) -> Self {
        Self {
            size: [width as f32, height as f32],
            phase: phase.value(),
            speed: o.speed as f32,
            height: o.height,
            turbulence: o.turbulence,
            scale: o.scale,
            octaves: o.octaves,
            direction: o.direction.shader_index(),
            area: o.spawn_area.shader_index(),
            fade: o.fade,
            brightness: o.brightness,
            contrast: o.contrast,
            seed: o.seed,
            algorithm: algorithm_index(o),
            _pad: 0,
        }
    }
}

fn algorithm_index(o: &FlameOptions) -> u32 {
    use crate::flames::options::FlameAlgorithm as A;
    match o.algorithm {
        A::Classic => 0,
        A::Realistic => 1,
        A::Plasma => 2,
        A::Dragon => 3,
        A::Wispy => 4,
        A::Inferno => 5,
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct GpuParticle {
    center: [f32; 2],
    radius: f32,
    alpha: f32,
    color: [f32; 3],
    rotation: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ParticleParams {
    size: [f32; 2],
    count: u32,
    shape: u32,
    blend: u32,
    palette_len: u32,
    dither: f32,
    _pad: u32,
    palette: [[f32; 4]; MAX_PALETTE],
}

struct Program {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    params: wgpu::Buffer,
    data: wgpu::Buffer,
}

struct Target {
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    bytes_per_row: u32,
}

struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    flames: Program,
    particles: Program,
    target: Option<Target>,
}

/// GPU implementation of [`FlameBackend`] and [`ParticleBackend`].
///
/// Particle layers with a decodable custom sprite are delegated to the shared CPU backend.
pub struct GpuBackend {
    ctx: Mutex<GpuContext>,
    cpu: Arc<CpuBackend>,
    adapter: String,
}

impl std::fmt::Debug for GpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuBackend")
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

impl GpuBackend {
    /// Create the device and compile both programs. Any failure means "no GPU".
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn probe(cpu: Arc<CpuBackend>) -> RetrofxResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => RetrofxError::backend("no gpu adapter available"),
            other => RetrofxError::backend(format!("wgpu request_adapter failed: {other:?}")),
        })?;
        let adapter_name = adapter.get_info().name;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("retrofx_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| RetrofxError::backend(format!("wgpu request_device failed: {e:?}")))?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let flames = build_program(&device, "flames", FLAME_SHADER, size_of::<FlameParams>() as u64, RAMP_BYTES);
        let particles = build_program(
            &device,
            "particles",
            PARTICLE_SHADER,
            size_of::<ParticleParams>() as u64,
            u64::from(MAX_PARTICLES) * size_of::<GpuParticle>() as u64,
        );
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RetrofxError::backend(format!("gpu program compile failed: {err}")));
        }

        tracing::debug!(adapter = %adapter_name, "gpu backend ready");
        Ok(Self {
            ctx: Mutex::new(GpuContext {
                device,
                queue,
                flames,
                particles,
                target: None,
            }),
            cpu,
            adapter: adapter_name,
        })
    }

    /// Name reported by the adapter.
    pub fn adapter_name(&self) -> &str {
        &self.adapter
    }

    fn lock(&self) -> RetrofxResult<std::sync::MutexGuard<'_, GpuContext>> {
        self.ctx
            .lock()
            .map_err(|_| RetrofxError::backend("gpu context poisoned by an earlier failure"))
    }
}

impl FlameBackend for GpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn render_flames(
        &self,
        src: &FrameRGBA,
        opts: &FlameOptions,
        intensity: f32,
        phase: Phase,
    ) -> RetrofxResult<FrameRGBA> {
        let o = opts.sanitized();
        let mut out = src.clone();
        if intensity <= 0.0 || src.is_empty() {
            return Ok(out);
        }
        let params = FlameParams::new(&o, src.width, src.height, phase);
        let ramp: Vec<[f32; 4]> = HeatRamp::new(o.color)
            .lut()
            .into_iter()
            .map(|px| px.map(|c| f32::from(c) / 255.0))
            .collect();

        let overlay = {
            let mut ctx = self.lock()?;
            let ctx = &mut *ctx;
            ctx.queue.write_buffer(&ctx.flames.params, 0, bytemuck::bytes_of(&params));
            ctx.queue.write_buffer(&ctx.flames.data, 0, bytemuck::cast_slice(&ramp));
            ctx.draw(Which::Flames, src.width, src.height)?
        };
        composite_overlay_in_place(&mut out, &overlay, o.blend, intensity)?;
        Ok(out)
    }
}

impl ParticleBackend for GpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn render_particles(
        &self,
        src: &FrameRGBA,
        opts: &ParticleOptions,
        intensity: f32,
        phase: Phase,
    ) -> RetrofxResult<FrameRGBA> {
        let o = opts.sanitized();
        if o.shape == ParticleShape::Custom && self.cpu.sprite_for(&o).is_some() {
            return self.cpu.render_particles(src, opts, intensity, phase);
        }
        let mut out = src.clone();
        if o.count == 0 || intensity <= 0.0 || src.is_empty() {
            return Ok(out);
        }

        let data: Vec<GpuParticle> = visible_particles(&o, src.width, src.height, phase, MAX_PARTICLES)
            .into_iter()
            .map(|p| GpuParticle {
                center: [p.x, p.y],
                radius: p.radius,
                alpha: p.alpha.clamp(0.0, 1.0),
                color: p.color.to_f32(),
                rotation: p.rotation,
            })
            .collect();
        let colors = o.dither_palette.colors();
        let mut palette = [[0.0f32; 4]; MAX_PALETTE];
        for (slot, c) in palette.iter_mut().zip(colors) {
            let [r, g, b] = c.to_f32();
            *slot = [r, g, b, 1.0];
        }
        let params = ParticleParams {
            size: [src.width as f32, src.height as f32],
            count: data.len() as u32,
            shape: o.shape.shader_index(),
            blend: o.blend.shader_index(),
            palette_len: colors.len().min(MAX_PALETTE) as u32,
            dither: o.dither_intensity,
            _pad: 0,
            palette,
        };

        let overlay = {
            let mut ctx = self.lock()?;
            let ctx = &mut *ctx;
            ctx.queue.write_buffer(&ctx.particles.params, 0, bytemuck::bytes_of(&params));
            if !data.is_empty() {
                ctx.queue.write_buffer(&ctx.particles.data, 0, bytemuck::cast_slice(&data));
            }
            ctx.draw(Which::Particles, src.width, src.height)?
        };
        composite_overlay_in_place(&mut out, &overlay, o.blend, intensity)?;
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug)]
enum Which {
    Flames,
    Particles,
}

impl GpuContext {
    fn ensure_target(&mut self, width: u32, height: u32) -> RetrofxResult<()> {
        if self
            .target
            .as_ref()
            .is_some_and(|t| t.width == width && t.height == height)
        {
            return Ok(());
        }
        let max = self.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(RetrofxError::backend(format!(
                "{width}x{height} exceeds the gpu texture limit {max}"
            )));
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("retrofx_overlay"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row_unpadded = width
            .checked_mul(4)
            .ok_or_else(|| RetrofxError::backend("render target width overflow"))?;
        let bytes_per_row = align_to(bytes_per_row_unpadded, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let buffer_size = u64::from(bytes_per_row)
            .checked_mul(u64::from(height))
            .ok_or_else(|| RetrofxError::backend("readback buffer size overflow"))?;
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("retrofx_readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.target = Some(Target {
            width,
            height,
            texture,
            view,
            readback,
            bytes_per_row,
        });
        Ok(())
    }

    /// Run one full-screen pass and read the premultiplied overlay back.
    fn draw(&mut self, which: Which, width: u32, height: u32) -> RetrofxResult<Vec<u8>> {
        self.ensure_target(width, height)?;
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| RetrofxError::backend("gpu render target not initialized"))?;
        let program = match which {
            Which::Flames => &self.flames,
            Which::Particles => &self.particles,
        };

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("retrofx_bg"),
            layout: &program.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: program.params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: program.data.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("retrofx_encoder"),
            });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("retrofx_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rp.set_pipeline(&program.pipeline);
            rp.set_bind_group(0, &bind_group, &[]);
            rp.draw(0..3, 0..1);
        }
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &target.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(target.bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RetrofxError::backend(format!("gpu {which:?} pass failed: {err}")));
        }

        let slice = target.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RetrofxError::backend(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| RetrofxError::backend("readback channel closed"))?
            .map_err(|e| RetrofxError::backend(format!("readback map failed: {e:?}")))?;

        let mapped = slice.get_mapped_range();
        let row_bytes = (width as usize) * 4;
        let padded_row_bytes = target.bytes_per_row as usize;
        let mut out = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * padded_row_bytes;
            out.extend_from_slice(&mapped[start..start + row_bytes]);
        }
        drop(mapped);
        target.readback.unmap();
        Ok(out)
    }
}

fn build_program(device: &wgpu::Device, name: &str, source: &str, params_size: u64, data_size: u64) -> Program {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(name),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(name),
        bind_group_layouts: &[&layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(name),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: wgpu::TextureFormat::Rgba8Unorm,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    let params = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(name),
        size: params_size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let data = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(name),
        size: data_size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    Program {
        pipeline,
        layout,
        params,
        data,
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

#[cfg(test)]
#[path = "../../tests/unit/render/gpu.rs"]
mod tests;
