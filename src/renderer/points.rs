//! Point-cloud rendering - instance upload and draw, every frame

use crate::classifier::GestureKind;
use crate::cloud::PointCloud;

use super::state::GPU_STATE;

/// Deep-space background
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.012,
    g: 0.012,
    b: 0.035,
    a: 1.0,
};

/// One particle as seen by the GPU: expanded to a billboard quad in the
/// vertex shader.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl ParticleInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32,
        2 => Float32x3
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Build instance data from the integrator's output buffers.
/// Zero-size particles (transparent source pixels) are skipped.
fn build_instances(cloud: &PointCloud) -> Vec<ParticleInstance> {
    let mut instances = Vec::with_capacity(cloud.count);
    for i in 0..cloud.count {
        let size = cloud.size[i];
        if size <= 0.0 {
            continue;
        }
        let j = i * 3;
        instances.push(ParticleInstance {
            position: [cloud.current[j], cloud.current[j + 1], cloud.current[j + 2]],
            size,
            color: [cloud.color[j], cloud.color[j + 1], cloud.color[j + 2]],
            _pad: 0.0,
        });
    }
    instances
}

/// Render one frame of the point cloud
pub fn render_cloud(cloud: &PointCloud, gesture: GestureKind, dt: f32) {
    GPU_STATE.with(|state_cell| {
        let mut state_ref = state_cell.borrow_mut();
        let state = match state_ref.as_mut() {
            Some(s) => s,
            None => return,
        };

        state.camera.update(gesture, dt);
        let camera_uniform = state.camera.uniform();
        state
            .queue
            .write_buffer(&state.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));

        let mut instances = build_instances(cloud);
        instances.truncate(state.instance_capacity);
        if !instances.is_empty() {
            state
                .queue
                .write_buffer(&state.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let output = match state.surface.get_current_texture() {
            Ok(t) => t,
            Err(_) => return,
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = state
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !instances.is_empty() {
                pass.set_pipeline(&state.render_pipeline);
                pass.set_bind_group(0, &state.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, state.instance_buffer.slice(..));
                pass.draw(0..6, 0..instances.len() as u32);
            }
        }

        state.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    });
}
