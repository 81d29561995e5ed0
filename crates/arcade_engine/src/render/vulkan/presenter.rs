//! Frame presentation
//!
//! One frame in flight: wait for the previous copy, acquire an image, write
//! the canvas into the staging buffer, record clear + copy, submit, present.
//! An out-of-date swapchain is rebuilt and the frame is dropped.

use crate::render::vulkan::frame::{CopyCommands, PresentSync};
use crate::render::vulkan::{Swapchain, VulkanContext, VulkanError, VulkanResult};
use ash::{vk, Device};

/// Host-visible buffer the canvas is written into
struct StagingBuffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    mapped: *mut u8,
    size: vk::DeviceSize,
}

impl StagingBuffer {
    fn new(context: &VulkanContext, size: vk::DeviceSize) -> VulkanResult<Self> {
        let device = context.device().clone();
        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(vk::BufferUsageFlags::TRANSFER_SRC)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { device.create_buffer(&buffer_info, None).map_err(VulkanError::Api)? };
        let requirements = unsafe { device.get_buffer_memory_requirements(buffer) };

        let memory_type = match context.gpu().memory_type(
            requirements.memory_type_bits,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        ) {
            Ok(index) => index,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type);

        let memory = match unsafe { device.allocate_memory(&alloc_info, None) } {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(VulkanError::Api(e));
            }
        };

        let mapped = unsafe {
            device
                .bind_buffer_memory(buffer, memory, 0)
                .and_then(|()| device.map_memory(memory, 0, size, vk::MemoryMapFlags::empty()))
        };
        let mapped = match mapped {
            Ok(ptr) => ptr.cast::<u8>(),
            Err(e) => {
                unsafe {
                    device.destroy_buffer(buffer, None);
                    device.free_memory(memory, None);
                }
                return Err(VulkanError::Api(e));
            }
        };

        Ok(Self {
            device,
            buffer,
            memory,
            mapped,
            size,
        })
    }

    /// Copy RGBA pixels in, swapping red and blue for BGRA targets
    fn write(&mut self, pixels: &[u8], bgra: bool) {
        let len = pixels.len().min(self.size as usize);
        // SAFETY: `mapped` points to `size` bytes of host-coherent memory that
        // stays mapped for the buffer's lifetime, and the in-flight fence was
        // waited on, so the GPU is not reading it.
        let dst = unsafe { std::slice::from_raw_parts_mut(self.mapped, len) };
        if bgra {
            for (out, px) in dst.chunks_exact_mut(4).zip(pixels.chunks_exact(4)) {
                out.copy_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        } else {
            dst.copy_from_slice(&pixels[..len]);
        }
    }
}

impl Drop for StagingBuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.unmap_memory(self.memory);
            self.device.destroy_buffer(self.buffer, None);
            self.device.free_memory(self.memory, None);
        }
    }
}

/// Copies CPU frames to the window through a swapchain
///
/// Field order is drop order: everything created from the context goes
/// before it.
pub struct FramePresenter {
    staging: Option<StagingBuffer>,
    sync: PresentSync,
    commands: CopyCommands,
    swapchain: Swapchain,
    context: VulkanContext,
}

impl FramePresenter {
    /// Create the presenter for a window of the given framebuffer size
    pub fn new(context: VulkanContext, extent: vk::Extent2D) -> VulkanResult<Self> {
        let swapchain = Swapchain::new(&context, extent, vk::SwapchainKHR::null())?;
        let commands = CopyCommands::new(context.device(), context.gpu().queues.graphics)?;
        let sync = PresentSync::new(context.device())?;

        Ok(Self {
            staging: None,
            sync,
            commands,
            swapchain,
            context,
        })
    }

    /// Rebuild the swapchain for a new framebuffer size
    pub fn recreate_swapchain(&mut self, extent: vk::Extent2D) -> VulkanResult<()> {
        if extent.width == 0 || extent.height == 0 {
            // Minimized; keep the old swapchain until there is something to show
            return Ok(());
        }
        self.context.wait_idle();
        let swapchain = Swapchain::new(&self.context, extent, self.swapchain.handle())?;
        self.swapchain = swapchain;
        Ok(())
    }

    /// Present `pixels` (tightly packed RGBA, `width` x `height`)
    ///
    /// The frame is copied to the top-left of the swapchain image and cropped
    /// if larger; any uncovered area is black.
    pub fn present(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        framebuffer_extent: vk::Extent2D,
    ) -> VulkanResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.sync.wait_for_previous()?;

        let acquired = unsafe {
            self.swapchain.loader().acquire_next_image(
                self.swapchain.handle(),
                u64::MAX,
                self.sync.acquired(),
                vk::Fence::null(),
            )
        };
        let image_index = match acquired {
            Ok((index, _suboptimal)) => index,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                return self.recreate_swapchain(framebuffer_extent);
            }
            Err(e) => return Err(VulkanError::Api(e)),
        };
        let image = self
            .swapchain
            .image(image_index)
            .ok_or(VulkanError::Api(vk::Result::ERROR_OUT_OF_DATE_KHR))?;

        let bgra = self.swapchain.is_bgra();
        let staging = self.staging_for(width, height)?;
        staging.write(pixels, bgra);
        let source = staging.buffer;

        let command_buffer = self.record_copy(source, image, width, height)?;
        self.submit(command_buffer)?;

        let wait = [self.sync.copied()];
        let swapchains = [self.swapchain.handle()];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&wait)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let presented = unsafe {
            self.swapchain
                .loader()
                .queue_present(self.context.present_queue(), &present_info)
        };
        match presented {
            Ok(false) => Ok(()),
            Ok(true) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                self.recreate_swapchain(framebuffer_extent)
            }
            Err(e) => Err(VulkanError::Api(e)),
        }
    }

    /// Staging buffer large enough for a `width` x `height` frame
    fn staging_for(&mut self, width: u32, height: u32) -> VulkanResult<&mut StagingBuffer> {
        let needed = vk::DeviceSize::from(width) * vk::DeviceSize::from(height) * 4;
        let fits = self.staging.as_ref().is_some_and(|staging| staging.size >= needed);
        if !fits {
            // Drop the old buffer first so both never exist at once
            self.staging = None;
            self.staging = Some(StagingBuffer::new(&self.context, needed)?);
        }
        self.staging.as_mut().ok_or(VulkanError::NoSuitableMemoryType)
    }

    fn submit(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()> {
        let wait = [self.sync.acquired()];
        let wait_stages = [vk::PipelineStageFlags::TRANSFER];
        let signal = [self.sync.copied()];
        let command_buffers = [command_buffer];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(&wait)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal)
            .build();

        let fence = self.sync.arm()?;
        unsafe {
            self.context
                .device()
                .queue_submit(self.context.graphics_queue(), &[submit_info], fence)
                .map_err(VulkanError::Api)
        }
    }

    /// Record: clear the image to black, copy the frame over it, hand the
    /// image to the presentation engine
    fn record_copy(
        &self,
        source: vk::Buffer,
        image: vk::Image,
        width: u32,
        height: u32,
    ) -> VulkanResult<vk::CommandBuffer> {
        let device = self.context.device();
        let target = self.swapchain.extent();
        let whole = color_range();
        let transfer_dst = vk::ImageLayout::TRANSFER_DST_OPTIMAL;

        let region = vk::BufferImageCopy::builder()
            .buffer_row_length(width)
            .buffer_image_height(height)
            .image_subresource(vk::ImageSubresourceLayers {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                mip_level: 0,
                base_array_layer: 0,
                layer_count: 1,
            })
            .image_extent(vk::Extent3D {
                width: width.min(target.width),
                height: height.min(target.height),
                depth: 1,
            })
            .build();
        let black = vk::ClearColorValue {
            float32: [0.0, 0.0, 0.0, 1.0],
        };

        let cb = self.commands.begin()?;
        let barrier = |from: Transition, to: Transition| unsafe {
            device.cmd_pipeline_barrier(
                cb,
                from.stage,
                to.stage,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[image_barrier(image, from, to)],
            );
        };

        barrier(Transition::UNUSED, Transition::WRITE);
        unsafe { device.cmd_clear_color_image(cb, image, transfer_dst, &black, &[whole]) };
        barrier(Transition::WRITE, Transition::WRITE);
        unsafe { device.cmd_copy_buffer_to_image(cb, source, image, transfer_dst, &[region]) };
        barrier(Transition::WRITE, Transition::PRESENT);

        self.commands.end()
    }
}

impl Drop for FramePresenter {
    fn drop(&mut self) {
        self.context.wait_idle();
    }
}

/// One side of an image layout transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    layout: vk::ImageLayout,
    access: vk::AccessFlags,
    stage: vk::PipelineStageFlags,
}

impl Transition {
    /// Freshly acquired; previous contents are discarded
    const UNUSED: Self = Self {
        layout: vk::ImageLayout::UNDEFINED,
        access: vk::AccessFlags::empty(),
        stage: vk::PipelineStageFlags::TOP_OF_PIPE,
    };
    /// Target of a clear or copy
    const WRITE: Self = Self {
        layout: vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        access: vk::AccessFlags::TRANSFER_WRITE,
        stage: vk::PipelineStageFlags::TRANSFER,
    };
    /// Owned by the presentation engine
    const PRESENT: Self = Self {
        layout: vk::ImageLayout::PRESENT_SRC_KHR,
        access: vk::AccessFlags::empty(),
        stage: vk::PipelineStageFlags::BOTTOM_OF_PIPE,
    };
}

fn color_range() -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        base_mip_level: 0,
        level_count: 1,
        base_array_layer: 0,
        layer_count: 1,
    }
}

fn image_barrier(image: vk::Image, from: Transition, to: Transition) -> vk::ImageMemoryBarrier {
    vk::ImageMemoryBarrier::builder()
        .src_access_mask(from.access)
        .dst_access_mask(to.access)
        .old_layout(from.layout)
        .new_layout(to.layout)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(color_range())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_barrier_discards_contents() {
        let barrier = image_barrier(vk::Image::null(), Transition::UNUSED, Transition::WRITE);
        assert_eq!(barrier.old_layout, vk::ImageLayout::UNDEFINED);
        assert_eq!(barrier.new_layout, vk::ImageLayout::TRANSFER_DST_OPTIMAL);
        assert_eq!(barrier.dst_access_mask, vk::AccessFlags::TRANSFER_WRITE);
    }

    #[test]
    fn test_clear_then_copy_keeps_layout() {
        let barrier = image_barrier(vk::Image::null(), Transition::WRITE, Transition::WRITE);
        assert_eq!(barrier.old_layout, barrier.new_layout);
        assert_eq!(barrier.src_access_mask, vk::AccessFlags::TRANSFER_WRITE);
    }

    #[test]
    fn test_last_barrier_hands_image_to_present() {
        let barrier = image_barrier(vk::Image::null(), Transition::WRITE, Transition::PRESENT);
        assert_eq!(barrier.new_layout, vk::ImageLayout::PRESENT_SRC_KHR);
        assert_eq!(barrier.subresource_range.layer_count, 1);
    }
}
