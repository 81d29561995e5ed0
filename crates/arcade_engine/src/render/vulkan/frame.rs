//! Per-frame GPU objects for the canvas copy
//!
//! The presenter keeps exactly one frame in flight, so it needs one pair of
//! semaphores, one fence and one reusable command buffer.

use crate::render::vulkan::{VulkanError, VulkanResult};
use ash::{vk, Device};

/// Synchronization for a single in-flight present
///
/// `acquired` orders the copy after the swapchain hands out an image,
/// `copied` orders the present after the copy, and `idle` tells the CPU the
/// staging buffer may be written again.
pub struct PresentSync {
    device: Device,
    acquired: vk::Semaphore,
    copied: vk::Semaphore,
    idle: vk::Fence,
}

impl PresentSync {
    /// Create the semaphores and an already signaled fence
    pub fn new(device: &Device) -> VulkanResult<Self> {
        let semaphore_info = vk::SemaphoreCreateInfo::builder();
        // Signaled, so the first frame does not wait on a copy that never ran
        let fence_info = vk::FenceCreateInfo::builder().flags(vk::FenceCreateFlags::SIGNALED);

        // Handles created so far are released by `Drop` on early return
        let mut sync = Self {
            device: device.clone(),
            acquired: vk::Semaphore::null(),
            copied: vk::Semaphore::null(),
            idle: vk::Fence::null(),
        };
        unsafe {
            sync.acquired = device
                .create_semaphore(&semaphore_info, None)
                .map_err(VulkanError::Api)?;
            sync.copied = device
                .create_semaphore(&semaphore_info, None)
                .map_err(VulkanError::Api)?;
            sync.idle = device.create_fence(&fence_info, None).map_err(VulkanError::Api)?;
        }
        Ok(sync)
    }

    /// Block until the previous copy has finished reading the staging buffer
    pub fn wait_for_previous(&self) -> VulkanResult<()> {
        unsafe {
            self.device
                .wait_for_fences(&[self.idle], true, u64::MAX)
                .map_err(VulkanError::Api)
        }
    }

    /// Unsignal the fence and hand it to the next submit
    ///
    /// Only call this right before submitting: a reset fence that is never
    /// submitted blocks the next [`wait_for_previous`](Self::wait_for_previous)
    /// forever.
    pub fn arm(&self) -> VulkanResult<vk::Fence> {
        unsafe {
            self.device
                .reset_fences(&[self.idle])
                .map_err(VulkanError::Api)?;
        }
        Ok(self.idle)
    }

    /// Signaled by image acquisition
    pub fn acquired(&self) -> vk::Semaphore {
        self.acquired
    }

    /// Signaled by the copy submit, waited on by present
    pub fn copied(&self) -> vk::Semaphore {
        self.copied
    }
}

impl Drop for PresentSync {
    fn drop(&mut self) {
        // Destroying null handles is a no-op
        unsafe {
            self.device.destroy_fence(self.idle, None);
            self.device.destroy_semaphore(self.copied, None);
            self.device.destroy_semaphore(self.acquired, None);
        }
    }
}

/// The one command buffer the copy is re-recorded into every frame
pub struct CopyCommands {
    device: Device,
    pool: vk::CommandPool,
    buffer: vk::CommandBuffer,
}

impl CopyCommands {
    /// Create a resettable pool on `queue_family` with one primary buffer
    pub fn new(device: &Device, queue_family: u32) -> VulkanResult<Self> {
        let pool_info = vk::CommandPoolCreateInfo::builder()
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
            .queue_family_index(queue_family);
        let pool = unsafe {
            device
                .create_command_pool(&pool_info, None)
                .map_err(VulkanError::Api)?
        };

        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);
        let allocated = unsafe { device.allocate_command_buffers(&alloc_info) };
        let buffer = match allocated.map(|buffers| buffers.first().copied()) {
            Ok(Some(buffer)) => buffer,
            Ok(None) => {
                unsafe { device.destroy_command_pool(pool, None) };
                return Err(VulkanError::Api(vk::Result::ERROR_OUT_OF_HOST_MEMORY));
            }
            Err(e) => {
                unsafe { device.destroy_command_pool(pool, None) };
                return Err(VulkanError::Api(e));
            }
        };

        Ok(Self {
            device: device.clone(),
            pool,
            buffer,
        })
    }

    /// Reset the buffer and start a one-shot recording
    ///
    /// The caller must have waited on the previous submit's fence.
    pub fn begin(&self) -> VulkanResult<vk::CommandBuffer> {
        let begin_info = vk::CommandBufferBeginInfo::builder()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        unsafe {
            self.device
                .reset_command_buffer(self.buffer, vk::CommandBufferResetFlags::empty())
                .map_err(VulkanError::Api)?;
            self.device
                .begin_command_buffer(self.buffer, &begin_info)
                .map_err(VulkanError::Api)?;
        }
        Ok(self.buffer)
    }

    /// Finish recording
    pub fn end(&self) -> VulkanResult<vk::CommandBuffer> {
        unsafe {
            self.device
                .end_command_buffer(self.buffer)
                .map_err(VulkanError::Api)?;
        }
        Ok(self.buffer)
    }
}

impl Drop for CopyCommands {
    fn drop(&mut self) {
        // Freeing the pool frees its buffer; the presenter has already waited
        // for the device to go idle
        unsafe {
            self.device.destroy_command_pool(self.pool, None);
        }
    }
}
