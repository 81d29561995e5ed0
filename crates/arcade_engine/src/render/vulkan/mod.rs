//! Vulkan presentation backend
//!
//! The engine draws on the CPU, so Vulkan is only used to move finished
//! frames to the screen: each frame is written to a host-visible staging
//! buffer and copied into the acquired swapchain image.

mod context;
mod frame;
mod presenter;
mod swapchain;

pub use context::{Gpu, QueueFamilies, VulkanContext, VulkanError, VulkanResult};
pub use presenter::FramePresenter;
pub use swapchain::Swapchain;
