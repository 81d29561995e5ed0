//! Copy-target swapchain
//!
//! Images are only ever written by transfer commands, so there are no image
//! views or framebuffers. The sizing and format choices are plain functions
//! over what the surface reports.

use crate::render::vulkan::{VulkanContext, VulkanError, VulkanResult};
use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::{vk, Device};

/// Formats the canvas can be copied into without conversion, best first
///
/// Canvas bytes are already sRGB encoded, so UNORM keeps the copy 1:1.
const COPY_FORMATS: [vk::Format; 2] = [vk::Format::B8G8R8A8_UNORM, vk::Format::R8G8B8A8_UNORM];

/// Image size for a surface: its fixed extent, or the window size clamped to
/// what it accepts when the surface leaves the choice to us
fn image_extent(caps: &vk::SurfaceCapabilitiesKHR, window: vk::Extent2D) -> vk::Extent2D {
    if caps.current_extent.width != u32::MAX {
        return caps.current_extent;
    }
    let (min, max) = (caps.min_image_extent, caps.max_image_extent);
    vk::Extent2D {
        width: window.width.clamp(min.width, max.width),
        height: window.height.clamp(min.height, max.height),
    }
}

/// One image more than the minimum, so acquiring rarely blocks
fn image_count(caps: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let wanted = caps.min_image_count + 1;
    match caps.max_image_count {
        0 => wanted,
        max => wanted.min(max),
    }
}

fn copy_format(available: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    COPY_FORMATS
        .iter()
        .find_map(|&wanted| available.iter().find(|sf| sf.format == wanted).copied())
        .or_else(|| available.first().copied())
}

/// Swapchain whose images receive the canvas copy
pub struct Swapchain {
    device: Device,
    loader: SwapchainLoader,
    handle: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    format: vk::Format,
    extent: vk::Extent2D,
}

impl Swapchain {
    /// Create a swapchain for the context's surface, retiring `previous` if
    /// it is not null
    pub fn new(
        context: &VulkanContext,
        window: vk::Extent2D,
        previous: vk::SwapchainKHR,
    ) -> VulkanResult<Self> {
        let gpu = context.gpu().handle;
        let surface = context.surface();
        let surfaces = context.surface_loader();

        let caps = unsafe {
            surfaces
                .get_physical_device_surface_capabilities(gpu, surface)
                .map_err(VulkanError::Api)?
        };
        if !caps.supported_usage_flags.contains(vk::ImageUsageFlags::TRANSFER_DST) {
            return Err(VulkanError::InitializationFailed(
                "Surface does not accept transfer writes".to_string(),
            ));
        }

        let formats = unsafe {
            surfaces
                .get_physical_device_surface_formats(gpu, surface)
                .map_err(VulkanError::Api)?
        };
        let format = copy_format(&formats).ok_or_else(|| {
            VulkanError::InitializationFailed("Surface reports no formats".to_string())
        })?;
        let extent = image_extent(&caps, window);

        let queues = context.gpu().queues;
        let shared = [queues.graphics, queues.present];
        let mut info = vk::SwapchainCreateInfoKHR::builder()
            .surface(surface)
            .min_image_count(image_count(&caps))
            .image_format(format.format)
            .image_color_space(format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::TRANSFER_DST)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(caps.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            // FIFO is the one mode every driver has, and it paces to vsync
            .present_mode(vk::PresentModeKHR::FIFO)
            .clipped(true)
            .old_swapchain(previous);
        if !queues.is_unified() {
            info = info
                .image_sharing_mode(vk::SharingMode::CONCURRENT)
                .queue_family_indices(&shared);
        }

        let loader = SwapchainLoader::new(context.instance(), context.device());
        let handle = unsafe { loader.create_swapchain(&info, None).map_err(VulkanError::Api)? };
        let images = match unsafe { loader.get_swapchain_images(handle) } {
            Ok(images) => images,
            Err(e) => {
                unsafe { loader.destroy_swapchain(handle, None) };
                return Err(VulkanError::Api(e));
            }
        };

        log::debug!(
            "Swapchain {}x{} {:?} with {} images",
            extent.width,
            extent.height,
            format.format,
            images.len()
        );

        Ok(Self {
            device: context.device().clone(),
            loader,
            handle,
            images,
            format: format.format,
            extent,
        })
    }

    /// True if the images store blue before red
    pub fn is_bgra(&self) -> bool {
        matches!(self.format, vk::Format::B8G8R8A8_UNORM | vk::Format::B8G8R8A8_SRGB)
    }

    /// Image size
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Image at `index`, as returned by acquisition
    pub fn image(&self, index: u32) -> Option<vk::Image> {
        self.images.get(index as usize).copied()
    }

    /// Raw handle
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.handle
    }

    /// Extension functions for acquire and present
    pub fn loader(&self) -> &SwapchainLoader {
        &self.loader
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device_wait_idle();
            self.loader.destroy_swapchain(self.handle, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(current: (u32, u32), min_images: u32, max_images: u32) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D { width: current.0, height: current.1 },
            min_image_extent: vk::Extent2D { width: 1, height: 1 },
            max_image_extent: vk::Extent2D { width: 1024, height: 768 },
            min_image_count: min_images,
            max_image_count: max_images,
            ..Default::default()
        }
    }

    fn format(format: vk::Format) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }
    }

    fn size(extent: vk::Extent2D) -> (u32, u32) {
        (extent.width, extent.height)
    }

    #[test]
    fn test_fixed_surface_extent_wins() {
        let window = vk::Extent2D { width: 800, height: 600 };
        assert_eq!(size(image_extent(&caps((200, 200), 2, 3), window)), (200, 200));
    }

    #[test]
    fn test_free_extent_clamps_window_size() {
        let window = vk::Extent2D { width: 4000, height: 0 };
        let extent = image_extent(&caps((u32::MAX, u32::MAX), 2, 3), window);
        assert_eq!(size(extent), (1024, 1));
    }

    #[test]
    fn test_image_count_respects_maximum() {
        assert_eq!(image_count(&caps((1, 1), 2, 0)), 3);
        assert_eq!(image_count(&caps((1, 1), 2, 8)), 3);
        assert_eq!(image_count(&caps((1, 1), 3, 3)), 3);
    }

    #[test]
    fn test_copy_format_preference() {
        let chosen = |available: &[vk::SurfaceFormatKHR]| copy_format(available).map(|f| f.format);

        let both = [format(vk::Format::R8G8B8A8_UNORM), format(vk::Format::B8G8R8A8_UNORM)];
        assert_eq!(chosen(&both), Some(vk::Format::B8G8R8A8_UNORM));

        let odd = [format(vk::Format::A2B10G10R10_UNORM_PACK32)];
        assert_eq!(chosen(&odd), Some(vk::Format::A2B10G10R10_UNORM_PACK32));
        assert_eq!(chosen(&[]), None);
    }
}
