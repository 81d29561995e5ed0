//! Vulkan context management
//!
//! Instance, window surface, GPU choice and the logical device with its
//! queues. Torn down in reverse order when the context drops.

use ash::extensions::khr::{Surface, Swapchain as SwapchainLoader};
use ash::{vk, Device, Entry, Instance};
use std::ffi::{c_char, CStr, CString};
use thiserror::Error;

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Vulkan context initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// No suitable memory type found for allocation
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Queue families the presenter submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    /// Runs the clear and copy commands
    pub graphics: u32,
    /// Presents to the window surface
    pub present: u32,
}

impl QueueFamilies {
    /// True if one family does both jobs
    pub fn is_unified(&self) -> bool {
        self.graphics == self.present
    }

    /// Pick queue families, preferring one that can both draw and present
    ///
    /// `can_present` is asked about each family index in order.
    pub fn pick(
        families: &[vk::QueueFamilyProperties],
        mut can_present: impl FnMut(u32) -> VulkanResult<bool>,
    ) -> VulkanResult<Option<Self>> {
        let mut graphics = None;
        let mut present = None;

        for (index, family) in (0u32..).zip(families) {
            let draws = family.queue_flags.contains(vk::QueueFlags::GRAPHICS);
            let presents = can_present(index)?;
            if draws && presents {
                return Ok(Some(Self { graphics: index, present: index }));
            }
            if draws {
                graphics = graphics.or(Some(index));
            }
            if presents {
                present = present.or(Some(index));
            }
        }

        Ok(graphics.zip(present).map(|(graphics, present)| Self { graphics, present }))
    }
}

/// Index of the first memory type allowed by `type_bits` with all `flags`
fn memory_type_index(
    memory: &vk::PhysicalDeviceMemoryProperties,
    type_bits: u32,
    flags: vk::MemoryPropertyFlags,
) -> Option<u32> {
    let count = memory.memory_type_count as usize;
    (0u32..)
        .zip(&memory.memory_types[..count])
        .find(|(index, ty)| type_bits & (1u32 << *index) != 0 && ty.property_flags.contains(flags))
        .map(|(index, _)| index)
}

/// The GPU chosen for presentation
pub struct Gpu {
    /// Physical device handle
    pub handle: vk::PhysicalDevice,
    /// Human readable device name
    pub name: String,
    /// Queue families used for copy and present
    pub queues: QueueFamilies,
    memory: vk::PhysicalDeviceMemoryProperties,
}

impl Gpu {
    /// First device with a swapchain extension and usable queues
    fn choose(
        instance: &Instance,
        surface: vk::SurfaceKHR,
        surfaces: &Surface,
    ) -> VulkanResult<Self> {
        let candidates =
            unsafe { instance.enumerate_physical_devices().map_err(VulkanError::Api)? };

        for handle in candidates {
            let name = unsafe {
                let properties = instance.get_physical_device_properties(handle);
                CStr::from_ptr(properties.device_name.as_ptr())
                    .to_string_lossy()
                    .into_owned()
            };

            if !Self::has_swapchain(instance, handle)? {
                log::debug!("Skipping GPU {}: no swapchain extension", name);
                continue;
            }

            let families = unsafe { instance.get_physical_device_queue_family_properties(handle) };
            let queues = QueueFamilies::pick(&families, |index| unsafe {
                surfaces
                    .get_physical_device_surface_support(handle, index, surface)
                    .map_err(VulkanError::Api)
            })?;
            let Some(queues) = queues else {
                log::debug!("Skipping GPU {}: cannot draw and present", name);
                continue;
            };

            let memory = unsafe { instance.get_physical_device_memory_properties(handle) };
            log::info!("Selected GPU: {}", name);
            return Ok(Self {
                handle,
                name,
                queues,
                memory,
            });
        }

        Err(VulkanError::InitializationFailed("No suitable GPU found".to_string()))
    }

    fn has_swapchain(instance: &Instance, handle: vk::PhysicalDevice) -> VulkanResult<bool> {
        let extensions = unsafe {
            instance
                .enumerate_device_extension_properties(handle)
                .map_err(VulkanError::Api)?
        };
        Ok(extensions.iter().any(|ext| {
            let name = unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) };
            name == SwapchainLoader::name()
        }))
    }

    /// Memory type for an allocation with the given requirements
    pub fn memory_type(&self, type_bits: u32, flags: vk::MemoryPropertyFlags) -> VulkanResult<u32> {
        memory_type_index(&self.memory, type_bits, flags).ok_or(VulkanError::NoSuitableMemoryType)
    }
}

/// Everything needed to talk to one GPU and one window surface
pub struct VulkanContext {
    _entry: Entry,
    instance: Instance,
    surface_loader: Surface,
    surface: vk::SurfaceKHR,
    gpu: Gpu,
    device: Device,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
}

impl VulkanContext {
    /// Create a context presenting to `window`
    pub fn new(glfw: &glfw::Glfw, window: &glfw::PWindow, app_name: &str) -> VulkanResult<Self> {
        let entry = unsafe { Entry::load() }.map_err(|e| {
            VulkanError::InitializationFailed(format!("Failed to load Vulkan: {}", e))
        })?;
        let instance = Self::create_instance(&entry, glfw, app_name)?;
        let surface_loader = Surface::new(&entry, &instance);

        let mut surface = vk::SurfaceKHR::null();
        let result =
            window.create_window_surface(instance.handle(), std::ptr::null(), &mut surface);
        if result != vk::Result::SUCCESS {
            unsafe { instance.destroy_instance(None) };
            return Err(VulkanError::InitializationFailed(format!(
                "Failed to create window surface: {:?}",
                result
            )));
        }

        let chosen = Gpu::choose(&instance, surface, &surface_loader)
            .and_then(|gpu| Ok((Self::create_device(&instance, &gpu)?, gpu)));
        let (device, gpu) = match chosen {
            Ok(parts) => parts,
            Err(e) => {
                unsafe {
                    surface_loader.destroy_surface(surface, None);
                    instance.destroy_instance(None);
                }
                return Err(e);
            }
        };

        let graphics_queue = unsafe { device.get_device_queue(gpu.queues.graphics, 0) };
        let present_queue = unsafe { device.get_device_queue(gpu.queues.present, 0) };

        Ok(Self {
            _entry: entry,
            instance,
            surface_loader,
            surface,
            gpu,
            device,
            graphics_queue,
            present_queue,
        })
    }

    fn create_instance(entry: &Entry, glfw: &glfw::Glfw, app_name: &str) -> VulkanResult<Instance> {
        let app_name = CString::new(app_name).unwrap_or_default();
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(c"arcade_engine")
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_0);

        // GLFW knows which surface extensions this platform needs
        let extensions: Vec<CString> = glfw
            .get_required_instance_extensions()
            .ok_or_else(|| {
                VulkanError::InitializationFailed("Window system has no Vulkan support".to_string())
            })?
            .into_iter()
            .map(CString::new)
            .collect::<Result<_, _>>()
            .map_err(|e| VulkanError::InitializationFailed(e.to_string()))?;
        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();

        let layers: Vec<*const c_char> = if cfg!(debug_assertions) && Self::has_validation(entry) {
            log::debug!("Enabling Vulkan validation layer");
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            Vec::new()
        };

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layers);

        unsafe { entry.create_instance(&create_info, None).map_err(VulkanError::Api) }
    }

    fn has_validation(entry: &Entry) -> bool {
        let Ok(layers) = entry.enumerate_instance_layer_properties() else {
            return false;
        };
        layers.iter().any(|layer| {
            let name = unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) };
            name == VALIDATION_LAYER
        })
    }

    fn create_device(instance: &Instance, gpu: &Gpu) -> VulkanResult<Device> {
        let priorities = [1.0];
        let queue_info = |family: u32| {
            vk::DeviceQueueCreateInfo::builder()
                .queue_family_index(family)
                .queue_priorities(&priorities)
                .build()
        };
        let mut queue_infos = vec![queue_info(gpu.queues.graphics)];
        if !gpu.queues.is_unified() {
            queue_infos.push(queue_info(gpu.queues.present));
        }

        let extensions = [SwapchainLoader::name().as_ptr()];
        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extensions);

        unsafe {
            instance
                .create_device(gpu.handle, &create_info, None)
                .map_err(VulkanError::Api)
        }
    }

    /// Instance handle wrapper
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Logical device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The chosen GPU
    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    /// Window surface
    pub fn surface(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Surface extension loader
    pub fn surface_loader(&self) -> &Surface {
        &self.surface_loader
    }

    /// Queue the copy is submitted to
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Queue frames are presented on
    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    /// Block until the GPU is idle
    pub fn wait_idle(&self) {
        if let Err(e) = unsafe { self.device.device_wait_idle() } {
            log::warn!("vkDeviceWaitIdle failed: {:?}", e);
        }
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
            self.surface_loader.destroy_surface(self.surface, None);
            self.instance.destroy_instance(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_prefers_family_that_draws_and_presents() {
        let families = [
            family(vk::QueueFlags::TRANSFER),
            family(vk::QueueFlags::GRAPHICS),
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER),
        ];
        let queues = QueueFamilies::pick(&families, |index| Ok(index != 1)).unwrap();

        assert_eq!(queues, Some(QueueFamilies { graphics: 2, present: 2 }));
        assert!(queues.is_some_and(|q| q.is_unified()));
    }

    #[test]
    fn test_split_families() {
        let families = [family(vk::QueueFlags::GRAPHICS), family(vk::QueueFlags::TRANSFER)];
        let queues = QueueFamilies::pick(&families, |index| Ok(index == 1)).unwrap();

        assert_eq!(queues, Some(QueueFamilies { graphics: 0, present: 1 }));
        assert!(queues.is_some_and(|q| !q.is_unified()));
    }

    #[test]
    fn test_no_present_support() {
        let families = [family(vk::QueueFlags::GRAPHICS)];
        assert_eq!(QueueFamilies::pick(&families, |_| Ok(false)).unwrap(), None);
    }

    #[test]
    fn test_surface_query_error_propagates() {
        let families = [family(vk::QueueFlags::GRAPHICS)];
        let result = QueueFamilies::pick(&families, |_| {
            Err(VulkanError::Api(vk::Result::ERROR_SURFACE_LOST_KHR))
        });
        assert!(matches!(result, Err(VulkanError::Api(vk::Result::ERROR_SURFACE_LOST_KHR))));
    }

    #[test]
    fn test_memory_type_index() {
        let mut memory = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: 3,
            ..Default::default()
        };
        memory.memory_types[0].property_flags = vk::MemoryPropertyFlags::DEVICE_LOCAL;
        memory.memory_types[1].property_flags = vk::MemoryPropertyFlags::HOST_VISIBLE;
        memory.memory_types[2].property_flags =
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        let host = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;

        assert_eq!(memory_type_index(&memory, 0b111, host), Some(2));
        assert_eq!(memory_type_index(&memory, 0b011, host), None);
        let visible = vk::MemoryPropertyFlags::HOST_VISIBLE;
        assert_eq!(memory_type_index(&memory, 0b010, visible), Some(1));
    }
}
