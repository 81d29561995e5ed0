//! Window management using GLFW
//!
//! A fixed-size window without a client API, presented through Vulkan.

use crate::events::AppEvent;
use crate::input::KeyCode;
use crate::render::vulkan::{FramePresenter, VulkanContext};
use crate::render::{Canvas, Display, RenderError};
use ash::vk;
use glfw::{Action, WindowEvent};

/// GLFW window presenting software frames through Vulkan
///
/// Field order is drop order: the presenter owns the surface and must go
/// before the window.
pub struct GlfwDisplay {
    presenter: FramePresenter,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    glfw: glfw::Glfw,
}

impl GlfwDisplay {
    /// Open a window with a client area of `width` x `height`
    pub fn open(title: &str, width: u32, height: u32, centered: bool) -> Result<Self, RenderError> {
        let mut glfw = glfw::init(glfw::log_errors)
            .map_err(|e| RenderError::Window(format!("GLFW initialization failed: {:?}", e)))?;

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| RenderError::Window("Window creation failed".to_string()))?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_focus_polling(true);
        window.set_framebuffer_size_polling(true);

        if centered {
            center_window(&mut glfw, &mut window, width, height);
        }

        let context = VulkanContext::new(&glfw, &window, title)?;
        let presenter = FramePresenter::new(context, framebuffer_extent(&window))?;

        log::info!("Opened window '{}' ({}x{})", title, width, height);

        Ok(Self {
            presenter,
            window,
            events,
            glfw,
        })
    }

    fn translate(event: WindowEvent) -> Option<AppEvent> {
        match event {
            WindowEvent::Close => Some(AppEvent::CloseRequested),
            WindowEvent::Key(key, _, Action::Press, _) => {
                KeyCode::from_glfw(key).map(AppEvent::KeyPressed)
            }
            WindowEvent::Key(key, _, Action::Release, _) => {
                KeyCode::from_glfw(key).map(AppEvent::KeyReleased)
            }
            WindowEvent::Focus(focused) => Some(AppEvent::FocusChanged(focused)),
            _ => None,
        }
    }
}

impl Display for GlfwDisplay {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.glfw.poll_events();

        let mut resized = false;
        let mut events: Vec<AppEvent> = glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| {
                if matches!(event, WindowEvent::FramebufferSize(..)) {
                    resized = true;
                }
                Self::translate(event)
            })
            .collect();

        if resized {
            if let Err(e) = self.presenter.recreate_swapchain(framebuffer_extent(&self.window)) {
                log::warn!("Failed to rebuild swapchain after resize: {}", e);
            }
        }

        if self.window.should_close() && !events.contains(&AppEvent::CloseRequested) {
            events.push(AppEvent::CloseRequested);
        }
        events
    }

    fn present(&mut self, canvas: &Canvas) -> Result<(), RenderError> {
        self.presenter.present(
            canvas.pixels(),
            canvas.width(),
            canvas.height(),
            framebuffer_extent(&self.window),
        )?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn resize(&mut self, width: u32, height: u32, centered: bool) -> Result<(), RenderError> {
        self.window.set_size(width as i32, height as i32);
        if centered {
            center_window(&mut self.glfw, &mut self.window, width, height);
        }
        self.presenter
            .recreate_swapchain(vk::Extent2D { width, height })?;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_size();
        (width as u32, height as u32)
    }
}

fn framebuffer_extent(window: &glfw::PWindow) -> vk::Extent2D {
    let (width, height) = window.get_framebuffer_size();
    vk::Extent2D {
        width: width.max(0) as u32,
        height: height.max(0) as u32,
    }
}

fn center_window(glfw: &mut glfw::Glfw, window: &mut glfw::PWindow, width: u32, height: u32) {
    let video_mode =
        glfw.with_primary_monitor(|_, monitor| monitor.and_then(|m| m.get_video_mode()));
    match video_mode {
        Some(mode) => {
            let x = (mode.width as i32 - width as i32) / 2;
            let y = (mode.height as i32 - height as i32) / 2;
            window.set_pos(x.max(0), y.max(0));
        }
        None => log::debug!("No primary monitor, leaving window position to the system"),
    }
}
