//! Keyboard input
//!
//! Engine-level key codes, so scenes never depend on the windowing crate.

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// 0 key
    Num0,
    /// 1 key
    Num1,
    /// 2 key
    Num2,
    /// 3 key
    Num3,
    /// 4 key
    Num4,
    /// 5 key
    Num5,
    /// 6 key
    Num6,
    /// 7 key
    Num7,
    /// 8 key
    Num8,
    /// 9 key
    Num9,
    /// Space bar
    Space,
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Backspace
    Backspace,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Left shift
    LeftShift,
    /// Right shift
    RightShift,
}

impl KeyCode {
    /// Map a glfw key, `None` for keys the engine does not expose
    pub fn from_glfw(key: glfw::Key) -> Option<Self> {
        let code = match key {
            glfw::Key::A => Self::A,
            glfw::Key::B => Self::B,
            glfw::Key::C => Self::C,
            glfw::Key::D => Self::D,
            glfw::Key::E => Self::E,
            glfw::Key::F => Self::F,
            glfw::Key::G => Self::G,
            glfw::Key::H => Self::H,
            glfw::Key::I => Self::I,
            glfw::Key::J => Self::J,
            glfw::Key::K => Self::K,
            glfw::Key::L => Self::L,
            glfw::Key::M => Self::M,
            glfw::Key::N => Self::N,
            glfw::Key::O => Self::O,
            glfw::Key::P => Self::P,
            glfw::Key::Q => Self::Q,
            glfw::Key::R => Self::R,
            glfw::Key::S => Self::S,
            glfw::Key::T => Self::T,
            glfw::Key::U => Self::U,
            glfw::Key::V => Self::V,
            glfw::Key::W => Self::W,
            glfw::Key::X => Self::X,
            glfw::Key::Y => Self::Y,
            glfw::Key::Z => Self::Z,
            glfw::Key::Num0 => Self::Num0,
            glfw::Key::Num1 => Self::Num1,
            glfw::Key::Num2 => Self::Num2,
            glfw::Key::Num3 => Self::Num3,
            glfw::Key::Num4 => Self::Num4,
            glfw::Key::Num5 => Self::Num5,
            glfw::Key::Num6 => Self::Num6,
            glfw::Key::Num7 => Self::Num7,
            glfw::Key::Num8 => Self::Num8,
            glfw::Key::Num9 => Self::Num9,
            glfw::Key::Space => Self::Space,
            glfw::Key::Enter => Self::Enter,
            glfw::Key::Escape => Self::Escape,
            glfw::Key::Tab => Self::Tab,
            glfw::Key::Backspace => Self::Backspace,
            glfw::Key::Up => Self::Up,
            glfw::Key::Down => Self::Down,
            glfw::Key::Left => Self::Left,
            glfw::Key::Right => Self::Right,
            glfw::Key::LeftShift => Self::LeftShift,
            glfw::Key::RightShift => Self::RightShift,
            _ => return None,
        };
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glfw_mapping() {
        assert_eq!(KeyCode::from_glfw(glfw::Key::Escape), Some(KeyCode::Escape));
        assert_eq!(KeyCode::from_glfw(glfw::Key::M), Some(KeyCode::M));
        assert_eq!(KeyCode::from_glfw(glfw::Key::Num7), Some(KeyCode::Num7));
        assert_eq!(KeyCode::from_glfw(glfw::Key::F12), None);
    }
}
