//! Game scenes

mod title;

pub use title::TitleScene;
