pub mod anim;
pub mod app;
pub mod backdrop;
pub mod boundary;
pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod lifecycle;
pub mod overlay;
pub mod page;
pub mod retro_tv;

pub use error::Error;
