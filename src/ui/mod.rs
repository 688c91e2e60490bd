/// Terminal front-end: device input, settings panel and rendering.

pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sliders;
