pub mod composer;
pub mod path;
pub mod renderer;
pub mod split;
pub mod surface;
pub mod widgets;

pub use composer::{FrameComposer, FrameError, FrameOutput, FrameVisuals};
pub use renderer::{FrameRenderer, RendererError};
pub use split::{SplitLayout, Widget};
pub use surface::{CommandList, DrawCommand, DrawSurface, RenderError};
