//! Label markup renderer.
//!
//! Bound template markup is parsed into a [`LabelScene`] and drawn either as
//! a single PDF page sized exactly to the label or as a PNG preview at
//! 3.78 px/mm. Rendering happens inside a [`RenderSession`] obtained from a
//! [`SessionProvider`].

mod color;
mod error;
mod fonts;
mod metrics;
mod pdf;
mod raster;
mod scene;
mod session;

pub use color::Color;
pub use error::RenderError;
pub use fonts::{FontFace, FontLibrary};
pub use metrics::{FittedText, fit_text, text_width_mm};
pub use pdf::render_pdf;
pub use raster::render_png;
pub use scene::{Align, Element, Frame, ImageBox, LabelScene, TextBox, decode_data_uri};
pub use session::{Deadline, IsolatedSessions, RenderSession, SessionLease, SessionProvider};
