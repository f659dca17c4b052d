//! Minimal PowerPoint (`.pptx`) writer.
//!
//! Builds a PresentationML package with one blank layout, solid slide
//! backgrounds, text boxes, rectangles, lines, embedded pictures and
//! speaker notes.
//!
//! ```no_run
//! use slidegen_pptx::{Frame, Presentation, TextStyle};
//!
//! # fn main() -> slidegen_pptx::Result<()> {
//! let mut pres = Presentation::new();
//! pres.set_title("Quarterly Review");
//! pres.add_slide()
//!     .set_background("FFFFFF")
//!     .add_text("Quarterly Review", Frame::inches(0.5, 2.0, 9.0, 1.5), TextStyle::new(44.0).bold());
//! pres.save("review.pptx")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod media;
mod package;
pub mod presentation;
pub mod shape;
pub mod slide;
mod template;
pub mod units;
mod xml;

pub use error::{PptxError, Result};
pub use media::ImageFormat;
pub use presentation::Presentation;
pub use shape::{Align, Shape, TextStyle, VerticalAlign};
pub use slide::Slide;
pub use units::{inches, points, Frame, SLIDE_HEIGHT_16X9, SLIDE_WIDTH_16X9};
