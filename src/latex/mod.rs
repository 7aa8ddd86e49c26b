//! LaTeX emission.
//!
//! - [`render`]: the recursive node-by-node walk
//! - [`rewrite`]: marker rewriting for paragraph and heading text
//! - [`sectioning`]: heading level to sectioning command
//! - [`figure`]: figure and formula blocks
//! - [`context`]: mode, side channels and diagnostics of a run

pub mod context;
pub mod figure;
pub mod render;
pub mod rewrite;
pub mod sectioning;

pub use context::{ConversionState, Diagnostic, Mode};
pub use figure::{FormulaPlacement, figure_block, image_file_name};
pub use render::Transducer;
pub use rewrite::{Applied, HEADING_RULES, PARAGRAPH_RULES, RewriteRule, apply_rules};
pub use sectioning::section_command;
