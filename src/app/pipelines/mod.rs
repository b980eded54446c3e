pub mod draw_pipeline;

pub use draw_pipeline::{run_draw, DrawPipeline};
