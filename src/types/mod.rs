mod extension;
mod interval;
mod plan;

pub use extension::Extension;
pub use interval::Interval;
pub use plan::ClipPlan;
