pub mod animation;
pub mod config;
pub mod error;
pub mod field;
pub mod outline;
pub mod path;
pub mod renderer;
pub mod ticker;
pub mod view;

#[cfg(feature = "gui")]
pub mod gui;

pub use animation::{AnalyticSpringRunner, Spring, SpringRunner, SpringStatus};
pub use config::{ElasticConfig, SpringConfig};
pub use error::ElasticError;
pub use field::ElasticTextField;
pub use outline::{Bounds, ControlPointModel, ControlPoints, Edge};
pub use path::{build_path, ElasticPath, QuadSegment, ShapeMesh};
pub use renderer::{ShapeParams, ShapeRenderer};
pub use ticker::{FrameTicker, ManualTicker};
pub use view::{ElasticSurface, ElasticView, Phase, Rgba};
