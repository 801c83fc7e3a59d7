pub mod accepts;
pub mod event_name;
pub mod parameter;
pub mod route;
pub mod text;
pub mod verb;

pub use route::{ConvertOptions, RouteConverter, convert_manifest, convert_route};
