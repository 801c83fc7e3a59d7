pub mod config;
pub mod error;
pub mod hook;
pub mod parse;
pub mod registry;
pub mod transform;

pub use hook::{ParameterObject, SocketHookRecord};
pub use transform::{ConvertOptions, RouteConverter, convert_manifest, convert_route};
