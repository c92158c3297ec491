// ABOUTME: Tool module - the Tool trait, the Registry that dispatches by name,
// ABOUTME: and the ToolResult every invocation produces.

mod registry;
mod result;
mod traits;

pub use registry::*;
pub use result::*;
pub use traits::*;
