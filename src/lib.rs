// ============================================================================
// prettypage Library
// ============================================================================

pub mod core;
pub mod dispatch;
pub mod editor;
pub mod handler;
pub mod tables;

// Re-export main types for convenience
pub use core::{Object, PageError, Renderer, Result, Table, TypeTag, Value};
pub use dispatch::{DispatchRegistry, MatchRule, Matcher};
pub use editor::{EditorResolver, EditorResolverRegistry, EditorSelector};
pub use handler::{
    CapabilityProbe, FailureInspector, Frame, HandleOutcome, HandlerConfig, Inspection,
    PageHandler, RenderContext, RequestContext, StaticRequestContext, TemplateExecutor,
};
pub use tables::{DataTableRegistry, TableEntry};
