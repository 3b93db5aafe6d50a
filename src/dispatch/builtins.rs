use crate::core::{TypeTag, Value};

use super::MatchRule;

/// Interface implemented by error handler objects
pub const HANDLER_INTERFACE: &str = "Whoops\\Handler\\HandlerInterface";

/// Default dumpers covering every possible value, in registration order.
///
/// Evaluation runs in reverse, so handlers are checked before objects,
/// objects before arrays, and the generic dumper catches the rest.
pub fn default_rules() -> Vec<MatchRule> {
    vec![
        // Match all variables:
        MatchRule::all("whoops.generic", "views/dumper/generic.html.php"),
        // Match arrays:
        MatchRule::equal("whoops.array", "views/dumper/array.html.php", TypeTag::Array),
        // Match objects:
        MatchRule::equal("whoops.object", "views/dumper/object.html.php", TypeTag::Object),
        // Match error handlers:
        MatchRule::predicate(
            "whoops.handler",
            "views/dumper/whoops_handler.html.php",
            is_handler,
        ),
    ]
}

fn is_handler(value: &Value) -> anyhow::Result<bool> {
    Ok(value
        .as_object()
        .is_some_and(|o| o.implements(HANDLER_INTERFACE)))
}
